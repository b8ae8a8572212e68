use std::sync::Arc;

use crate::http::RestClient;

/// Backend reachability as shown in the connectivity banner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
}

pub struct HealthGateway {
    rest: Arc<RestClient>,
}

impl HealthGateway {
    pub(crate) fn new(rest: Arc<RestClient>) -> Self {
        Self { rest }
    }

    /// Liveness probe: any 2xx means online, everything else (including a
    /// transport failure) means offline.
    pub async fn check(&self) -> Connectivity {
        if self.rest.probe("/health").await {
            Connectivity::Online
        } else {
            Connectivity::Offline
        }
    }
}
