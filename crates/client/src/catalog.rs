use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use rigquote_core::catalog::{fallback_catalog, CatalogEntry};

use crate::error::{ApiError, ApiResult};
use crate::http::RestClient;

/// Shape of the backend components endpoint.
#[derive(Debug, Deserialize)]
struct ComponentsEnvelope {
    #[serde(rename = "PC_Components")]
    pc_components: Vec<CatalogEntry>,
}

/// Read-only component reference data, degraded to the bundled dataset when
/// the backend cannot serve a usable catalog.
pub struct CatalogGateway {
    rest: Arc<RestClient>,
    allow_fallback: bool,
}

impl CatalogGateway {
    pub(crate) fn new(rest: Arc<RestClient>, allow_fallback: bool) -> Self {
        Self { rest, allow_fallback }
    }

    /// Fetch the catalog. Any failure (non-2xx, a non-JSON body, an
    /// unexpected shape, an empty list) degrades to the bundled dataset,
    /// so with the fallback enabled this never returns an error. The
    /// degraded mode is intentional, not an error path.
    pub async fn load(&self) -> ApiResult<Vec<CatalogEntry>> {
        let failure = match self.rest.get_json::<ComponentsEnvelope>("/components").await {
            Ok(envelope) if !envelope.pc_components.is_empty() => {
                return Ok(envelope.pc_components)
            }
            Ok(_) => ApiError::Unexpected("backend catalog had no entries".to_string()),
            Err(error) => error,
        };

        if !self.allow_fallback {
            return Err(failure);
        }

        warn!(error = %failure, "catalog fetch failed, serving the bundled dataset");
        Ok(fallback_catalog())
    }
}
