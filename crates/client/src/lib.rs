pub mod catalog;
pub mod debounce;
pub mod error;
pub mod health;
pub mod http;
pub mod inflight;
pub mod parties;
pub mod quotations;

use std::sync::Arc;

use rigquote_core::config::AppConfig;

pub use catalog::CatalogGateway;
pub use debounce::{Debouncer, EDIT_SETTLE, PRINT_SETTLE};
pub use error::{ApiError, ApiResult};
pub use health::{Connectivity, HealthGateway};
pub use http::RestClient;
pub use inflight::SingleFlight;
pub use parties::PartyGateway;
pub use quotations::{filter_records, QuotationGateway, SaveOptions};

/// All gateways sharing one HTTP client, wired from the app config.
pub struct ApiClient {
    pub parties: PartyGateway,
    pub quotations: QuotationGateway,
    pub catalog: CatalogGateway,
    pub health: HealthGateway,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> ApiResult<Self> {
        let rest = Arc::new(RestClient::new(&config.backend)?);
        Ok(Self {
            parties: PartyGateway::new(Arc::clone(&rest)),
            quotations: QuotationGateway::new(Arc::clone(&rest)),
            catalog: CatalogGateway::new(Arc::clone(&rest), config.catalog.allow_fallback),
            health: HealthGateway::new(rest),
        })
    }
}
