use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use rigquote_core::domain::party::{Party, PartyDraft, PartyId};

use crate::error::ApiResult;
use crate::http::RestClient;
use crate::inflight::SingleFlight;

/// Party CRUD plus a per-session read cache with an in-flight guard, so
/// rapid UI re-renders cannot stack duplicate fetches for the same record.
pub struct PartyGateway {
    rest: Arc<RestClient>,
    cache: Mutex<HashMap<PartyId, Party>>,
    loading: SingleFlight<PartyId>,
}

impl PartyGateway {
    pub(crate) fn new(rest: Arc<RestClient>) -> Self {
        Self { rest, cache: Mutex::new(HashMap::new()), loading: SingleFlight::new() }
    }

    pub async fn list(&self) -> ApiResult<Vec<Party>> {
        self.rest.get_json("/parties").await
    }

    /// Cached read of one party. `Ok(None)` means a fetch for the same id is
    /// already in flight; callers treat the record as still loading. A 404
    /// (party deleted between list and load) surfaces as `NotFound` so the
    /// caller can route back to the party list.
    pub async fn fetch(&self, id: &PartyId) -> ApiResult<Option<Party>> {
        if let Some(party) = self.cached(id) {
            return Ok(Some(party));
        }

        let Some(_token) = self.loading.begin(id.clone()) else {
            debug!(party_id = %id, "party fetch already in flight");
            return Ok(None);
        };

        let party: Party = self.rest.get_json(&format!("/parties/{id}")).await?;
        self.lock_cache().insert(id.clone(), party.clone());
        Ok(Some(party))
    }

    pub fn cached(&self, id: &PartyId) -> Option<Party> {
        self.lock_cache().get(id).cloned()
    }

    pub async fn create(&self, draft: &PartyDraft) -> ApiResult<Party> {
        let party: Party = self.rest.post_json("/parties", draft).await?;
        self.lock_cache().insert(party.id.clone(), party.clone());
        Ok(party)
    }

    pub async fn update(&self, id: &PartyId, draft: &PartyDraft) -> ApiResult<Party> {
        let party: Party = self.rest.put_json(&format!("/parties/{id}"), draft).await?;
        self.lock_cache().insert(party.id.clone(), party.clone());
        Ok(party)
    }

    pub async fn delete(&self, id: &PartyId) -> ApiResult<()> {
        self.rest.delete(&format!("/parties/{id}")).await?;
        self.lock_cache().remove(id);
        Ok(())
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<PartyId, Party>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
