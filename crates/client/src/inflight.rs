use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};

/// Guard against overlapping requests for the same resource.
///
/// The first caller for a key gets a token; anyone asking for the same key
/// while the token is alive gets `None` and should treat the resource as
/// "still loading". The duplicate is neither queued nor cancelled.
#[derive(Debug)]
pub struct SingleFlight<K> {
    inflight: Mutex<HashSet<K>>,
}

impl<K: Clone + Eq + Hash> SingleFlight<K> {
    pub fn new() -> Self {
        Self { inflight: Mutex::new(HashSet::new()) }
    }

    pub fn begin(&self, key: K) -> Option<FlightToken<'_, K>> {
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        if inflight.insert(key.clone()) {
            Some(FlightToken { owner: self, key })
        } else {
            None
        }
    }
}

impl<K: Clone + Eq + Hash> Default for SingleFlight<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases the key when dropped, whether the request finished or failed.
pub struct FlightToken<'a, K: Clone + Eq + Hash> {
    owner: &'a SingleFlight<K>,
    key: K,
}

impl<K: Clone + Eq + Hash> Drop for FlightToken<'_, K> {
    fn drop(&mut self) {
        let mut inflight = self.owner.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        inflight.remove(&self.key);
    }
}
