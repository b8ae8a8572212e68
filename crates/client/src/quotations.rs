use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use rigquote_core::domain::business::BusinessDetails;
use rigquote_core::domain::party::{Party, PartyId};
use rigquote_core::domain::quotation::{
    QuotationId, QuotationItem, QuotationStatus, SavedQuotationRecord,
};
use rigquote_core::pricing::QuoteTotals;
use rigquote_core::revision;
use rigquote_core::session::QuotationSession;

use crate::error::{ApiError, ApiResult};
use crate::http::RestClient;
use crate::inflight::SingleFlight;

/// Caller knobs for [`QuotationGateway::save`].
#[derive(Clone, Debug, Default)]
pub struct SaveOptions {
    /// Title to base the save on; defaults to `"Quotation for {party}"`.
    /// Any ` (n)` revision suffix is stripped before numbering.
    pub base_title: Option<String>,
    pub create_revision: bool,
    pub source_quotation_id: Option<QuotationId>,
}

/// What the backend receives on save. Totals are client-computed and
/// included even though the backend may recompute them; the client values
/// drive immediate UI feedback.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuotationPayload {
    title: String,
    quotation_number: Option<String>,
    date: NaiveDate,
    valid_until: NaiveDate,
    status: QuotationStatus,
    total_amount: Decimal,
    totals: QuoteTotals,
    revision_number: Option<u32>,
    revision_of: Option<QuotationId>,
    party: Party,
    items: Vec<QuotationItem>,
    business_details: BusinessDetails,
    notes: String,
    terms: String,
}

/// Save/load/list/revision operations against the quotation resource, with
/// a fetch-once-per-party cache and an in-flight guard over it.
pub struct QuotationGateway {
    rest: Arc<RestClient>,
    party_lists: Mutex<HashMap<PartyId, Vec<SavedQuotationRecord>>>,
    all: Mutex<Option<Vec<SavedQuotationRecord>>>,
    loading: SingleFlight<PartyId>,
}

impl QuotationGateway {
    pub(crate) fn new(rest: Arc<RestClient>) -> Self {
        Self {
            rest,
            party_lists: Mutex::new(HashMap::new()),
            all: Mutex::new(None),
            loading: SingleFlight::new(),
        }
    }

    /// Validate, serialize and persist the session, then adopt the identity
    /// the backend assigned.
    ///
    /// Revision numbering scans the quotation titles already known for the
    /// party; the backend response stays authoritative and overwrites
    /// whatever number was proposed here.
    pub async fn save(
        &self,
        session: &mut QuotationSession,
        options: SaveOptions,
    ) -> ApiResult<SavedQuotationRecord> {
        session.validate_for_save()?;
        let totals = session.compute_totals()?;
        let party = session
            .selected_party()
            .cloned()
            .ok_or_else(|| ApiError::Validation("no customer party is selected".to_string()))?;

        let base = match &options.base_title {
            Some(title) => revision::base_title(title).to_string(),
            None => revision::default_title(&party.name),
        };

        let as_revision = options.create_revision || session.revision().is_revision;
        let (title, revision_number) = if as_revision {
            let titles = self.known_titles(&party.id).await;
            let number =
                revision::next_revision_number(&base, titles.iter().map(String::as_str));
            (revision::revision_title(&base, number), (number > 0).then_some(number))
        } else {
            (base, None)
        };

        let revision_of = if as_revision {
            options
                .source_quotation_id
                .clone()
                .or_else(|| session.revision().revision_of.clone())
                .or_else(|| session.current_id().cloned())
        } else {
            None
        };

        let payload = QuotationPayload {
            title,
            quotation_number: session.quotation_number().map(str::to_string),
            date: session.quotation_date(),
            valid_until: session.valid_until(),
            status: QuotationStatus::Draft,
            total_amount: totals.total_sale,
            totals,
            revision_number,
            revision_of: revision_of.clone(),
            party: party.clone(),
            items: session.items().iter().map(QuotationItem::from).collect(),
            business_details: session.business().clone(),
            notes: session.notes().to_string(),
            terms: session.terms().to_string(),
        };

        let record: SavedQuotationRecord = match (options.create_revision, &revision_of) {
            (true, Some(source)) => {
                self.rest.post_json(&format!("/quotations/{source}/revisions"), &payload).await?
            }
            _ => self.rest.post_json("/quotations", &payload).await?,
        };

        session.apply_saved(&record);
        self.invalidate_party(&party.id);
        self.invalidate_all();
        info!(quotation_id = %record.id, title = %record.title, "quotation saved");

        Ok(record)
    }

    pub async fn load(&self, id: &QuotationId) -> ApiResult<SavedQuotationRecord> {
        self.rest.get_json(&format!("/quotations/{id}")).await
    }

    /// Load a quotation, hydrate a fresh session from it, and save that
    /// session straight back as the next revision of the same title.
    pub async fn create_revision(
        &self,
        id: &QuotationId,
    ) -> ApiResult<(QuotationSession, SavedQuotationRecord)> {
        let source = self.load(id).await?;
        let mut session = QuotationSession::from_record(&source);
        let record = self
            .save(
                &mut session,
                SaveOptions {
                    base_title: Some(source.title.clone()),
                    create_revision: true,
                    source_quotation_id: Some(id.clone()),
                },
            )
            .await?;
        Ok((session, record))
    }

    /// Fetch-once per party per session view. Returns the cached (possibly
    /// empty) list as a no-op when a fetch for the same party is already in
    /// flight.
    pub async fn list_for_party(
        &self,
        party_id: &PartyId,
    ) -> ApiResult<Vec<SavedQuotationRecord>> {
        if let Some(records) = self.cached_for_party(party_id) {
            return Ok(records);
        }

        let Some(_token) = self.loading.begin(party_id.clone()) else {
            debug!(party_id = %party_id, "quotation list fetch already in flight");
            return Ok(self.cached_for_party(party_id).unwrap_or_default());
        };

        let records: Vec<SavedQuotationRecord> =
            self.rest.get_json(&format!("/quotations/party/{party_id}")).await?;
        self.lock_party_lists().insert(party_id.clone(), records.clone());
        Ok(records)
    }

    /// Unfiltered listing backing the global quotations view; cached until
    /// invalidated by a save or an explicit [`Self::invalidate_all`].
    pub async fn list_all(&self) -> ApiResult<Vec<SavedQuotationRecord>> {
        if let Some(records) = self.lock_all().clone() {
            return Ok(records);
        }

        let records: Vec<SavedQuotationRecord> = self.rest.get_json("/quotations").await?;
        *self.lock_all() = Some(records.clone());
        Ok(records)
    }

    pub async fn revisions_of(&self, id: &QuotationId) -> ApiResult<Vec<SavedQuotationRecord>> {
        self.rest.get_json(&format!("/quotations/{id}/revisions")).await
    }

    pub fn cached_for_party(&self, party_id: &PartyId) -> Option<Vec<SavedQuotationRecord>> {
        self.lock_party_lists().get(party_id).cloned()
    }

    pub fn invalidate_party(&self, party_id: &PartyId) {
        self.lock_party_lists().remove(party_id);
    }

    pub fn invalidate_all(&self) {
        *self.lock_all() = None;
    }

    async fn known_titles(&self, party_id: &PartyId) -> Vec<String> {
        match self.list_for_party(party_id).await {
            Ok(records) => records.into_iter().map(|record| record.title).collect(),
            Err(error) => {
                warn!(
                    party_id = %party_id,
                    error = %error,
                    "could not list quotations for revision numbering, assuming none"
                );
                Vec::new()
            }
        }
    }

    fn lock_party_lists(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<PartyId, Vec<SavedQuotationRecord>>> {
        self.party_lists.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_all(&self) -> std::sync::MutexGuard<'_, Option<Vec<SavedQuotationRecord>>> {
        self.all.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Client-side filter over an already-fetched list: matches title, display
/// name, quotation number, party name, status and notes.
pub fn filter_records<'a>(
    records: &'a [SavedQuotationRecord],
    term: &str,
) -> Vec<&'a SavedQuotationRecord> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|record| {
            record.title.to_lowercase().contains(&term)
                || revision::display_name(record).to_lowercase().contains(&term)
                || record.quotation_number.to_lowercase().contains(&term)
                || record.party.name.to_lowercase().contains(&term)
                || record.status.label().contains(&term)
                || record.notes.to_lowercase().contains(&term)
        })
        .collect()
}
