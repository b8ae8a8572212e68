//! The quotation being edited: selected customer, line items, letterhead,
//! dates and revision bookkeeping.
//!
//! One session is constructed per editing flow and threaded explicitly to
//! whatever consumes it; there is no ambient singleton. Totals are always
//! derived on demand through the pricing module.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::domain::business::{BusinessDetails, BusinessDetailsPatch};
use crate::domain::line_item::{LineItem, LineItemDraft, LineItemId, LineItemPatch};
use crate::domain::party::Party;
use crate::domain::quotation::{QuotationId, RevisionMeta, SavedQuotationRecord};
use crate::errors::{PricingError, SavePrecondition, SaveValidationError, SessionError, StoreError};
use crate::pricing::{self, QuoteTotals};
use crate::store::LineItemStore;

/// How long a fresh quotation stays valid.
pub const QUOTATION_VALIDITY_DAYS: i64 = 15;

/// Standard terms printed on every quotation unless edited.
pub const DEFAULT_TERMS: &str = "Prices valid until the date shown above. Warranty as per \
                                 manufacturer terms. Goods once sold will not be taken back. \
                                 Payment due on delivery.";

#[derive(Clone, Debug, PartialEq)]
pub struct QuotationSession {
    business: BusinessDetails,
    selected_party: Option<Party>,
    items: LineItemStore,
    quotation_number: Option<String>,
    quotation_date: NaiveDate,
    valid_until: NaiveDate,
    notes: String,
    terms: String,
    print_mode: bool,
    current_id: Option<QuotationId>,
    revision: RevisionMeta,
}

impl QuotationSession {
    /// Fresh empty session dated `today`, valid for the standard window.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            business: BusinessDetails::default(),
            selected_party: None,
            items: LineItemStore::new(),
            quotation_number: None,
            quotation_date: today,
            valid_until: today + Duration::days(QUOTATION_VALIDITY_DAYS),
            notes: String::new(),
            terms: DEFAULT_TERMS.to_string(),
            print_mode: false,
            current_id: None,
            revision: RevisionMeta::default(),
        }
    }

    /// Rebuild a session from a persisted record. Items get fresh local ids;
    /// the record itself is never mutated.
    pub fn from_record(record: &SavedQuotationRecord) -> Self {
        let mut items = LineItemStore::new();
        for item in &record.items {
            items.add(item.to_draft());
        }

        Self {
            business: record.business_details.clone(),
            selected_party: Some(record.party.clone()),
            items,
            quotation_number: Some(record.quotation_number.clone()),
            quotation_date: record.date,
            valid_until: record.valid_until,
            notes: record.notes.clone(),
            terms: record.terms.clone(),
            print_mode: false,
            current_id: Some(record.id.clone()),
            revision: RevisionMeta {
                is_revision: record.revision_number.is_some(),
                revision_number: record.revision_number,
                revision_of: record.revision_of.clone(),
            },
        }
    }

    /// Back to the initial empty state: party, items, notes and all
    /// persisted-identity tracking cleared, dates reset to today / today+15.
    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }

    pub fn business(&self) -> &BusinessDetails {
        &self.business
    }

    pub fn set_business_details(&mut self, patch: BusinessDetailsPatch) {
        self.business.apply_patch(patch);
    }

    pub fn selected_party(&self) -> Option<&Party> {
        self.selected_party.as_ref()
    }

    pub fn select_party(&mut self, party: Party) {
        self.selected_party = Some(party);
    }

    pub fn clear_party(&mut self) {
        self.selected_party = None;
    }

    pub fn quotation_number(&self) -> Option<&str> {
        self.quotation_number.as_deref()
    }

    pub fn quotation_date(&self) -> NaiveDate {
        self.quotation_date
    }

    pub fn set_quotation_date(&mut self, date: NaiveDate) {
        self.quotation_date = date;
    }

    pub fn valid_until(&self) -> NaiveDate {
        self.valid_until
    }

    pub fn set_valid_until(&mut self, date: NaiveDate) {
        self.valid_until = date;
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn terms(&self) -> &str {
        &self.terms
    }

    pub fn set_terms(&mut self, terms: impl Into<String>) {
        self.terms = terms.into();
    }

    pub fn current_id(&self) -> Option<&QuotationId> {
        self.current_id.as_ref()
    }

    pub fn revision(&self) -> &RevisionMeta {
        &self.revision
    }

    pub fn add_item(&mut self, draft: LineItemDraft) -> LineItemId {
        self.items.add(draft)
    }

    pub fn update_item(&mut self, id: LineItemId, patch: LineItemPatch) -> Result<(), StoreError> {
        self.items.update(id, patch).map(|_| ())
    }

    pub fn remove_item(&mut self, id: LineItemId) {
        self.items.remove(id);
    }

    pub fn item(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.get(id)
    }

    pub fn items(&self) -> &[LineItem] {
        self.items.items()
    }

    /// Edit the purchase price by its tax-exclusive value: the inclusive
    /// price is recomputed here (the store stores inclusive only).
    pub fn set_purchase_excl_tax(
        &mut self,
        id: LineItemId,
        price_excl_tax: Decimal,
    ) -> Result<(), SessionError> {
        let rate = self.items.get(id).ok_or(StoreError::NotFound(id))?.tax_rate_percent;
        let inclusive = pricing::price_incl_tax(price_excl_tax, rate)?;
        self.items.update(
            id,
            LineItemPatch { purchase_incl_tax: Some(inclusive), ..LineItemPatch::default() },
        )?;
        Ok(())
    }

    /// Tax-exclusive edit of the sale price; see [`Self::set_purchase_excl_tax`].
    pub fn set_sale_excl_tax(
        &mut self,
        id: LineItemId,
        price_excl_tax: Decimal,
    ) -> Result<(), SessionError> {
        let rate = self.items.get(id).ok_or(StoreError::NotFound(id))?.tax_rate_percent;
        let inclusive = pricing::price_incl_tax(price_excl_tax, rate)?;
        self.items.update(
            id,
            LineItemPatch { sale_incl_tax: Some(inclusive), ..LineItemPatch::default() },
        )?;
        Ok(())
    }

    /// Recompute aggregate totals over the current items. O(items), cheap
    /// enough for every render.
    pub fn compute_totals(&self) -> Result<QuoteTotals, PricingError> {
        pricing::aggregate(self.items.items())
    }

    pub fn print_mode(&self) -> bool {
        self.print_mode
    }

    /// Flip the print flag, returning the new state. The presentation layer
    /// triggers its one-shot print side effect on the `true` transition,
    /// after a short settle delay.
    pub fn toggle_print_mode(&mut self) -> bool {
        self.print_mode = !self.print_mode;
        self.print_mode
    }

    /// Preconditions for saving, reported in a fixed order: the missing
    /// party always comes before the empty item list.
    pub fn validate_for_save(&self) -> Result<(), SaveValidationError> {
        let mut failed = Vec::new();
        if self.selected_party.is_none() {
            failed.push(SavePrecondition::SelectedParty);
        }
        if self.items.is_empty() {
            failed.push(SavePrecondition::LineItems);
        }
        if failed.is_empty() {
            Ok(())
        } else {
            Err(SaveValidationError(failed))
        }
    }

    /// Adopt the identity the backend assigned after a successful save or
    /// revision: quotation number, record id and revision metadata.
    pub fn apply_saved(&mut self, record: &SavedQuotationRecord) {
        self.current_id = Some(record.id.clone());
        self.quotation_number = Some(record.quotation_number.clone());
        self.revision = RevisionMeta {
            is_revision: record.revision_number.is_some(),
            revision_number: record.revision_number,
            revision_of: record.revision_of.clone(),
        };
    }
}
