use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::business::BusinessDetails;
use crate::domain::line_item::{LineItem, LineItemDraft};
use crate::domain::party::Party;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuotationId(pub String);

impl std::fmt::Display for QuotationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotationStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
}

impl QuotationStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }
}

/// Revision bookkeeping on the session. Only meaningful once the session has
/// a persisted identity (`current_id` set).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RevisionMeta {
    pub is_revision: bool,
    pub revision_number: Option<u32>,
    pub revision_of: Option<QuotationId>,
}

/// A line item as it travels over the wire. Saved records carry no
/// session-local ids; hydration assigns fresh ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationItem {
    pub category: String,
    pub brand: String,
    pub model: String,
    pub hsn_code: String,
    pub warranty_text: String,
    pub quantity: u32,
    pub purchase_incl_tax: Decimal,
    pub sale_incl_tax: Decimal,
    pub tax_rate_percent: Decimal,
}

impl From<&LineItem> for QuotationItem {
    fn from(item: &LineItem) -> Self {
        Self {
            category: item.category.clone(),
            brand: item.brand.clone(),
            model: item.model.clone(),
            hsn_code: item.hsn_code.clone(),
            warranty_text: item.warranty_text.clone(),
            quantity: item.quantity,
            purchase_incl_tax: item.purchase_incl_tax,
            sale_incl_tax: item.sale_incl_tax,
            tax_rate_percent: item.tax_rate_percent,
        }
    }
}

impl QuotationItem {
    /// Candidate for re-insertion into a session store; hydration never
    /// reuses persisted ids.
    pub fn to_draft(&self) -> LineItemDraft {
        LineItemDraft {
            category: self.category.clone(),
            brand: self.brand.clone(),
            model: self.model.clone(),
            hsn_code: self.hsn_code.clone(),
            warranty_text: self.warranty_text.clone(),
            quantity: Some(self.quantity),
            purchase_incl_tax: self.purchase_incl_tax,
            sale_incl_tax: self.sale_incl_tax,
            tax_rate_percent: Some(self.tax_rate_percent),
        }
    }
}

/// A quotation as persisted by the backend. Immutable once fetched; the
/// session never patches a record in place, it re-derives a fresh session
/// from it on load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuotationRecord {
    pub id: QuotationId,
    pub title: String,
    pub quotation_number: String,
    pub date: NaiveDate,
    pub valid_until: NaiveDate,
    pub status: QuotationStatus,
    pub total_amount: Decimal,
    #[serde(default)]
    pub revision_number: Option<u32>,
    #[serde(default)]
    pub revision_of: Option<QuotationId>,
    pub party: Party,
    pub items: Vec<QuotationItem>,
    pub business_details: BusinessDetails,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub terms: String,
}
