use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Session-local line item identity. Assigned from a strictly increasing
/// counter so rapid successive adds can never collide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineItemId(pub u64);

impl std::fmt::Display for LineItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One sellable component on the quotation.
///
/// Only tax-inclusive prices are stored; the exclusive counterparts are
/// derived through the pricing module whenever they are needed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: LineItemId,
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

/// Candidate for [`crate::store::LineItemStore::add`]; the store assigns the
/// id and fills defaults for quantity (1) and tax rate (18%).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineItemDraft {
    pub category: String,
    pub brand: String,
    pub model: String,
    pub hsn_code: String,
    pub warranty_text: String,
    pub quantity: Option<u32>,
    pub purchase_incl_tax: Decimal,
    pub sale_incl_tax: Decimal,
    pub tax_rate_percent: Option<Decimal>,
}

/// Partial edit merged into an existing item. Price fields here are always
/// tax-inclusive; callers editing an exclusive price convert first (the
/// store never derives the paired field itself).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineItemPatch {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub hsn_code: Option<String>,
    pub warranty_text: Option<String>,
    pub quantity: Option<u32>,
    pub purchase_incl_tax: Option<Decimal>,
    pub sale_incl_tax: Option<Decimal>,
    pub tax_rate_percent: Option<Decimal>,
}

impl LineItem {
    pub fn apply_patch(&mut self, patch: LineItemPatch) {
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(brand) = patch.brand {
            self.brand = brand;
        }
        if let Some(model) = patch.model {
            self.model = model;
        }
        if let Some(hsn_code) = patch.hsn_code {
            self.hsn_code = hsn_code;
        }
        if let Some(warranty_text) = patch.warranty_text {
            self.warranty_text = warranty_text;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity.max(1);
        }
        if let Some(purchase_incl_tax) = patch.purchase_incl_tax {
            self.purchase_incl_tax = purchase_incl_tax;
        }
        if let Some(sale_incl_tax) = patch.sale_incl_tax {
            self.sale_incl_tax = sale_incl_tax;
        }
        if let Some(tax_rate_percent) = patch.tax_rate_percent {
            self.tax_rate_percent = tax_rate_percent;
        }
    }
}
