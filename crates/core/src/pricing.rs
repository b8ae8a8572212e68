//! GST price conversions and quotation totals.
//!
//! Everything in this module is a pure function over line items. Totals are
//! recomputed from the items on every call and never cached or persisted,
//! which keeps the stored inclusive prices the single source of truth.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::line_item::LineItem;
use crate::errors::PricingError;

/// GST default applied when a line item is added without an explicit rate.
pub fn default_tax_rate() -> Decimal {
    Decimal::from(18u32)
}

fn tax_divisor(tax_rate_percent: Decimal) -> Result<Decimal, PricingError> {
    let divisor = Decimal::ONE + tax_rate_percent / Decimal::ONE_HUNDRED;
    if divisor <= Decimal::ZERO {
        return Err(PricingError::InvalidInput(format!(
            "tax rate {tax_rate_percent}% leaves no positive taxable base"
        )));
    }
    Ok(divisor)
}

/// Strip GST from a tax-inclusive price: `incl / (1 + rate/100)`.
pub fn price_excl_tax(
    price_incl_tax: Decimal,
    tax_rate_percent: Decimal,
) -> Result<Decimal, PricingError> {
    Ok(price_incl_tax / tax_divisor(tax_rate_percent)?)
}

/// Add GST to a tax-exclusive price: `excl * (1 + rate/100)`.
pub fn price_incl_tax(
    price_excl_tax: Decimal,
    tax_rate_percent: Decimal,
) -> Result<Decimal, PricingError> {
    Ok(price_excl_tax * tax_divisor(tax_rate_percent)?)
}

/// Per-line money summary, all values scaled by the line quantity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineTotals {
    pub purchase_total: Decimal,
    pub sale_total: Decimal,
    pub tax_total: Decimal,
    pub margin: Decimal,
}

pub fn line_totals(item: &LineItem) -> Result<LineTotals, PricingError> {
    let quantity = Decimal::from(item.quantity);
    let sale_excl = price_excl_tax(item.sale_incl_tax, item.tax_rate_percent)?;

    let purchase_total = item.purchase_incl_tax * quantity;
    let sale_total = item.sale_incl_tax * quantity;
    let tax_total = (item.sale_incl_tax - sale_excl) * quantity;
    let margin = sale_total - purchase_total;

    Ok(LineTotals { purchase_total, sale_total, tax_total, margin })
}

/// Aggregate money summary over a whole quotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTotals {
    pub total_purchase: Decimal,
    pub total_sale: Decimal,
    pub total_tax: Decimal,
    pub total_margin: Decimal,
    pub margin_percent: Decimal,
}

impl QuoteTotals {
    pub fn zero() -> Self {
        Self {
            total_purchase: Decimal::ZERO,
            total_sale: Decimal::ZERO,
            total_tax: Decimal::ZERO,
            total_margin: Decimal::ZERO,
            margin_percent: Decimal::ZERO,
        }
    }
}

/// Sum [`line_totals`] over all items. `margin_percent` is defined as 0 for
/// an empty (or zero-sale) quotation.
pub fn aggregate(items: &[LineItem]) -> Result<QuoteTotals, PricingError> {
    let mut totals = QuoteTotals::zero();

    for item in items {
        let line = line_totals(item)?;
        totals.total_purchase += line.purchase_total;
        totals.total_sale += line.sale_total;
        totals.total_tax += line.tax_total;
        totals.total_margin += line.margin;
    }

    if !totals.total_sale.is_zero() {
        totals.margin_percent = totals.total_margin / totals.total_sale * Decimal::ONE_HUNDRED;
    }

    Ok(totals)
}
