use crate::domain::line_item::{LineItem, LineItemDraft, LineItemId, LineItemPatch};
use crate::errors::StoreError;
use crate::pricing::default_tax_rate;

/// In-memory collection of the session's line items, in insertion order.
///
/// Display sorting is a presentation concern; the store only guarantees the
/// order items were added in. Ids come from a strictly increasing counter,
/// never wall-clock time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineItemStore {
    items: Vec<LineItem>,
    next_id: u64,
}

impl LineItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate item, assigning a fresh id and defaulting quantity to
    /// 1 and the tax rate to the standard GST rate when unset.
    pub fn add(&mut self, draft: LineItemDraft) -> LineItemId {
        self.next_id += 1;
        let id = LineItemId(self.next_id);

        self.items.push(LineItem {
            id,
            category: draft.category,
            brand: draft.brand,
            model: draft.model,
            hsn_code: draft.hsn_code,
            warranty_text: draft.warranty_text,
            quantity: draft.quantity.unwrap_or(1).max(1),
            purchase_incl_tax: draft.purchase_incl_tax,
            sale_incl_tax: draft.sale_incl_tax,
            tax_rate_percent: draft.tax_rate_percent.unwrap_or_else(default_tax_rate),
        });

        id
    }

    /// Merge a partial edit into an existing item.
    ///
    /// The store does not derive the paired exclusive/inclusive price field;
    /// callers editing an exclusive price convert through the pricing module
    /// before patching.
    pub fn update(&mut self, id: LineItemId, patch: LineItemPatch) -> Result<&LineItem, StoreError> {
        let item =
            self.items.iter_mut().find(|item| item.id == id).ok_or(StoreError::NotFound(id))?;
        item.apply_patch(patch);
        Ok(item)
    }

    /// Idempotent removal: unknown ids are a no-op so double-fired UI events
    /// stay harmless.
    pub fn remove(&mut self, id: LineItemId) {
        self.items.retain(|item| item.id != id);
    }

    pub fn get(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
