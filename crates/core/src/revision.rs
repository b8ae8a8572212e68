//! Revision titles and numbering.
//!
//! A revision chain shares one base title. The bare title is revision 0 and
//! carries no suffix; later revisions append ` (n)`. Numbers are derived
//! from whatever quotation list the client has already fetched, so they are
//! best-effort: the backend response is treated as authoritative and
//! overwrites whatever the client proposed.

use crate::domain::quotation::SavedQuotationRecord;

/// Default title when the caller supplies none.
pub fn default_title(party_name: &str) -> String {
    format!("Quotation for {party_name}")
}

/// Strip a trailing ` (n)` revision suffix, if present, returning the base
/// title shared by the whole revision chain.
pub fn base_title(title: &str) -> &str {
    let trimmed = title.trim_end();
    let Some(rest) = trimmed.strip_suffix(')') else {
        return trimmed;
    };
    let Some(open) = rest.rfind(" (") else {
        return trimmed;
    };
    let digits = &rest[open + 2..];
    if !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit()) {
        &trimmed[..open]
    } else {
        trimmed
    }
}

/// The revision number a title encodes relative to `base`: the bare base
/// title is revision 0, `"{base} (n)"` is revision n, anything else is not
/// part of the chain.
pub fn revision_suffix(title: &str, base: &str) -> Option<u32> {
    let title = title.trim();
    if title == base {
        return Some(0);
    }
    let rest = title.strip_prefix(base)?.strip_prefix(" (")?.strip_suffix(')')?;
    if rest.is_empty() || !rest.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

/// Next revision number for `base` given the titles already known: one past
/// the highest existing suffix, 1 when only the bare title exists, 0 (the
/// bare title itself) when the chain is empty.
pub fn next_revision_number<'a>(base: &str, titles: impl IntoIterator<Item = &'a str>) -> u32 {
    titles
        .into_iter()
        .filter_map(|title| revision_suffix(title, base))
        .max()
        .map_or(0, |highest| highest + 1)
}

/// Render the title for a given revision number; revision 0 stays bare.
pub fn revision_title(base: &str, number: u32) -> String {
    if number == 0 {
        base.to_string()
    } else {
        format!("{base} ({number})")
    }
}

/// Canonical display name used on every screen: the record title when it has
/// one, else the backend quotation number, else the raw id.
pub fn display_name(record: &SavedQuotationRecord) -> String {
    let title = record.title.trim();
    if !title.is_empty() {
        return title.to_string();
    }
    let number = record.quotation_number.trim();
    if !number.is_empty() {
        return format!("Quotation {number}");
    }
    record.id.to_string()
}
