use serde::{Deserialize, Serialize};

/// The retailer's own letterhead details, printed on every quotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDetails {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub gstin: String,
    pub logo_ref: String,
}

impl Default for BusinessDetails {
    fn default() -> Self {
        Self {
            name: "Apex Computers".to_string(),
            address: "Shop 14, Lamington Road, Mumbai 400004".to_string(),
            phone: "+91 98200 12345".to_string(),
            email: "sales@apexcomputers.in".to_string(),
            gstin: "27AAACA1234F1Z5".to_string(),
            logo_ref: "apex-logo.png".to_string(),
        }
    }
}

/// Partial update applied over the current details; `None` fields are left
/// untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDetailsPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub gstin: Option<String>,
    pub logo_ref: Option<String>,
}

impl BusinessDetails {
    pub fn apply_patch(&mut self, patch: BusinessDetailsPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(gstin) = patch.gstin {
            self.gstin = gstin;
        }
        if let Some(logo_ref) = patch.logo_ref {
            self.logo_ref = logo_ref;
        }
    }
}
