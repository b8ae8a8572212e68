//! Browsable component reference data and its search.
//!
//! The catalog normally comes from the backend; the bundled dataset below is
//! the offline fallback, so the item picker always has something to show.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogModel {
    pub model: String,
    pub hsn_code: String,
    pub warranty_text: String,
    pub purchase_incl_tax: Decimal,
    pub sale_incl_tax: Decimal,
}

/// One category/brand group of sellable models.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub category: String,
    pub brand: String,
    pub models: Vec<CatalogModel>,
}

struct SeedModel {
    model: &'static str,
    hsn_code: &'static str,
    warranty_text: &'static str,
    purchase_incl_tax: i64,
    sale_incl_tax: i64,
}

struct SeedEntry {
    category: &'static str,
    brand: &'static str,
    models: &'static [SeedModel],
}

const FALLBACK_COMPONENTS: &[SeedEntry] = &[
    SeedEntry {
        category: "Processor",
        brand: "Intel",
        models: &[
            SeedModel {
                model: "Core i5-12400F",
                hsn_code: "8542",
                warranty_text: "3 Years",
                purchase_incl_tax: 10500,
                sale_incl_tax: 12999,
            },
            SeedModel {
                model: "Core i7-12700",
                hsn_code: "8542",
                warranty_text: "3 Years",
                purchase_incl_tax: 24200,
                sale_incl_tax: 27999,
            },
        ],
    },
    SeedEntry {
        category: "Processor",
        brand: "AMD",
        models: &[
            SeedModel {
                model: "Ryzen 5 5600",
                hsn_code: "8542",
                warranty_text: "3 Years",
                purchase_incl_tax: 9400,
                sale_incl_tax: 11499,
            },
            SeedModel {
                model: "Ryzen 7 5700X",
                hsn_code: "8542",
                warranty_text: "3 Years",
                purchase_incl_tax: 15800,
                sale_incl_tax: 18499,
            },
        ],
    },
    SeedEntry {
        category: "Graphics Card",
        brand: "Zotac",
        models: &[SeedModel {
            model: "Gaming GeForce RTX 4060 8GB",
            hsn_code: "8471",
            warranty_text: "5 Years",
            purchase_incl_tax: 26500,
            sale_incl_tax: 30999,
        }],
    },
    SeedEntry {
        category: "Graphics Card",
        brand: "MSI",
        models: &[SeedModel {
            model: "Ventus RTX 4060 Ti 8GB",
            hsn_code: "8471",
            warranty_text: "3 Years",
            purchase_incl_tax: 36200,
            sale_incl_tax: 41999,
        }],
    },
    SeedEntry {
        category: "Motherboard",
        brand: "Asus",
        models: &[
            SeedModel {
                model: "Prime B450M-K II",
                hsn_code: "8473",
                warranty_text: "3 Years",
                purchase_incl_tax: 4700,
                sale_incl_tax: 5699,
            },
            SeedModel {
                model: "TUF Gaming B650M-Plus",
                hsn_code: "8473",
                warranty_text: "3 Years",
                purchase_incl_tax: 15400,
                sale_incl_tax: 17999,
            },
        ],
    },
    SeedEntry {
        category: "Motherboard",
        brand: "Gigabyte",
        models: &[SeedModel {
            model: "B760M DS3H DDR4",
            hsn_code: "8473",
            warranty_text: "3 Years",
            purchase_incl_tax: 11200,
            sale_incl_tax: 13499,
        }],
    },
    SeedEntry {
        category: "RAM",
        brand: "Corsair",
        models: &[SeedModel {
            model: "Vengeance LPX 16GB DDR4 3200",
            hsn_code: "8473",
            warranty_text: "Lifetime",
            purchase_incl_tax: 3600,
            sale_incl_tax: 4299,
        }],
    },
    SeedEntry {
        category: "RAM",
        brand: "G.Skill",
        models: &[SeedModel {
            model: "Ripjaws S5 32GB DDR5 5600",
            hsn_code: "8473",
            warranty_text: "Lifetime",
            purchase_incl_tax: 8900,
            sale_incl_tax: 10499,
        }],
    },
    SeedEntry {
        category: "SSD",
        brand: "Samsung",
        models: &[
            SeedModel {
                model: "980 NVMe 1TB",
                hsn_code: "8523",
                warranty_text: "5 Years",
                purchase_incl_tax: 5600,
                sale_incl_tax: 6799,
            },
            SeedModel {
                model: "870 EVO 500GB",
                hsn_code: "8523",
                warranty_text: "5 Years",
                purchase_incl_tax: 3900,
                sale_incl_tax: 4699,
            },
        ],
    },
    SeedEntry {
        category: "SSD",
        brand: "Western Digital",
        models: &[SeedModel {
            model: "Blue SN580 500GB",
            hsn_code: "8523",
            warranty_text: "5 Years",
            purchase_incl_tax: 3100,
            sale_incl_tax: 3799,
        }],
    },
    SeedEntry {
        category: "Power Supply",
        brand: "Corsair",
        models: &[SeedModel {
            model: "CV550 550W",
            hsn_code: "8504",
            warranty_text: "3 Years",
            purchase_incl_tax: 3300,
            sale_incl_tax: 3999,
        }],
    },
    SeedEntry {
        category: "Power Supply",
        brand: "Deepcool",
        models: &[SeedModel {
            model: "PK650D 650W",
            hsn_code: "8504",
            warranty_text: "5 Years",
            purchase_incl_tax: 4300,
            sale_incl_tax: 5199,
        }],
    },
    SeedEntry {
        category: "Cabinet",
        brand: "NZXT",
        models: &[SeedModel {
            model: "H510 Flow",
            hsn_code: "8473",
            warranty_text: "2 Years",
            purchase_incl_tax: 5400,
            sale_incl_tax: 6499,
        }],
    },
    SeedEntry {
        category: "Cabinet",
        brand: "Ant Esports",
        models: &[SeedModel {
            model: "ICE-112 Auto RGB",
            hsn_code: "8473",
            warranty_text: "1 Year",
            purchase_incl_tax: 2300,
            sale_incl_tax: 2899,
        }],
    },
];

/// The bundled dataset used when the backend catalog is unreachable or
/// returns something unusable. Available offline, one entry or more per
/// seeded category.
pub fn fallback_catalog() -> Vec<CatalogEntry> {
    FALLBACK_COMPONENTS
        .iter()
        .map(|entry| CatalogEntry {
            category: entry.category.to_string(),
            brand: entry.brand.to_string(),
            models: entry
                .models
                .iter()
                .map(|model| CatalogModel {
                    model: model.model.to_string(),
                    hsn_code: model.hsn_code.to_string(),
                    warranty_text: model.warranty_text.to_string(),
                    purchase_incl_tax: Decimal::from(model.purchase_incl_tax),
                    sale_incl_tax: Decimal::from(model.sale_incl_tax),
                })
                .collect(),
        })
        .collect()
}

/// Which fields a search term is matched against; everything on by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchFields {
    pub category: bool,
    pub brand: bool,
    pub model: bool,
    pub tax_code: bool,
    pub warranty: bool,
}

impl Default for SearchFields {
    fn default() -> Self {
        Self { category: true, brand: true, model: true, tax_code: true, warranty: true }
    }
}

/// One ranked hit; higher score means a more specific match.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogMatch {
    pub category: String,
    pub brand: String,
    pub model: CatalogModel,
    pub score: u32,
}

const SCORE_MODEL_EXACT: u32 = 100;
const SCORE_MODEL_SUFFIX: u32 = 90;
const SCORE_MODEL_SUBSTRING: u32 = 80;
const SCORE_BRAND_EXACT: u32 = 70;
const SCORE_BRAND_SUBSTRING: u32 = 60;
const SCORE_CATEGORY_EXACT: u32 = 50;
const SCORE_CATEGORY_SUBSTRING: u32 = 40;
const SCORE_TAX_CODE: u32 = 30;
const SCORE_WARRANTY_SUBSTRING: u32 = 20;
const SCORE_COMPOUND: u32 = 10;

fn model_digits(model: &str) -> String {
    model.chars().filter(char::is_ascii_digit).collect()
}

/// Rank catalog models against a free-text term.
///
/// A short all-digit term (2-4 digits) is additionally tried against the
/// tail of the model's digits, so "400" finds a "Core i5-12400F", and a
/// hyphenated `category-brand` term matches both halves as a compound.
/// Sorting is descending by score and stable for equal scores.
pub fn search(entries: &[CatalogEntry], term: &str, fields: SearchFields) -> Vec<CatalogMatch> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }

    let digit_term = (2..=4).contains(&term.len()) && term.bytes().all(|byte| byte.is_ascii_digit());
    let compound = term.split_once('-').filter(|(category, brand)| {
        fields.category && fields.brand && !category.is_empty() && !brand.is_empty()
    });

    let mut matches = Vec::new();
    for entry in entries {
        let category = entry.category.to_lowercase();
        let brand = entry.brand.to_lowercase();

        for model in &entry.models {
            let model_name = model.model.to_lowercase();
            let mut score = 0u32;

            if fields.model {
                if model_name == term {
                    score = score.max(SCORE_MODEL_EXACT);
                } else if digit_term && model_digits(&model_name).ends_with(&term) {
                    score = score.max(SCORE_MODEL_SUFFIX);
                } else if model_name.contains(&term) {
                    score = score.max(SCORE_MODEL_SUBSTRING);
                }
            }
            if fields.brand {
                if brand == term {
                    score = score.max(SCORE_BRAND_EXACT);
                } else if brand.contains(&term) {
                    score = score.max(SCORE_BRAND_SUBSTRING);
                }
            }
            if fields.category {
                if category == term {
                    score = score.max(SCORE_CATEGORY_EXACT);
                } else if category.contains(&term) {
                    score = score.max(SCORE_CATEGORY_SUBSTRING);
                }
            }
            if fields.tax_code && model.hsn_code.to_lowercase().contains(&term) {
                score = score.max(SCORE_TAX_CODE);
            }
            if fields.warranty && model.warranty_text.to_lowercase().contains(&term) {
                score = score.max(SCORE_WARRANTY_SUBSTRING);
            }
            if let Some((category_part, brand_part)) = compound {
                if category.contains(category_part) && brand.contains(brand_part) {
                    score = score.max(SCORE_COMPOUND);
                }
            }

            if score > 0 {
                matches.push(CatalogMatch {
                    category: entry.category.clone(),
                    brand: entry.brand.clone(),
                    model: model.clone(),
                    score,
                });
            }
        }
    }

    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{fallback_catalog, search, SearchFields};

    #[test]
    fn fallback_covers_every_seeded_category() {
        let catalog = fallback_catalog();
        let categories: BTreeSet<_> =
            catalog.iter().map(|entry| entry.category.as_str()).collect();

        let expected: BTreeSet<_> = [
            "Processor",
            "Graphics Card",
            "Motherboard",
            "RAM",
            "SSD",
            "Power Supply",
            "Cabinet",
        ]
        .into_iter()
        .collect();

        assert_eq!(categories, expected);
        assert!(catalog.iter().all(|entry| !entry.models.is_empty()));
    }

    #[test]
    fn exact_model_outranks_substring_matches() {
        let catalog = fallback_catalog();
        let exact = search(&catalog, "Core i5-12400F", SearchFields::default());
        assert_eq!(exact[0].model.model, "Core i5-12400F");

        let substring = search(&catalog, "ryzen", SearchFields::default());
        assert!(exact[0].score > substring[0].score);
    }

    #[test]
    fn digit_suffix_heuristic_finds_models_by_trailing_digits() {
        let catalog = fallback_catalog();
        let matches = search(&catalog, "2400", SearchFields::default());

        assert!(matches.iter().any(|hit| hit.model.model == "Core i5-12400F"));
    }

    #[test]
    fn brand_matches_rank_above_category_matches() {
        let catalog = fallback_catalog();
        let matches = search(&catalog, "corsair", SearchFields::default());

        assert!(!matches.is_empty());
        assert!(matches.iter().all(|hit| hit.brand == "Corsair"));

        let category_hits = search(&catalog, "power supply", SearchFields::default());
        assert!(matches[0].score > category_hits[0].score);
    }

    #[test]
    fn hyphenated_compound_matches_category_and_brand() {
        let catalog = fallback_catalog();
        let matches = search(&catalog, "processor-amd", SearchFields::default());

        assert!(!matches.is_empty());
        assert!(matches.iter().all(|hit| hit.brand == "AMD"));
    }

    #[test]
    fn field_mask_suppresses_disabled_fields() {
        let catalog = fallback_catalog();
        let no_brand = SearchFields { brand: false, ..SearchFields::default() };

        assert!(search(&catalog, "corsair", no_brand).is_empty());
    }

    #[test]
    fn equal_scores_keep_catalog_order() {
        let catalog = fallback_catalog();
        let matches = search(&catalog, "ssd", SearchFields::default());

        let samsung_at = matches
            .iter()
            .position(|hit| hit.brand == "Samsung")
            .expect("samsung ssd present");
        let wd_at = matches
            .iter()
            .position(|hit| hit.brand == "Western Digital")
            .expect("wd ssd present");
        assert!(samsung_at < wd_at);
    }

    #[test]
    fn blank_terms_match_nothing() {
        let catalog = fallback_catalog();
        assert!(search(&catalog, "   ", SearchFields::default()).is_empty());
    }
}
