//! Fish catalog model, decoding and card formatting.
//!
//! Parses the `{"fish": [...]}` document served by the catalog endpoint
//! into an ordered list of [`Fish`] records, and formats the detail card
//! shown when a fish is expanded.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

// ============================================================================
// Error type
// ============================================================================

/// Errors that can occur when reading or decoding a fish catalog.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate fish id {id}: '{first}' and '{second}'")]
    DuplicateId {
        id: u32,
        first: String,
        second: String,
    },

    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// Catalog types
// ============================================================================

/// One catalog entry.
///
/// Identity is `id`; every other field is display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fish {
    pub id: u32,
    pub name: String,
    pub image_url: String,
    pub rarity: String,
    /// Sell price in Bells. Some entries have none recorded.
    #[serde(default)]
    pub price: Option<u32>,
    pub size: String,
    pub location: String,
    /// Months the fish appears in the northern hemisphere.
    pub nh_months: String,
    /// Months the fish appears in the southern hemisphere.
    pub sh_months: String,
    /// Time-of-day range, e.g. `"4 PM - 9 AM"`.
    pub time: String,
}

/// The document returned by the catalog endpoint.
#[derive(Debug, Deserialize, Serialize)]
pub struct FishListDocument {
    pub fish: Vec<Fish>,
}

impl FishListDocument {
    /// Unwrap the fish list, checking that every `id` is unique.
    pub fn into_fish(self) -> Result<Vec<Fish>, Error> {
        check_unique_ids(&self.fish)?;
        Ok(self.fish)
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Parse a catalog document, preserving the order the fish were listed in.
///
/// Fails if the JSON is malformed or two entries share an `id`.
pub fn parse_fish_list(json: &str) -> Result<Vec<Fish>, Error> {
    let doc: FishListDocument = serde_json::from_str(json)?;
    doc.into_fish()
}

/// Read and parse a catalog document from disk.
pub fn read_fish_list(path: &Path) -> Result<Vec<Fish>, Error> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_fish_list(&content)
}

fn check_unique_ids(fish: &[Fish]) -> Result<(), Error> {
    let mut seen: HashMap<u32, &str> = HashMap::with_capacity(fish.len());
    for f in fish {
        if let Some(first) = seen.insert(f.id, &f.name) {
            return Err(Error::DuplicateId {
                id: f.id,
                first: first.to_string(),
                second: f.name.clone(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// Lookup helpers
// ============================================================================

/// Keep fish whose name contains `filter`, ignoring case. Order is preserved.
pub fn filter_by_name(fish: Vec<Fish>, filter: &str) -> Vec<Fish> {
    let needle = filter.to_lowercase();
    fish.into_iter()
        .filter(|f| f.name.to_lowercase().contains(&needle))
        .collect()
}

/// Find a fish by exact name, ignoring case.
pub fn find_by_name<'a>(fish: &'a [Fish], name: &str) -> Option<&'a Fish> {
    let wanted = name.to_lowercase();
    fish.iter().find(|f| f.name.to_lowercase() == wanted)
}

// ============================================================================
// Card formatting
// ============================================================================

/// A row of the detail card, in display order via [`CardField::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Rarity,
    Price,
    Time,
    Location,
    Size,
    NhMonths,
    ShMonths,
}

impl CardField {
    pub const ALL: [CardField; 7] = [
        CardField::Rarity,
        CardField::Price,
        CardField::Time,
        CardField::Location,
        CardField::Size,
        CardField::NhMonths,
        CardField::ShMonths,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CardField::Rarity => "Rarity",
            CardField::Price => "Price",
            CardField::Time => "Time",
            CardField::Location => "Location",
            CardField::Size => "Size",
            CardField::NhMonths => "NH Months",
            CardField::ShMonths => "SH Months",
        }
    }

    /// Month ranges are long and get their own styling.
    pub fn is_months(self) -> bool {
        matches!(self, CardField::NhMonths | CardField::ShMonths)
    }

    /// Format this field of `fish` as a single display line.
    ///
    /// Price reads as an amount (`"900 Bells"`); everything else is
    /// `"<label>: <value>"`.
    pub fn format(self, fish: &Fish) -> String {
        let value = match self {
            CardField::Rarity => &fish.rarity,
            CardField::Price => {
                return match fish.price {
                    Some(price) => format!("{price} Bells"),
                    None => format!("{}: unknown", self.label()),
                };
            }
            CardField::Time => &fish.time,
            CardField::Location => &fish.location,
            CardField::Size => &fish.size,
            CardField::NhMonths => &fish.nh_months,
            CardField::ShMonths => &fish.sh_months,
        };
        format!("{}: {}", self.label(), value)
    }
}

/// Heading shown above the card rows.
pub fn card_title(fish: &Fish) -> String {
    format!("{} Information", fish.name)
}

/// All card rows for `fish`, paired with the field they came from.
pub fn card_rows(fish: &Fish) -> Vec<(CardField, String)> {
    CardField::ALL
        .iter()
        .map(|&field| (field, field.format(fish)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    const SAMPLE: &str = r#"{
        "fish": [
            {
                "id": 2,
                "name": "Koi",
                "imageUrl": "https://example.test/koi.png",
                "rarity": "Rare",
                "price": 4000,
                "location": "Pond",
                "size": "4",
                "time": "4 PM - 9 AM",
                "nhMonths": "All year",
                "shMonths": "All year"
            },
            {
                "id": 1,
                "name": "Carp",
                "imageUrl": "https://example.test/carp.png",
                "rarity": "Common",
                "price": null,
                "location": "Pond",
                "size": "4",
                "time": "All day",
                "nhMonths": "All year",
                "shMonths": "All year"
            }
        ]
    }"#;

    fn koi() -> Fish {
        parse_fish_list(SAMPLE).unwrap().remove(0)
    }

    // -- Decoding --

    #[test]
    fn parse_preserves_document_order() {
        let fish = parse_fish_list(SAMPLE).unwrap();
        let names: Vec<&str> = fish.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Koi", "Carp"]);
    }

    #[test]
    fn parse_reads_camel_case_fields() {
        let koi = koi();
        assert_eq!(koi.image_url, "https://example.test/koi.png");
        assert_eq!(koi.nh_months, "All year");
        assert_eq!(koi.price, Some(4000));
    }

    #[test]
    fn parse_accepts_null_and_missing_price() {
        let fish = parse_fish_list(SAMPLE).unwrap();
        assert_eq!(fish[1].price, None);

        let json = r#"{"fish": [{
            "id": 9, "name": "Eel", "imageUrl": "", "rarity": "Uncommon",
            "location": "River", "size": "Narrow", "time": "4 PM - 9 AM",
            "nhMonths": "Jun-Sep", "shMonths": "Dec-Mar"
        }]}"#;
        let fish = parse_fish_list(json).unwrap();
        assert_eq!(fish[0].price, None);
    }

    #[test]
    fn parse_empty_list() {
        let fish = parse_fish_list(r#"{"fish": []}"#).unwrap();
        assert!(fish.is_empty());
    }

    #[test]
    fn parse_missing_fish_field_fails() {
        let err = parse_fish_list(r#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)), "got {err:?}");
    }

    #[test]
    fn parse_malformed_json_fails() {
        let err = parse_fish_list("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, Error::Json(_)), "got {err:?}");
    }

    #[test]
    fn parse_rejects_duplicate_ids() {
        let json = SAMPLE.replace(r#""id": 1"#, r#""id": 2"#);
        let err = parse_fish_list(&json).unwrap_err();
        expect![[r#"duplicate fish id 2: 'Koi' and 'Carp'"#]].assert_eq(&err.to_string());
    }

    #[test]
    fn read_missing_file_reports_path() {
        let err = read_fish_list(Path::new("/nonexistent/fish.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().starts_with("reading /nonexistent/fish.json:"));
    }

    #[test]
    fn read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fish.json");
        std::fs::write(&path, SAMPLE).unwrap();
        let fish = read_fish_list(&path).unwrap();
        assert_eq!(fish.len(), 2);
    }

    // -- Lookup --

    #[test]
    fn filter_is_case_insensitive_and_keeps_order() {
        let fish = parse_fish_list(SAMPLE).unwrap();
        let filtered = filter_by_name(fish.clone(), "AR");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Carp");

        let filtered = filter_by_name(fish, "");
        let names: Vec<&str> = filtered.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Koi", "Carp"]);
    }

    #[test]
    fn find_by_name_ignores_case() {
        let fish = parse_fish_list(SAMPLE).unwrap();
        assert_eq!(find_by_name(&fish, "kOI").map(|f| f.id), Some(2));
        assert!(find_by_name(&fish, "Ko").is_none());
    }

    // -- Card --

    #[test]
    fn card_rows_in_display_order() {
        let koi = koi();
        let lines: Vec<String> = card_rows(&koi).into_iter().map(|(_, l)| l).collect();
        expect![[r#"
            [
                "Rarity: Rare",
                "4000 Bells",
                "Time: 4 PM - 9 AM",
                "Location: Pond",
                "Size: 4",
                "NH Months: All year",
                "SH Months: All year",
            ]"#]]
        .assert_eq(&format!("{lines:#?}"));
    }

    #[test]
    fn card_price_unknown_when_absent() {
        let mut koi = koi();
        koi.price = None;
        assert_eq!(CardField::Price.format(&koi), "Price: unknown");
    }

    #[test]
    fn card_title_uses_name() {
        assert_eq!(card_title(&koi()), "Koi Information");
    }

    #[test]
    fn months_fields_flagged() {
        let months: Vec<CardField> = CardField::ALL
            .into_iter()
            .filter(|f| f.is_months())
            .collect();
        assert_eq!(months, vec![CardField::NhMonths, CardField::ShMonths]);
    }
}
