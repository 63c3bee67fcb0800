use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel value for the "every site" dropdown option.
pub const ALL_SITES_VALUE: &str = "ALL";
/// Label shown for [`ALL_SITES_VALUE`].
pub const ALL_SITES_LABEL: &str = "All Sites";

// ---------------------------------------------------------------------------
// RawValue – a single untyped cell before coercion
// ---------------------------------------------------------------------------

/// A cell as read from CSV, JSON or Parquet, before column coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Missing,
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Build from a CSV field. Empty fields are missing.
    pub fn from_field(s: &str) -> Self {
        if s.trim().is_empty() {
            RawValue::Missing
        } else {
            RawValue::Text(s.to_string())
        }
    }

    /// Numeric view of the cell. Text is parsed after trimming.
    fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Missing => None,
            RawValue::Number(v) => Some(*v),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Coerce to a payload mass. Anything that is not a finite number is missing.
    pub fn to_payload(&self) -> Option<f64> {
        self.as_number().filter(|v| v.is_finite())
    }

    /// Coerce to an outcome. Unparseable or missing values count as failures.
    pub fn to_outcome(&self) -> Outcome {
        let Some(v) = self.as_number().filter(|v| v.is_finite()) else {
            return Outcome::Failure;
        };
        match v.trunc() as i64 {
            1 => Outcome::Success,
            0 => Outcome::Failure,
            other => {
                log::warn!("outcome class {other} is outside {{0, 1}}; treating as failure");
                Outcome::Failure
            }
        }
    }

    /// Text view of the cell, `None` when missing or blank.
    pub fn to_label(&self) -> Option<String> {
        match self {
            RawValue::Missing => None,
            RawValue::Number(v) => Some(v.to_string()),
            RawValue::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Binary launch outcome (the `class` column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// The numeric class: 1 = success, 0 = failure.
    pub fn class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "Success"),
            Outcome::Failure => write!(f, "Failure"),
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single launch attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRecord {
    pub site: String,
    /// `None` when the source value was missing or not a finite number.
    pub payload_mass_kg: Option<f64>,
    pub outcome: Outcome,
    pub booster_category: String,
    pub flight_number: Option<u32>,
    pub booster_version: Option<String>,
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed indices. Immutable once built.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    pub records: Vec<LaunchRecord>,
    /// Distinct launch sites, sorted.
    pub sites: Vec<String>,
    /// Distinct booster version categories, sorted.
    pub booster_categories: Vec<String>,
    /// Smallest known payload mass.
    pub min_payload: Option<f64>,
    /// Largest known payload mass.
    pub max_payload: Option<f64>,
}

impl LaunchDataset {
    /// Build indices and payload bounds from the loaded records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let sites: BTreeSet<&str> = records.iter().map(|r| r.site.as_str()).collect();
        let boosters: BTreeSet<&str> = records
            .iter()
            .map(|r| r.booster_category.as_str())
            .collect();
        let sites = sites.into_iter().map(str::to_string).collect();
        let booster_categories = boosters.into_iter().map(str::to_string).collect();

        let payloads = || records.iter().filter_map(|r| r.payload_mass_kg);
        let min_payload = payloads().reduce(f64::min);
        let max_payload = payloads().reduce(f64::max);

        LaunchDataset {
            records,
            sites,
            booster_categories,
            min_payload,
            max_payload,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Dropdown options: "All Sites" followed by every distinct site.
    pub fn site_options(&self) -> Vec<SiteSelection> {
        std::iter::once(SiteSelection::All)
            .chain(self.sites.iter().cloned().map(SiteSelection::Site))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Control values
// ---------------------------------------------------------------------------

/// Current value of the site dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// The dropdown value (`"ALL"` or the site name).
    pub fn value(&self) -> &str {
        match self {
            SiteSelection::All => ALL_SITES_VALUE,
            SiteSelection::Site(s) => s,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        match self {
            SiteSelection::All => ALL_SITES_LABEL,
            SiteSelection::Site(s) => s,
        }
    }

    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(s) => s == site,
        }
    }
}

/// Inclusive payload mass range in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Self {
        PayloadRange { low, high }
    }

    /// Whether `mass` lies in `[low, high]`. Inverted ranges contain nothing.
    pub fn contains(&self, mass: f64) -> bool {
        self.low <= mass && mass <= self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(site: &str, payload: Option<f64>, outcome: Outcome) -> LaunchRecord {
        LaunchRecord {
            site: site.to_string(),
            payload_mass_kg: payload,
            outcome,
            booster_category: "FT".to_string(),
            flight_number: None,
            booster_version: None,
        }
    }

    #[test]
    fn payload_coercion_drops_non_numbers() {
        assert_eq!(RawValue::from_field(" 2500.5 ").to_payload(), Some(2500.5));
        assert_eq!(RawValue::Number(300.0).to_payload(), Some(300.0));
        assert_eq!(RawValue::from_field("heavy").to_payload(), None);
        assert_eq!(RawValue::from_field("").to_payload(), None);
        assert_eq!(RawValue::from_field("NaN").to_payload(), None);
        assert_eq!(RawValue::Number(f64::INFINITY).to_payload(), None);
    }

    #[test]
    fn outcome_coercion_defaults_to_failure() {
        assert_eq!(RawValue::from_field("1").to_outcome(), Outcome::Success);
        assert_eq!(RawValue::from_field("1.0").to_outcome(), Outcome::Success);
        assert_eq!(RawValue::Number(0.0).to_outcome(), Outcome::Failure);
        assert_eq!(RawValue::Missing.to_outcome(), Outcome::Failure);
        assert_eq!(RawValue::from_field("yes").to_outcome(), Outcome::Failure);
        assert_eq!(RawValue::Number(2.0).to_outcome(), Outcome::Failure);
    }

    #[test]
    fn dataset_indices_and_bounds() {
        let ds = LaunchDataset::from_records(vec![
            record("B", Some(500.0), Outcome::Success),
            record("A", None, Outcome::Failure),
            record("A", Some(9600.0), Outcome::Success),
        ]);
        assert_eq!(ds.sites, vec!["A", "B"]);
        assert_eq!(ds.min_payload, Some(500.0));
        assert_eq!(ds.max_payload, Some(9600.0));
        assert_eq!(
            ds.site_options(),
            vec![
                SiteSelection::All,
                SiteSelection::Site("A".into()),
                SiteSelection::Site("B".into()),
            ]
        );
    }

    #[test]
    fn payload_bounds_absent_without_payloads() {
        let ds = LaunchDataset::from_records(vec![record("A", None, Outcome::Success)]);
        assert_eq!(ds.min_payload, None);
        assert_eq!(ds.max_payload, None);
    }

    #[test]
    fn site_selection_values() {
        assert_eq!(SiteSelection::All.value(), "ALL");
        assert_eq!(SiteSelection::All.label(), "All Sites");
        let ksc = SiteSelection::Site("KSC LC-39A".into());
        assert_eq!(ksc.value(), "KSC LC-39A");
        assert!(ksc.matches("KSC LC-39A"));
        assert!(!ksc.matches("VAFB SLC-4E"));
    }

    #[test]
    fn inverted_range_contains_nothing() {
        let r = PayloadRange::new(5000.0, 1000.0);
        assert!(!r.contains(3000.0));
        assert!(PayloadRange::new(2000.0, 2000.0).contains(2000.0));
    }
}
