use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{LaunchDataset, Outcome, SiteSelection};

// ---------------------------------------------------------------------------
// Site/outcome aggregation (pie chart input)
// ---------------------------------------------------------------------------

/// One `(label, count)` row of a pie table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountRow {
    pub label: String,
    pub count: usize,
}

/// Derived table feeding the success pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PieTable {
    /// Successful launches per site, one row per distinct site.
    SuccessesBySite(Vec<CountRow>),
    /// Exactly two rows for one site: `Success` then `Failure`.
    OutcomesForSite { site: String, rows: [CountRow; 2] },
}

impl PieTable {
    pub fn rows(&self) -> &[CountRow] {
        match self {
            PieTable::SuccessesBySite(rows) => rows,
            PieTable::OutcomesForSite { rows, .. } => rows,
        }
    }

    pub fn title(&self) -> String {
        match self {
            PieTable::SuccessesBySite(_) => "Total Successful Launches by Site".to_string(),
            PieTable::OutcomesForSite { site, .. } => format!("Success vs Failure for {site}"),
        }
    }
}

/// Count successes for the pie chart.
///
/// With [`SiteSelection::All`] the outcome class is summed per site.  For a
/// single site the result is always `[Success, Failure]`, zero-filled; a site
/// that is not in the dataset yields two zero rows.
pub fn success_counts(dataset: &LaunchDataset, selection: &SiteSelection) -> PieTable {
    match selection {
        SiteSelection::All => {
            let mut by_site: BTreeMap<&str, usize> = BTreeMap::new();
            for r in &dataset.records {
                *by_site.entry(r.site.as_str()).or_default() += r.outcome.class() as usize;
            }
            PieTable::SuccessesBySite(
                by_site
                    .into_iter()
                    .map(|(site, count)| CountRow {
                        label: site.to_string(),
                        count,
                    })
                    .collect(),
            )
        }
        SiteSelection::Site(site) => {
            let (successes, failures) = dataset
                .records
                .iter()
                .filter(|r| r.site == *site)
                .fold((0, 0), |(s, f), r| match r.outcome {
                    Outcome::Success => (s + 1, f),
                    Outcome::Failure => (s, f + 1),
                });
            PieTable::OutcomesForSite {
                site: site.clone(),
                rows: [
                    CountRow {
                        label: Outcome::Success.to_string(),
                        count: successes,
                    },
                    CountRow {
                        label: Outcome::Failure.to_string(),
                        count: failures,
                    },
                ],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LaunchRecord;

    fn record(site: &str, outcome: Outcome) -> LaunchRecord {
        LaunchRecord {
            site: site.to_string(),
            payload_mass_kg: Some(1000.0),
            outcome,
            booster_category: "FT".to_string(),
            flight_number: None,
            booster_version: None,
        }
    }

    /// A: 3 successes / 1 failure, B: 0 successes / 2 failures.
    fn two_site_dataset() -> LaunchDataset {
        use Outcome::*;
        LaunchDataset::from_records(vec![
            record("A", Success),
            record("B", Failure),
            record("A", Success),
            record("A", Failure),
            record("B", Failure),
            record("A", Success),
        ])
    }

    fn pairs(table: &PieTable) -> Vec<(&str, usize)> {
        table
            .rows()
            .iter()
            .map(|r| (r.label.as_str(), r.count))
            .collect()
    }

    #[test]
    fn all_sites_sums_successes_per_site() {
        let ds = two_site_dataset();
        let table = success_counts(&ds, &SiteSelection::All);
        assert_eq!(pairs(&table), vec![("A", 3), ("B", 0)]);
        assert_eq!(table.title(), "Total Successful Launches by Site");
    }

    #[test]
    fn single_site_is_success_then_failure() {
        let ds = two_site_dataset();
        let table = success_counts(&ds, &SiteSelection::Site("A".into()));
        assert_eq!(pairs(&table), vec![("Success", 3), ("Failure", 1)]);
        assert_eq!(table.title(), "Success vs Failure for A");
    }

    #[test]
    fn zero_success_row_is_kept() {
        let ds = two_site_dataset();
        let table = success_counts(&ds, &SiteSelection::Site("B".into()));
        assert_eq!(pairs(&table), vec![("Success", 0), ("Failure", 2)]);
    }

    #[test]
    fn single_site_counts_sum_to_site_rows() {
        let ds = two_site_dataset();
        for site in &ds.sites {
            let table = success_counts(&ds, &SiteSelection::Site(site.clone()));
            let n = ds.records.iter().filter(|r| &r.site == site).count();
            assert_eq!(table.rows().len(), 2);
            assert_eq!(table.rows().iter().map(|r| r.count).sum::<usize>(), n);
        }
    }

    #[test]
    fn unknown_site_yields_zero_rows() {
        let ds = two_site_dataset();
        let table = success_counts(&ds, &SiteSelection::Site("Boca Chica".into()));
        assert_eq!(pairs(&table), vec![("Success", 0), ("Failure", 0)]);
    }

    #[test]
    fn empty_dataset_is_not_an_error() {
        let ds = LaunchDataset::from_records(Vec::new());
        assert!(success_counts(&ds, &SiteSelection::All).rows().is_empty());
    }

    #[test]
    fn repeated_calls_agree() {
        let ds = two_site_dataset();
        for sel in ds.site_options() {
            assert_eq!(success_counts(&ds, &sel), success_counts(&ds, &sel));
        }
    }
}
