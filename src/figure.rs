use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::aggregate::success_counts;
use crate::data::filter::filter_by_payload;
use crate::data::model::{LaunchDataset, PayloadRange, SiteSelection};

pub const SCATTER_X_LABEL: &str = "Payload Mass (kg)";
pub const SCATTER_Y_LABEL: &str = "Success (1=Yes, 0=No)";
/// The only y ticks the scatter chart shows, whatever the data.
pub const SCATTER_Y_TICKS: [u8; 2] = [0, 1];

// ---------------------------------------------------------------------------
// Chart-ready figures
// ---------------------------------------------------------------------------

/// A rendered output, ready to draw or export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Figure {
    Pie(PieFigure),
    Scatter(ScatterFigure),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieFigure {
    pub title: String,
    /// Every slice, including zero-valued ones.
    pub slices: Vec<PieSlice>,
}

impl PieFigure {
    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Share of the whole for each slice, in `[0, 1]`.  All zero when the
    /// pie is empty.
    pub fn fractions(&self) -> Vec<f64> {
        let total = self.total();
        self.slices
            .iter()
            .map(|s| {
                if total == 0 {
                    0.0
                } else {
                    s.value as f64 / total as f64
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub class: u8,
    pub booster_category: String,
    pub site: String,
    pub flight_number: Option<u32>,
    pub booster_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterFigure {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub y_ticks: [u8; 2],
    pub points: Vec<ScatterPoint>,
}

impl ScatterFigure {
    /// Points grouped by booster version category, categories sorted.
    pub fn series(&self) -> BTreeMap<&str, Vec<&ScatterPoint>> {
        let mut series: BTreeMap<&str, Vec<&ScatterPoint>> = BTreeMap::new();
        for p in &self.points {
            series.entry(p.booster_category.as_str()).or_default().push(p);
        }
        series
    }
}

/// Pie chart of successes for the selected site(s).
pub fn pie_figure(dataset: &LaunchDataset, selection: &SiteSelection) -> PieFigure {
    let table = success_counts(dataset, selection);
    PieFigure {
        title: table.title(),
        slices: table
            .rows()
            .iter()
            .map(|r| PieSlice {
                label: r.label.clone(),
                value: r.count,
            })
            .collect(),
    }
}

/// Scatter chart of payload mass against outcome class.
pub fn scatter_figure(
    dataset: &LaunchDataset,
    selection: &SiteSelection,
    range: PayloadRange,
) -> ScatterFigure {
    let points = filter_by_payload(dataset, selection, range)
        .into_iter()
        .filter_map(|r| {
            Some(ScatterPoint {
                payload_mass_kg: r.payload_mass_kg?,
                class: r.outcome.class(),
                booster_category: r.booster_category.clone(),
                site: r.site.clone(),
                flight_number: r.flight_number,
                booster_version: r.booster_version.clone(),
            })
        })
        .collect();

    ScatterFigure {
        title: scatter_title(selection, range),
        x_label: SCATTER_X_LABEL,
        y_label: SCATTER_Y_LABEL,
        y_ticks: SCATTER_Y_TICKS,
        points,
    }
}

/// Title carrying the active site and the literal range bounds.
pub fn scatter_title(selection: &SiteSelection, range: PayloadRange) -> String {
    format!(
        "Payload vs. Outcome for {} ({}-{} kg)",
        selection.label(),
        range.low,
        range.high
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LaunchRecord, Outcome};

    fn record(site: &str, payload: Option<f64>, outcome: Outcome, booster: &str) -> LaunchRecord {
        LaunchRecord {
            site: site.to_string(),
            payload_mass_kg: payload,
            outcome,
            booster_category: booster.to_string(),
            flight_number: Some(7),
            booster_version: None,
        }
    }

    fn dataset() -> LaunchDataset {
        use Outcome::*;
        LaunchDataset::from_records(vec![
            record("CCAFS LC-40", Some(500.0), Failure, "v1.0"),
            record("KSC LC-39A", Some(3000.0), Success, "FT"),
            record("KSC LC-39A", Some(5000.0), Success, "B4"),
            record("KSC LC-39A", None, Failure, "FT"),
        ])
    }

    #[test]
    fn scatter_title_prints_bounds_literally() {
        assert_eq!(
            scatter_title(&SiteSelection::All, PayloadRange::new(0.0, 10000.0)),
            "Payload vs. Outcome for All Sites (0-10000 kg)"
        );
        assert_eq!(
            scatter_title(
                &SiteSelection::Site("KSC LC-39A".into()),
                PayloadRange::new(2000.0, 4500.5)
            ),
            "Payload vs. Outcome for KSC LC-39A (2000-4500.5 kg)"
        );
    }

    #[test]
    fn scatter_keeps_both_ticks_when_one_class_present() {
        let fig = scatter_figure(
            &dataset(),
            &SiteSelection::Site("KSC LC-39A".into()),
            PayloadRange::new(0.0, 10000.0),
        );
        assert!(fig.points.iter().all(|p| p.class == 1));
        assert_eq!(fig.y_ticks, [0, 1]);
        assert_eq!(fig.points.len(), 2);
    }

    #[test]
    fn scatter_series_grouped_by_booster() {
        let fig = scatter_figure(&dataset(), &SiteSelection::All, PayloadRange::new(0.0, 10000.0));
        let series = fig.series();
        let keys: Vec<&str> = series.keys().copied().collect();
        assert_eq!(keys, vec!["B4", "FT", "v1.0"]);
        assert_eq!(series["FT"].len(), 1);
        assert_eq!(series["FT"][0].site, "KSC LC-39A");
    }

    #[test]
    fn empty_scatter_has_no_points() {
        let fig = scatter_figure(
            &dataset(),
            &SiteSelection::All,
            PayloadRange::new(6000.0, 9000.0),
        );
        assert!(fig.points.is_empty());
        assert!(fig.series().is_empty());
    }

    #[test]
    fn pie_fractions_handle_zero_total() {
        let fig = pie_figure(&dataset(), &SiteSelection::Site("Nowhere".into()));
        assert_eq!(fig.total(), 0);
        assert_eq!(fig.fractions(), vec![0.0, 0.0]);

        let fig = pie_figure(&dataset(), &SiteSelection::Site("KSC LC-39A".into()));
        assert_eq!(fig.title, "Success vs Failure for KSC LC-39A");
        let fractions = fig.fractions();
        assert!((fractions[0] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn figure_serialises_with_kind_tag() {
        let fig = Figure::Pie(pie_figure(&dataset(), &SiteSelection::All));
        let json = serde_json::to_value(&fig).unwrap();
        assert_eq!(json["kind"], "pie");
        assert_eq!(json["title"], "Total Successful Launches by Site");
        assert_eq!(json["slices"][1]["label"], "KSC LC-39A");
        assert_eq!(json["slices"][1]["value"], 2);
    }
}
