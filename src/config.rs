use crate::data::model::{LaunchDataset, PayloadRange};

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Dataset read at startup, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "spacex_launch_dash.csv";

/// Static dashboard settings.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_path: &'static str,
    pub window_title: &'static str,
    pub heading: &'static str,
    pub inner_size: [f32; 2],
    pub min_inner_size: [f32; 2],
    /// Range slider domain in kilograms.
    pub payload_min: f64,
    pub payload_max: f64,
    pub payload_step: f64,
    /// Labelled positions under the range slider.
    pub payload_marks: &'static [f64],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: DEFAULT_DATA_PATH,
            window_title: "Launch Dash",
            heading: "SpaceX Launch Records Dashboard",
            inner_size: [1200.0, 900.0],
            min_inner_size: [640.0, 480.0],
            payload_min: 0.0,
            payload_max: 10000.0,
            payload_step: 1000.0,
            payload_marks: &[0.0, 2500.0, 5000.0, 7500.0, 10000.0],
        }
    }
}

impl DashboardConfig {
    /// Initial slider value: the dataset's payload bounds truncated to whole
    /// kilograms and clamped to the slider domain.  Falls back to the whole
    /// domain when no record has a payload.
    pub fn initial_payload_range(&self, dataset: &LaunchDataset) -> PayloadRange {
        match (dataset.min_payload, dataset.max_payload) {
            (Some(min), Some(max)) => PayloadRange::new(
                min.trunc().clamp(self.payload_min, self.payload_max),
                max.trunc().clamp(self.payload_min, self.payload_max),
            ),
            _ => PayloadRange::new(self.payload_min, self.payload_max),
        }
    }
}
