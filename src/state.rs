use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::binding::{CallbackRegistry, ControlId, Controls, OutputId};
use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::model::{LaunchDataset, PayloadRange, SiteSelection};
use crate::figure::Figure;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset, replaced wholesale on File → Open.
    pub dataset: LaunchDataset,

    /// Current control values.
    pub controls: Controls,

    registry: CallbackRegistry,

    /// Most recent figure per output.
    figures: BTreeMap<OutputId, Figure>,

    pub site_colors: ColorMap,
    pub booster_colors: ColorMap,
    pub outcome_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state and render every output once.
    pub fn new(config: DashboardConfig, dataset: LaunchDataset) -> Self {
        let controls = Controls {
            site: SiteSelection::All,
            payload: config.initial_payload_range(&dataset),
        };
        let mut state = Self {
            config,
            site_colors: ColorMap::new(dataset.sites.iter().map(String::as_str)),
            booster_colors: ColorMap::new(dataset.booster_categories.iter().map(String::as_str)),
            outcome_colors: ColorMap::outcomes(),
            dataset,
            controls,
            registry: CallbackRegistry::dashboard(),
            figures: BTreeMap::new(),
            status_message: None,
        };
        state.render_all();
        state
    }

    /// Ingest a newly loaded dataset and reset the controls to their defaults.
    pub fn set_dataset(&mut self, dataset: LaunchDataset) {
        self.controls = Controls {
            site: SiteSelection::All,
            payload: self.config.initial_payload_range(&dataset),
        };
        self.site_colors = ColorMap::new(dataset.sites.iter().map(String::as_str));
        self.booster_colors = ColorMap::new(dataset.booster_categories.iter().map(String::as_str));
        self.dataset = dataset;
        self.status_message = None;
        self.render_all();
    }

    pub fn figure(&self, output: OutputId) -> Option<&Figure> {
        self.figures.get(&output)
    }

    /// Change the site dropdown.  No-op when the value is unchanged.
    pub fn select_site(&mut self, site: SiteSelection) {
        if self.controls.site == site {
            return;
        }
        log::debug!("{} → {}", ControlId::SiteDropdown, site.value());
        self.controls.site = site;
        self.controls_changed(&[ControlId::SiteDropdown]);
    }

    /// Move the lower slider handle.  It cannot pass the upper handle.
    pub fn set_payload_low(&mut self, low: f64) {
        let high = self.controls.payload.high;
        let low = low.clamp(self.config.payload_min, high);
        self.set_payload_range(PayloadRange::new(low, high));
    }

    /// Move the upper slider handle.  It cannot pass the lower handle.
    pub fn set_payload_high(&mut self, high: f64) {
        let low = self.controls.payload.low;
        let high = high.clamp(low, self.config.payload_max);
        self.set_payload_range(PayloadRange::new(low, high));
    }

    fn set_payload_range(&mut self, range: PayloadRange) {
        if self.controls.payload == range {
            return;
        }
        self.controls.payload = range;
        self.controls_changed(&[ControlId::PayloadSlider]);
    }

    fn controls_changed(&mut self, changed: &[ControlId]) {
        let updates = self.registry.dispatch(changed, &self.dataset, &self.controls);
        self.figures.extend(updates);
    }

    fn render_all(&mut self) {
        self.figures = self
            .registry
            .render_all(&self.dataset, &self.controls)
            .into_iter()
            .collect();
    }

    /// Write the controls and current figures as pretty JSON.
    pub fn export_figures(&self, path: &Path) -> Result<()> {
        #[derive(Serialize)]
        struct Export<'a> {
            controls: &'a Controls,
            outputs: BTreeMap<String, &'a Figure>,
        }

        let export = Export {
            controls: &self.controls,
            outputs: self
                .figures
                .iter()
                .map(|(id, fig)| (id.to_string(), fig))
                .collect(),
        };
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &export).context("writing figures as JSON")?;
        writer.flush().context("flushing figures")?;
        Ok(())
    }
}
