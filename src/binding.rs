//! Explicit output bindings.
//!
//! Each output chart declares the controls it reads and a pure callback.
//! When controls change, [`CallbackRegistry::dispatch`] re-runs every binding
//! that lists one of them, once, with the current value of all its inputs.

use std::fmt;

use serde::Serialize;

use crate::data::model::{LaunchDataset, PayloadRange, SiteSelection};
use crate::figure::{self, Figure};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ControlId {
    SiteDropdown,
    PayloadSlider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum OutputId {
    SuccessPieChart,
    SuccessPayloadScatter,
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ControlId::SiteDropdown => "site-dropdown",
            ControlId::PayloadSlider => "payload-slider",
        })
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputId::SuccessPieChart => "success-pie-chart",
            OutputId::SuccessPayloadScatter => "success-payload-scatter-chart",
        })
    }
}

/// Snapshot of every control value at dispatch time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Controls {
    pub site: SiteSelection,
    pub payload: PayloadRange,
}

/// Computes one output from the dataset and the current controls.
pub type Callback = fn(&LaunchDataset, &Controls) -> Figure;

pub struct Binding {
    pub output: OutputId,
    pub inputs: Vec<ControlId>,
    pub callback: Callback,
}

impl Binding {
    fn is_triggered_by(&self, changed: &[ControlId]) -> bool {
        self.inputs.iter().any(|input| changed.contains(input))
    }
}

/// Output identifier → (callback, declared inputs).
#[derive(Default)]
pub struct CallbackRegistry {
    bindings: Vec<Binding>,
}

impl CallbackRegistry {
    /// Register a binding.  A later binding for the same output replaces the
    /// earlier one.
    pub fn register(&mut self, output: OutputId, inputs: &[ControlId], callback: Callback) {
        self.bindings.retain(|b| b.output != output);
        self.bindings.push(Binding {
            output,
            inputs: inputs.to_vec(),
            callback,
        });
    }

    /// The launch dashboard: pie ← site, scatter ← site + payload.
    pub fn dashboard() -> Self {
        let mut registry = Self::default();
        registry.register(OutputId::SuccessPieChart, &[ControlId::SiteDropdown], pie_output);
        registry.register(
            OutputId::SuccessPayloadScatter,
            &[ControlId::SiteDropdown, ControlId::PayloadSlider],
            scatter_output,
        );
        registry
    }

    /// Recompute every output that depends on a changed control.
    pub fn dispatch(
        &self,
        changed: &[ControlId],
        dataset: &LaunchDataset,
        controls: &Controls,
    ) -> Vec<(OutputId, Figure)> {
        let updates: Vec<(OutputId, Figure)> = self
            .bindings
            .iter()
            .filter(|b| b.is_triggered_by(changed))
            .map(|b| (b.output, (b.callback)(dataset, controls)))
            .collect();
        log::debug!(
            "controls {:?} changed, recomputed {:?}",
            changed,
            updates.iter().map(|(id, _)| *id).collect::<Vec<_>>()
        );
        updates
    }

    /// Compute every output once (initial render).
    pub fn render_all(
        &self,
        dataset: &LaunchDataset,
        controls: &Controls,
    ) -> Vec<(OutputId, Figure)> {
        self.bindings
            .iter()
            .map(|b| (b.output, (b.callback)(dataset, controls)))
            .collect()
    }
}

fn pie_output(dataset: &LaunchDataset, controls: &Controls) -> Figure {
    Figure::Pie(figure::pie_figure(dataset, &controls.site))
}

fn scatter_output(dataset: &LaunchDataset, controls: &Controls) -> Figure {
    Figure::Scatter(figure::scatter_figure(dataset, &controls.site, controls.payload))
}
