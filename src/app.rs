use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LaunchDashApp {
    pub state: AppState,
}

impl LaunchDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for LaunchDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: controls and charts, top to bottom ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_empty() {
                plot::no_data_hint(ui);
                return;
            }
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.vertical_centered(|ui: &mut Ui| {
                        ui.heading(self.state.config.heading);
                    });
                    ui.add_space(8.0);

                    panels::site_dropdown(ui, &mut self.state);
                    ui.add_space(8.0);
                    plot::success_pie(ui, &self.state);
                    ui.separator();

                    panels::payload_slider(ui, &mut self.state);
                    ui.add_space(8.0);
                    plot::success_payload_scatter(ui, &self.state);
                    ui.separator();

                    table::scatter_records(ui, &self.state);
                });
        });
    }
}
