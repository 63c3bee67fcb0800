use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::binding::OutputId;
use crate::figure::Figure;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// Table of the launches currently plotted on the scatter chart.
pub fn scatter_records(ui: &mut Ui, state: &AppState) {
    let Some(Figure::Scatter(fig)) = state.figure(OutputId::SuccessPayloadScatter) else {
        return;
    };

    ui.collapsing(format!("Launches in range ({})", fig.points.len()), |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(60.0))
            .column(Column::auto().at_least(120.0))
            .column(Column::auto().at_least(100.0))
            .column(Column::auto().at_least(80.0))
            .column(Column::remainder())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for title in ["Flight", "Launch Site", "Payload (kg)", "Outcome", "Booster"] {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, fig.points.len(), |mut row| {
                    let p = &fig.points[row.index()];
                    row.col(|ui: &mut Ui| {
                        ui.label(p.flight_number.map(|n| n.to_string()).unwrap_or_default());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(&p.site);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.1}", p.payload_mass_kg));
                    });
                    row.col(|ui: &mut Ui| {
                        let text = if p.class == 1 { "Success" } else { "Failure" };
                        ui.label(RichText::new(text).color(state.outcome_colors.color_for(text)));
                    });
                    row.col(|ui: &mut Ui| {
                        let label = match &p.booster_version {
                            Some(v) => format!("{} ({v})", p.booster_category),
                            None => p.booster_category.clone(),
                        };
                        let color = state.booster_colors.color_for(&p.booster_category);
                        ui.label(RichText::new(label).color(color));
                    });
                });
            });
    });
}
