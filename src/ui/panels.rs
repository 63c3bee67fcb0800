use eframe::egui::{self, Color32, RichText, Slider, Ui};

use crate::binding::OutputId;
use crate::data::loader::load_file;
use crate::data::model::SiteSelection;
use crate::figure::Figure;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Controls – site dropdown and payload range
// ---------------------------------------------------------------------------

/// Render the site selector.  Always has a value; "All Sites" by default.
pub fn site_dropdown(ui: &mut Ui, state: &mut AppState) {
    let options = state.dataset.site_options();
    let mut selected = state.controls.site.clone();

    ui.vertical_centered(|ui: &mut Ui| {
        egui::ComboBox::from_id_salt("site-dropdown")
            .selected_text(selected.label())
            .width(ui.available_width() * 0.6)
            .show_ui(ui, |ui: &mut Ui| {
                for opt in &options {
                    ui.selectable_value(&mut selected, opt.clone(), opt.label());
                }
            });
    });

    state.select_site(selected);
}

/// Render the two-handled payload range control.
pub fn payload_slider(ui: &mut Ui, state: &mut AppState) {
    let domain = state.config.payload_min..=state.config.payload_max;
    let step = state.config.payload_step;
    let mut low = state.controls.payload.low;
    let mut high = state.controls.payload.high;

    ui.vertical_centered(|ui: &mut Ui| {
        ui.label("Payload range (Kg):");
    });
    ui.horizontal(|ui: &mut Ui| {
        let low_changed = ui
            .add(Slider::new(&mut low, domain.clone()).step_by(step).text("from"))
            .changed();
        let high_changed = ui
            .add(Slider::new(&mut high, domain).step_by(step).text("to"))
            .changed();
        if low_changed {
            state.set_payload_low(low);
        }
        if high_changed {
            state.set_payload_high(high);
        }
    });

    let marks: Vec<String> = state
        .config
        .payload_marks
        .iter()
        .map(|m| m.to_string())
        .collect();
    ui.weak(format!("marks: {}", marks.join(" · ")));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export figures…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let shown = match state.figure(OutputId::SuccessPayloadScatter) {
            Some(Figure::Scatter(fig)) => fig.points.len(),
            _ => 0,
        };
        ui.label(format!(
            "{} launches loaded, {} in payload range",
            state.dataset.len(),
            shown
        ));

        if let SiteSelection::Site(site) = &state.controls.site {
            ui.separator();
            ui.label(format!("site: {site}"));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export figures")
        .set_file_name("figures.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match state.export_figures(&path) {
            Ok(()) => log::info!("Exported figures to {}", path.display()),
            Err(e) => {
                log::error!("Failed to export figures: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
