use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{GridMark, Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Polygon};

use crate::binding::OutputId;
use crate::data::model::SiteSelection;
use crate::figure::{Figure, PieFigure, ScatterFigure};
use crate::state::AppState;

const PIE_HEIGHT: f32 = 320.0;
const SCATTER_HEIGHT: f32 = 360.0;
/// Arc segments for a full circle.
const PIE_SEGMENTS: f64 = 96.0;

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// Outline of a pie wedge: the centre followed by the arc.
///
/// Angles are in radians, measured clockwise from twelve o'clock.
pub fn wedge_points(start: f64, sweep: f64, radius: f64) -> Vec<[f64; 2]> {
    let segments = ((sweep / TAU) * PIE_SEGMENTS).ceil().max(1.0) as usize;
    std::iter::once([0.0, 0.0])
        .chain((0..=segments).map(|i| {
            let angle = FRAC_PI_2 - (start + sweep * i as f64 / segments as f64);
            [radius * angle.cos(), radius * angle.sin()]
        }))
        .collect()
}

/// Render the success pie chart.
pub fn success_pie(ui: &mut Ui, state: &AppState) {
    let Some(Figure::Pie(fig)) = state.figure(OutputId::SuccessPieChart) else {
        return;
    };
    let colors = if state.controls.site == SiteSelection::All {
        &state.site_colors
    } else {
        &state.outcome_colors
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&fig.title);
    });

    let fractions = fig.fractions();
    Plot::new(OutputId::SuccessPieChart.to_string())
        .height(PIE_HEIGHT)
        .data_aspect(1.0)
        .legend(Legend::default())
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.1)
        .include_x(1.1)
        .include_y(-1.1)
        .include_y(1.1)
        .show(ui, |plot_ui| {
            if fig.total() == 0 {
                plot_ui.text(egui_plot::Text::new(
                    PlotPoint::new(0.0, 0.0),
                    "No launches to show",
                ));
                return;
            }
            let mut start = 0.0;
            for (slice, fraction) in fig.slices.iter().zip(&fractions) {
                let sweep = fraction * TAU;
                if sweep > 0.0 {
                    let points: PlotPoints = wedge_points(start, sweep, 1.0).into();
                    plot_ui.polygon(
                        Polygon::new(points)
                            .name(&slice.label)
                            .fill_color(colors.color_for(&slice.label))
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                }
                start += sweep;
            }
        });

    pie_summary(ui, fig, &fractions, |label| colors.color_for(label));
}

/// One line per slice, zero-valued slices included.
fn pie_summary(ui: &mut Ui, fig: &PieFigure, fractions: &[f64], color: impl Fn(&str) -> Color32) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (slice, fraction) in fig.slices.iter().zip(fractions) {
            ui.label(RichText::new("■").color(color(&slice.label)));
            ui.label(format!(
                "{}: {} ({:.1}%)",
                slice.label,
                slice.value,
                fraction * 100.0
            ));
            ui.add_space(8.0);
        }
    });
}

// ---------------------------------------------------------------------------
// Scatter chart
// ---------------------------------------------------------------------------

/// Hover text for the point nearest to `value`.
fn hover_label(fig: &ScatterFigure, name: &str, value: &PlotPoint) -> String {
    let nearest = fig
        .points
        .iter()
        .filter(|p| name.is_empty() || p.booster_category == name)
        .min_by(|a, b| {
            let da = (a.payload_mass_kg - value.x).abs() + (a.class as f64 - value.y).abs();
            let db = (b.payload_mass_kg - value.x).abs() + (b.class as f64 - value.y).abs();
            da.total_cmp(&db)
        });
    match nearest {
        Some(p) => {
            let flight = p
                .flight_number
                .map(|n| format!("Flight {n}\n"))
                .unwrap_or_default();
            format!(
                "{flight}{}\nBooster: {}\nPayload: {} kg\nClass: {}",
                p.site, p.booster_category, p.payload_mass_kg, p.class
            )
        }
        None => format!("Payload: {:.0} kg", value.x),
    }
}

/// Render the payload vs. outcome scatter chart.
pub fn success_payload_scatter(ui: &mut Ui, state: &AppState) {
    let Some(Figure::Scatter(fig)) = state.figure(OutputId::SuccessPayloadScatter) else {
        return;
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&fig.title);
    });

    let hover_fig = fig.clone();
    let ticks: Vec<f64> = fig.y_ticks.iter().map(|&t| t as f64).collect();
    let range = state.controls.payload;

    Plot::new(OutputId::SuccessPayloadScatter.to_string())
        .height(SCATTER_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(fig.x_label)
        .y_axis_label(fig.y_label)
        .include_x(range.low)
        .include_x(range.high)
        .include_y(-0.25)
        .include_y(1.25)
        .y_grid_spacer(move |_input| {
            ticks
                .iter()
                .map(|&value| GridMark {
                    value,
                    step_size: 1.0,
                })
                .collect()
        })
        .label_formatter(move |name, value| hover_label(&hover_fig, name, value))
        .allow_drag(true)
        .allow_zoom(true)
        .allow_scroll(true)
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            for (category, points) in fig.series() {
                let series: PlotPoints = points
                    .iter()
                    .map(|p| [p.payload_mass_kg, p.class as f64])
                    .collect();
                plot_ui.points(
                    Points::new(series)
                        .name(category)
                        .color(state.booster_colors.color_for(category))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(5.0),
                );
            }
        });

    if fig.points.is_empty() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.weak("No launches in this payload range.");
        });
    }
}

pub fn no_data_hint(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading("The dataset has no launches  (File → Open…)");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn wedge_starts_at_centre_and_twelve_o_clock() {
        let pts = wedge_points(0.0, FRAC_PI_2, 1.0);
        assert_eq!(pts[0], [0.0, 0.0]);
        assert!(close(pts[1][0], 0.0) && close(pts[1][1], 1.0));
        // A quarter turn clockwise ends at three o'clock.
        let last = pts[pts.len() - 1];
        assert!(close(last[0], 1.0) && close(last[1], 0.0));
    }

    #[test]
    fn wedge_arc_stays_on_the_circle() {
        for [x, y] in wedge_points(1.0, 2.5, 2.0).into_iter().skip(1) {
            assert!(close((x * x + y * y).sqrt(), 2.0));
        }
    }

    #[test]
    fn hover_names_the_nearest_launch() {
        use crate::figure::ScatterPoint;
        let point = |site: &str, payload: f64, class: u8, booster: &str| ScatterPoint {
            payload_mass_kg: payload,
            class,
            booster_category: booster.to_string(),
            site: site.to_string(),
            flight_number: Some(12),
            booster_version: None,
        };
        let fig = ScatterFigure {
            title: String::new(),
            x_label: "",
            y_label: "",
            y_ticks: [0, 1],
            points: vec![
                point("CCAFS LC-40", 500.0, 0, "v1.0"),
                point("KSC LC-39A", 5300.0, 1, "FT"),
            ],
        };
        let label = hover_label(&fig, "FT", &PlotPoint::new(5000.0, 0.9));
        assert!(label.starts_with("Flight 12\nKSC LC-39A"));
        let label = hover_label(&fig, "", &PlotPoint::new(450.0, 0.0));
        assert!(label.contains("CCAFS LC-40"));
        let label = hover_label(&fig, "B5", &PlotPoint::new(450.0, 0.0));
        assert_eq!(label, "Payload: 450 kg");
    }

    #[test]
    fn tiny_wedges_still_have_an_arc() {
        assert_eq!(wedge_points(0.0, 1e-6, 1.0).len(), 3);
        assert_eq!(wedge_points(0.0, TAU, 1.0).len(), PIE_SEGMENTS as usize + 2);
    }
}
