use std::f32::consts::TAU;

use eframe::egui::{self, Color32, RichText, Sense, Shape, Stroke, Ui, Vec2};
use egui_extras::{Column as TableColumn, TableBuilder};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::red_yellow_green;
use crate::data::aggregate::{GroupMean, Histogram, Share};
use crate::data::model::Column;
use crate::format::format_usd;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// 2×2 chart grid
// ---------------------------------------------------------------------------

/// Render the four charts; each shows a notice instead when it has no data.
pub fn chart_grid(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📈 Charts");

    ui.columns(2, |cols| {
        chart_title(&mut cols[0], "Top 10 roles by mean salary");
        match &state.views.top_roles {
            Some(top) => top_roles_chart(&mut cols[0], top),
            None => no_data(&mut cols[0], "No data to show in the roles chart."),
        }

        chart_title(&mut cols[1], "Annual salary distribution");
        match &state.views.distribution {
            Some(hist) => distribution_chart(&mut cols[1], hist),
            None => no_data(&mut cols[1], "No data to show in the salary distribution."),
        }
    });

    ui.add_space(8.0);

    ui.columns(2, |cols| {
        chart_title(&mut cols[0], "Share by work arrangement");
        match &state.views.remote_shares {
            Some(shares) => donut_chart(&mut cols[0], shares, state),
            None => no_data(&mut cols[0], "No data to show in the work arrangement chart."),
        }

        country_panel(&mut cols[1], state);
    });
}

fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong().size(16.0));
}

fn no_data(ui: &mut Ui, message: &str) {
    ui.label(RichText::new(format!("⚠ {message}")).color(Color32::from_rgb(200, 150, 0)));
}

// ---------------------------------------------------------------------------
// Horizontal bar chart: top roles
// ---------------------------------------------------------------------------

fn top_roles_chart(ui: &mut Ui, top: &[GroupMean]) {
    let bars: Vec<Bar> = top
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new(i as f64, g.mean_salary)
                .name(format!("{}: {}", g.key, format_usd(g.mean_salary)))
                .width(0.7)
        })
        .collect();

    // Category labels for the y axis, indexed by bar position.
    let labels: Vec<String> = top.iter().map(|g| g.key.clone()).collect();

    Plot::new("top_roles")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .x_axis_label("Mean annual salary (USD)")
        .y_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .horizontal()
                    .color(Color32::from_rgb(99, 110, 250))
                    .name("Mean salary"),
            );
        });
}

// ---------------------------------------------------------------------------
// Histogram: salary distribution
// ---------------------------------------------------------------------------

fn distribution_chart(ui: &mut Ui, hist: &Histogram) {
    let bars: Vec<Bar> = hist
        .bins()
        .map(|bin| {
            let width = if hist.bin_width > 0.0 { hist.bin_width } else { 1.0 };
            Bar::new((bin.lo + bin.hi) / 2.0, bin.count as f64)
                .width(width)
                .name(format!(
                    "{} – {}: {}",
                    format_usd(bin.lo),
                    format_usd(bin.hi),
                    bin.count
                ))
        })
        .collect();

    Plot::new("salary_distribution")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_label("Salary range (USD)")
        .y_axis_label("Records")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .color(Color32::from_rgb(99, 110, 250))
                    .name(format!("Records ({})", hist.total())),
            );
        });
}

// ---------------------------------------------------------------------------
// Donut: work arrangement proportions
// ---------------------------------------------------------------------------

fn donut_chart(ui: &mut Ui, shares: &[Share], state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        let side = (ui.available_width() * 0.5).min(CHART_HEIGHT);
        let (response, painter) = ui.allocate_painter(Vec2::splat(side), Sense::hover());
        let center = response.rect.center();
        let outer = side * 0.48;
        let inner = outer * 0.5;

        let mut start = -TAU / 4.0;
        for share in shares {
            let sweep = share.fraction as f32 * TAU;
            let color = state.remote_colors.color_for(&share.label);
            // Convex ring segments, a few degrees each.
            let steps = ((sweep / TAU) * 120.0).ceil().max(1.0) as usize;
            for s in 0..steps {
                let a0 = start + sweep * s as f32 / steps as f32;
                let a1 = start + sweep * (s + 1) as f32 / steps as f32;
                let dir0 = Vec2::angled(a0);
                let dir1 = Vec2::angled(a1);
                painter.add(Shape::convex_polygon(
                    vec![
                        center + dir0 * inner,
                        center + dir0 * outer,
                        center + dir1 * outer,
                        center + dir1 * inner,
                    ],
                    color,
                    Stroke::NONE,
                ));
            }
            start += sweep;
        }

        ui.vertical(|ui: &mut Ui| {
            for share in shares {
                let color = state.remote_colors.color_for(&share.label);
                ui.label(
                    RichText::new(format!(
                        "■ {}  {:.1}% ({})",
                        share.label,
                        share.fraction * 100.0,
                        share.count
                    ))
                    .color(color),
                );
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Country map: mean salary of the target role per ISO-3 code
// ---------------------------------------------------------------------------

fn country_panel(ui: &mut Ui, state: &mut AppState) {
    let mut picked = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("Mean salary by country for").strong().size(16.0));
        egui::ComboBox::from_id_salt("target_role")
            .selected_text(&state.target_role)
            .show_ui(ui, |ui: &mut Ui| {
                for role in &state.roles {
                    if ui
                        .selectable_label(*role == state.target_role, role)
                        .clicked()
                    {
                        picked = Some(role.clone());
                    }
                }
            });
    });
    if let Some(role) = picked {
        state.set_target_role(role);
    }

    match &state.views.country_means {
        None => no_data(ui, "No data to show in the country chart."),
        Some(means) if means.is_empty() => no_data(
            ui,
            &format!("No {} records in the current selection.", state.target_role),
        ),
        Some(means) => country_tiles(ui, means),
    }
}

fn country_tiles(ui: &mut Ui, means: &[GroupMean]) {
    let lo = means.iter().map(|g| g.mean_salary).fold(f64::INFINITY, f64::min);
    let hi = means.iter().map(|g| g.mean_salary).fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;

    egui::ScrollArea::vertical()
        .id_salt("country_tiles")
        .max_height(CHART_HEIGHT)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for g in means {
                    let t = if span > 0.0 { (g.mean_salary - lo) / span } else { 1.0 };
                    let fill = red_yellow_green(t);
                    egui::Frame::new()
                        .fill(fill)
                        .corner_radius(4.0)
                        .inner_margin(6.0)
                        .show(ui, |ui: &mut Ui| {
                            ui.set_min_width(64.0);
                            ui.vertical(|ui: &mut Ui| {
                                ui.label(RichText::new(&g.key).strong().color(Color32::BLACK));
                                ui.label(
                                    RichText::new(format_usd(g.mean_salary))
                                        .small()
                                        .color(Color32::BLACK),
                                );
                            });
                        })
                        .response
                        .on_hover_text(format!(
                            "{}: {} mean over {} records",
                            g.key,
                            format_usd(g.mean_salary),
                            g.count
                        ));
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Detail table
// ---------------------------------------------------------------------------

/// Raw dump of the filtered records.
pub fn detail_table(ui: &mut Ui, state: &AppState) {
    ui.heading("📋 Detailed data");

    let records = &state.dataset.records;
    let rows = &state.visible_indices;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(400.0)
        .columns(TableColumn::auto().at_least(80.0), Column::ALL.len())
        .header(20.0, |mut header| {
            for col in Column::ALL {
                header.col(|ui: &mut Ui| {
                    ui.strong(col.label());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let record = &records[rows[row.index()]];
                for col in Column::ALL {
                    row.col(|ui: &mut Ui| {
                        ui.label(record.cell(col));
                    });
                }
            });
        });
}
