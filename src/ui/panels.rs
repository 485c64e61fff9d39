use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::format::format_usd;
use crate::state::{AppState, FilterColumn};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 Filters");
    ui.separator();

    if state.dataset.is_empty() {
        ui.label("The dataset has no records.");
        return;
    }

    if ui.button("Reset filters").clicked() {
        state.reset_filters();
    }
    ui.add_space(4.0);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for column in FilterColumn::ALL {
                let all_values = state.options(column);

                // Show count of selected / total in the header
                let n_selected = state.selected_count(column);
                let n_total = all_values.len();
                let header_text = format!("{}  ({n_selected}/{n_total})", column.label());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(column.label())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(column);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(column);
                            }
                        });

                        for val in &all_values {
                            let mut checked = state.is_selected(column, val);
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                state.toggle_filter_value(column, val);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with the visible-record counter.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("🎲 Data Careers Salary Dashboard");
        ui.separator();
        ui.label(format!(
            "{} records loaded, {} visible",
            state.dataset.len(),
            state.visible_indices.len()
        ));
    });
    ui.label("Explore salaries in data roles over recent years. Use the filters on the left to refine the analysis.");
}

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

/// Render the four headline metrics (annual salary in USD).
pub fn metrics_row(ui: &mut Ui, state: &AppState) {
    let summary = &state.views.summary;
    ui.heading("📊 Overall metrics (annual salary in USD)");
    ui.columns(4, |cols| {
        metric(&mut cols[0], "Mean salary", &format_usd(summary.mean_salary));
        metric(&mut cols[1], "Max salary", &format_usd(summary.max_salary));
        metric(&mut cols[2], "Records", &summary.record_count.to_string());
        metric(&mut cols[3], "Most frequent role", &summary.most_frequent_role);
    });
}

fn metric(ui: &mut Ui, title: &str, value: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(title).weak());
        ui.label(RichText::new(value).size(24.0).strong());
    });
}
