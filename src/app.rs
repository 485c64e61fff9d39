use eframe::egui::{self, Color32, RichText};

use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

/// The dashboard window: either a live session or the load failure.
pub enum SalaryDashApp {
    Ready(Box<AppState>),
    Failed { source: String, message: String },
}

impl eframe::App for SalaryDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = match self {
            SalaryDashApp::Ready(state) => state,
            SalaryDashApp::Failed { source, message } => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.label(
                            RichText::new(format!("Could not load {source}\n\n{message}"))
                                .color(Color32::RED)
                                .heading(),
                        );
                    });
                });
                return;
            }
        };

        // ---- Top panel: title and counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, state);
            });

        // ---- Central panel: metrics, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    panels::metrics_row(ui, state);
                    ui.separator();
                    charts::chart_grid(ui, state);
                    ui.separator();
                    charts::detail_table(ui, state);
                });
        });
    }
}
