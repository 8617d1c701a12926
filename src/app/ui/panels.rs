use eframe::egui::{self, Align, Context, Layout};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        scenario_path: &str,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading(&self.scenario.title);
                ui.separator();
                ui.label(
                    egui::RichText::new(format!(
                        "Fronteira: {:.0}% | {:.0}%",
                        self.boundaries.lower(),
                        self.boundaries.upper()
                    ))
                    .monospace(),
                );

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let reload = ui
                        .add_enabled(!is_reloading, egui::Button::new("Reload scenario"))
                        .on_hover_text(format!("Re-read {scenario_path} from disk."));
                    if reload.clicked() {
                        *reload_requested = true;
                    }
                    if is_reloading {
                        ui.spinner();
                    }
                });
            });
            ui.add_space(4.0);
        });

        egui::SidePanel::left("controls")
            .default_width(280.0)
            .show(ctx, |ui| {
                self.draw_controls(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_graph(ui);
        });
    }
}
