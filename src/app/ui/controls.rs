use eframe::egui::{self, Ui};

use crate::scenario::Zone;

use super::super::ViewModel;
use super::super::render_utils::zone_color;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Scenario");
        ui.separator();
        ui.add_space(4.0);

        if !self.scenario.description.is_empty() {
            ui.label(self.scenario.description.as_str());
            ui.add_space(6.0);
        }

        ui.label("Search tasks")
            .on_hover_text("Fuzzy-highlight matching nodes without moving anything.");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Matches task labels and ids.");

        ui.separator();

        for zone in [Zone::Ai, Zone::Shared, Zone::Human] {
            ui.horizontal(|ui| {
                ui.colored_label(zone_color(zone), zone.label());
                ui.label(format!("{} tasks", self.scenario.zone_count(zone)));
            });
        }

        ui.separator();

        ui.checkbox(&mut self.live_physics, "Live physics simulation")
            .on_hover_text("Pause to freeze the layout; nodes stop reclassifying while paused.");

        ui.collapsing("Physics tuning", |ui| {
            let intensity_slider = ui
                .add(
                    egui::Slider::new(&mut self.physics_intensity, 0.2..=2.5)
                        .text("Intensity")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Overall strength applied to all layout forces.");
            if intensity_slider.changed()
                && let Some(simulation) = &mut self.simulation
            {
                simulation.set_intensity(self.physics_intensity);
            }
        });

        ui.separator();

        egui::CollapsingHeader::new("Tasks")
            .default_open(true)
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(320.0)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for task in &self.scenario.tasks {
                            ui.horizontal(|ui| {
                                ui.colored_label(zone_color(task.current_zone), "●");
                                ui.label(task.label.as_str())
                                    .on_hover_text(task.description.as_str());
                            });
                        }
                    });
            });
    }
}
