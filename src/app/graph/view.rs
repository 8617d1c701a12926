use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::scenario::Zone;
use crate::util::truncate_label;

use super::super::render_utils::{blend_color, edge_color, zone_color, zone_tint};
use super::super::sim::{NODE_RADIUS, TOP_OFFSET};
use super::super::{ViewModel, ZoneFade};

/// Duration of the color blend after a zone reassignment.
const FADE_SECONDS: f32 = 0.2;

fn to_screen(rect: Rect, pos: Vec2) -> Pos2 {
    rect.left_top() + pos
}

impl ViewModel {
    fn search_matches(&self) -> Option<HashSet<usize>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .scenario
            .tasks
            .iter()
            .enumerate()
            .filter_map(|(index, task)| {
                matcher
                    .fuzzy_match(&task.label, query)
                    .or_else(|| {
                        matcher.fuzzy_match(
                            &task.label.to_ascii_lowercase(),
                            &query.to_ascii_lowercase(),
                        )
                    })
                    .or_else(|| matcher.fuzzy_match(&task.id, query))
                    .map(|_score| index)
            })
            .collect::<HashSet<_>>();
        Some(matches)
    }

    fn draw_lanes(&self, painter: &egui::Painter, rect: Rect) {
        painter.rect_filled(rect, 0.0, Color32::from_rgb(12, 13, 16));

        let lower_x = rect.left() + self.boundaries.lower() / 100.0 * rect.width();
        let upper_x = rect.left() + self.boundaries.upper() / 100.0 * rect.width();

        let lanes = [
            (
                Rect::from_min_max(rect.left_top(), Pos2::new(lower_x, rect.bottom())),
                Zone::Ai,
            ),
            (
                Rect::from_min_max(
                    Pos2::new(lower_x, rect.top()),
                    Pos2::new(upper_x, rect.bottom()),
                ),
                Zone::Shared,
            ),
            (
                Rect::from_min_max(Pos2::new(upper_x, rect.top()), rect.right_bottom()),
                Zone::Human,
            ),
        ];

        for (lane_rect, zone) in lanes {
            painter.rect_filled(lane_rect, 0.0, zone_tint(zone));
            painter.text(
                Pos2::new(lane_rect.center().x, rect.top() + 28.0),
                Align2::CENTER_CENTER,
                format!("{} · {}", zone.label(), self.scenario.zone_count(zone)),
                FontId::monospace(13.0),
                zone_color(zone),
            );
        }
    }

    fn draw_boundary_lines(&self, painter: &egui::Painter, rect: Rect) {
        for percent in [self.boundaries.lower(), self.boundaries.upper()] {
            let x = rect.left() + percent / 100.0 * rect.width();
            painter.line_segment(
                [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
                Stroke::new(2.0, Color32::from_rgba_unmultiplied(255, 255, 255, 90)),
            );
            painter.circle_filled(
                Pos2::new(x, rect.top() + TOP_OFFSET * 0.5),
                6.0,
                Color32::from_gray(230),
            );
            painter.text(
                Pos2::new(x, rect.top() + 50.0),
                Align2::CENTER_CENTER,
                format!("{percent:.0}%"),
                FontId::monospace(11.0),
                Color32::from_gray(170),
            );
        }
    }

    fn draw_hover_card(&self, painter: &egui::Painter, rect: Rect, index: usize) {
        let Some(task) = self.scenario.tasks.get(index) else {
            return;
        };

        let origin = rect.left_top() + vec2(16.0, 56.0);
        painter.text(
            origin,
            Align2::LEFT_TOP,
            &task.label,
            FontId::proportional(15.0),
            Color32::from_gray(240),
        );
        if !task.description.is_empty() {
            painter.text(
                origin + vec2(0.0, 22.0),
                Align2::LEFT_TOP,
                &task.description,
                FontId::proportional(12.0),
                Color32::from_gray(175),
            );
        }
        painter.text(
            origin + vec2(0.0, 42.0),
            Align2::LEFT_TOP,
            format!(
                "zone {}  |  AI confidence {:.0}%  |  ethical load {:.0}%",
                task.current_zone.label(),
                task.ai_confidence * 100.0,
                task.ethical_complexity * 100.0
            ),
            FontId::monospace(12.0),
            Color32::from_gray(200),
        );
        if !task.dependencies.is_empty() {
            painter.text(
                origin + vec2(0.0, 60.0),
                Align2::LEFT_TOP,
                format!("depends on: {}", task.dependencies.join(", ")),
                FontId::monospace(11.0),
                Color32::from_gray(150),
            );
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let size = rect.size();

        // Zero-size panes during mount or layout are "not ready", not errors.
        if size.x <= 0.0 || size.y <= 0.0 {
            self.simulation = None;
            self.canvas_size = Vec2::ZERO;
            return;
        }

        if self.simulation.is_none() || self.canvas_size != size {
            self.canvas_size = size;
            self.rebuild_simulation();
        }

        let painter = ui.painter_at(rect);

        self.handle_canvas_drag(rect, &response);

        let delta_seconds = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);

        let mut changes = Vec::new();
        if self.live_physics
            && let Some(simulation) = self.simulation.as_mut()
        {
            changes = simulation.step(delta_seconds);
        }
        for change in &changes {
            self.scenario.update_node_zone(&change.id, change.to);
            if let Some(fade) = self.zone_fades.get_mut(change.index) {
                *fade = ZoneFade {
                    from: change.from,
                    progress: 0.0,
                };
            }
        }

        let mut fades_active = false;
        for fade in &mut self.zone_fades {
            if fade.progress < 1.0 {
                fade.progress = (fade.progress + delta_seconds / FADE_SECONDS).min(1.0);
                if fade.progress < 1.0 {
                    fades_active = true;
                }
            }
        }

        let search_matches = self.search_matches();
        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = pointer.and_then(|pointer| {
            if rect.contains(pointer) {
                self.node_at(rect, pointer)
            } else {
                None
            }
        });
        let hovered_handle =
            pointer.and_then(|pointer| self.boundary_handle_at(rect, pointer));

        self.draw_lanes(&painter, rect);

        let Some(simulation) = self.simulation.as_ref() else {
            return;
        };

        for &edge in simulation.edges() {
            // Hidden entirely unless both endpoints share a zone right now.
            let Some(zone) = simulation.edge_zone(edge) else {
                continue;
            };
            let start = to_screen(rect, simulation.nodes()[edge.0].pos);
            let end = to_screen(rect, simulation.nodes()[edge.1].pos);
            painter.line_segment([start, end], Stroke::new(2.0, edge_color(zone)));
        }

        self.draw_boundary_lines(&painter, rect);

        for (index, node) in simulation.nodes().iter().enumerate() {
            let position = to_screen(rect, node.pos);
            let fade = self.zone_fades.get(index).copied().unwrap_or(ZoneFade {
                from: node.zone,
                progress: 1.0,
            });
            let fill = blend_color(zone_color(fade.from), zone_color(node.zone), fade.progress);

            painter.circle_filled(position, NODE_RADIUS, fill);
            painter.circle_stroke(position, NODE_RADIUS, Stroke::new(2.0, Color32::WHITE));

            if search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index))
            {
                painter.circle_stroke(
                    position,
                    NODE_RADIUS + 5.0,
                    Stroke::new(2.0, Color32::from_rgb(103, 196, 255)),
                );
            }

            let label = self
                .scenario
                .tasks
                .get(index)
                .map(|task| truncate_label(&task.label).to_uppercase())
                .unwrap_or_default();
            painter.text(
                position,
                Align2::CENTER_CENTER,
                label,
                FontId::monospace(10.0),
                Color32::WHITE,
            );
        }

        if self.dragged_node.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grabbing);
        } else if self.boundary_drag.is_some() || hovered_handle.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::ResizeHorizontal);
        } else if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grab);
        }

        if let Some(index) = hovered {
            self.draw_hover_card(&painter, rect, index);
        }

        if simulation.is_active() || fades_active || response.dragged() {
            ui.ctx().request_repaint();
        }
    }
}
