use eframe::egui::{self, Pos2, Rect, Vec2};

use super::super::sim::NODE_RADIUS;
use super::super::{BoundaryHandle, ViewModel};

/// Pointer tolerance around a boundary line, in pixels.
const HANDLE_GRAB_WIDTH: f32 = 8.0;

impl ViewModel {
    pub(in crate::app) fn boundary_handle_at(
        &self,
        rect: Rect,
        pointer: Pos2,
    ) -> Option<BoundaryHandle> {
        let lower_x = rect.left() + self.boundaries.lower() / 100.0 * rect.width();
        let upper_x = rect.left() + self.boundaries.upper() / 100.0 * rect.width();

        let lower_distance = (pointer.x - lower_x).abs();
        let upper_distance = (pointer.x - upper_x).abs();

        if lower_distance <= HANDLE_GRAB_WIDTH && lower_distance <= upper_distance {
            Some(BoundaryHandle::Lower)
        } else if upper_distance <= HANDLE_GRAB_WIDTH {
            Some(BoundaryHandle::Upper)
        } else {
            None
        }
    }

    pub(in crate::app) fn node_at(&self, rect: Rect, pointer: Pos2) -> Option<usize> {
        let simulation = self.simulation.as_ref()?;
        let local = pointer - rect.left_top();

        simulation
            .nodes()
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let distance = (node.pos - local).length();
                (distance <= NODE_RADIUS).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _distance)| index)
    }

    /// Routes one frame's pointer input: a press on a boundary line starts a
    /// boundary drag, a press on a node pins that node, and subsequent drag
    /// motion feeds whichever of the two is active.
    pub(in crate::app) fn handle_canvas_drag(&mut self, rect: Rect, response: &egui::Response) {
        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            if let Some(handle) = self.boundary_handle_at(rect, pointer) {
                self.boundary_drag = Some(handle);
            } else if let Some(index) = self.node_at(rect, pointer) {
                if let Some(simulation) = &mut self.simulation {
                    simulation.begin_drag(index);
                    self.dragged_node = Some(index);
                }
            }
        }

        if response.dragged_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            if let Some(handle) = self.boundary_drag {
                let percent = (pointer.x - rect.left()) / rect.width().max(1.0) * 100.0;
                self.boundaries = match handle {
                    BoundaryHandle::Lower => self.boundaries.with_lower(percent),
                    BoundaryHandle::Upper => self.boundaries.with_upper(percent),
                };
                if let Some(simulation) = &mut self.simulation {
                    simulation.set_boundaries(self.boundaries);
                }
            } else if let Some(index) = self.dragged_node
                && let Some(simulation) = &mut self.simulation
            {
                let local: Vec2 = pointer - rect.left_top();
                simulation.drag_to(index, local);
            }
        }

        if response.drag_stopped() {
            if let Some(index) = self.dragged_node.take()
                && let Some(simulation) = &mut self.simulation
            {
                simulation.end_drag(index);
            }
            self.boundary_drag = None;
        }
    }
}
