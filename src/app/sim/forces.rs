use eframe::egui::{Vec2, vec2};

use super::boundary::Boundaries;
use super::{NODE_RADIUS, SimNode, TOP_OFFSET};

const REPULSION_STRENGTH: f32 = 24_000.0;
const REPULSION_SOFTENING: f32 = 600.0;
const LINK_DISTANCE: f32 = 80.0;
const LINK_STRENGTH: f32 = 0.1;
const COLLISION_MARGIN: f32 = 5.0;
const COLLISION_STRENGTH: f32 = 0.8;
const CENTER_Y_STRENGTH: f32 = 0.08;
const LANE_X_STRENGTH: f32 = 0.5;

fn separation_direction(delta: Vec2, distance: f32, from: usize, to: usize) -> Vec2 {
    if distance > 0.0001 {
        delta / distance
    } else {
        // Coincident nodes: pick a stable pseudo-random direction so the
        // pair separates instead of dividing by zero.
        let angle =
            ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
        vec2(angle.cos(), angle.sin())
    }
}

/// Accumulates one tick's worth of forces. Pairwise loops are O(n²), which is
/// fine at the ~8-12 tasks a scenario holds but would not scale further.
pub(super) fn accumulate(
    nodes: &[SimNode],
    edges: &[(usize, usize)],
    boundaries: Boundaries,
    width: f32,
    height: f32,
    intensity: f32,
    forces: &mut Vec<Vec2>,
) {
    let node_count = nodes.len();
    forces.clear();
    forces.resize(node_count, Vec2::ZERO);

    let intensity = intensity.clamp(0.2, 2.5);
    let min_separation = (NODE_RADIUS + COLLISION_MARGIN) * 2.0;

    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let delta = nodes[i].pos - nodes[j].pos;
            let distance_sq = delta.length_sq();
            let distance = distance_sq.sqrt();
            let direction = separation_direction(delta, distance, i, j);

            let repulsion =
                (REPULSION_STRENGTH * intensity) / (distance_sq + REPULSION_SOFTENING);
            forces[i] += direction * repulsion;
            forces[j] -= direction * repulsion;

            if distance < min_separation {
                let overlap_push =
                    (min_separation - distance) * COLLISION_STRENGTH * intensity;
                forces[i] += direction * overlap_push;
                forces[j] -= direction * overlap_push;
            }
        }
    }

    for &(from, to) in edges {
        if from >= node_count || to >= node_count || from == to {
            continue;
        }

        let delta = nodes[from].pos - nodes[to].pos;
        let distance = delta.length();
        let direction = separation_direction(delta, distance, from, to);

        // Weak on purpose: dependency edges suggest flow without being strong
        // enough to pull a node out of its lane.
        let spring = (distance - LINK_DISTANCE) * LINK_STRENGTH * intensity;
        forces[from] -= direction * spring;
        forces[to] += direction * spring;
    }

    let band_center_y = (height + TOP_OFFSET) * 0.5;
    for (index, node) in nodes.iter().enumerate() {
        forces[index].y += (band_center_y - node.pos.y) * CENTER_Y_STRENGTH * intensity;

        // The dominant force: pull toward the center of the lane matching the
        // node's live zone under the live boundaries.
        let lane_x = boundaries.lane_center(node.zone) / 100.0 * width;
        forces[index].x += (lane_x - node.pos.x) * LANE_X_STRENGTH * intensity;
    }
}
