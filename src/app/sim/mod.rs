mod boundary;
mod forces;

use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

pub(in crate::app) use boundary::Boundaries;

use crate::scenario::{TaskNode, Zone};
use crate::util::stable_jitter;

pub(in crate::app) const NODE_RADIUS: f32 = 32.0;
/// Vertical space reserved for the header chrome above the lanes.
pub(in crate::app) const TOP_OFFSET: f32 = 180.0;

const SEED_JITTER: f32 = 25.0;
const ALPHA_MIN: f32 = 0.001;
const ALPHA_DECAY: f32 = 0.977;
const REZONE_ALPHA: f32 = 0.2;
const BOUNDARY_ALPHA: f32 = 0.3;
const DRAG_ALPHA_TARGET: f32 = 0.3;
const VELOCITY_DAMPING: f32 = 0.6;
const MAX_SPEED: f32 = 16.0;

pub(in crate::app) struct SimNode {
    pub id: String,
    pub zone: Zone,
    pub pos: Vec2,
    pub velocity: Vec2,
    /// Pointer position while the node is being dragged. A pinned node is
    /// excluded from force integration but still clamped and reclassified.
    pub pin: Option<Vec2>,
}

/// One zone reassignment produced by a tick. Emitted once per change, applied
/// upstream per node, so notifications are idempotent and order-independent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct ZoneChange {
    pub index: usize,
    pub id: String,
    pub from: Zone,
    pub to: Zone,
}

/// The spatial classifier: a transient force simulation over one scenario and
/// one canvas size. Replaced wholesale when either changes; positions are
/// never persisted.
pub(in crate::app) struct Simulation {
    nodes: Vec<SimNode>,
    edges: Vec<(usize, usize)>,
    boundaries: Boundaries,
    width: f32,
    height: f32,
    alpha: f32,
    alpha_target: f32,
    intensity: f32,
    force_scratch: Vec<Vec2>,
}

impl Simulation {
    /// Builds a simulation for the given tasks and canvas. Returns `None`
    /// while the canvas has no usable area (initial mount, collapsed panes).
    pub(in crate::app) fn new(
        tasks: &[TaskNode],
        boundaries: Boundaries,
        width: f32,
        height: f32,
    ) -> Option<Self> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }

        let mut index_by_id = HashMap::with_capacity(tasks.len());
        for (index, task) in tasks.iter().enumerate() {
            index_by_id.insert(task.id.as_str(), index);
        }

        // Pre-seed every node at its lane center plus deterministic jitter so
        // the first rendered frame already shows the externally assigned
        // zones instead of a transient wrong-lane flash.
        let band_center_y = (height + TOP_OFFSET) * 0.5;
        let nodes = tasks
            .iter()
            .map(|task| {
                let lane_x = boundaries.lane_center(task.current_zone) / 100.0 * width;
                let (jitter_x, jitter_y) = stable_jitter(&task.id);
                SimNode {
                    id: task.id.clone(),
                    zone: task.current_zone,
                    pos: vec2(
                        lane_x + jitter_x * SEED_JITTER,
                        band_center_y + jitter_y * SEED_JITTER,
                    ),
                    velocity: Vec2::ZERO,
                    pin: None,
                }
            })
            .collect::<Vec<_>>();

        let mut edges = Vec::new();
        for (target_index, task) in tasks.iter().enumerate() {
            for dependency in &task.dependencies {
                // Dangling ids are tolerated and simply produce no edge.
                if let Some(&source_index) = index_by_id.get(dependency.as_str())
                    && source_index != target_index
                {
                    edges.push((source_index, target_index));
                }
            }
        }
        edges.sort_unstable();
        edges.dedup();

        Some(Self {
            nodes,
            edges,
            boundaries,
            width,
            height,
            alpha: 1.0,
            alpha_target: 0.0,
            intensity: 1.0,
            force_scratch: Vec::new(),
        })
    }

    pub(in crate::app) fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub(in crate::app) fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub(in crate::app) fn boundaries(&self) -> Boundaries {
        self.boundaries
    }

    pub(in crate::app) fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.clamp(0.2, 2.5);
    }

    /// An edge is visible only while both endpoints share a zone; the shared
    /// zone doubles as its color. Re-derived per frame, never stored.
    pub(in crate::app) fn edge_zone(&self, edge: (usize, usize)) -> Option<Zone> {
        let source = self.nodes.get(edge.0)?;
        let target = self.nodes.get(edge.1)?;
        (source.zone == target.zone).then_some(source.zone)
    }

    /// Whether the next tick would still move anything. Used by the view to
    /// decide if another repaint is needed.
    pub(in crate::app) fn is_active(&self) -> bool {
        self.alpha >= ALPHA_MIN
            || self.alpha_target > 0.0
            || self.nodes.iter().any(|node| node.pin.is_some())
    }

    /// Stores a new (already clamped) boundary pair and wakes the simulation
    /// so lane pulls re-settle nodes. No node is repositioned directly.
    pub(in crate::app) fn set_boundaries(&mut self, boundaries: Boundaries) {
        if boundaries != self.boundaries {
            self.boundaries = boundaries;
            self.alpha = self.alpha.max(BOUNDARY_ALPHA);
        }
    }

    pub(in crate::app) fn begin_drag(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = Some(node.pos);
            node.velocity = Vec2::ZERO;
            self.alpha_target = DRAG_ALPHA_TARGET;
            self.alpha = self.alpha.max(DRAG_ALPHA_TARGET);
        }
    }

    pub(in crate::app) fn drag_to(&mut self, index: usize, target: Vec2) {
        let clamped = self.clamp_to_canvas(target);
        if let Some(node) = self.nodes.get_mut(index)
            && node.pin.is_some()
        {
            node.pin = Some(clamped);
        }
    }

    pub(in crate::app) fn end_drag(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = None;
        }
        self.alpha_target = 0.0;
    }

    fn clamp_to_canvas(&self, pos: Vec2) -> Vec2 {
        let max_x = (self.width - NODE_RADIUS).max(NODE_RADIUS);
        let min_y = TOP_OFFSET + NODE_RADIUS;
        let max_y = (self.height - NODE_RADIUS).max(min_y);
        vec2(pos.x.clamp(NODE_RADIUS, max_x), pos.y.clamp(min_y, max_y))
    }

    /// Advances the simulation by one tick and reports zone reassignments.
    ///
    /// Per node the order is fixed: integrate, clamp to the canvas, then
    /// re-derive the zone from the clamped position. A node is never
    /// classified from an out-of-bounds position. Zone flips bump alpha
    /// instead of restarting the whole simulation, so a single crossing does
    /// not make every other node jitter.
    pub(in crate::app) fn step(&mut self, delta_seconds: f32) -> Vec<ZoneChange> {
        let mut changes = Vec::new();
        let has_pin = self.nodes.iter().any(|node| node.pin.is_some());
        if self.nodes.is_empty() || (self.alpha < ALPHA_MIN && self.alpha_target <= 0.0 && !has_pin)
        {
            return changes;
        }

        let time_scale = (delta_seconds * 60.0).clamp(0.25, 3.0);

        forces::accumulate(
            &self.nodes,
            &self.edges,
            self.boundaries,
            self.width,
            self.height,
            self.intensity,
            &mut self.force_scratch,
        );

        for (index, node) in self.nodes.iter_mut().enumerate() {
            if let Some(pin) = node.pin {
                node.pos = pin;
                node.velocity = Vec2::ZERO;
                continue;
            }

            let mut velocity = (node.velocity
                + self.force_scratch[index] * (self.alpha * time_scale))
                * VELOCITY_DAMPING;
            let speed_sq = velocity.length_sq();
            if speed_sq > MAX_SPEED * MAX_SPEED {
                velocity *= MAX_SPEED / speed_sq.sqrt();
            }
            node.velocity = velocity;
            node.pos += velocity * time_scale;
        }

        for index in 0..self.nodes.len() {
            let clamped = self.clamp_to_canvas(self.nodes[index].pos);
            let node = &mut self.nodes[index];
            node.pos = clamped;

            let x_percent = node.pos.x / self.width * 100.0;
            let candidate = self.boundaries.zone_at(x_percent);
            if candidate != node.zone {
                changes.push(ZoneChange {
                    index,
                    id: node.id.clone(),
                    from: node.zone,
                    to: candidate,
                });
                node.zone = candidate;
            }
        }

        if !changes.is_empty() {
            self.alpha = self.alpha.max(REZONE_ALPHA);
        }
        self.alpha += (self.alpha_target - self.alpha) * (1.0 - ALPHA_DECAY.powf(time_scale));

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn task(id: &str, zone: Zone, dependencies: &[&str]) -> TaskNode {
        TaskNode {
            id: id.to_owned(),
            label: id.to_owned(),
            description: String::new(),
            ai_confidence: 0.5,
            ethical_complexity: 0.5,
            current_zone: zone,
            dependencies: dependencies.iter().map(|dep| (*dep).to_owned()).collect(),
        }
    }

    fn three_lane_sim() -> Simulation {
        let tasks = [
            task("alpha", Zone::Ai, &[]),
            task("bravo", Zone::Shared, &[]),
            task("charlie", Zone::Human, &[]),
        ];
        Simulation::new(&tasks, Boundaries::new(33.0, 66.0), 800.0, 600.0)
            .expect("canvas has area")
    }

    #[test]
    fn zero_sized_canvas_is_not_ready() {
        let tasks = [task("a", Zone::Ai, &[])];
        assert!(Simulation::new(&tasks, Boundaries::default(), 0.0, 600.0).is_none());
        assert!(Simulation::new(&tasks, Boundaries::default(), 800.0, 0.0).is_none());
        assert!(Simulation::new(&tasks, Boundaries::default(), -1.0, -1.0).is_none());
    }

    #[test]
    fn empty_task_list_does_no_work() {
        let mut sim =
            Simulation::new(&[], Boundaries::default(), 800.0, 600.0).expect("builds empty");
        assert!(sim.nodes().is_empty());
        assert!(sim.edges().is_empty());
        assert!(sim.step(DT).is_empty());
    }

    #[test]
    fn preseed_places_nodes_inside_their_lanes() {
        // 800 px wide with boundaries [33, 66]: lane pixel ranges are
        // [0, 264), [264, 528) and [528, 800].
        let sim = three_lane_sim();
        let positions = sim.nodes().iter().map(|node| node.pos.x).collect::<Vec<_>>();

        assert!(positions[0] >= 0.0 && positions[0] < 264.0, "{positions:?}");
        assert!(positions[1] >= 264.0 && positions[1] < 528.0, "{positions:?}");
        assert!(positions[2] >= 528.0 && positions[2] <= 800.0, "{positions:?}");
    }

    #[test]
    fn preseed_is_deterministic() {
        let first = three_lane_sim();
        let second = three_lane_sim();
        for (a, b) in first.nodes().iter().zip(second.nodes()) {
            assert_eq!(a.pos, b.pos);
        }
    }

    #[test]
    fn positions_stay_clamped_every_tick() {
        let mut sim = three_lane_sim();
        sim.nodes[0].pos = vec2(-500.0, 9000.0);
        sim.nodes[1].pos = vec2(5000.0, -200.0);

        for _ in 0..120 {
            sim.step(DT);
            for node in sim.nodes() {
                assert!(node.pos.x >= NODE_RADIUS && node.pos.x <= 800.0 - NODE_RADIUS);
                assert!(
                    node.pos.y >= TOP_OFFSET + NODE_RADIUS && node.pos.y <= 600.0 - NODE_RADIUS
                );
            }
        }
    }

    #[test]
    fn settled_nodes_agree_with_their_derived_zone() {
        let mut sim = three_lane_sim();
        for _ in 0..2000 {
            sim.step(DT);
        }

        assert!(!sim.is_active(), "simulation should have come to rest");
        let boundaries = sim.boundaries();
        for node in sim.nodes() {
            let derived = boundaries.zone_at(node.pos.x / 800.0 * 100.0);
            assert_eq!(node.zone, derived, "node {} off its lane", node.id);
        }
    }

    #[test]
    fn reclassification_is_idempotent_at_a_fixed_position() {
        let mut sim = three_lane_sim();
        sim.begin_drag(0);
        sim.drag_to(0, vec2(400.0, 400.0)); // 50%: SHARED

        let first = sim.step(DT);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].to, Zone::Shared);

        // Same pinned position, so no further reassignment may fire.
        for _ in 0..30 {
            assert!(sim.step(DT).is_empty());
        }
    }

    #[test]
    fn boundary_move_that_does_not_cross_a_node_changes_nothing() {
        let tasks = [task("mid", Zone::Shared, &[])];
        let mut sim = Simulation::new(&tasks, Boundaries::new(33.0, 66.0), 800.0, 600.0)
            .expect("canvas has area");
        sim.begin_drag(0);
        sim.drag_to(0, vec2(320.0, 400.0)); // 40%: SHARED either way
        assert!(sim.step(DT).is_empty());

        sim.set_boundaries(Boundaries::new(35.0, 70.0));
        for _ in 0..30 {
            assert!(sim.step(DT).is_empty());
        }
        assert_eq!(sim.nodes()[0].zone, Zone::Shared);
    }

    #[test]
    fn boundary_move_across_a_node_reassigns_it_exactly_once() {
        let tasks = [task("mid", Zone::Shared, &[])];
        let mut sim = Simulation::new(&tasks, Boundaries::new(33.0, 66.0), 800.0, 600.0)
            .expect("canvas has area");
        sim.begin_drag(0);
        sim.drag_to(0, vec2(320.0, 400.0)); // 40%
        sim.step(DT);

        sim.set_boundaries(Boundaries::new(50.0, 70.0)); // 40% is now in the AI lane
        let mut all_changes = Vec::new();
        for _ in 0..60 {
            all_changes.extend(sim.step(DT));
        }

        assert_eq!(all_changes.len(), 1, "{all_changes:?}");
        assert_eq!(all_changes[0].from, Zone::Shared);
        assert_eq!(all_changes[0].to, Zone::Ai);
        assert_eq!(sim.nodes()[0].zone, Zone::Ai);
    }

    #[test]
    fn drag_across_all_lanes_reports_each_transition_once_in_order() {
        let tasks = [task("mover", Zone::Ai, &[])];
        let mut sim = Simulation::new(&tasks, Boundaries::new(33.0, 66.0), 800.0, 600.0)
            .expect("canvas has area");

        sim.begin_drag(0);
        let mut all_changes = Vec::new();
        // A pointer sweep from 20% to 80% of an 800 px canvas.
        for x in [160.0, 240.0, 320.0, 400.0, 480.0, 560.0, 640.0] {
            sim.drag_to(0, vec2(x, 400.0));
            all_changes.extend(sim.step(DT));
        }
        sim.end_drag(0);

        let transitions = all_changes
            .iter()
            .map(|change| (change.from, change.to))
            .collect::<Vec<_>>();
        assert_eq!(
            transitions,
            vec![(Zone::Ai, Zone::Shared), (Zone::Shared, Zone::Human)]
        );
    }

    #[test]
    fn released_node_settles_into_the_lane_it_was_dropped_in() {
        let tasks = [task("mover", Zone::Ai, &[])];
        let mut sim = Simulation::new(&tasks, Boundaries::new(33.0, 66.0), 800.0, 600.0)
            .expect("canvas has area");

        sim.begin_drag(0);
        sim.drag_to(0, vec2(700.0, 400.0)); // 87.5%: HUMAN
        sim.step(DT);
        sim.end_drag(0);

        for _ in 0..2000 {
            sim.step(DT);
        }
        assert_eq!(sim.nodes()[0].zone, Zone::Human);
        let derived = sim.boundaries().zone_at(sim.nodes()[0].pos.x / 800.0 * 100.0);
        assert_eq!(derived, Zone::Human);
    }

    #[test]
    fn dangling_dependencies_produce_no_edges() {
        let tasks = [
            task("a", Zone::Ai, &[]),
            task("b", Zone::Ai, &["a", "ghost", "b"]),
        ];
        let sim = Simulation::new(&tasks, Boundaries::default(), 800.0, 600.0)
            .expect("canvas has area");

        assert_eq!(sim.edges(), &[(0, 1)]);
    }

    #[test]
    fn duplicate_dependencies_collapse_to_one_edge() {
        let tasks = [task("a", Zone::Ai, &[]), task("b", Zone::Ai, &["a", "a"])];
        let sim = Simulation::new(&tasks, Boundaries::default(), 800.0, 600.0)
            .expect("canvas has area");
        assert_eq!(sim.edges(), &[(0, 1)]);
    }

    #[test]
    fn edges_are_visible_only_while_zones_match() {
        let tasks = [task("a", Zone::Ai, &[]), task("b", Zone::Ai, &["a"])];
        let mut sim = Simulation::new(&tasks, Boundaries::new(33.0, 66.0), 800.0, 600.0)
            .expect("canvas has area");

        assert_eq!(sim.edge_zone((0, 1)), Some(Zone::Ai));

        sim.begin_drag(1);
        sim.drag_to(1, vec2(700.0, 400.0));
        let changes = sim.step(DT);
        assert!(!changes.is_empty());

        // No stale visibility: the very tick that reassigned the node must
        // already report the edge as hidden.
        assert_eq!(sim.edge_zone((0, 1)), None);
    }

    #[test]
    fn waking_on_boundary_change_reactivates_a_settled_simulation() {
        let mut sim = three_lane_sim();
        for _ in 0..2000 {
            sim.step(DT);
        }
        assert!(!sim.is_active());

        sim.set_boundaries(Boundaries::new(50.0, 70.0));
        assert!(sim.is_active());

        // Lane pulls must re-settle every node against the new boundaries.
        for _ in 0..3000 {
            sim.step(DT);
        }
        let boundaries = sim.boundaries();
        for node in sim.nodes() {
            let derived = boundaries.zone_at(node.pos.x / 800.0 * 100.0);
            assert_eq!(node.zone, derived);
        }
    }
}
