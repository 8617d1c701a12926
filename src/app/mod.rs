use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};

use crate::scenario::{Scenario, Zone, load_scenario};

mod graph;
mod render_utils;
mod sim;
mod ui;

pub struct FronteiraApp {
    scenario_path: String,
    state: AppState,
    reload_rx: Option<Receiver<Result<Scenario, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Scenario, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

/// Which lane separator a pointer drag currently owns.
#[derive(Clone, Copy, PartialEq, Eq)]
enum BoundaryHandle {
    Lower,
    Upper,
}

/// Rendering-side state for the short color blend after a zone change. Fed
/// only by the `ZoneChange` events the simulation step returns.
#[derive(Clone, Copy)]
struct ZoneFade {
    from: Zone,
    progress: f32,
}

struct ViewModel {
    scenario: Scenario,
    boundaries: sim::Boundaries,
    simulation: Option<sim::Simulation>,
    canvas_size: Vec2,
    zone_fades: Vec<ZoneFade>,
    dragged_node: Option<usize>,
    boundary_drag: Option<BoundaryHandle>,
    search: String,
    live_physics: bool,
    physics_intensity: f32,
}

impl ViewModel {
    fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            boundaries: sim::Boundaries::default(),
            simulation: None,
            canvas_size: Vec2::ZERO,
            zone_fades: Vec::new(),
            dragged_node: None,
            boundary_drag: None,
            search: String::new(),
            live_physics: true,
            physics_intensity: 1.0,
        }
    }

    /// Drops and recreates the simulation for the current scenario and
    /// canvas. Boundary positions survive; node positions do not.
    fn rebuild_simulation(&mut self) {
        self.simulation = sim::Simulation::new(
            &self.scenario.tasks,
            self.boundaries,
            self.canvas_size.x,
            self.canvas_size.y,
        );
        if let Some(simulation) = &mut self.simulation {
            simulation.set_intensity(self.physics_intensity);
        }
        self.zone_fades = self
            .scenario
            .tasks
            .iter()
            .map(|task| ZoneFade {
                from: task.current_zone,
                progress: 1.0,
            })
            .collect();
        self.dragged_node = None;
        self.boundary_drag = None;
    }
}

impl FronteiraApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, scenario_path: String) -> Self {
        let state = Self::start_load(scenario_path.clone());
        Self {
            scenario_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(scenario_path: String) -> Receiver<Result<Scenario, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_scenario(&scenario_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(scenario_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(scenario_path),
        }
    }
}

impl eframe::App for FronteiraApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(scenario) => AppState::Ready(Box::new(ViewModel::new(scenario))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading scenario...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load scenario");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.scenario_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.scenario_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.scenario_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(scenario) => AppState::Ready(Box::new(ViewModel::new(scenario))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
