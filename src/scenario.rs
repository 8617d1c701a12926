use std::fs;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Who currently owns a task on the human/AI spectrum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    #[serde(rename = "AI")]
    Ai,
    #[serde(rename = "SHARED")]
    Shared,
    #[serde(rename = "HUMAN")]
    Human,
}

impl Zone {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ai => "AI",
            Self::Shared => "SHARED",
            Self::Human => "HUMAN",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// How confidently an AI could own this task, in [0, 1]. Assigned by the
    /// upstream classifier, never changed by the layout.
    #[serde(default)]
    pub ai_confidence: f32,
    /// Ethical weight of delegating this task, in [0, 1].
    #[serde(default)]
    pub ethical_complexity: f32,
    pub current_zone: Zone,
    /// Ids of tasks that conceptually precede this one. Only used to derive
    /// visual edges; dangling ids and cycles are tolerated.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub tasks: Vec<TaskNode>,
}

impl Scenario {
    /// Applies one zone reassignment. Idempotent; unknown ids are ignored.
    pub fn update_node_zone(&mut self, id: &str, zone: Zone) {
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
            task.current_zone = zone;
        }
    }

    pub fn zone_count(&self, zone: Zone) -> usize {
        self.tasks
            .iter()
            .filter(|task| task.current_zone == zone)
            .count()
    }
}

pub fn load_scenario(path: &str) -> Result<Scenario> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading scenario file {path}"))?;
    let mut scenario: Scenario =
        serde_json::from_str(&raw).with_context(|| format!("parsing scenario JSON from {path}"))?;

    for task in &mut scenario.tasks {
        task.ai_confidence = task.ai_confidence.clamp(0.0, 1.0);
        task.ethical_complexity = task.ethical_complexity.clamp(0.0, 1.0);
    }

    Ok(scenario)
}
