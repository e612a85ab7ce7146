//! Scenario Replay
//!
//! A scenario is a TOML file describing a small world (agents, placed
//! materials, calendar, storm) and a timeline of steps: state changes, tool
//! triggers, sampler passes and depletion ticks. Replaying it drives a real
//! [`Engine`] over a [`ScriptedHost`] and collects one [`TickReport`] per tick.
//!
//! ```toml
//! name = "pickaxe then rest"
//!
//! [[agents]]
//! id = 1
//! position = { x = 0.5, y = 10.0, z = 0.5 }
//!
//! [[steps]]
//! at = 0
//! op = "attack"
//! agent = 1
//! tool = "pickaxe"
//!
//! [[steps]]
//! at = 1000
//! op = "tick"
//! agent = 1
//! raw = 0.5
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use satiety_signals::{
    AgentId, BlockPos, CalendarSample, HazardSample, Material, MaterialLayer, MountInfo,
    MovementState, Position, SimMillis, ToolCategory, ToolUse, TriggerControls,
};

use crate::config::{ConfigError, EngineConfig};
use crate::diagnostics::TickReport;
use crate::engine::Engine;
use crate::scripted::ScriptedHost;

/// Errors from loading a scenario
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("scenario config: {0}")]
    Config(#[from] ConfigError),
    #[error("step {index} at {at} ms comes before the previous step at {previous} ms")]
    OutOfOrder {
        index: usize,
        at: SimMillis,
        previous: SimMillis,
    },
}

/// An agent present when the scenario starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSetup {
    pub id: AgentId,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub movement: MovementState,
    #[serde(default)]
    pub tool: Option<ToolCategory>,
    #[serde(default)]
    pub item: Option<String>,
}

/// A material placed in the world before the first step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub pos: BlockPos,
    #[serde(default)]
    pub layer: MaterialLayer,
    pub material: Material,
}

/// What a step does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StepOp {
    Join {
        agent: AgentId,
    },
    Leave {
        agent: AgentId,
    },
    Move {
        agent: AgentId,
        position: Position,
    },
    Movement {
        agent: AgentId,
        #[serde(default)]
        movement: MovementState,
    },
    Hold {
        agent: AgentId,
        #[serde(default)]
        tool: Option<ToolCategory>,
        #[serde(default)]
        item: Option<String>,
    },
    Mount {
        agent: AgentId,
        #[serde(default)]
        mount: Option<MountInfo>,
    },
    Controls {
        agent: AgentId,
        #[serde(default)]
        primary: bool,
        #[serde(default)]
        secondary: bool,
    },
    Target {
        agent: AgentId,
        #[serde(default)]
        block: Option<String>,
    },
    Place(Placement),
    Calendar {
        #[serde(default)]
        calendar: Option<CalendarSample>,
    },
    Hazard {
        #[serde(default)]
        hazard: Option<HazardSample>,
    },
    Attack {
        agent: AgentId,
        #[serde(default)]
        tool: Option<ToolCategory>,
        #[serde(default)]
        item: Option<String>,
    },
    Interact {
        agent: AgentId,
        #[serde(default)]
        tool: Option<ToolCategory>,
        #[serde(default)]
        item: Option<String>,
    },
    Fire {
        agent: AgentId,
    },
    Sample,
    Tick {
        agent: AgentId,
        #[serde(default = "default_raw")]
        raw: f32,
    },
}

fn default_raw() -> f32 {
    1.0
}

/// One timed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub at: SimMillis,
    #[serde(flatten)]
    pub op: StepOp,
}

/// A scripted run of the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    /// Overrides the config the runner was given
    pub config: Option<EngineConfig>,
    pub calendar: Option<CalendarSample>,
    pub hazard: Option<HazardSample>,
    pub agents: Vec<AgentSetup>,
    pub materials: Vec<Placement>,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Steps must be in time order and an embedded config must be valid.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if let Some(config) = &self.config {
            config.validate()?;
        }
        for (index, pair) in self.steps.windows(2).enumerate() {
            if pair[1].at < pair[0].at {
                return Err(ScenarioError::OutOfOrder {
                    index: index + 1,
                    at: pair[1].at,
                    previous: pair[0].at,
                });
            }
        }
        Ok(())
    }

    /// The host as it stands before the first step.
    pub fn build_host(&self) -> ScriptedHost {
        let mut host = ScriptedHost::new();
        host.set_calendar(self.calendar);
        host.set_hazard(self.hazard);

        for agent in &self.agents {
            host.add_agent(agent.id);
            if let Some(position) = agent.position {
                host.set_position(agent.id, position);
            }
            host.set_movement(agent.id, agent.movement);
            host.set_held_item(agent.id, agent.tool, agent.item.as_deref());
        }
        for placement in &self.materials {
            host.set_material(placement.pos, placement.layer, placement.material.clone());
        }
        host
    }

    /// Replays every step and returns the reports of all ticks in order.
    ///
    /// `config` is used unless the scenario carries its own.
    pub fn run(&self, config: EngineConfig) -> Vec<TickReport> {
        let config = self.config.clone().unwrap_or(config);
        let mut engine = Engine::new(self.build_host(), config);
        let mut reports = Vec::new();

        tracing::info!(
            "replaying scenario {:?}: {} agents, {} steps",
            self.name,
            self.agents.len(),
            self.steps.len()
        );
        for step in &self.steps {
            if let Some(report) = apply_step(&mut engine, step) {
                reports.push(report);
            }
        }
        reports
    }
}

/// Applies one step; ticks produce a report.
pub fn apply_step(engine: &mut Engine<ScriptedHost>, step: &Step) -> Option<TickReport> {
    let now = step.at;
    match &step.op {
        StepOp::Join { agent } => engine.host_mut().add_agent(*agent),
        StepOp::Leave { agent } => {
            engine.host_mut().remove_agent(*agent);
            engine.on_disconnect(*agent);
        }
        StepOp::Move { agent, position } => engine.host_mut().set_position(*agent, *position),
        StepOp::Movement { agent, movement } => engine.host_mut().set_movement(*agent, *movement),
        StepOp::Hold { agent, tool, item } => {
            engine.host_mut().set_held_item(*agent, *tool, item.as_deref())
        }
        StepOp::Mount { agent, mount } => engine.host_mut().set_mount(*agent, mount.clone()),
        StepOp::Controls {
            agent,
            primary,
            secondary,
        } => engine.host_mut().set_controls(
            *agent,
            TriggerControls {
                primary_down: *primary,
                secondary_down: *secondary,
            },
        ),
        StepOp::Target { agent, block } => {
            engine.host_mut().set_targeted_block(*agent, block.as_deref())
        }
        StepOp::Place(placement) => engine.host_mut().set_material(
            placement.pos,
            placement.layer,
            placement.material.clone(),
        ),
        StepOp::Calendar { calendar } => engine.host_mut().set_calendar(*calendar),
        StepOp::Hazard { hazard } => engine.host_mut().set_hazard(*hazard),
        StepOp::Attack { agent, tool, item } => {
            engine.on_attack_start(*agent, &ToolUse::new(*tool, item.clone()), now);
        }
        StepOp::Interact { agent, tool, item } => {
            engine.on_interact_start(*agent, &ToolUse::new(*tool, item.clone()), now);
        }
        StepOp::Fire { agent } => engine.on_fire_start(*agent, now),
        StepOp::Sample => engine.sample_all(now),
        StepOp::Tick { agent, raw } => {
            return Some(engine.evaluate(*agent, now).report(*raw));
        }
    }
    None
}
