//! Seeded random workload.
//!
//! Drives an [`Engine`] with randomly wandering agents that swap tools,
//! click, sit down, swim and attack, sampling every few milliseconds and
//! ticking depletion at a fixed interval. The same seed always produces the
//! same reports.

use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use satiety_signals::{
    ActionKind, AgentId, BlockPos, CalendarSample, HazardSample, Material, MaterialLayer,
    MountInfo, MovementState, Position, SimMillis, ToolCategory, ToolUse, TriggerControls,
};

use crate::config::EngineConfig;
use crate::diagnostics::TickReport;
use crate::engine::Engine;
use crate::scripted::ScriptedHost;

/// Tools an agent may pick up, with the item code it holds.
const LOADOUT: [(Option<ToolCategory>, &str); 8] = [
    (None, ""),
    (Some(ToolCategory::Pickaxe), "game:pickaxe-copper"),
    (Some(ToolCategory::Axe), "game:axe-felling-iron"),
    (Some(ToolCategory::Shovel), "game:shovel-bronze"),
    (Some(ToolCategory::Hammer), "game:hammer-iron"),
    (Some(ToolCategory::Bow), "game:bow-long"),
    (Some(ToolCategory::Sword), "game:blade-falx-iron"),
    (None, "game:pan-wooden"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoakOptions {
    pub seed: u64,
    pub agents: u64,
    pub duration_ms: SimMillis,
    pub sample_interval_ms: SimMillis,
    pub tick_interval_ms: SimMillis,
}

impl Default for SoakOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            agents: 4,
            duration_ms: 60_000,
            sample_interval_ms: 20,
            tick_interval_ms: 1_000,
        }
    }
}

/// Counts gathered over a soak run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SoakSummary {
    pub ticks: usize,
    pub passthrough_ticks: usize,
    pub actions: BTreeMap<ActionKind, usize>,
}

impl SoakSummary {
    pub fn from_reports(reports: &[TickReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            summary.ticks += 1;
            if !report.breakdown.applied {
                summary.passthrough_ticks += 1;
            }
            *summary.actions.entry(report.breakdown.action).or_insert(0) += 1;
        }
        summary
    }
}

/// Every agent stands on its own granite tile next to a shallow pool.
fn build_world(options: &SoakOptions) -> ScriptedHost {
    let mut host = ScriptedHost::new();
    host.set_calendar(Some(CalendarSample::new(9.0, 24.0, 60.0)));
    host.set_hazard(Some(HazardSample::calm()));

    for n in 0..options.agents {
        let agent = AgentId(n + 1);
        let x = (n as i32) * 4;
        host.add_agent(agent);
        host.set_position(agent, Position::new(x as f64 + 0.5, 10.0, 0.5));
        host.set_material(BlockPos::new(x, 9, 0), MaterialLayer::Solid, Material::new(12, "game:rock-granite"));
        host.set_material(BlockPos::new(x, 9, 0), MaterialLayer::Default, Material::new(30, "game:packeddirt-path"));
        host.set_material(BlockPos::new(x + 1, 10, 0), MaterialLayer::Fluid, Material::liquid(40, "game:water-still-7"));
    }
    host
}

/// Applies one random change to an agent.
fn perturb(engine: &mut Engine<ScriptedHost>, rng: &mut SmallRng, agent: AgentId, now: SimMillis) {
    let x = ((agent.get() - 1) as i32 * 4) as f64;
    match rng.gen_range(0..10) {
        0 => {
            let movement = match rng.gen_range(0..5) {
                0 => MovementState::idle(),
                1 => MovementState::walking(),
                2 => MovementState::sprinting(),
                3 => MovementState::sneaking(),
                _ => MovementState {
                    floor_sitting: true,
                    ..MovementState::default()
                },
            };
            engine.host_mut().set_movement(agent, movement);
        }
        1 => {
            // Step into the pool or back onto the tile
            let in_pool = rng.gen_bool(0.5);
            let (px, movement) = if in_pool {
                (x + 1.5, MovementState::wading())
            } else {
                (x + 0.5, MovementState::idle())
            };
            let host = engine.host_mut();
            host.set_position(agent, Position::new(px, 10.0, 0.5));
            host.set_movement(agent, movement);
        }
        2 => {
            let (tool, code) = LOADOUT[rng.gen_range(0..LOADOUT.len())];
            let code = (!code.is_empty()).then_some(code);
            engine.host_mut().set_held_item(agent, tool, code);
        }
        3 => {
            let controls = TriggerControls {
                primary_down: rng.gen_bool(0.5),
                secondary_down: rng.gen_bool(0.5),
            };
            engine.host_mut().set_controls(agent, controls);
        }
        4 => {
            let (tool, code) = LOADOUT[rng.gen_range(0..LOADOUT.len())];
            let tool_use = ToolUse::new(tool, (!code.is_empty()).then(|| code.to_string()));
            engine.on_attack_start(agent, &tool_use, now);
        }
        5 => {
            let mount = match rng.gen_range(0..4) {
                0 => Some(MountInfo::seat("BlockEntityBedSeat")),
                1 => Some(MountInfo::seat("EntityChairSeat")),
                _ => None,
            };
            engine.host_mut().set_mount(agent, mount);
        }
        6 => {
            let target = rng.gen_bool(0.3).then_some("game:quern-granite");
            engine.host_mut().set_targeted_block(agent, target);
        }
        7 if rng.gen_bool(0.1) => engine.on_fire_start(agent, now),
        _ => {}
    }
}

/// Runs the workload and returns every tick report in order.
pub fn run(options: &SoakOptions, config: EngineConfig) -> Vec<TickReport> {
    let mut rng = SmallRng::seed_from_u64(options.seed);
    let mut engine = Engine::new(build_world(options), config);
    let agents: Vec<AgentId> = (1..=options.agents).map(AgentId).collect();
    let mut reports = Vec::new();

    let sample_every = options.sample_interval_ms.max(1);
    let tick_every = options.tick_interval_ms.max(1);

    tracing::info!(
        "soak run: seed {}, {} agents, {} ms",
        options.seed,
        options.agents,
        options.duration_ms
    );

    let mut now = 0;
    let mut next_tick = 0;
    while now <= options.duration_ms {
        for &agent in &agents {
            if rng.gen_bool(0.05) {
                perturb(&mut engine, &mut rng, agent, now);
            }
        }

        if rng.gen_bool(0.001) {
            let storm = rng.gen_bool(0.5);
            let hazard = if storm {
                HazardSample::active()
            } else {
                HazardSample::calm()
            };
            engine.host_mut().set_hazard(Some(hazard));
        }

        engine.sample_all(now);

        if now >= next_tick {
            next_tick += tick_every;
            for &agent in &agents {
                let raw = rng.gen_range(0.1f32..1.0);
                reports.push(engine.evaluate(agent, now).report(raw));
            }
        }
        now += sample_every;
    }

    reports
}
