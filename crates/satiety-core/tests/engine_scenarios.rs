//! End-to-end engine behaviour through the scripted host.

use satiety_core::{
    ActionMultipliers, Engine, EngineConfig, EnvironmentMultipliers, ScriptedHost,
};
use satiety_signals::{
    fixtures, ActionKind, AgentId, CalendarSample, HazardSample, MaterialLayer, MovementState,
    Position, ToolCategory, ToolUse, TriggerControls,
};

const ALICE: AgentId = AgentId(1);
const BOB: AgentId = AgentId(2);

fn feet() -> Position {
    Position::new(4.5, 20.0, -3.5)
}

/// One agent standing on granite with a path block on the default layer.
fn world() -> ScriptedHost {
    let mut host = ScriptedHost::new();
    host.add_agent(ALICE);
    host.set_position(ALICE, feet());
    host.set_material(feet().block().below(), MaterialLayer::Solid, fixtures::granite());
    host.set_material(
        feet().block().below(),
        MaterialLayer::Default,
        fixtures::packed_dirt_path(),
    );
    host
}

fn flat_config() -> EngineConfig {
    let mut config = EngineConfig {
        action_multipliers: ActionMultipliers::neutral(),
        environment_multipliers: EnvironmentMultipliers::disabled(),
        ..EngineConfig::default()
    };
    config.month_length_scaling.enabled = false;
    config
}

#[test]
fn test_sprinting_rescales_raw_amount() {
    let mut config = flat_config();
    config.action_multipliers.sprinting = 1.5;
    let mut engine = Engine::new(world(), config);
    engine.host_mut().set_movement(ALICE, MovementState::sprinting());

    assert_eq!(engine.rescale(ALICE, 0, 2.0), 3.0);
}

#[test]
fn test_mining_flag_fires_once_then_expires() {
    let engine = Engine::with_defaults(world());
    engine.on_attack_start(ALICE, &fixtures::copper_pickaxe(), 0);

    assert_eq!(engine.evaluate(ALICE, 25_000).action, ActionKind::Mining);
    assert_eq!(engine.evaluate(ALICE, 40_000).action, ActionKind::Standing);
}

#[test]
fn test_flag_past_its_window_never_fires() {
    let engine = Engine::with_defaults(world());
    engine.on_attack_start(ALICE, &ToolUse::tool(ToolCategory::Axe), 0);

    assert_eq!(engine.evaluate(ALICE, 30_001).action, ActionKind::Standing);
    let state = engine.flags().snapshot(ALICE).unwrap();
    assert!(state.pending_kinds().is_empty());
}

#[test]
fn test_flag_at_window_edge_still_fires() {
    let engine = Engine::with_defaults(world());
    engine.on_attack_start(ALICE, &ToolUse::tool(ToolCategory::Axe), 0);
    assert_eq!(engine.evaluate(ALICE, 30_000).action, ActionKind::Chopping);
}

#[test]
fn test_standing_still_on_path_gets_no_discount() {
    let engine = Engine::with_defaults(world());
    let breakdown = engine.evaluate(ALICE, 0);
    assert_eq!(breakdown.action, ActionKind::Standing);
    assert_eq!(breakdown.multipliers.path, 1.0);

    let mut engine = engine;
    engine.host_mut().set_movement(ALICE, MovementState::walking());
    assert_eq!(engine.evaluate(ALICE, 10).multipliers.path, 0.9);
}

#[test]
fn test_missing_hazard_reading_is_neutral() {
    let engine = Engine::with_defaults(world());
    let breakdown = engine.evaluate(ALICE, 0);
    assert_eq!(breakdown.multipliers.storm, 1.0);
    assert!(breakdown.applied);
}

#[test]
fn test_storm_surges_depletion() {
    let mut engine = Engine::new(world(), flat_config());
    let mut config = flat_config();
    config.environment_multipliers = EnvironmentMultipliers {
        path_bonus_enabled: false,
        ..EnvironmentMultipliers::default()
    };
    engine.replace_config(config);
    engine.host_mut().set_hazard(Some(HazardSample::with_strength(0.2)));

    assert_eq!(engine.rescale(ALICE, 0, 0.5), 2.0);
}

#[test]
fn test_non_positive_total_returns_input() {
    let mut config = EngineConfig::default();
    config.action_multipliers.standing = 0.0;
    let engine = Engine::new(world(), config);
    assert_eq!(engine.rescale(ALICE, 0, 0.3), 0.3);

    let mut config = EngineConfig::default();
    config.global_multiplier = -2.0;
    engine.replace_config(config);
    assert_eq!(engine.rescale(ALICE, 10, 0.3), 0.3);
}

#[test]
fn test_one_shot_never_fires_twice_in_a_row() {
    let engine = Engine::with_defaults(world());
    engine.on_attack_start(ALICE, &fixtures::iron_sword(), 0);
    engine.on_attack_start(ALICE, &ToolUse::tool(ToolCategory::Hammer), 0);
    engine.on_fire_start(ALICE, 0);

    let mut seen = Vec::new();
    for now in [10, 20, 30, 40] {
        seen.push(engine.evaluate(ALICE, now).action);
    }
    assert_eq!(
        seen,
        vec![
            ActionKind::WeaponSwing,
            ActionKind::HammerUse,
            ActionKind::FireStarting,
            ActionKind::Standing,
        ]
    );
}

#[test]
fn test_sleep_fast_forward_keeps_normal_month_multiplier() {
    let mut engine = Engine::new(world(), EngineConfig::default());
    engine.host_mut().set_calendar(Some(fixtures::normal_calendar()));
    let normal = engine.evaluate(ALICE, 0).multipliers.month;
    assert!((normal - 2.0).abs() < 1e-9);

    engine.host_mut().set_mount(ALICE, Some(fixtures::bed_seat()));
    engine
        .host_mut()
        .set_calendar(Some(CalendarSample::new(9.0, 24.0, 200.0)));
    let asleep = engine.evaluate(ALICE, 1_000);
    assert_eq!(asleep.action, ActionKind::Sleeping);
    assert_eq!(asleep.multipliers.month, normal);

    // Waking up at normal speed again
    engine.host_mut().set_mount(ALICE, None);
    engine.host_mut().set_calendar(Some(fixtures::reference_calendar()));
    let awake = engine.evaluate(ALICE, 2_000).multipliers.month;
    assert!((awake - 1.0).abs() < 1e-9);
}

#[test]
fn test_month_multiplier_within_bounds_for_many_calendars() {
    let mut engine = Engine::new(world(), EngineConfig::default());
    let config = engine.config();
    let bounds = &config.month_length_scaling;

    for speed in [0.5, 1.0, 10.0, 60.0, 119.0] {
        for days in [1.0, 3.0, 9.0, 30.0, 365.0] {
            engine
                .host_mut()
                .set_calendar(Some(CalendarSample::new(days, 24.0, speed)));
            let month = engine.evaluate(ALICE, 0).multipliers.month;
            assert!(month >= bounds.min_multiplier && month <= bounds.max_multiplier);
        }
    }
}

#[test]
fn test_pan_click_in_shallow_water() {
    let mut host = world();
    host.set_movement(ALICE, MovementState::wading());
    host.set_held_item(ALICE, None, Some(fixtures::wooden_pan_code()));
    host.set_material(feet().block(), MaterialLayer::Fluid, fixtures::still_water());
    let mut engine = Engine::with_defaults(host);

    engine.sample_all(0);
    engine.host_mut().set_controls(ALICE, TriggerControls::secondary());
    engine.sample_all(20);

    let breakdown = engine.evaluate(ALICE, 500);
    assert_eq!(breakdown.action, ActionKind::Panning);
    assert_eq!(breakdown.multipliers.action, 0.85);

    // Wading on granite is not swimming
    assert_eq!(engine.evaluate(ALICE, 600).action, ActionKind::Standing);
}

#[test]
fn test_adrift_in_water_without_footing_is_swimming() {
    let mut host = ScriptedHost::new();
    host.set_position(BOB, feet());
    host.set_movement(BOB, MovementState::wading());
    host.set_material(feet().block(), MaterialLayer::Fluid, fixtures::seawater());
    let engine = Engine::with_defaults(host);

    assert_eq!(engine.evaluate(BOB, 0).action, ActionKind::Swimming);
}

#[test]
fn test_bare_click_counts_as_weapon_swing() {
    let mut engine = Engine::with_defaults(world());
    engine.sample_all(0);
    engine.host_mut().set_controls(ALICE, TriggerControls::primary());
    engine.sample_all(1_000);

    assert_eq!(engine.evaluate(ALICE, 1_100).action, ActionKind::WeaponSwing);
    assert_eq!(engine.evaluate(ALICE, 1_150).action, ActionKind::Standing);
}

#[test]
fn test_quern_grinding_through_sampler() {
    let mut engine = Engine::with_defaults(world());
    engine
        .host_mut()
        .set_targeted_block(ALICE, Some("game:quern-granite"));
    engine.host_mut().set_controls(ALICE, TriggerControls::secondary());

    let mut now = 0;
    while now <= 2_000 {
        engine.sample_all(now);
        now += 20;
    }
    assert_eq!(engine.evaluate(ALICE, now).action, ActionKind::QuernGrinding);
}

#[test]
fn test_seated_agents() {
    let mut engine = Engine::with_defaults(world());
    engine.on_attack_start(ALICE, &fixtures::copper_pickaxe(), 0);

    engine.host_mut().set_mount(ALICE, Some(fixtures::horse_saddle()));
    assert_eq!(engine.evaluate(ALICE, 10).action, ActionKind::SittingMount);

    engine.host_mut().set_mount(ALICE, Some(fixtures::chair_seat()));
    assert_eq!(engine.evaluate(ALICE, 20).action, ActionKind::SittingFurniture);

    // The pickaxe swing was never consumed while seated
    engine.host_mut().set_mount(ALICE, None);
    assert_eq!(engine.evaluate(ALICE, 30).action, ActionKind::Mining);
}

#[test]
fn test_agents_are_isolated() {
    let mut engine = Engine::with_defaults(world());
    engine.host_mut().set_position(BOB, feet());
    engine.on_attack_start(BOB, &ToolUse::item("game:shovel-bronze"), 0);

    assert_eq!(engine.evaluate(ALICE, 10).action, ActionKind::Standing);
    assert_eq!(engine.evaluate(BOB, 10).action, ActionKind::Digging);
}

#[test]
fn test_concurrent_triggers_and_ticks_across_agents() {
    use std::sync::Arc;
    use std::thread;

    let mut host = ScriptedHost::new();
    for n in 0..8 {
        host.add_agent(AgentId(n));
    }
    let engine = Arc::new(Engine::with_defaults(host));

    let handles: Vec<_> = (0..8u64)
        .map(|n| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let agent = AgentId(n);
                let mut mined = 0;
                for step in 0..100i64 {
                    let now = step * 1_000;
                    engine.on_attack_start(agent, &ToolUse::tool(ToolCategory::Pickaxe), now);
                    if engine.evaluate(agent, now + 500).action == ActionKind::Mining {
                        mined += 1;
                    }
                }
                mined
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 100);
    }
}
