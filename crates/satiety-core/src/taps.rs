//! Sampler and Trigger Taps
//!
//! The two producers that feed the flag store:
//! - discrete tool-use triggers, mapped to an action through the tool table
//! - the fast periodic sampler, which watches control edges for actions the
//!   host never reports as events (pan clicks, quern spinning, bare clicks)

use satiety_signals::{ActionKind, AgentId, SimMillis, ToolCategory, ToolUse};

use crate::config::PendingWindows;
use crate::flags::AgentActionState;
use crate::host::{is_water_like, Host};

/// Maps the start of an attack to the pending kind it sets.
///
/// Work tools map to their own kind; anything else is a weapon swing.
pub fn attack_action(tool_use: &ToolUse) -> ActionKind {
    let code = tool_use.code_lower();
    let tool = tool_use.tool;

    if tool == Some(ToolCategory::Pickaxe) || is_prospecting_pick(tool, &code) {
        return ActionKind::Mining;
    }
    if tool == Some(ToolCategory::Axe) {
        return ActionKind::Chopping;
    }
    if is_shovel(tool, &code) {
        return ActionKind::Digging;
    }
    if tool == Some(ToolCategory::Hammer) {
        return ActionKind::HammerUse;
    }
    if is_bow_like(tool, &code) {
        return ActionKind::BowUse;
    }
    ActionKind::WeaponSwing
}

/// Maps the start of an interaction to a pending kind. Only aim-and-release
/// weapons count.
pub fn interact_action(tool_use: &ToolUse) -> Option<ActionKind> {
    is_bow_like(tool_use.tool, &tool_use.code_lower()).then_some(ActionKind::BowUse)
}

/// Whether an item counts as a work tool for the click fallback.
pub fn is_work_item(tool: Option<ToolCategory>, code: &str) -> bool {
    let code = code.to_lowercase();
    tool.map(ToolCategory::is_work_tool).unwrap_or(false)
        || is_prospecting_pick(tool, &code)
        || is_shovel(tool, &code)
        || is_bow_like(tool, &code)
}

fn is_prospecting_pick(tool: Option<ToolCategory>, code: &str) -> bool {
    tool == Some(ToolCategory::ProspectingPick)
        || code.contains("propick")
        || code.contains("prospectingpick")
}

fn is_shovel(tool: Option<ToolCategory>, code: &str) -> bool {
    tool == Some(ToolCategory::Shovel) || code.contains("shovel")
}

fn is_bow_like(tool: Option<ToolCategory>, code: &str) -> bool {
    tool.map(ToolCategory::is_bow_like).unwrap_or(false) || code.contains("crossbow")
}

/// Whether an item code names a wooden gold pan.
pub fn is_wooden_pan(code: &str) -> bool {
    let code = code.to_lowercase();
    code.contains("pan-wooden")
        || code.contains("woodenpan")
        || (code.contains("pan") && code.contains("wood"))
}

/// Whether a block code names a quern.
pub fn is_quern(code: &str) -> bool {
    code.to_lowercase().contains("quern")
}

/// What one sampler pass did for an agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleOutcome {
    /// Pending kinds set during this pass
    pub flags_set: Vec<ActionKind>,
    /// Whether a primary click was recorded for the weapon-swing fallback
    pub click_recorded: bool,
}

impl SampleOutcome {
    pub fn is_empty(&self) -> bool {
        self.flags_set.is_empty() && !self.click_recorded
    }
}

/// Runs the sampler rules for one agent against its locked state.
///
/// Agents whose controls the host cannot report are skipped and keep their
/// latches untouched.
pub fn sample_agent<H: Host + ?Sized>(
    host: &H,
    agent: AgentId,
    state: &mut AgentActionState,
    now: SimMillis,
    windows: &PendingWindows,
) -> SampleOutcome {
    let mut outcome = SampleOutcome::default();
    let Some(controls) = host.trigger_controls(agent) else {
        return outcome;
    };

    let primary_click = controls.primary_down && !state.last_primary_down;
    let secondary_click = controls.secondary_down && !state.last_secondary_down;
    state.last_primary_down = controls.primary_down;
    state.last_secondary_down = controls.secondary_down;

    if secondary_click && panning_conditions_met(host, agent) {
        state.set_flag(ActionKind::Panning, now);
        outcome.flags_set.push(ActionKind::Panning);
    }

    let on_quern = controls.secondary_down
        && host
            .targeted_block(agent)
            .map(|code| is_quern(&code))
            .unwrap_or(false);
    if on_quern && track_quern_spin(state, now, windows) {
        state.set_flag(ActionKind::QuernGrinding, now);
        outcome.flags_set.push(ActionKind::QuernGrinding);
    } else if !on_quern {
        state.quern_hold_started = None;
        state.quern_last_refresh = None;
    }

    if primary_click && windows.weapon_swing_click_window_ms > 0 {
        let code = host.held_item_code(agent).unwrap_or_default();
        if !is_work_item(host.active_tool(agent), &code) {
            state.last_primary_click = Some(now);
            outcome.click_recorded = true;
        }
    }

    outcome
}

/// Holding a pan, standing still in shallow water, not swimming.
fn panning_conditions_met<H: Host + ?Sized>(host: &H, agent: AgentId) -> bool {
    let holding_pan = host
        .held_item_code(agent)
        .map(|code| is_wooden_pan(&code))
        .unwrap_or(false);
    if !holding_pan {
        return false;
    }

    let movement = host.movement_state(agent).unwrap_or_default();
    if movement.swimming || !movement.feet_in_liquid || movement.trying_to_move {
        return false;
    }

    let Some(feet) = host.position(agent).map(|p| p.block()) else {
        return false;
    };
    [feet, feet.below()].into_iter().any(|pos| {
        host.material_at(pos, satiety_signals::MaterialLayer::Fluid)
            .map(|m| m.is_liquid && is_water_like(&m.code))
            .unwrap_or(false)
    })
}

/// Advances quern hold tracking; true when the flag is due for a refresh.
fn track_quern_spin(state: &mut AgentActionState, now: SimMillis, windows: &PendingWindows) -> bool {
    let started = *state.quern_hold_started.get_or_insert(now);
    if now - started < windows.quern_spin_hold_ms {
        return false;
    }

    let due = state
        .quern_last_refresh
        .map(|last| now - last >= windows.quern_flag_refresh_ms)
        .unwrap_or(true);
    if due {
        state.quern_last_refresh = Some(now);
    }
    due
}
