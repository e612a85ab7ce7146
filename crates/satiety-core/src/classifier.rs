//! Action Classifier
//!
//! Resolves exactly one [`ActionKind`] per depletion tick. Checks run in a
//! fixed order and the first match wins:
//!
//! 1. seat (bed, furniture, creature)
//! 2. floor sitting
//! 3. pending one-shot flags, in [`PENDING_PRIORITY`] order
//! 4. swimming
//! 5. sprinting / sneaking
//! 6. standing

use satiety_signals::{ActionKind, MountInfo, SimMillis, PENDING_PRIORITY};

use crate::config::PendingWindows;
use crate::flags::AgentActionState;
use crate::host::AgentSignals;

const FURNITURE_WORDS: [&str; 4] = ["seat", "chair", "bench", "stool"];

/// Classifies one tick, consuming whatever pending flags it inspects.
pub fn classify(
    state: &mut AgentActionState,
    signals: &AgentSignals,
    now: SimMillis,
    windows: &PendingWindows,
) -> ActionKind {
    if let Some(mount) = &signals.mount {
        return classify_mount(mount);
    }

    if signals.movement.floor_sitting {
        return ActionKind::Sitting;
    }

    if let Some(kind) = consume_pending(state, now, windows) {
        return kind;
    }

    continuous_action(signals)
}

/// Seat classification by name heuristics.
pub fn classify_mount(mount: &MountInfo) -> ActionKind {
    if mount.seat_kind.to_lowercase().contains("bed") {
        return ActionKind::Sleeping;
    }
    if looks_like_furniture(mount) {
        return ActionKind::SittingFurniture;
    }
    if mount.carrier.as_ref().map(|c| c.is_living).unwrap_or(false) {
        return ActionKind::SittingMount;
    }
    ActionKind::SittingFurniture
}

fn looks_like_furniture(mount: &MountInfo) -> bool {
    let mentions_furniture = |name: &str| {
        let name = name.to_lowercase();
        FURNITURE_WORDS.iter().any(|word| name.contains(word))
    };

    if mentions_furniture(&mount.seat_kind) {
        return true;
    }
    match &mount.carrier {
        Some(carrier) => {
            mentions_furniture(&carrier.type_name)
                || carrier.code.as_deref().map(mentions_furniture).unwrap_or(false)
        }
        None => false,
    }
}

/// Visits pending flags in priority order, clearing each one it looks at.
///
/// Returns the first live one. Expired flags are dropped without a trace.
pub fn consume_pending(
    state: &mut AgentActionState,
    now: SimMillis,
    windows: &PendingWindows,
) -> Option<ActionKind> {
    for kind in PENDING_PRIORITY {
        if state.try_consume(kind, now, windows.window_for(kind)) {
            return Some(kind);
        }
        if kind == ActionKind::WeaponSwing
            && state.take_click(now, windows.weapon_swing_click_window_ms)
        {
            return Some(ActionKind::WeaponSwing);
        }
    }
    None
}

/// Classification from continuous state alone.
pub fn continuous_action(signals: &AgentSignals) -> ActionKind {
    let movement = &signals.movement;

    let adrift = movement.feet_in_liquid && signals.water_at_feet && !signals.solid_footing;
    if movement.swimming || adrift {
        return ActionKind::Swimming;
    }

    if movement.trying_to_move && movement.sprinting {
        return ActionKind::Sprinting;
    }
    if movement.trying_to_move && movement.sneaking {
        return ActionKind::Sneaking;
    }

    ActionKind::Standing
}

#[cfg(test)]
mod tests {
    use super::*;
    use satiety_signals::{fixtures, Carrier, MovementState};

    fn windows() -> PendingWindows {
        PendingWindows::default()
    }

    fn on_foot(movement: MovementState) -> AgentSignals {
        AgentSignals {
            movement,
            solid_footing: true,
            ..AgentSignals::default()
        }
    }

    #[test]
    fn test_bed_is_sleeping() {
        assert_eq!(classify_mount(&fixtures::bed_seat()), ActionKind::Sleeping);
    }

    #[test]
    fn test_furniture_by_seat_or_carrier_name() {
        assert_eq!(classify_mount(&fixtures::chair_seat()), ActionKind::SittingFurniture);

        let bench_carrier = MountInfo::seat("EntitySeatable")
            .with_carrier(Carrier::object("EntityMechanism", "mod:bench-oak"));
        assert_eq!(classify_mount(&bench_carrier), ActionKind::SittingFurniture);
    }

    #[test]
    fn test_living_carrier_is_mount() {
        assert_eq!(classify_mount(&fixtures::horse_saddle()), ActionKind::SittingMount);
    }

    #[test]
    fn test_furniture_name_wins_over_living_carrier() {
        let saddle_seat = MountInfo::seat("EntityRideableSeat")
            .with_carrier(Carrier::creature("EntityAgent", "game:horse-brown"));
        assert_eq!(classify_mount(&saddle_seat), ActionKind::SittingFurniture);
    }

    #[test]
    fn test_unknown_seat_defaults_to_furniture() {
        assert_eq!(classify_mount(&fixtures::boat_seat()), ActionKind::SittingFurniture);
        assert_eq!(classify_mount(&MountInfo::seat("Mystery")), ActionKind::SittingFurniture);
    }

    #[test]
    fn test_mount_overrides_pending_flags_and_leaves_them() {
        let mut state = AgentActionState::new();
        state.set_flag(ActionKind::Mining, 0);
        let signals = AgentSignals {
            mount: Some(fixtures::horse_saddle()),
            movement: MovementState::sprinting(),
            ..AgentSignals::default()
        };

        assert_eq!(classify(&mut state, &signals, 10, &windows()), ActionKind::SittingMount);
        assert!(state.is_pending(ActionKind::Mining));
    }

    #[test]
    fn test_floor_sitting_beats_flags() {
        let mut state = AgentActionState::new();
        state.set_flag(ActionKind::Panning, 0);
        let signals = on_foot(MovementState {
            floor_sitting: true,
            ..MovementState::default()
        });
        assert_eq!(classify(&mut state, &signals, 10, &windows()), ActionKind::Sitting);
    }

    #[test]
    fn test_flag_priority_and_visited_flags_cleared() {
        let mut state = AgentActionState::new();
        state.set_flag(ActionKind::Mining, 0);
        state.set_flag(ActionKind::Panning, 0);
        state.set_flag(ActionKind::BowUse, 0);
        let signals = on_foot(MovementState::idle());

        assert_eq!(classify(&mut state, &signals, 100, &windows()), ActionKind::Panning);
        // Only the winner was visited and cleared
        assert!(state.is_pending(ActionKind::Mining));
        assert_eq!(classify(&mut state, &signals, 200, &windows()), ActionKind::Mining);
        assert_eq!(classify(&mut state, &signals, 300, &windows()), ActionKind::BowUse);
        assert_eq!(classify(&mut state, &signals, 400, &windows()), ActionKind::Standing);
    }

    #[test]
    fn test_expired_flags_dropped_on_the_way_to_live_one() {
        let mut state = AgentActionState::new();
        // Weapon swing window is 3s, mining 30s
        state.set_flag(ActionKind::WeaponSwing, 0);
        state.set_flag(ActionKind::Chopping, 0);
        let signals = on_foot(MovementState::idle());

        assert_eq!(classify(&mut state, &signals, 5_000, &windows()), ActionKind::Chopping);
        assert!(state.pending_kinds().is_empty());
    }

    #[test]
    fn test_click_fallback_counts_as_weapon_swing_once() {
        let mut state = AgentActionState::new();
        state.last_primary_click = Some(1_000);
        state.set_flag(ActionKind::Mining, 900);
        let signals = on_foot(MovementState::idle());

        assert_eq!(classify(&mut state, &signals, 1_200, &windows()), ActionKind::WeaponSwing);
        assert_eq!(classify(&mut state, &signals, 1_210, &windows()), ActionKind::Mining);
    }

    #[test]
    fn test_stale_click_is_ignored() {
        let mut state = AgentActionState::new();
        state.last_primary_click = Some(1_000);
        let signals = on_foot(MovementState::idle());

        assert_eq!(classify(&mut state, &signals, 1_300, &windows()), ActionKind::Standing);
        assert_eq!(state.last_primary_click, None);
    }

    #[test]
    fn test_swimming() {
        let swimming = on_foot(MovementState {
            swimming: true,
            ..MovementState::default()
        });
        assert_eq!(continuous_action(&swimming), ActionKind::Swimming);

        let adrift = AgentSignals {
            movement: MovementState::wading(),
            water_at_feet: true,
            solid_footing: false,
            ..AgentSignals::default()
        };
        assert_eq!(continuous_action(&adrift), ActionKind::Swimming);
    }

    #[test]
    fn test_wading_on_solid_ground_is_not_swimming() {
        let wading = AgentSignals {
            movement: MovementState::wading(),
            water_at_feet: true,
            solid_footing: true,
            ..AgentSignals::default()
        };
        assert_eq!(continuous_action(&wading), ActionKind::Standing);

        let lava = AgentSignals {
            movement: MovementState::wading(),
            water_at_feet: false,
            solid_footing: false,
            ..AgentSignals::default()
        };
        assert_eq!(continuous_action(&lava), ActionKind::Standing);
    }

    #[test]
    fn test_movement_modifiers() {
        assert_eq!(continuous_action(&on_foot(MovementState::sprinting())), ActionKind::Sprinting);
        assert_eq!(continuous_action(&on_foot(MovementState::sneaking())), ActionKind::Sneaking);
        assert_eq!(continuous_action(&on_foot(MovementState::walking())), ActionKind::Standing);

        // Sprint key held while standing still
        let idle_sprint = on_foot(MovementState {
            sprinting: true,
            ..MovementState::default()
        });
        assert_eq!(continuous_action(&idle_sprint), ActionKind::Standing);
    }

    #[test]
    fn test_flags_beat_swimming() {
        let mut state = AgentActionState::new();
        state.set_flag(ActionKind::WeaponSwing, 0);
        let signals = AgentSignals {
            movement: MovementState {
                swimming: true,
                ..MovementState::default()
            },
            ..AgentSignals::default()
        };
        assert_eq!(classify(&mut state, &signals, 10, &windows()), ActionKind::WeaponSwing);
        assert_eq!(classify(&mut state, &signals, 20, &windows()), ActionKind::Swimming);
    }
}
