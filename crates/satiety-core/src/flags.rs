//! Pending-Flag Store
//!
//! Discrete actions (a pickaxe swing, a pan click) happen at arbitrary times
//! while depletion ticks fire on their own schedule. Each action leaves a
//! one-shot [`PendingTrigger`] in the agent's state; the next tick consumes it.
//!
//! Agents are independent: the map lock only guards membership, and every
//! agent's state sits behind its own mutex.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use satiety_signals::{ActionKind, AgentId, SimMillis, PENDING_PRIORITY};

/// A discrete action waiting to be attributed to a depletion tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTrigger {
    pub fired_at: SimMillis,
}

impl PendingTrigger {
    pub fn new(fired_at: SimMillis) -> Self {
        Self { fired_at }
    }

    /// Milliseconds since the trigger fired.
    pub fn age(&self, now: SimMillis) -> SimMillis {
        now.saturating_sub(self.fired_at)
    }

    /// Whether a consumer at `now` may still attribute this trigger.
    pub fn is_live(&self, now: SimMillis, window: SimMillis) -> bool {
        self.age(now) <= window
    }
}

fn slot(kind: ActionKind) -> Option<usize> {
    PENDING_PRIORITY.iter().position(|k| *k == kind)
}

/// Everything the engine remembers about one agent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentActionState {
    /// Edge latch for the primary control
    pub last_primary_down: bool,
    /// Edge latch for the secondary control
    pub last_secondary_down: bool,
    /// Last primary click made with a non-work item
    pub last_primary_click: Option<SimMillis>,
    /// When the secondary control started being held on a quern
    pub quern_hold_started: Option<SimMillis>,
    /// When the quern flag was last refreshed
    pub quern_last_refresh: Option<SimMillis>,
    /// Rate limit for per-agent diagnostics
    pub last_debug_emit: Option<SimMillis>,
    pending: [Option<PendingTrigger>; PENDING_PRIORITY.len()],
}

impl AgentActionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `kind` pending at `now`, replacing any unconsumed trigger.
    ///
    /// Returns false for kinds that are never pending.
    pub fn set_flag(&mut self, kind: ActionKind, now: SimMillis) -> bool {
        match slot(kind) {
            Some(i) => {
                self.pending[i] = Some(PendingTrigger::new(now));
                true
            }
            None => false,
        }
    }

    /// The pending trigger for `kind`, without consuming it.
    pub fn pending(&self, kind: ActionKind) -> Option<PendingTrigger> {
        slot(kind).and_then(|i| self.pending[i])
    }

    pub fn is_pending(&self, kind: ActionKind) -> bool {
        self.pending(kind).is_some()
    }

    /// Removes and returns the pending trigger for `kind`.
    pub fn take(&mut self, kind: ActionKind) -> Option<PendingTrigger> {
        slot(kind).and_then(|i| self.pending[i].take())
    }

    /// Consumes `kind`: clears it either way, true only if it was still live.
    pub fn try_consume(&mut self, kind: ActionKind, now: SimMillis, max_age: SimMillis) -> bool {
        self.take(kind)
            .map(|trigger| trigger.is_live(now, max_age))
            .unwrap_or(false)
    }

    /// Consumes the recorded primary click: true if it happened within `window`.
    pub fn take_click(&mut self, now: SimMillis, window: SimMillis) -> bool {
        match self.last_primary_click.take() {
            Some(at) if window > 0 => PendingTrigger::new(at).is_live(now, window),
            _ => false,
        }
    }

    /// Kinds currently pending, in priority order.
    pub fn pending_kinds(&self) -> Vec<ActionKind> {
        PENDING_PRIORITY
            .iter()
            .zip(self.pending.iter())
            .filter(|(_, p)| p.is_some())
            .map(|(k, _)| *k)
            .collect()
    }
}

/// Per-agent action state, keyed by agent id.
#[derive(Debug, Default)]
pub struct FlagStore {
    agents: RwLock<HashMap<AgentId, Arc<Mutex<AgentActionState>>>>,
}

impl FlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_map(&self) -> RwLockReadGuard<'_, HashMap<AgentId, Arc<Mutex<AgentActionState>>>> {
        self.agents
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_map(&self) -> RwLockWriteGuard<'_, HashMap<AgentId, Arc<Mutex<AgentActionState>>>> {
        self.agents
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn existing(&self, agent: AgentId) -> Option<Arc<Mutex<AgentActionState>>> {
        self.read_map().get(&agent).cloned()
    }

    fn entry(&self, agent: AgentId) -> Arc<Mutex<AgentActionState>> {
        if let Some(state) = self.existing(agent) {
            return state;
        }
        self.write_map().entry(agent).or_default().clone()
    }

    /// Runs `f` with exclusive access to the agent's state, creating it first
    /// if the agent is new.
    pub fn with_state<R>(&self, agent: AgentId, f: impl FnOnce(&mut AgentActionState) -> R) -> R {
        let state = self.entry(agent);
        let mut guard = lock_agent(&state);
        f(&mut guard)
    }

    /// Like [`FlagStore::with_state`], but an agent with no state gets a
    /// throwaway one that is never stored.
    pub fn with_existing_state<R>(
        &self,
        agent: AgentId,
        f: impl FnOnce(&mut AgentActionState) -> R,
    ) -> R {
        match self.existing(agent) {
            Some(state) => {
                let mut guard = lock_agent(&state);
                f(&mut guard)
            }
            None => f(&mut AgentActionState::new()),
        }
    }

    /// Marks `kind` pending for `agent` at `now`. Last writer wins.
    pub fn set_flag(&self, agent: AgentId, kind: ActionKind, now: SimMillis) {
        self.with_state(agent, |state| state.set_flag(kind, now));
    }

    /// Consumes `kind` for `agent`. Unknown agents have nothing pending.
    pub fn try_consume(
        &self,
        agent: AgentId,
        kind: ActionKind,
        now: SimMillis,
        max_age: SimMillis,
    ) -> bool {
        let Some(state) = self.existing(agent) else {
            return false;
        };
        let mut guard = lock_agent(&state);
        guard.try_consume(kind, now, max_age)
    }

    /// Drops all state for `agent`. Returns whether anything was removed.
    pub fn remove(&self, agent: AgentId) -> bool {
        self.write_map().remove(&agent).is_some()
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.read_map().contains_key(&agent)
    }

    /// A copy of the agent's current state.
    pub fn snapshot(&self, agent: AgentId) -> Option<AgentActionState> {
        let state = self.existing(agent)?;
        let guard = lock_agent(&state);
        Some(guard.clone())
    }

    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_map().is_empty()
    }
}

fn lock_agent(state: &Arc<Mutex<AgentActionState>>) -> MutexGuard<'_, AgentActionState> {
    state
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
