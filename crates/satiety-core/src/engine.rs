//! Engine
//!
//! Owns the per-agent flag store, the calendar cache and the current config,
//! and exposes the entry points the host calls:
//!
//! - [`Engine::sample_all`] on the fast sampling interval
//! - [`Engine::on_attack_start`], [`Engine::on_interact_start`] and
//!   [`Engine::on_fire_start`] when the host reports a tool use
//! - [`Engine::rescale`] once per depletion tick per agent
//! - [`Engine::on_disconnect`] when an agent leaves
//!
//! No entry point fails. Missing host readings fall back to neutral values.

use std::path::Path;
use std::sync::{Arc, RwLock};

use satiety_signals::{ActionKind, AgentId, HazardSample, SimMillis, ToolUse};

use crate::calendar::CalendarNormalizer;
use crate::classifier::classify;
use crate::composer::{compose, storm_active};
use crate::config::{ConfigError, EngineConfig};
use crate::diagnostics::{log_tick, LogThrottle, TickBreakdown};
use crate::flags::FlagStore;
use crate::host::{AgentSignals, Host};
use crate::taps::{attack_action, interact_action, sample_agent};

/// The action classification and rate scaling engine.
#[derive(Debug)]
pub struct Engine<H: Host> {
    host: H,
    config: RwLock<Arc<EngineConfig>>,
    flags: FlagStore,
    calendar: CalendarNormalizer,
    storm_log: LogThrottle,
}

impl<H: Host> Engine<H> {
    pub fn new(host: H, config: EngineConfig) -> Self {
        Self {
            host,
            config: RwLock::new(Arc::new(config)),
            flags: FlagStore::new(),
            calendar: CalendarNormalizer::new(),
            storm_log: LogThrottle::default(),
        }
    }

    pub fn with_defaults(host: H) -> Self {
        Self::new(host, EngineConfig::default())
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn flags(&self) -> &FlagStore {
        &self.flags
    }

    pub fn calendar(&self) -> &CalendarNormalizer {
        &self.calendar
    }

    /// The config in effect right now.
    pub fn config(&self) -> Arc<EngineConfig> {
        let slot = self
            .config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&slot)
    }

    /// Swaps in a new config. Calls already in flight keep their snapshot.
    pub fn replace_config(&self, config: EngineConfig) {
        let mut slot = self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Arc::new(config);
    }

    /// Reloads the config from `path`. The current config stays on error.
    pub fn reload_config(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let config = EngineConfig::from_file(path.as_ref())?;
        tracing::info!("reloaded config from {}", path.as_ref().display());
        self.replace_config(config);
        Ok(())
    }

    /// One sampler pass over every online agent.
    pub fn sample_all(&self, now: SimMillis) {
        let config = self.config();
        let windows = &config.pending_windows;

        for agent in self.host.online_agents() {
            let outcome = self
                .flags
                .with_state(agent, |state| sample_agent(&self.host, agent, state, now, windows));

            if config.debug_logging {
                for kind in &outcome.flags_set {
                    tracing::debug!(agent = %agent, action = %kind, now, "sampler set flag");
                }
            }
        }
    }

    /// The agent started attacking or breaking with whatever it holds.
    pub fn on_attack_start(&self, agent: AgentId, tool_use: &ToolUse, now: SimMillis) -> ActionKind {
        let kind = attack_action(tool_use);
        self.flags.set_flag(agent, kind, now);
        kind
    }

    /// The agent started using its held item. Only aim-and-release weapons
    /// set a flag.
    pub fn on_interact_start(
        &self,
        agent: AgentId,
        tool_use: &ToolUse,
        now: SimMillis,
    ) -> Option<ActionKind> {
        let kind = interact_action(tool_use)?;
        self.flags.set_flag(agent, kind, now);
        Some(kind)
    }

    /// The agent started lighting a fire.
    pub fn on_fire_start(&self, agent: AgentId, now: SimMillis) {
        self.flags.set_flag(agent, ActionKind::FireStarting, now);
    }

    /// Forgets everything about `agent`. Unknown agents are ignored.
    pub fn on_disconnect(&self, agent: AgentId) -> bool {
        let removed = self.flags.remove(agent);
        if removed {
            tracing::debug!(agent = %agent, "dropped agent state");
        }
        removed
    }

    /// Classifies and scales one depletion tick.
    ///
    /// Consumes the agent's pending flags exactly as [`Engine::rescale`] does.
    pub fn evaluate(&self, agent: AgentId, now: SimMillis) -> TickBreakdown {
        let config = self.config();
        let signals = AgentSignals::gather(&self.host, agent);
        let calendar = self.host.calendar_sample();
        let hazard = self.host.hazard_sample();

        if config.debug_logging {
            self.log_storm(&config, hazard.as_ref(), now);
        }

        self.flags.with_existing_state(agent, |state| {
            let action = classify(state, &signals, now, &config.pending_windows);
            let month = self
                .calendar
                .month_multiplier(&config.month_length_scaling, action, calendar.as_ref());
            let composition = compose(&config, &signals, action, month, hazard.as_ref());
            let breakdown = TickBreakdown::new(agent, now, action, composition);

            if config.debug_logging {
                log_tick(state, &breakdown);
            }
            breakdown
        })
    }

    /// Rescales one raw depletion amount.
    ///
    /// Returns `raw` unchanged when the composed multiplier is unusable.
    pub fn rescale(&self, agent: AgentId, now: SimMillis, raw: f32) -> f32 {
        self.evaluate(agent, now).apply(raw)
    }

    fn log_storm(&self, config: &EngineConfig, hazard: Option<&HazardSample>, now: SimMillis) {
        if !self.storm_log.ready(now) {
            return;
        }
        match hazard {
            Some(sample) => tracing::debug!(
                active = ?sample.active,
                strength = ?sample.strength,
                storm = storm_active(&config.environment_multipliers, sample),
                "storm reading"
            ),
            None => tracing::debug!("storm reading unavailable"),
        }
    }
}
