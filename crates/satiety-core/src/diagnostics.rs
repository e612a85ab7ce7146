//! Diagnostics
//!
//! Per-tick breakdowns, rate-limited `tracing` output, and a JSON-lines
//! report writer for replay and soak runs.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use satiety_signals::{ActionKind, AgentId, SimMillis};

use crate::composer::Composition;
use crate::flags::AgentActionState;

/// Minimum gap between two tick breakdowns logged for the same agent.
pub const AGENT_LOG_INTERVAL_MS: SimMillis = 2_000;

/// Minimum gap between two storm readings logged engine-wide.
pub const STORM_LOG_INTERVAL_MS: SimMillis = 5_000;

/// How one depletion tick was classified and scaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickBreakdown {
    pub agent: AgentId,
    pub now: SimMillis,
    pub action: ActionKind,
    pub multipliers: Composition,
    pub total: f64,
    /// False when the total was rejected and the raw amount passes through
    pub applied: bool,
}

impl TickBreakdown {
    pub fn new(agent: AgentId, now: SimMillis, action: ActionKind, multipliers: Composition) -> Self {
        Self {
            agent,
            now,
            action,
            multipliers,
            total: multipliers.total(),
            applied: multipliers.is_applicable(),
        }
    }

    /// Rescales a raw depletion amount the way this tick dictates.
    pub fn apply(&self, raw: f32) -> f32 {
        self.multipliers.apply(raw)
    }

    /// Pairs the breakdown with the amounts it rescaled.
    pub fn report(self, raw: f32) -> TickReport {
        TickReport {
            adjusted: self.apply(raw),
            raw,
            breakdown: self,
        }
    }
}

/// One line of a tick report file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    #[serde(flatten)]
    pub breakdown: TickBreakdown,
    pub raw: f32,
    pub adjusted: f32,
}

/// Logs a tick breakdown unless this agent logged one recently.
///
/// Returns whether a line was emitted.
pub fn log_tick(state: &mut AgentActionState, breakdown: &TickBreakdown) -> bool {
    let due = state
        .last_debug_emit
        .map(|last| breakdown.now - last >= AGENT_LOG_INTERVAL_MS)
        .unwrap_or(true);
    if !due {
        return false;
    }
    state.last_debug_emit = Some(breakdown.now);

    let m = &breakdown.multipliers;
    tracing::debug!(
        agent = %breakdown.agent,
        action = %breakdown.action,
        global = m.global,
        month = m.month,
        path = m.path,
        storm = m.storm,
        action_multiplier = m.action,
        total = breakdown.total,
        applied = breakdown.applied,
        "depletion tick"
    );
    true
}

/// Engine-wide rate limit for one kind of log line.
#[derive(Debug)]
pub struct LogThrottle {
    interval: SimMillis,
    last: Mutex<Option<SimMillis>>,
}

impl LogThrottle {
    pub fn new(interval: SimMillis) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    /// True at most once per interval; claims the slot when it returns true.
    pub fn ready(&self, now: SimMillis) -> bool {
        let mut last = self
            .last
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match *last {
            Some(at) if now - at < self.interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

impl Default for LogThrottle {
    fn default() -> Self {
        Self::new(STORM_LOG_INTERVAL_MS)
    }
}

/// Errors from writing tick reports
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes tick reports as JSON lines.
pub struct ReportWriter {
    writer: Option<Box<dyn Write + Send>>,
    line_count: u64,
}

impl ReportWriter {
    /// Create a writer that truncates and writes to `path`
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self::from_file(file))
    }

    fn from_file(file: File) -> Self {
        Self::from_writer(BufWriter::new(file))
    }

    /// Wrap any sink, e.g. stdout
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Some(Box::new(writer)),
            line_count: 0,
        }
    }

    /// A writer that only counts
    pub fn null() -> Self {
        Self {
            writer: None,
            line_count: 0,
        }
    }

    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    pub fn write(&mut self, report: &TickReport) -> Result<(), ReportError> {
        self.line_count += 1;
        if let Some(writer) = self.writer.as_mut() {
            let json = serde_json::to_string(report)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    pub fn write_all(&mut self, reports: &[TickReport]) -> Result<(), ReportError> {
        for report in reports {
            self.write(report)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ReportError> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for ReportWriter {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("failed to flush report writer: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufRead;

    fn breakdown(now: SimMillis) -> TickBreakdown {
        let multipliers = Composition {
            global: 1.0,
            month: 2.0,
            path: 0.9,
            storm: 1.0,
            action: 1.5,
        };
        TickBreakdown::new(AgentId(3), now, ActionKind::Sprinting, multipliers)
    }

    #[test]
    fn test_breakdown_totals() {
        let b = breakdown(0);
        assert!((b.total - 2.7).abs() < 1e-12);
        assert!(b.applied);

        let report = b.report(1.0);
        assert!((report.adjusted - 2.7).abs() < 1e-6);
        assert_eq!(report.raw, 1.0);
    }

    #[test]
    fn test_agent_log_rate_limit() {
        let mut state = AgentActionState::new();
        assert!(log_tick(&mut state, &breakdown(0)));
        assert!(!log_tick(&mut state, &breakdown(1_999)));
        assert!(log_tick(&mut state, &breakdown(2_000)));
        assert_eq!(state.last_debug_emit, Some(2_000));
    }

    #[test]
    fn test_throttle() {
        let throttle = LogThrottle::default();
        assert!(throttle.ready(100));
        assert!(!throttle.ready(5_099));
        assert!(throttle.ready(5_100));
    }

    #[test]
    fn test_report_lines() {
        let file = tempfile::NamedTempFile::new().unwrap();
        {
            let mut writer = ReportWriter::create(file.path()).unwrap();
            writer.write(&breakdown(0).report(1.0)).unwrap();
            writer.write(&breakdown(1_000).report(0.5)).unwrap();
            assert_eq!(writer.line_count(), 2);
        }

        let reader = std::io::BufReader::new(File::open(file.path()).unwrap());
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines.len(), 2);

        let parsed: TickReport = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(parsed.breakdown.now, 1_000);
        assert_eq!(parsed.breakdown.action, ActionKind::Sprinting);
        assert_eq!(parsed.raw, 0.5);

        let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(value["action"], "sprinting");
        assert_eq!(value["agent"], 3);
    }

    #[test]
    fn test_null_writer_counts() {
        let mut writer = ReportWriter::null();
        writer.write(&breakdown(0).report(1.0)).unwrap();
        assert_eq!(writer.line_count(), 1);
    }
}
