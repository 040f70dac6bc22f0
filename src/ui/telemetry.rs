//! In-memory theme usage statistics.
//!
//! Nothing here is persisted or sent anywhere; the numbers live as long as the
//! owning [`ThemeRegistry`](crate::ui::registry::ThemeRegistry) and can be
//! turned off through the `telemetry` config key.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// What triggered a theme switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchSource {
    /// Tab / Shift-Tab cycling in the input loop
    Tab,
    /// Selection from the model or provider dialog
    Modal,
    /// Code-triggered, e.g. config defaults or background detection
    Programmatic,
}

struct TelemetryState {
    total_switches: u64,
    switches_by_theme: HashMap<String, u64>,
    active_time: HashMap<String, Duration>,
    active_provider: String,
    last_switch: Instant,
    session_start: Instant,
    session_started_at: DateTime<Utc>,
    total_switch_time: Duration,
    fastest_switch: Option<Duration>,
    slowest_switch: Duration,
    tab_cycles: u64,
    modal_selections: u64,
    programmatic_switches: u64,
}

impl TelemetryState {
    fn new(active_provider: &str, now: Instant) -> Self {
        Self {
            total_switches: 0,
            switches_by_theme: HashMap::new(),
            active_time: HashMap::new(),
            active_provider: active_provider.to_string(),
            last_switch: now,
            session_start: now,
            session_started_at: Utc::now(),
            total_switch_time: Duration::ZERO,
            fastest_switch: None,
            slowest_switch: Duration::ZERO,
            tab_cycles: 0,
            modal_selections: 0,
            programmatic_switches: 0,
        }
    }
}

pub struct ThemeTelemetry {
    enabled: AtomicBool,
    state: Mutex<TelemetryState>,
}

impl ThemeTelemetry {
    pub fn new(active_provider: &str, enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            state: Mutex::new(TelemetryState::new(active_provider, Instant::now())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    fn lock(&self) -> MutexGuard<'_, TelemetryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a switch that changed the active theme to `provider_id`.
    pub fn record_switch(&self, provider_id: &str, source: SwitchSource, duration: Duration) {
        self.record_switch_at(provider_id, source, duration, Instant::now());
    }

    pub(crate) fn record_switch_at(
        &self,
        provider_id: &str,
        source: SwitchSource,
        duration: Duration,
        now: Instant,
    ) {
        if !self.is_enabled() {
            return;
        }
        let mut state = self.lock();

        state.total_switches += 1;
        *state
            .switches_by_theme
            .entry(provider_id.to_string())
            .or_default() += 1;

        match source {
            SwitchSource::Tab => state.tab_cycles += 1,
            SwitchSource::Modal => state.modal_selections += 1,
            SwitchSource::Programmatic => state.programmatic_switches += 1,
        }

        state.total_switch_time += duration;
        state.fastest_switch = Some(match state.fastest_switch {
            Some(fastest) => fastest.min(duration),
            None => duration,
        });
        state.slowest_switch = state.slowest_switch.max(duration);

        let elapsed = now.saturating_duration_since(state.last_switch);
        let previous = std::mem::replace(&mut state.active_provider, provider_id.to_string());
        if previous != provider_id {
            *state.active_time.entry(previous).or_default() += elapsed;
        }
        state.last_switch = now;
    }

    pub fn snapshot(&self) -> TelemetryStats {
        self.snapshot_at(Instant::now())
    }

    pub(crate) fn snapshot_at(&self, now: Instant) -> TelemetryStats {
        let state = self.lock();

        let mut active_time = state.active_time.clone();
        *active_time
            .entry(state.active_provider.clone())
            .or_default() += now.saturating_duration_since(state.last_switch);

        let average_switch_time = if state.total_switches == 0 {
            Duration::ZERO
        } else {
            let nanos = state.total_switch_time.as_nanos() / u128::from(state.total_switches);
            Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
        };

        TelemetryStats {
            active_provider: state.active_provider.clone(),
            total_switches: state.total_switches,
            switches_by_theme: state.switches_by_theme.clone(),
            active_time_by_theme: active_time,
            session_started_at: state.session_started_at,
            session_duration: now.saturating_duration_since(state.session_start),
            average_switch_time,
            fastest_switch: state.fastest_switch,
            slowest_switch: state.slowest_switch,
            tab_cycles: state.tab_cycles,
            modal_selections: state.modal_selections,
            programmatic_switches: state.programmatic_switches,
        }
    }

    /// Clear all counters, keeping the currently active provider.
    pub fn reset(&self) {
        let mut state = self.lock();
        let active = state.active_provider.clone();
        *state = TelemetryState::new(&active, Instant::now());
    }
}

/// Point-in-time copy of the telemetry counters.
#[derive(Debug, Clone)]
pub struct TelemetryStats {
    /// Provider the last recorded switch activated
    pub active_provider: String,
    pub total_switches: u64,
    pub switches_by_theme: HashMap<String, u64>,
    pub active_time_by_theme: HashMap<String, Duration>,
    pub session_started_at: DateTime<Utc>,
    pub session_duration: Duration,
    pub average_switch_time: Duration,
    pub fastest_switch: Option<Duration>,
    pub slowest_switch: Duration,
    pub tab_cycles: u64,
    pub modal_selections: u64,
    pub programmatic_switches: u64,
}

impl TelemetryStats {
    /// Provider with the most time spent active.
    pub fn most_used_theme(&self) -> Option<&str> {
        self.active_time_by_theme
            .iter()
            .filter(|(_, d)| !d.is_zero())
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(id, _)| id.as_str())
    }

    /// Provider with the least (non-zero) time spent active.
    pub fn least_used_theme(&self) -> Option<&str> {
        self.active_time_by_theme
            .iter()
            .filter(|(_, d)| !d.is_zero())
            .min_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)))
            .map(|(id, _)| id.as_str())
    }

    /// Preference score in `0.0..=1.0`: 70% share of session time, 30% share
    /// of switches.
    pub fn theme_preference(&self, provider_id: &str) -> f64 {
        if self.session_duration.is_zero() {
            return 0.0;
        }
        let time_score = self
            .active_time_by_theme
            .get(provider_id)
            .map(|d| d.as_secs_f64() / self.session_duration.as_secs_f64())
            .unwrap_or(0.0);
        let selection_score = match (self.total_switches, self.switches_by_theme.get(provider_id)) {
            (0, _) | (_, None) => 0.0,
            (total, Some(count)) => *count as f64 / total as f64,
        };
        (time_score * 0.7 + selection_score * 0.3).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_switches_by_source_and_theme() {
        let telemetry = ThemeTelemetry::new("claude", true);
        let start = Instant::now();
        telemetry.record_switch_at("gemini", SwitchSource::Tab, Duration::from_micros(3), start);
        telemetry.record_switch_at("codex", SwitchSource::Tab, Duration::from_micros(1), start);
        telemetry.record_switch_at(
            "gemini",
            SwitchSource::Modal,
            Duration::from_micros(5),
            start,
        );

        let stats = telemetry.snapshot_at(start);
        assert_eq!(stats.total_switches, 3);
        assert_eq!(stats.switches_by_theme.get("gemini"), Some(&2));
        assert_eq!(stats.tab_cycles, 2);
        assert_eq!(stats.modal_selections, 1);
        assert_eq!(stats.programmatic_switches, 0);
        assert_eq!(stats.fastest_switch, Some(Duration::from_micros(1)));
        assert_eq!(stats.slowest_switch, Duration::from_micros(5));
        assert_eq!(stats.average_switch_time, Duration::from_micros(3));
    }

    #[test]
    fn active_time_accrues_to_previous_theme() {
        let telemetry = ThemeTelemetry::new("claude", true);
        let t0 = Instant::now() + Duration::from_secs(1);
        {
            let mut state = telemetry.lock();
            state.last_switch = t0;
            state.session_start = t0;
        }
        telemetry.record_switch_at(
            "gemini",
            SwitchSource::Programmatic,
            Duration::ZERO,
            t0 + Duration::from_secs(10),
        );

        let stats = telemetry.snapshot_at(t0 + Duration::from_secs(12));
        assert_eq!(
            stats.active_time_by_theme.get("claude"),
            Some(&Duration::from_secs(10))
        );
        assert_eq!(
            stats.active_time_by_theme.get("gemini"),
            Some(&Duration::from_secs(2))
        );
        assert_eq!(stats.most_used_theme(), Some("claude"));
        assert_eq!(stats.least_used_theme(), Some("gemini"));

        // claude: 10/12 of the time, no switches to it
        let claude = stats.theme_preference("claude");
        assert!((claude - 0.7 * 10.0 / 12.0).abs() < 1e-9);
        // gemini: 2/12 of the time, the only switch
        let gemini = stats.theme_preference("gemini");
        assert!((gemini - (0.7 * 2.0 / 12.0 + 0.3)).abs() < 1e-9);
        assert_eq!(stats.theme_preference("qwen"), 0.0);
    }

    #[test]
    fn disabled_telemetry_records_nothing() {
        let telemetry = ThemeTelemetry::new("claude", false);
        telemetry.record_switch("gemini", SwitchSource::Tab, Duration::from_micros(2));
        assert_eq!(telemetry.snapshot().total_switches, 0);

        telemetry.set_enabled(true);
        telemetry.record_switch("gemini", SwitchSource::Tab, Duration::from_micros(2));
        assert_eq!(telemetry.snapshot().total_switches, 1);
    }

    #[test]
    fn average_survives_huge_switch_counts() {
        let telemetry = ThemeTelemetry::new("claude", true);
        {
            let mut state = telemetry.lock();
            state.total_switches = 1 << 32;
            state.total_switch_time = Duration::from_micros(1 << 32);
        }
        let stats = telemetry.snapshot();
        assert_eq!(stats.average_switch_time, Duration::from_micros(1));
    }

    #[test]
    fn reset_clears_counters() {
        let telemetry = ThemeTelemetry::new("claude", true);
        telemetry.record_switch("qwen", SwitchSource::Modal, Duration::from_micros(2));
        telemetry.reset();
        let stats = telemetry.snapshot();
        assert_eq!(stats.total_switches, 0);
        assert!(stats.switches_by_theme.is_empty());
        assert_eq!(stats.fastest_switch, None);
    }
}
