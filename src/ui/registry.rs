//! Provider theme registry.
//!
//! Themes are built once and never mutated; the registry only swaps which
//! `Arc<Theme>` is active. Readers clone the `Arc` under a read lock, so a
//! frame always renders from a single theme even while another task switches.

use crate::core::config::data::Config;
use crate::ui::builtin_themes::{load_builtin_themes, theme_spec_from_custom, DEFAULT_THEME_ID};
use crate::ui::telemetry::{SwitchSource, ThemeTelemetry};
use crate::ui::theme::{for_each_palette_slot, AdaptiveColor, Palette, Theme};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use tracing::{debug, warn};

type ThemeListener = Arc<dyn Fn(&Arc<Theme>) + Send + Sync>;

struct ActiveTheme {
    current: Arc<Theme>,
    previous: Option<Arc<Theme>>,
}

/// Direction for Tab / Shift-Tab provider cycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Forward,
    Backward,
}

pub struct ThemeRegistry {
    themes: HashMap<String, Arc<Theme>>,
    order: Vec<String>,
    default_id: String,
    active: RwLock<ActiveTheme>,
    listeners: Mutex<Vec<ThemeListener>>,
    telemetry: ThemeTelemetry,
}

impl ThemeRegistry {
    /// Create a registry whose default (and initially active) theme is
    /// `default_theme`.
    pub fn new(default_theme: Theme) -> Self {
        let id = default_theme.provider_id.to_ascii_lowercase();
        let theme = Arc::new(default_theme);
        Self {
            themes: HashMap::from([(id.clone(), Arc::clone(&theme))]),
            order: vec![id.clone()],
            telemetry: ThemeTelemetry::new(&id, true),
            default_id: id,
            active: RwLock::new(ActiveTheme {
                current: theme,
                previous: None,
            }),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// The built-in provider themes, with claude active.
    pub fn builtin() -> Self {
        let mut themes = load_builtin_themes()
            .into_iter()
            .map(|spec| Theme::from_spec(&spec, None));
        let first = themes.next().unwrap_or_else(|| Theme {
            provider_id: DEFAULT_THEME_ID.to_string(),
            display_name: "Claude".to_string(),
            palette: Palette::default(),
            decorations: None,
        });

        let mut registry = Self::new(first);
        for theme in themes {
            registry.register(theme);
        }
        registry.set_default(DEFAULT_THEME_ID);
        registry
    }

    /// Built-ins plus the config's custom themes, starting on the configured
    /// default provider when it has a theme.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::builtin();

        for custom in &config.custom_themes {
            let spec = theme_spec_from_custom(custom);
            let base = match spec.extends.as_deref() {
                Some(parent) => registry.get(parent).or_else(|| {
                    warn!(theme = %spec.id, extends = %parent, "unknown parent theme, using default");
                    None
                }),
                None => registry.get(&spec.id),
            }
            .or_else(|| registry.get(DEFAULT_THEME_ID));

            let theme = Theme::from_spec(&spec, base.as_deref());
            debug!(provider = %theme.provider_id, "registered custom theme");
            registry.register(theme);
        }

        if let Some(provider) = config.default_provider.as_deref() {
            if !registry.set_default(provider) {
                warn!(provider = %provider, "no theme for default provider, keeping {}", DEFAULT_THEME_ID);
            }
        }
        registry.telemetry.set_enabled(config.telemetry_enabled());
        registry
    }

    fn read(&self) -> RwLockReadGuard<'_, ActiveTheme> {
        self.active.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ActiveTheme> {
        self.active.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a theme, replacing any existing theme with the same provider ID
    /// in place. Replacing the active theme makes the new one active.
    pub fn register(&mut self, theme: Theme) {
        let id = theme.provider_id.to_ascii_lowercase();
        let theme = Arc::new(theme);
        if self.themes.insert(id.clone(), Arc::clone(&theme)).is_none() {
            self.order.push(id.clone());
        }
        let active = self
            .active
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if active.current.provider_id.eq_ignore_ascii_case(&id) {
            active.current = theme;
        }
    }

    /// Make `provider_id` the default and active theme. Returns false, and
    /// changes nothing, for an unknown provider.
    pub fn set_default(&mut self, provider_id: &str) -> bool {
        let Some(theme) = self.get(provider_id) else {
            return false;
        };
        self.default_id = theme.provider_id.to_ascii_lowercase();
        *self
            .active
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner) = ActiveTheme {
            current: theme,
            previous: None,
        };
        self.telemetry = ThemeTelemetry::new(&self.default_id, self.telemetry.is_enabled());
        true
    }

    /// The active theme.
    pub fn current(&self) -> Arc<Theme> {
        Arc::clone(&self.read().current)
    }

    /// The theme that was active before the last change, if any.
    pub fn previous(&self) -> Option<Arc<Theme>> {
        self.read().previous.clone()
    }

    pub fn get(&self, provider_id: &str) -> Option<Arc<Theme>> {
        self.themes
            .get(&provider_id.to_ascii_lowercase())
            .map(Arc::clone)
    }

    pub fn contains(&self, provider_id: &str) -> bool {
        self.themes.contains_key(&provider_id.to_ascii_lowercase())
    }

    /// Registered provider IDs in registration order.
    pub fn provider_ids(&self) -> &[String] {
        &self.order
    }

    /// Registered themes in registration order.
    pub fn themes(&self) -> impl Iterator<Item = &Arc<Theme>> + '_ {
        self.order.iter().filter_map(|id| self.themes.get(id))
    }

    pub fn default_provider_id(&self) -> &str {
        &self.default_id
    }

    pub fn telemetry(&self) -> &ThemeTelemetry {
        &self.telemetry
    }

    /// Switch the active theme. Returns false for an unknown provider and
    /// leaves the active theme untouched; switching to the active provider
    /// returns true without any effect.
    pub fn switch_to(&self, provider_id: &str) -> bool {
        self.switch_to_via(provider_id, SwitchSource::Programmatic)
    }

    /// [`switch_to`](Self::switch_to), recording what triggered the switch.
    pub fn switch_to_via(&self, provider_id: &str, source: SwitchSource) -> bool {
        let Some(theme) = self.get(provider_id) else {
            debug!(provider = %provider_id, "no theme for provider, keeping current");
            return false;
        };

        let started = Instant::now();
        let elapsed = {
            let mut active = self.write();
            if Arc::ptr_eq(&active.current, &theme) {
                return true;
            }
            let replaced = std::mem::replace(&mut active.current, Arc::clone(&theme));
            active.previous = Some(replaced);
            let elapsed = started.elapsed();
            // Telemetry must see switches in the order they were applied.
            self.telemetry
                .record_switch(&theme.provider_id, source, elapsed);
            elapsed
        };

        debug!(provider = %theme.provider_id, ?source, ?elapsed, "switched theme");

        let listeners: Vec<ThemeListener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener(&theme);
        }
        true
    }

    /// Switch back to the default theme.
    pub fn reset(&self) {
        self.switch_to_via(&self.default_id, SwitchSource::Programmatic);
    }

    /// Provider registered after (or before) the active one, wrapping around.
    pub fn adjacent_provider_id(&self, direction: CycleDirection) -> &str {
        let current = self.current();
        let len = self.order.len();
        let index = self
            .order
            .iter()
            .position(|id| id.eq_ignore_ascii_case(&current.provider_id))
            .unwrap_or(0);
        let next = match direction {
            CycleDirection::Forward => (index + 1) % len,
            CycleDirection::Backward => (index + len - 1) % len,
        };
        &self.order[next]
    }

    pub fn next_provider_id(&self) -> &str {
        self.adjacent_provider_id(CycleDirection::Forward)
    }

    /// Move to the adjacent provider's theme, as Tab / Shift-Tab do.
    pub fn cycle(&self, direction: CycleDirection) -> Arc<Theme> {
        let target = self.adjacent_provider_id(direction).to_string();
        self.switch_to_via(&target, SwitchSource::Tab);
        self.current()
    }

    /// Call `listener` with the new theme after every switch that changed the
    /// active theme. Listeners run on the switching thread, outside the lock.
    pub fn on_theme_change<F>(&self, listener: F)
    where
        F: Fn(&Arc<Theme>) + Send + Sync + 'static,
    {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }
}

macro_rules! registry_accessors {
    ($($slot:ident),+ $(,)?) => {
        impl ThemeRegistry {
            $(
                #[doc = concat!("`", stringify!($slot), "` color of the active theme.")]
                #[inline]
                pub fn $slot(&self) -> AdaptiveColor {
                    self.read().current.palette.$slot
                }
            )+
        }
    };
}

for_each_palette_slot!(registry_accessors);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::data::{ColorSpec, CustomTheme, DecorationSpec};
    use ratatui::style::Color;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;

    macro_rules! accessor_check {
        ($($slot:ident),+ $(,)?) => {
            fn assert_accessors_match(registry: &ThemeRegistry, theme: &Theme) {
                $(
                    assert_eq!(
                        registry.$slot(),
                        theme.palette.$slot,
                        "{} mismatch for {}",
                        stringify!($slot),
                        theme.provider_id
                    );
                )+
            }
        };
    }

    for_each_palette_slot!(accessor_check);

    #[test]
    fn starts_on_claude() {
        let registry = ThemeRegistry::builtin();
        assert_eq!(registry.current().provider_id, "claude");
        assert_eq!(registry.default_provider_id(), "claude");
        assert!(registry.previous().is_none());
        assert_eq!(
            registry.provider_ids(),
            &["claude", "gemini", "codex", "qwen"]
        );
    }

    #[test]
    fn every_builtin_switches_and_exposes_its_palette() {
        let registry = ThemeRegistry::builtin();
        for id in ["claude", "gemini", "codex", "qwen"] {
            assert!(registry.switch_to(id), "switch to {id}");
            let expected = registry.get(id).expect("registered theme");
            assert_eq!(registry.current().provider_id, id);
            assert_accessors_match(&registry, &expected);
        }
    }

    #[test]
    fn builtin_primary_colors_are_distinct() {
        let registry = ThemeRegistry::builtin();
        assert!(registry.switch_to("claude"));
        assert_eq!(registry.primary(), AdaptiveColor::same(Color::Rgb(0xD4, 0x75, 0x4C)));
        assert!(registry.switch_to("gemini"));
        assert_eq!(registry.primary(), AdaptiveColor::same(Color::Rgb(0x42, 0x85, 0xF4)));
        assert!(registry.switch_to("codex"));
        assert_eq!(registry.primary(), AdaptiveColor::same(Color::Rgb(0x10, 0xA3, 0x7F)));
        assert!(registry.switch_to("qwen"));
        assert_eq!(registry.primary(), AdaptiveColor::same(Color::Rgb(0xFF, 0x6A, 0x00)));
    }

    #[test]
    fn unknown_provider_leaves_theme_unchanged() {
        let registry = ThemeRegistry::builtin();
        assert!(registry.switch_to("gemini"));
        let before = registry.current();

        assert!(!registry.switch_to("nonexistent"));
        assert!(!registry.switch_to(""));
        assert!(Arc::ptr_eq(&before, &registry.current()));
        assert_eq!(registry.previous().map(|t| t.provider_id.clone()).as_deref(), Some("claude"));
    }

    #[test]
    fn switching_twice_is_idempotent() {
        let registry = ThemeRegistry::builtin();
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notified);
        registry.on_theme_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(registry.switch_to("codex"));
        let first = registry.current();
        assert!(registry.switch_to("codex"));
        assert!(Arc::ptr_eq(&first, &registry.current()));
        assert_eq!(notified.load(Ordering::SeqCst), 1);
        assert_eq!(registry.telemetry().snapshot().total_switches, 1);

        // the active provider is also a no-op from the start
        let fresh = ThemeRegistry::builtin();
        assert!(fresh.switch_to("claude"));
        assert!(fresh.previous().is_none());
    }

    #[test]
    fn lookup_ignores_case() {
        let registry = ThemeRegistry::builtin();
        assert!(registry.contains("QWEN"));
        assert!(registry.switch_to("Gemini"));
        assert_eq!(registry.current().provider_id, "gemini");
    }

    #[test]
    fn concurrent_reads_never_see_a_mixed_theme() {
        let registry = Arc::new(ThemeRegistry::builtin());
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let done = Arc::clone(&done);
                thread::spawn(move || {
                    let mut reads = 0usize;
                    while !done.load(Ordering::Relaxed) || reads < 1_000 {
                        let theme = registry.current();
                        let registered = registry
                            .get(&theme.provider_id)
                            .expect("current theme is registered");
                        assert_eq!(theme.palette, registered.palette);
                        assert_eq!(theme.decorations, registered.decorations);
                        reads += 1;
                    }
                })
            })
            .collect();

        let writer = {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let ids = ["claude", "gemini", "codex", "qwen"];
                for i in 0..5_000 {
                    assert!(registry.switch_to(ids[i % ids.len()]));
                }
            })
        };

        writer.join().expect("writer thread");
        done.store(true, Ordering::Relaxed);
        for reader in readers {
            reader.join().expect("reader thread");
        }
    }

    #[test]
    fn listeners_receive_new_theme() {
        let registry = ThemeRegistry::builtin();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        registry.on_theme_change(move |theme| {
            sink.lock().expect("listener lock").push(theme.provider_id.clone());
        });

        registry.switch_to("gemini");
        registry.switch_to("nonexistent");
        registry.switch_to("qwen");
        registry.reset();

        assert_eq!(
            *seen.lock().expect("listener lock"),
            vec!["gemini", "qwen", "claude"]
        );
    }

    #[test]
    fn listener_may_read_the_registry() {
        let registry = Arc::new(ThemeRegistry::builtin());
        let observed = Arc::new(Mutex::new(None));
        let weak = Arc::downgrade(&registry);
        let sink = Arc::clone(&observed);
        registry.on_theme_change(move |_| {
            if let Some(registry) = weak.upgrade() {
                *sink.lock().expect("listener lock") = Some(registry.primary());
            }
        });

        registry.switch_to("codex");
        let codex = registry.get("codex").expect("codex theme");
        assert_eq!(*observed.lock().expect("listener lock"), Some(codex.palette.primary));
    }

    #[test]
    fn concurrent_switchers_leave_telemetry_on_the_current_theme() {
        let registry = Arc::new(ThemeRegistry::builtin());
        let writers: Vec<_> = [["claude", "gemini"], ["codex", "qwen"]]
            .into_iter()
            .map(|ids| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for i in 0..2_000 {
                        registry.switch_to(ids[i % 2]);
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().expect("writer thread");
        }

        let stats = registry.telemetry().snapshot();
        assert_eq!(stats.active_provider, registry.current().provider_id);
        assert_eq!(stats.programmatic_switches, stats.total_switches);
    }

    #[test]
    fn cycling_wraps_in_registration_order() {
        let registry = ThemeRegistry::builtin();
        assert_eq!(registry.next_provider_id(), "gemini");
        assert_eq!(registry.cycle(CycleDirection::Forward).provider_id, "gemini");
        assert_eq!(registry.cycle(CycleDirection::Forward).provider_id, "codex");
        assert_eq!(registry.cycle(CycleDirection::Forward).provider_id, "qwen");
        assert_eq!(registry.cycle(CycleDirection::Forward).provider_id, "claude");
        assert_eq!(registry.cycle(CycleDirection::Backward).provider_id, "qwen");

        let stats = registry.telemetry().snapshot();
        assert_eq!(stats.tab_cycles, 5);
    }

    fn custom(id: &str, extends: Option<&str>, primary: &str) -> CustomTheme {
        CustomTheme {
            id: id.to_string(),
            display_name: id.to_uppercase(),
            extends: extends.map(str::to_string),
            palette: BTreeMap::from([("primary".to_string(), ColorSpec::Same(primary.to_string()))]),
            decorations: None,
        }
    }

    #[test]
    fn custom_themes_extend_and_replace() {
        let config = Config {
            custom_themes: vec![
                custom("grok", Some("codex"), "#FFFFFF"),
                custom("gemini", None, "#123456"),
                CustomTheme {
                    decorations: Some(DecorationSpec {
                        welcome: Some("Hi from Mistral".to_string()),
                        ..Default::default()
                    }),
                    ..custom("mistral", Some("nope"), "#FA520F")
                },
            ],
            ..Default::default()
        };
        let registry = ThemeRegistry::from_config(&config);
        assert_eq!(
            registry.provider_ids(),
            &["claude", "gemini", "codex", "qwen", "grok", "mistral"]
        );

        let builtin = ThemeRegistry::builtin();
        let codex = builtin.get("codex").expect("codex");
        let grok = registry.get("grok").expect("grok");
        assert_eq!(grok.palette.primary, AdaptiveColor::same(Color::Rgb(255, 255, 255)));
        assert_eq!(grok.palette.background, codex.palette.background);
        assert!(grok.decorations.is_none());

        let gemini = registry.get("gemini").expect("gemini");
        let original = builtin.get("gemini").expect("gemini");
        assert_eq!(gemini.palette.primary, AdaptiveColor::same(Color::Rgb(0x12, 0x34, 0x56)));
        assert_eq!(gemini.palette.text, original.palette.text);
        assert_eq!(gemini.decorations, original.decorations);

        let claude = builtin.get("claude").expect("claude");
        let mistral = registry.get("mistral").expect("mistral");
        assert_eq!(mistral.palette.text, claude.palette.text);
        assert_eq!(
            mistral.decorations.as_ref().map(|d| d.welcome_message.as_str()),
            Some("Hi from Mistral")
        );
    }

    #[test]
    fn config_default_provider_selects_initial_theme() {
        let config = Config {
            default_provider: Some("Qwen".to_string()),
            telemetry: Some(false),
            ..Default::default()
        };
        let registry = ThemeRegistry::from_config(&config);
        assert_eq!(registry.current().provider_id, "qwen");
        assert!(!registry.telemetry().is_enabled());

        registry.switch_to("claude");
        registry.reset();
        assert_eq!(registry.current().provider_id, "qwen");
    }

    #[test]
    fn unknown_default_provider_falls_back_to_claude() {
        let config = Config {
            default_provider: Some("openrouter".to_string()),
            ..Default::default()
        };
        let registry = ThemeRegistry::from_config(&config);
        assert_eq!(registry.current().provider_id, "claude");
    }

    #[test]
    fn replacing_active_theme_updates_current() {
        let mut registry = ThemeRegistry::builtin();
        let mut theme = (*registry.current()).clone();
        theme.display_name = "Claude Night".to_string();
        registry.register(theme);
        assert_eq!(registry.current().display_name, "Claude Night");
        assert_eq!(registry.provider_ids().len(), 4);
    }
}
