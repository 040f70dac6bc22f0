//! Interactive provider switcher.
//!
//! Cycling providers swaps the active theme in the registry; every frame is
//! painted from the one `Arc<Theme>` read at the start of the draw.

use std::error::Error;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::bridge::CliBridge;
use crate::core::catalog::{
    AutoDetectResult, CatalogError, CatalogProvider, CliCredentialSource, ProviderCatalog,
    SourceError,
};
use crate::core::config::data::Config;
use crate::ui::appearance::Appearance;
use crate::ui::registry::{CycleDirection, ThemeRegistry};
use crate::ui::telemetry::SwitchSource;
use crate::ui::theme::{AdaptiveColor, Theme};
use crate::utils::color::{detect_color_depth, quantize_color, ColorDepth};

const TICK_RATE: Duration = Duration::from_millis(120);
const AUTO_DETECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves adaptive theme colors for this terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    pub appearance: Appearance,
    pub depth: ColorDepth,
}

impl Paint {
    pub fn detect() -> Self {
        Self {
            appearance: Appearance::detect(),
            depth: detect_color_depth(),
        }
    }

    pub fn color(self, color: AdaptiveColor) -> Color {
        quantize_color(color.resolve(self.appearance), self.depth)
    }
}

/// Catalog fetch progress.
#[derive(Debug, Default)]
pub enum CatalogState {
    #[default]
    Loading,
    Ready(Vec<CatalogProvider>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitcherAction {
    Continue,
    Quit,
    Selected(String),
}

#[derive(Debug, Default)]
pub struct SwitcherState {
    pub catalog: CatalogState,
    pub tick: usize,
    /// Set once a key press changes the theme; auto-detect then leaves it alone
    pub user_switched: bool,
    pub notice: Option<String>,
}

impl SwitcherState {
    pub fn finish_loading(&mut self, result: Result<Vec<CatalogProvider>, CatalogError>) {
        self.catalog = match result {
            Ok(providers) => CatalogState::Ready(providers),
            Err(err) => CatalogState::Failed(err.to_string()),
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.catalog, CatalogState::Loading)
    }
}

enum UiEvent {
    Terminal(Event),
    Catalog(Result<Vec<CatalogProvider>, CatalogError>),
    AutoDetect(Result<AutoDetectResult, SourceError>),
}

/// Fold a background credential scan into the switcher. When the active
/// provider has no credentials but another registered provider does, and the
/// user has not picked a theme yet, the theme moves to that provider.
pub fn apply_auto_detect(
    registry: &ThemeRegistry,
    state: &mut SwitcherState,
    result: Result<AutoDetectResult, SourceError>,
) {
    let result = match result {
        Ok(result) if result.found > 0 => result,
        Ok(_) => {
            debug!("auto-detect found no credentials");
            return;
        }
        Err(err) => {
            debug!(error = %err, "auto-detect failed");
            return;
        }
    };
    state.notice = Some(format!("✓ Auto-detected {} credential(s)", result.found));

    if state.user_switched || result.has_credentials_for(&registry.current().provider_id) {
        return;
    }
    let detected = registry
        .provider_ids()
        .iter()
        .find(|id| result.has_credentials_for(id));
    if let Some(id) = detected {
        debug!(provider = %id, "switching to auto-detected provider");
        registry.switch_to_via(id, SwitchSource::Programmatic);
    }
}

/// Apply one key press. Digits jump straight to the nth provider.
pub fn handle_key(registry: &ThemeRegistry, key: KeyEvent) -> SwitcherAction {
    if key.kind != KeyEventKind::Press {
        return SwitcherAction::Continue;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => SwitcherAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            SwitcherAction::Quit
        }
        KeyCode::Tab | KeyCode::Right => {
            registry.cycle(CycleDirection::Forward);
            SwitcherAction::Continue
        }
        KeyCode::BackTab | KeyCode::Left => {
            registry.cycle(CycleDirection::Backward);
            SwitcherAction::Continue
        }
        KeyCode::Char(digit @ '1'..='9') => {
            let index = digit as usize - '1' as usize;
            if let Some(id) = registry.provider_ids().get(index) {
                registry.switch_to_via(id, SwitchSource::Modal);
            }
            SwitcherAction::Continue
        }
        KeyCode::Enter => SwitcherAction::Selected(registry.current().provider_id.clone()),
        _ => SwitcherAction::Continue,
    }
}

fn provider_tabs(registry: &ThemeRegistry, theme: &Theme, paint: Paint) -> Line<'static> {
    let palette = &theme.palette;
    let mut spans = Vec::new();
    for (i, id) in registry.provider_ids().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(
                " │ ",
                Style::default().fg(paint.color(palette.border_subtle)),
            ));
        }
        let style = if *id == theme.provider_id {
            Style::default()
                .fg(paint.color(palette.primary))
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(paint.color(palette.text_muted))
        };
        spans.push(Span::styled(format!("{} {}", i + 1, id), style));
    }
    Line::from(spans)
}

fn catalog_lines(state: &SwitcherState, theme: &Theme, paint: Paint) -> Vec<Line<'static>> {
    let palette = &theme.palette;
    let muted = Style::default().fg(paint.color(palette.text_muted));

    match &state.catalog {
        CatalogState::Loading => {
            let spinner = theme
                .decorations
                .as_ref()
                .and_then(|d| d.spinner_frame(state.tick))
                .unwrap_or('…');
            vec![Line::from(Span::styled(
                format!("{spinner} Loading providers..."),
                Style::default().fg(paint.color(palette.info)),
            ))]
        }
        CatalogState::Failed(message) => vec![Line::from(Span::styled(
            format!("⚠️  {message}"),
            Style::default().fg(paint.color(palette.error)),
        ))],
        CatalogState::Ready(providers) if providers.is_empty() => {
            vec![Line::from(Span::styled("No providers available.", muted))]
        }
        CatalogState::Ready(providers) => providers
            .iter()
            .map(|provider| {
                let health = provider
                    .health
                    .indicator()
                    .map(|mark| format!(" {mark}"))
                    .unwrap_or_default();
                let active = provider.id.eq_ignore_ascii_case(&theme.provider_id);
                let (marker, style) = if active {
                    (
                        "▶ ",
                        Style::default()
                            .fg(paint.color(palette.accent))
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    ("  ", Style::default().fg(paint.color(palette.text)))
                };
                Line::from(vec![
                    Span::styled(format!("{marker}{}{health}", provider.display_name), style),
                    Span::styled(
                        format!("  ({}, {} models)", provider.id, provider.models.len()),
                        muted,
                    ),
                ])
            })
            .collect(),
    }
}

pub fn render(frame: &mut Frame, registry: &ThemeRegistry, state: &SwitcherState, paint: Paint) {
    let theme = registry.current();
    let palette = &theme.palette;

    let background = Style::default()
        .bg(paint.color(palette.background))
        .fg(paint.color(palette.text));
    frame.render_widget(Block::default().style(background), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let border = Style::default().fg(paint.color(palette.border_active));
    let tabs = Paragraph::new(provider_tabs(registry, &theme, paint)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(
                theme.name(),
                Style::default()
                    .fg(paint.color(palette.primary))
                    .add_modifier(Modifier::BOLD),
            )),
    );
    frame.render_widget(tabs, chunks[0]);

    let welcome = theme
        .decorations
        .as_ref()
        .map(|d| d.welcome_message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Welcome to {}", theme.display_name));
    let welcome = Paragraph::new(Span::styled(
        welcome,
        Style::default().fg(paint.color(palette.secondary)),
    ))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::BOTTOM).border_style(
        Style::default().fg(paint.color(palette.border_subtle)),
    ));
    frame.render_widget(welcome, chunks[1]);

    let mut lines = catalog_lines(state, &theme, paint);
    if let Some(notice) = &state.notice {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(paint.color(palette.success)),
        )));
    }
    let providers = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(paint.color(palette.border)))
            .title("Providers"),
    );
    frame.render_widget(providers, chunks[2]);

    let help = Paragraph::new(Span::styled(
        "Tab/→ next • Shift-Tab/← previous • 1-9 jump • Enter select • Esc quit",
        Style::default().fg(paint.color(palette.text_muted)),
    ));
    frame.render_widget(help, chunks[3]);
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Terminal(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

fn spawn_catalog_fetch(
    catalog: ProviderCatalog,
    cancel: CancellationToken,
    event_tx: mpsc::UnboundedSender<UiEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let result = catalog.fetch_cancellable(&cancel).await;
        let _ = event_tx.send(UiEvent::Catalog(result));
    })
}

fn spawn_auto_detect(
    cli: Arc<dyn CliCredentialSource>,
    cancel: CancellationToken,
    event_tx: mpsc::UnboundedSender<UiEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            result = tokio::time::timeout(AUTO_DETECT_TIMEOUT, cli.auto_detect()) => result,
        };
        let result = result.unwrap_or(Err(SourceError::TimedOut(AUTO_DETECT_TIMEOUT)));
        let _ = event_tx.send(UiEvent::AutoDetect(result));
    })
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    registry: &ThemeRegistry,
    events: &mut mpsc::UnboundedReceiver<UiEvent>,
    paint: Paint,
) -> Result<Option<String>, Box<dyn Error>> {
    let mut state = SwitcherState::default();
    let mut ticker = tokio::time::interval(TICK_RATE);

    loop {
        terminal.draw(|f| render(f, registry, &state, paint))?;

        tokio::select! {
            _ = ticker.tick() => {
                state.tick = state.tick.wrapping_add(1);
            }
            event = events.recv() => match event {
                Some(UiEvent::Terminal(Event::Key(key))) => {
                    let before = registry.current();
                    match handle_key(registry, key) {
                        SwitcherAction::Continue => {}
                        SwitcherAction::Quit => return Ok(None),
                        SwitcherAction::Selected(id) => return Ok(Some(id)),
                    }
                    if !Arc::ptr_eq(&before, &registry.current()) {
                        state.user_switched = true;
                    }
                }
                Some(UiEvent::Terminal(_)) => {}
                Some(UiEvent::Catalog(result)) => state.finish_loading(result),
                Some(UiEvent::AutoDetect(result)) => {
                    apply_auto_detect(registry, &mut state, result);
                }
                None => return Ok(None),
            },
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout)).inspect_err(|_| {
        let _ = disable_raw_mode();
    })?;
    Ok(terminal)
}

fn restore_terminal<B: Backend + io::Write>(
    terminal: &mut Terminal<B>,
) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the switcher until the user selects a provider or quits. Quitting
/// while the catalog or the credential scan is still running cancels it.
pub async fn run_switcher(config: &Config) -> Result<(), Box<dyn Error>> {
    let registry = ThemeRegistry::from_config(config);
    let paint = Paint::detect();
    let cancel = CancellationToken::new();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let fetch = spawn_catalog_fetch(
        ProviderCatalog::from_config(config),
        cancel.clone(),
        event_tx.clone(),
    );
    let cli: Arc<dyn CliCredentialSource> = Arc::new(CliBridge::from_config(config));
    let detect = spawn_auto_detect(cli, cancel.clone(), event_tx.clone());
    let reader = spawn_event_reader(event_tx);

    let mut terminal = setup_terminal()?;
    let outcome = event_loop(&mut terminal, &registry, &mut event_rx, paint).await;
    restore_terminal(&mut terminal)?;

    cancel.cancel();
    reader.abort();
    if let Err(err) = fetch.await {
        debug!(error = %err, "catalog task ended abnormally");
    }
    if let Err(err) = detect.await {
        debug!(error = %err, "auto-detect task ended abnormally");
    }

    let stats = registry.telemetry().snapshot();
    debug!(
        switches = stats.total_switches,
        most_used = ?stats.most_used_theme(),
        "switcher closed"
    );

    if let Some(provider) = outcome? {
        let theme = registry.current();
        println!("✅ Selected {} ({})", theme.display_name, provider);
        println!("   Run 'rycode set default-provider {provider}' to start here next time.");
    }
    Ok(())
}
