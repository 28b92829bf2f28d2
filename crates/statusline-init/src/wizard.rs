//! Interactive TUI wizard for building a statusline configuration.
//!
//! Five steps: feature checklist, colors, icon style, debug logging and
//! install location. Everything else in the resulting [`StatuslineConfig`]
//! is fixed (bash, detailed theme, ccusage on, no custom emojis).

use std::fmt;
use std::io;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use statusline_core::{
    Feature, IconStyle, InstallLocation, Runtime, StatuslineConfig, StatuslineError, Theme,
};
use thiserror::Error;
use tracing::{debug, info};

/// Shown when the checklist is confirmed with nothing selected.
pub const NO_FEATURE_SELECTED: &str = "You must choose at least one feature.";

/// Errors that can occur during wizard flow.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("User cancelled setup")]
    UserCancelled,

    #[error("TUI rendering failed: {0}")]
    RenderFailed(String),

    #[error("Terminal I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl From<WizardError> for StatuslineError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::UserCancelled => StatuslineError::UserCancelled,
            WizardError::RenderFailed(message) => StatuslineError::Terminal { message },
            WizardError::IoError(e) => StatuslineError::Terminal {
                message: e.to_string(),
            },
        }
    }
}

/// Result type for wizard operations.
pub type Result<T> = std::result::Result<T, WizardError>;

/// Wizard pages, in the order they are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WizardStep {
    Features,
    Colors,
    IconStyle,
    Logging,
    Location,
}

impl WizardStep {
    const ALL: [WizardStep; 5] = [
        WizardStep::Features,
        WizardStep::Colors,
        WizardStep::IconStyle,
        WizardStep::Logging,
        WizardStep::Location,
    ];

    fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    fn next(&self) -> Option<WizardStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    fn previous(&self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    fn question(&self) -> &'static str {
        match self {
            WizardStep::Features => "Select statusline features",
            WizardStep::Colors => "Enable modern color scheme?",
            WizardStep::IconStyle => "Choose icon style",
            WizardStep::Logging => "Enable debug logging to .claude/statusline.log?",
            WizardStep::Location => "Where would you like to install the statusline?",
        }
    }

    fn option_count(&self) -> usize {
        match self {
            WizardStep::Features => Feature::ALL.len(),
            WizardStep::IconStyle => IconStyle::ALL.len(),
            WizardStep::Colors | WizardStep::Logging => YES_NO.len(),
            WizardStep::Location => LOCATIONS.len(),
        }
    }
}

const YES_NO: [bool; 2] = [true, false];
const LOCATIONS: [InstallLocation; 2] = [InstallLocation::Global, InstallLocation::Project];

fn feature_label(feature: Feature) -> &'static str {
    match feature {
        Feature::Directory => "📁 Working Directory",
        Feature::Git => "🌿 Git Branch",
        Feature::Model => "🤖 Model Name & Version",
        Feature::Context => "🧠 Context Remaining",
        Feature::Usage => "💵 Usage & Cost",
        Feature::Session => "⌛ Session Time Remaining",
        Feature::Tokens => "📊 Token Statistics",
        Feature::BurnRate => "⚡ Burn Rate (tokens/min)",
    }
}

fn icon_style_label(style: IconStyle) -> &'static str {
    match style {
        IconStyle::NerdFont => "Nerd Font (requires Nerd Font)",
        IconStyle::Emoji => "😀 Emoji (colorful, works everywhere)",
        IconStyle::Unicode => "▸ Unicode (clean, modern icons)",
        IconStyle::Ascii => "[>] ASCII (maximum compatibility)",
    }
}

fn location_label(location: InstallLocation) -> &'static str {
    match location {
        InstallLocation::Global => "🏠 Global (~/.claude) - Use across all projects",
        InstallLocation::Project => "📂 Project (./.claude) - Only for this project",
    }
}

/// Internal state for the wizard TUI.
struct WizardState {
    step: WizardStep,
    /// Highlighted row on the current step
    cursor: usize,
    list_state: ListState,
    /// Checked flag per entry of `Feature::ALL`
    checked: [bool; 8],
    colors: bool,
    icon_style: IconStyle,
    logging: bool,
    location: InstallLocation,
    /// Validation message for the current step
    error: Option<&'static str>,
    should_exit: bool,
    /// Set when the last step is confirmed; `None` after exit means cancelled
    result: Option<StatuslineConfig>,
}

impl WizardState {
    fn new() -> Self {
        let mut state = Self {
            step: WizardStep::Features,
            cursor: 0,
            list_state: ListState::default(),
            checked: [true; 8],
            colors: true,
            icon_style: IconStyle::NerdFont,
            logging: false,
            location: InstallLocation::Project,
            error: None,
            should_exit: false,
            result: None,
        };
        state.enter_step(WizardStep::Features);
        state
    }

    /// Switch to `step` with the cursor on its current answer.
    fn enter_step(&mut self, step: WizardStep) {
        self.step = step;
        self.error = None;
        self.cursor = match step {
            WizardStep::Features => 0,
            WizardStep::Colors => usize::from(!self.colors),
            WizardStep::IconStyle => IconStyle::ALL
                .iter()
                .position(|s| *s == self.icon_style)
                .unwrap_or(0),
            WizardStep::Logging => usize::from(!self.logging),
            WizardStep::Location => LOCATIONS
                .iter()
                .position(|l| *l == self.location)
                .unwrap_or(0),
        };
        self.list_state.select(Some(self.cursor));
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => self.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(),
            KeyCode::Char(' ') => self.toggle(),
            KeyCode::Enter => self.confirm(),
            KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => self.back(),
            KeyCode::Esc | KeyCode::Char('q') => self.quit(),
            _ => {}
        }
    }

    fn move_up(&mut self) {
        let count = self.step.option_count();
        self.cursor = if self.cursor > 0 {
            self.cursor - 1
        } else {
            count - 1 // Wrap around
        };
        self.list_state.select(Some(self.cursor));
    }

    fn move_down(&mut self) {
        let count = self.step.option_count();
        self.cursor = if self.cursor + 1 < count {
            self.cursor + 1
        } else {
            0 // Wrap around
        };
        self.list_state.select(Some(self.cursor));
    }

    fn toggle(&mut self) {
        if self.step == WizardStep::Features {
            self.checked[self.cursor] = !self.checked[self.cursor];
            self.error = None;
        }
    }

    fn selected_features(&self) -> Vec<Feature> {
        Feature::ALL
            .iter()
            .zip(self.checked)
            .filter(|(_, checked)| *checked)
            .map(|(feature, _)| *feature)
            .collect()
    }

    fn confirm(&mut self) {
        match self.step {
            WizardStep::Features => {
                if self.selected_features().is_empty() {
                    self.error = Some(NO_FEATURE_SELECTED);
                    return;
                }
            }
            WizardStep::Colors => self.colors = YES_NO[self.cursor],
            WizardStep::IconStyle => self.icon_style = IconStyle::ALL[self.cursor],
            WizardStep::Logging => self.logging = YES_NO[self.cursor],
            WizardStep::Location => self.location = LOCATIONS[self.cursor],
        }

        match self.step.next() {
            Some(step) => self.enter_step(step),
            None => {
                self.result = Some(self.build_config());
                self.should_exit = true;
            }
        }
    }

    fn back(&mut self) {
        if let Some(step) = self.step.previous() {
            self.enter_step(step);
        }
    }

    fn quit(&mut self) {
        self.should_exit = true;
        self.result = None;
    }

    fn build_config(&self) -> StatuslineConfig {
        StatuslineConfig {
            features: self.selected_features(),
            runtime: Runtime::Bash,
            colors: self.colors,
            theme: Theme::Detailed,
            ccusage_integration: true,
            logging: self.logging,
            custom_emojis: false,
            icon_style: Some(self.icon_style),
            install_location: Some(self.location),
        }
    }

    /// Rows for the current step: (label, marked).
    fn rows(&self) -> Vec<(&'static str, bool)> {
        match self.step {
            WizardStep::Features => Feature::ALL
                .iter()
                .zip(self.checked)
                .map(|(f, checked)| (feature_label(*f), checked))
                .collect(),
            WizardStep::Colors => YES_NO
                .iter()
                .map(|v| (if *v { "Yes" } else { "No" }, *v == self.colors))
                .collect(),
            WizardStep::IconStyle => IconStyle::ALL
                .iter()
                .map(|s| (icon_style_label(*s), *s == self.icon_style))
                .collect(),
            WizardStep::Logging => YES_NO
                .iter()
                .map(|v| (if *v { "Yes" } else { "No" }, *v == self.logging))
                .collect(),
            WizardStep::Location => LOCATIONS
                .iter()
                .map(|l| (location_label(*l), *l == self.location))
                .collect(),
        }
    }
}

/// Run the interactive setup wizard.
///
/// # Returns
///
/// * `Ok(config)` - The user confirmed the last step
/// * `Err(WizardError::UserCancelled)` - The user pressed Esc or `q`
pub fn run_wizard() -> Result<StatuslineConfig> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = WizardState::new();
    let result = run_wizard_loop(&mut terminal, &mut state);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    match state.result {
        Some(config) => {
            info!(features = config.features.len(), "wizard completed");
            Ok(config)
        }
        None => {
            debug!(step = ?state.step, "wizard cancelled");
            Err(WizardError::UserCancelled)
        }
    }
}

fn run_wizard_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut WizardState,
) -> Result<()> {
    loop {
        terminal
            .draw(|f| draw_wizard(f, state))
            .map_err(|e| WizardError::RenderFailed(e.to_string()))?;

        if state.should_exit {
            break;
        }

        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            state.handle_key(key.code);
        }
    }

    Ok(())
}

fn draw_wizard(f: &mut Frame, state: &mut WizardState) {
    let size = f.area();
    f.render_widget(Clear, size);

    let box_width = size.width.min(64);
    let box_height = size.height.min(state.step.option_count() as u16 + 10);
    let centered = centered_rect(box_width, box_height, size);

    let outer_block = Block::default()
        .title(" cc-statusline setup ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(outer_block.clone(), centered);
    let inner = outer_block.inner(centered);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Question
            Constraint::Min(2),    // Options
            Constraint::Length(1), // Error
            Constraint::Length(1), // Help
        ])
        .split(inner);

    let title = Line::from(vec![
        Span::styled(
            format!("Step {} of {}  ", state.step.index() + 1, WizardStep::ALL.len()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            state.step.question(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(title), chunks[0]);

    draw_options(f, state, chunks[1]);

    if let Some(error) = state.error {
        let error = Paragraph::new(error)
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        f.render_widget(error, chunks[2]);
    }

    let help_text = match state.step {
        WizardStep::Features => "↑/↓: Navigate | Space: Toggle | Enter: Continue | q: Quit",
        _ => "↑/↓: Navigate | Enter: Select | ←: Back | q: Quit",
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[3]);
}

fn draw_options(f: &mut Frame, state: &mut WizardState, area: Rect) {
    let checklist = state.step == WizardStep::Features;
    let items: Vec<ListItem> = state
        .rows()
        .into_iter()
        .enumerate()
        .map(|(i, (label, marked))| {
            let marker = match (checklist, marked) {
                (true, true) => "[x]",
                (true, false) => "[ ]",
                (false, true) => "(*)",
                (false, false) => "( )",
            };
            let style = if i == state.cursor {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {marker} "), Style::default().fg(Color::Green)),
                Span::raw(label),
            ]))
            .style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::NONE));
    f.render_stateful_widget(list, area, &mut state.list_state);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;

    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Post-wizard summary of a configuration.
pub struct ConfigSummary<'a>(pub &'a StatuslineConfig);

impl fmt::Display for ConfigSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.0;
        let features: Vec<&str> = config.features.iter().map(|f| f.as_str()).collect();

        writeln!(f, "✅ Configuration Summary:")?;
        writeln!(f, "   Runtime: {}", config.runtime)?;
        writeln!(f, "   Theme: {}", config.theme)?;
        writeln!(f, "   Colors: {}", if config.colors { "✅" } else { "❌" })?;
        writeln!(f, "   Features: {}", features.join(", "))?;
        if config.ccusage_integration {
            writeln!(f, "   📊 ccusage integration enabled")?;
        }
        if config.logging {
            writeln!(f, "   📝 Debug logging enabled")?;
        }
        Ok(())
    }
}
