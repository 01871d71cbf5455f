mod commands;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use carbon_quest::config::{Config, DEFAULT_CONFIG_FILE};
use carbon_quest::storage::FileStore;
use carbon_quest::tracker::{
    self, format_countdown, newest_first, GateState, Session, Step, Submission, TrackerError,
};

/// carbon-quest - log your daily carbon savings, earn XP, finish quests
#[derive(Parser, Debug)]
#[command(name = "carbon-quest")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory holding saved progress (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive quiz (default)
    Play,
    /// Print level, XP, quests and cooldown
    Status,
    /// Print the daily log history, newest first
    History {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Skip the submission cooldown (demo/testing)
    NextDay,
}

enum GameState {
    TitleScreen,
    Quiz,
    Results,
}

enum MenuOption {
    Start,
    Quit,
}

impl MenuOption {
    fn next(&self) -> Self {
        match self {
            MenuOption::Start => MenuOption::Quit,
            MenuOption::Quit => MenuOption::Start,
        }
    }
}

struct App {
    session: Session<FileStore>,
    state: GameState,
    menu_selection: MenuOption,
    highlighted: usize,
    last_submission: Option<Submission>,
    message: String,
    message_style: Style,
    command_mode: bool,
    command_buffer: String,
}

impl App {
    fn new(session: Session<FileStore>) -> Self {
        App {
            session,
            state: GameState::TitleScreen,
            menu_selection: MenuOption::Start,
            highlighted: 0,
            last_submission: None,
            message: String::from("Answer honestly. Every kilogram counts."),
            message_style: Style::default().fg(Color::Yellow),
            command_mode: false,
            command_buffer: String::new(),
        }
    }

    fn start(&mut self) {
        if self.session.carbon_saved().is_some() {
            self.state = GameState::Results;
            self.message = "Today's log is done. [r] restart  [n] next day  [:q] quit".to_string();
        } else {
            self.state = GameState::Quiz;
            self.sync_highlight();
        }
    }

    fn sync_highlight(&mut self) {
        let question = self.session.current_question();
        self.highlighted = self
            .session
            .answers()
            .choice(question.name)
            .and_then(|label| question.options.iter().position(|o| o.label == label))
            .unwrap_or(0);
    }

    fn info(&mut self, text: impl Into<String>) {
        self.message = text.into();
        self.message_style = Style::default().fg(Color::Cyan);
    }

    fn report(&mut self, err: TrackerError) {
        self.message_style = match err {
            TrackerError::CooldownActive { .. } => Style::default().fg(Color::Magenta),
            _ => Style::default().fg(Color::Red),
        };
        self.message = err.to_string();
    }

    fn move_highlight(&mut self, up: bool) {
        let count = self.session.current_question().options.len();
        self.highlighted = if up {
            (self.highlighted + count - 1) % count
        } else {
            (self.highlighted + 1) % count
        };
    }

    fn select(&mut self, index: usize) {
        let question = self.session.current_question();
        let Some(option) = question.options.get(index) else {
            return;
        };
        let (dimension, label) = (question.name, option.label.clone());
        self.highlighted = index;
        match self.session.select_option(dimension, &label) {
            Ok(()) => {
                let hint = if self.session.aux_applies(self.session.current_question()) {
                    "  Use ←/→ (PgUp/PgDn for 10) to set the amount."
                } else {
                    ""
                };
                self.info(format!("Selected: {label}.{hint}"));
            }
            Err(err) => self.report(err),
        }
    }

    fn adjust_aux(&mut self, delta: f64) {
        let question = self.session.current_question();
        if !self.session.aux_applies(question) {
            return;
        }
        let dimension = question.name;
        let Some((min, max)) = self.session.aux_range(dimension) else {
            return;
        };
        let Some(aux) = question.aux.as_ref() else {
            return;
        };
        let value = (self.session.answers().aux(aux.kind) + delta).clamp(min, max);
        if let Err(err) = self.session.set_aux_value(dimension, value) {
            self.report(err);
        }
    }

    fn next(&mut self) {
        match self.session.go_next(Utc::now()) {
            Ok(Step::Moved(_)) => {
                self.sync_highlight();
                self.info("Next question.");
            }
            Ok(Step::Submitted(submission)) => {
                let mut text = format!(
                    "*** +{} XP ***  You saved {:.2} kg of CO₂ today!",
                    submission.xp_gained, submission.carbon_saved
                );
                if submission.leveled_up {
                    text.push_str(&format!(
                        "  LEVEL UP: {}!",
                        submission.level.current.label
                    ));
                }
                for quest in &submission.completed_quests {
                    text.push_str(&format!("  Quest complete: {}.", quest.description));
                }
                self.message = text;
                self.message_style = Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD);
                self.last_submission = Some(*submission);
                self.state = GameState::Results;
            }
            Err(err) => self.report(err),
        }
    }

    fn back(&mut self) {
        self.session.go_back();
        self.sync_highlight();
    }

    fn restart(&mut self) {
        self.session.restart();
        self.last_submission = None;
        self.state = GameState::Quiz;
        self.highlighted = 0;
        self.info("Quiz restarted.");
    }

    fn next_day(&mut self) {
        match self.session.advance_day() {
            Some(_) => self.info("Skipped ahead one day. The next log is unlocked."),
            None => self.info("Nothing to skip: no log has been submitted yet."),
        }
    }

    fn tick(&mut self, now: DateTime<Utc>) {
        if self.session.tick(now) {
            self.last_submission = None;
            self.highlighted = 0;
            if let GameState::Results = self.state {
                self.state = GameState::Quiz;
            }
            self.info("A new day has begun. Time for today's log!");
        }
    }

    /// Runs a `:` command. Returns false when the app should exit.
    fn run_command(&mut self, command: &str) -> bool {
        match command {
            "q" | "quit" => return false,
            "help" => self.info(
                "Commands: :q (quit), :restart, :next-day, :help  |  Keys: 1-9 pick, ↑/↓ + Space, Enter next, Backspace back",
            ),
            "restart" => self.restart(),
            "next-day" | "nextday" => self.next_day(),
            "" => {}
            other => {
                self.message = format!("Unknown command: {other}");
                self.message_style = Style::default().fg(Color::Red);
            }
        }
        true
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let interactive = matches!(cli.command, None | Some(Command::Play));
    init_tracing(&config, interactive)?;

    let catalog = config.catalog()?;
    let store = FileStore::open(&config.data_dir)
        .with_context(|| format!("failed to open data dir {}", config.data_dir.display()))?;
    let session = Session::open(catalog, store, config.session_settings());

    match cli.command {
        None | Some(Command::Play) => run_tui(App::new(session)),
        Some(Command::Status) => commands::status(&session, Utc::now()),
        Some(Command::History { limit }) => commands::history(&session, limit),
        Some(Command::NextDay) => commands::next_day(session),
    }
}

/// The TUI owns the terminal, so it logs to a file under the data dir.
fn init_tracing(config: &Config, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if to_file {
        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("failed to create {}", config.data_dir.display()))?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.log_path())
            .context("failed to open log file")?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
    Ok(())
}

fn run_tui(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        warn!(error = %err, "terminal loop failed");
    }
    info!(total_xp = app.session.total_xp(), "exiting");
    result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| draw_ui(f, app))?;

        // One second poll doubles as the countdown/auto-reset tick.
        if !event::poll(Duration::from_secs(1))? {
            app.tick(Utc::now());
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if let GameState::TitleScreen = app.state {
            match key.code {
                KeyCode::Up | KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('k') => {
                    app.menu_selection = app.menu_selection.next();
                }
                KeyCode::Enter => match app.menu_selection {
                    MenuOption::Start => app.start(),
                    MenuOption::Quit => return Ok(()),
                },
                KeyCode::Char('q') => return Ok(()),
                _ => {}
            }
            continue;
        }

        // Command mode handling (vim-style :q)
        if app.command_mode {
            match key.code {
                KeyCode::Esc => {
                    app.command_mode = false;
                    app.command_buffer.clear();
                }
                KeyCode::Enter => {
                    let command = std::mem::take(&mut app.command_buffer);
                    app.command_mode = false;
                    if !app.run_command(command.trim()) {
                        return Ok(());
                    }
                }
                KeyCode::Backspace => {
                    app.command_buffer.pop();
                    if app.command_buffer.is_empty() {
                        app.command_mode = false;
                    }
                }
                KeyCode::Char(c) => app.command_buffer.push(c),
                _ => {}
            }
            continue;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char(':'), _) => {
                app.command_mode = true;
                app.command_buffer.clear();
            }
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Ok(()),
            (KeyCode::Char('n'), _) => app.next_day(),
            (KeyCode::Esc, _) => app.info("Type :q to quit, :help for keys"),
            _ => match app.state {
                GameState::Quiz => handle_quiz_key(app, key.code),
                GameState::Results => {
                    if let KeyCode::Char('r') = key.code {
                        app.restart();
                    }
                }
                GameState::TitleScreen => {}
            },
        }
    }
}

fn handle_quiz_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Up | KeyCode::Char('k') => app.move_highlight(true),
        KeyCode::Down | KeyCode::Char('j') => app.move_highlight(false),
        KeyCode::Char(' ') => app.select(app.highlighted),
        KeyCode::Char(c @ '1'..='9') => app.select(c as usize - '1' as usize),
        KeyCode::Left => app.adjust_aux(-1.0),
        KeyCode::Right => app.adjust_aux(1.0),
        KeyCode::PageDown => app.adjust_aux(-10.0),
        KeyCode::PageUp => app.adjust_aux(10.0),
        KeyCode::Enter => app.next(),
        KeyCode::Backspace => app.back(),
        KeyCode::Char('r') => app.restart(),
        _ => {}
    }
}

fn draw_ui(f: &mut Frame, app: &App) {
    if matches!(app.state, GameState::TitleScreen) {
        draw_title_screen(f, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(5),
        ])
        .split(f.area());

    // Status bar
    let level = app.session.level();
    let now = Utc::now();
    let cooldown = match app.session.gate_state(now) {
        GateState::Eligible => Span::styled(" Ready to log ", Style::default().fg(Color::Green)),
        GateState::Cooling { remaining } => Span::styled(
            format!(" Next log in {} ", format_countdown(&remaining)),
            Style::default().fg(Color::Magenta),
        ),
    };
    let status = Line::from(vec![
        Span::styled(
            " CARBON QUEST ",
            Style::default().fg(Color::Black).bg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" Level {}: {} ", level.current.level, level.current.label),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" XP: {} ", app.session.total_xp()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  "),
        cooldown,
    ]);
    let status_block = Paragraph::new(status).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(status_block, chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(32), Constraint::Percentage(68)])
        .split(chunks[1]);

    draw_sidebar(f, app, main_chunks[0]);
    match app.state {
        GameState::Results => draw_results(f, app, main_chunks[1]),
        _ => draw_question(f, app, main_chunks[1]),
    }

    // Message area
    let (message, style, title) = if app.command_mode {
        (
            format!(":{}", app.command_buffer),
            Style::default().fg(Color::White).bg(Color::DarkGray),
            " Command ",
        )
    } else {
        (app.message.clone(), app.message_style, " Messages ")
    };
    let message = Paragraph::new(message)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .style(style);
    f.render_widget(message, chunks[2]);
}

fn draw_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let quests = app.session.quests();
    let mut constraints: Vec<Constraint> = quests.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Length(4));
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (quest, row) in quests.iter().zip(rows.iter()) {
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", quest.description)),
            )
            .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
            .ratio(quest.ratio())
            .label(format!("{} / {}", quest.progress.floor(), quest.target));
        f.render_widget(gauge, *row);
    }

    let level = app.session.level();
    let label = match &level.next {
        Some(_) => format!(
            "{}%  ({} / {} XP to next level)",
            level.progress.floor(),
            level.xp_into_level,
            level.xp_for_next
        ),
        None => "Max level reached".to_string(),
    };
    let level_gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Level {}: {} ", level.current.level, level.current.label)),
        )
        .gauge_style(Style::default().fg(Color::Yellow).bg(Color::Black))
        .ratio(level.progress / 100.0)
        .label(label);
    f.render_widget(level_gauge, rows[quests.len()]);

    let help = Paragraph::new(
        "1-9 / Space: pick\n↑/↓: move\n←/→: amount\nEnter: next/submit\nBackspace: back\nn: next day\n:q quit",
    )
    .block(Block::default().borders(Borders::ALL).title(" Keys "))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, rows[quests.len() + 1]);
}

fn draw_question(f: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let question = session.current_question();
    let chosen = session.answers().choice(question.name);

    let mut lines = vec![
        Line::from(Span::styled(
            question.prompt.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (i, option) in question.options.iter().enumerate() {
        let marker = if chosen == Some(option.label.as_str()) { "(•)" } else { "( )" };
        let style = if i == app.highlighted {
            Style::default().fg(Color::Black).bg(Color::Green)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!(" {} {} {} ", i + 1, marker, option.label),
            style,
        )));
    }

    if let (true, Some(aux)) = (session.aux_applies(question), question.aux.as_ref()) {
        let value = session.answers().aux(aux.kind);
        let max = session.aux_range(question.name).map_or(aux.max, |(_, max)| max);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{}: {} (max {})", aux.prompt, value, max),
            Style::default().fg(Color::Cyan),
        )));
    }

    let nav = if session.is_last_question() { "Enter: Submit" } else { "Enter: Next →" };
    let title = format!(
        " Question {}/{}  [{}] ",
        session.current_index() + 1,
        session.catalog().questions.len(),
        nav
    );
    let panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(panel, area);
}

fn draw_results(f: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let saved = session.carbon_saved().unwrap_or(0.0);
    let trees = tracker::impact::tree_equivalent(saved);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(12),
            Constraint::Min(4),
        ])
        .split(area);

    let summary = vec![
        Line::from(Span::styled(
            format!("You saved {saved:.2} kg of CO₂ today!"),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Level: {}", session.level().current.label)),
        Line::from(format!(
            "It would take approximately {} tree{} absorbing CO₂ for one day to match this!",
            trees,
            if trees == 1 { "" } else { "s" }
        )),
    ];
    let summary = Paragraph::new(summary)
        .block(Block::default().borders(Borders::ALL).title(" Today "))
        .wrap(Wrap { trim: true });
    f.render_widget(summary, rows[0]);

    let breakdown = app
        .last_submission
        .as_ref()
        .map(|s| s.breakdown.clone())
        .unwrap_or_else(|| session.breakdown());
    let bars: Vec<Bar> = breakdown
        .iter()
        .map(|(dimension, kg)| {
            Bar::default()
                .value((kg * 100.0).round() as u64)
                .text_value(format!("{kg:.2}"))
                .label(Line::from(dimension.title()))
        })
        .collect();
    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Carbon Savings Breakdown (kg) "),
        )
        .bar_width(10)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(Style::default().fg(Color::Black).bg(Color::Green))
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, rows[1]);

    let logs: Vec<Line> = newest_first(session.daily_logs())
        .map(|log| {
            Line::from(format!(
                "{}  saved {:.2} kg CO₂  |  Level: {} (XP: {})",
                log.date.format("%a %b %d %Y %H:%M"),
                log.carbon_saved,
                log.level_at_time.label,
                log.total_xp_after
            ))
        })
        .collect();
    let history = Paragraph::new(logs)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Your Daily Logs  [r: Restart | n: Next Day] "),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(history, rows[2]);
}

fn draw_title_screen(f: &mut Frame, app: &App) {
    let area = f.area();

    let title_art = r#"
    ╔═══════════════════════════════════════════════════════════╗
    ║                                                           ║
    ║                  C A R B O N   Q U E S T                  ║
    ║                                                           ║
    ║           Log your day. Save CO₂. Level up.               ║
    ║                                                           ║
    ╚═══════════════════════════════════════════════════════════╝
"#;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(area);

    let title = Paragraph::new(title_art)
        .style(Style::default().fg(Color::Green))
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let selected = Style::default()
        .fg(Color::Black)
        .bg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let start_style = if matches!(app.menu_selection, MenuOption::Start) {
        selected
    } else {
        Style::default().fg(Color::White)
    };
    let start_label = if app.session.carbon_saved().is_some() {
        "  VIEW TODAY'S LOG  "
    } else {
        "  START TODAY'S LOG  "
    };
    let start = Paragraph::new(start_label)
        .style(start_style)
        .alignment(Alignment::Center);
    f.render_widget(start, chunks[1]);

    let quit_style = if matches!(app.menu_selection, MenuOption::Quit) {
        selected
    } else {
        Style::default().fg(Color::White)
    };
    let quit = Paragraph::new("  QUIT  ")
        .style(quit_style)
        .alignment(Alignment::Center);
    f.render_widget(quit, chunks[2]);

    let level = app.session.level();
    let summary = Paragraph::new(format!(
        "Level {} {}  •  {} XP  •  {} days logged",
        level.current.level,
        level.current.label,
        app.session.total_xp(),
        app.session.daily_logs().len()
    ))
    .style(Style::default().fg(Color::Yellow))
    .alignment(Alignment::Center);
    f.render_widget(summary, chunks[3]);

    let help = Paragraph::new("↑/↓ to select  •  ENTER to confirm  •  q to quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[4]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbon_quest::catalog::{default_catalog, Dimension};
    use carbon_quest::tracker::SessionSettings;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 18, 0, 0).unwrap()
    }

    /// An app whose session finished a quiz at `t0`.
    fn finished_app(dir: &TempDir) -> App {
        let store = FileStore::open(dir.path()).unwrap();
        let mut session =
            Session::open(default_catalog().unwrap(), store, SessionSettings::default());
        for (dimension, label) in [
            (Dimension::Transport, "Didn't go anywhere"),
            (Dimension::Vegetarian, "No"),
            (Dimension::EWaste, "No"),
            (Dimension::Energy, "Yes"),
            (Dimension::Plastic, "No"),
        ] {
            session.select_option(dimension, label).unwrap();
            session.go_next(t0()).unwrap();
        }
        assert!(session.carbon_saved().is_some());
        App::new(session)
    }

    #[test]
    fn new_day_on_title_screen_keeps_the_menu() {
        let dir = TempDir::new().unwrap();
        let mut app = finished_app(&dir);

        app.tick(t0() + chrono::Duration::hours(25));
        assert!(matches!(app.state, GameState::TitleScreen));
        assert_eq!(app.session.carbon_saved(), None);
    }

    #[test]
    fn new_day_on_results_returns_to_quiz() {
        let dir = TempDir::new().unwrap();
        let mut app = finished_app(&dir);
        app.start();
        assert!(matches!(app.state, GameState::Results));

        app.tick(t0() + chrono::Duration::hours(1));
        assert!(matches!(app.state, GameState::Results));

        app.tick(t0() + chrono::Duration::hours(25));
        assert!(matches!(app.state, GameState::Quiz));
        assert_eq!(app.session.current_index(), 0);
    }
}
