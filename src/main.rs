use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use quizr::app::App;
use quizr::config::Config;
use quizr::event::{AppEvent, EventHandler};
use quizr::quiz::action::Action;
use quizr::quiz::machine::QuizMachine;
use quizr::quiz::question::DifficultyFilter;
use quizr::quiz::state::Status;
use quizr::replay;
use quizr::source::{self, FileSource, HttpSource, QuestionSource};
use quizr::store::json_store::JsonStore;
use quizr::store::{HighScoreStore, MemoryStore};
use quizr::ui::components::finish_screen::FinishScreen;
use quizr::ui::components::progress_bar::ProgressBar;
use quizr::ui::components::question_view::QuestionView;
use quizr::ui::components::start_screen::StartScreen;
use quizr::ui::components::timer::Timer;
use quizr::ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use quizr::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "quizr", version, about = "Terminal trivia quiz with a countdown timer")]
struct Cli {
    #[arg(short, long, help = "Question server URL")]
    url: Option<String>,

    #[arg(short, long, help = "Load questions from a local JSON file instead of the server")]
    file: Option<PathBuf>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Starting difficulty (all, easy, medium, hard)")]
    difficulty: Option<String>,

    #[arg(short, long, help = "Seconds allowed per question")]
    seconds: Option<u32>,

    #[arg(short, long, help = "Write debug output to the log file")]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a file of JSON actions (one per line) and print the final state
    Replay {
        actions: PathBuf,
        #[arg(long, help = "Skip the question fetch; the script loads its own questions")]
        no_fetch: bool,
        #[arg(long, help = "Write a new high score to the real store")]
        persist: bool,
    },
    /// Write the default config file if there is none and print its path
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Logging disabled: {e:#}");
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "unreadable config, using defaults");
        Config::default()
    });
    if let Some(url) = cli.url {
        config.questions_url = url;
    }
    if let Some(file) = cli.file {
        config.questions_file = Some(file);
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(seconds) = cli.seconds {
        config.seconds_per_question = seconds;
    }
    config.validate();

    match cli.command {
        Some(Command::Replay {
            actions,
            no_fetch,
            persist,
        }) => run_replay(&config, &actions, no_fetch, persist),
        Some(Command::InitConfig) => init_config(&config),
        None => run_tui(config),
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quizr");
    fs::create_dir_all(&dir)?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("quizr.log"))?;

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("quizr={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

fn build_source(config: &Config) -> Box<dyn QuestionSource + Send> {
    match config.questions_file {
        Some(ref path) => Box::new(FileSource::new(path.clone())),
        None => Box::new(HttpSource::new(
            &config.questions_url,
            config.fetch_timeout_secs.map(Duration::from_secs),
        )),
    }
}

fn open_store() -> Box<dyn HighScoreStore> {
    match JsonStore::new() {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!(error = %e, "data directory unavailable, high score will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

fn init_config(config: &Config) -> Result<()> {
    let path = Config::config_path();
    if path.exists() {
        println!("{} (already exists)", path.display());
    } else {
        config.save()?;
        println!("{}", path.display());
    }
    Ok(())
}

fn run_replay(config: &Config, actions: &Path, no_fetch: bool, persist: bool) -> Result<()> {
    let script = fs::read_to_string(actions)
        .with_context(|| format!("could not read {}", actions.display()))?;

    let real = open_store();
    let store: Box<dyn HighScoreStore> = if persist {
        real
    } else {
        Box::new(MemoryStore::with_high_score(real.load()))
    };
    let mut machine = QuizMachine::new(store, config.seconds_per_question);

    if !no_fetch {
        let source = build_source(config);
        machine.dispatch(source::load_action(source.as_ref()));
        let filter = config.difficulty_filter();
        if filter != DifficultyFilter::All {
            machine.dispatch(Action::SetDifficulty(filter));
        }
    }

    replay::run_script(&mut machine, &script)
        .with_context(|| format!("replay of {} aborted", actions.display()))?;

    println!("{}", serde_json::to_string_pretty(machine.state())?);
    Ok(())
}

fn run_tui(config: Config) -> Result<()> {
    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(
            theme = %config.theme,
            available = ?Theme::available_themes(),
            "unknown theme, using default"
        );
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let source = build_source(&config);
    let source_label = source.describe();
    let mut app = App::new(config, open_store(), theme, source_label);
    info!(source = %app.source_label, "starting quiz");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_secs(1));
    source::spawn_loader(source, events.sender());

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Loaded(action) => app.questions_arrived(action),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.state().status {
        Status::Loading | Status::Error => handle_waiting_key(app, key),
        Status::Ready => handle_ready_key(app, key),
        Status::Active => handle_active_key(app, key),
        Status::Finished => handle_finished_key(app, key),
    }
}

fn handle_waiting_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
        app.should_quit = true;
    }
}

fn handle_ready_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('s') => app.start(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => app.cycle_difficulty(false),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => app.cycle_difficulty(true),
        _ => {}
    }
}

fn handle_active_key(app: &mut App, key: KeyEvent) {
    let answered = app.state().has_answered();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char(ch @ '1'..='4') if !answered => {
            let choice = ch as usize - '1' as usize;
            app.submit(choice);
        }
        KeyCode::Up | KeyCode::Char('k') if !answered => app.select_prev_option(),
        KeyCode::Down | KeyCode::Char('j') if !answered => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if answered {
                app.next_or_finish();
            } else {
                app.submit_selected();
            }
        }
        KeyCode::Right | KeyCode::Char('n') => app.next_or_finish(),
        _ => {}
    }
}

fn handle_finished_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => app.restart(),
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);
    render_header(frame, app, layout.header);

    match app.state().status {
        Status::Loading => render_message(
            frame,
            app,
            layout.main,
            "Loading questions...",
            &format!("from {}", app.source_label),
            false,
        ),
        Status::Error => render_message(
            frame,
            app,
            layout.main,
            "There was an error fetching questions.",
            &format!("Check {} and start again.", app.source_label),
            true,
        ),
        Status::Ready => {
            let centered = centered_rect(60, 70, layout.main);
            frame.render_widget(StartScreen::new(app.state(), app.theme), centered);
        }
        Status::Active => render_active(frame, app, layout.main),
        Status::Finished => {
            let centered = centered_rect(60, 70, layout.main);
            frame.render_widget(FinishScreen::new(app.state(), app.theme), centered);
        }
    }

    let hints: &[&str] = match app.state().status {
        Status::Loading | Status::Error => &["[q] Quit"],
        Status::Ready => &["[Enter] Start", "[\u{2190}/\u{2192}] Difficulty", "[q] Quit"],
        Status::Active if app.state().has_answered() => {
            if app.state().is_last_question() {
                &["[Enter] Finish", "[q] Quit"]
            } else {
                &["[Enter] Next question", "[q] Quit"]
            }
        }
        Status::Active => &["[1-4] Answer", "[\u{2191}/\u{2193}] Move", "[Enter] Choose", "[q] Quit"],
        Status::Finished => &["[r] Restart", "[q] Quit"],
    };
    let footer_lines: Vec<Line> = pack_hint_lines(hints, layout.footer.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_muted()))))
        .collect();
    frame.render_widget(Paragraph::new(footer_lines), layout.footer);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let state = app.state();
    let info = format!(
        " {} questions | {} | High score {}",
        state.num_questions(),
        state.difficulty_filter,
        state.high_score
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " quizr ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default().fg(colors.text_muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_message(
    frame: &mut ratatui::Frame,
    app: &App,
    area: Rect,
    title: &str,
    detail: &str,
    is_error: bool,
) {
    let colors = &app.theme.colors;
    let centered = centered_rect(50, 30, area);
    let color = if is_error { colors.error() } else { colors.accent() };

    let block = Block::bordered()
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(colors.bg()));
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(detail, Style::default().fg(colors.text_muted()))),
    ];
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, centered);
}

fn render_active(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let state = app.state();
    let Some(question) = state.current_question() else {
        return;
    };

    let main = centered_rect(80, 90, area);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(1),
        ])
        .split(main);

    let num = state.num_questions();
    let answered = usize::from(state.has_answered());
    let ratio = if num == 0 {
        0.0
    } else {
        (state.current_index + answered) as f64 / num as f64
    };
    let caption = format!(
        "Question {}/{}  \u{00b7}  {}/{} points",
        state.current_index + 1,
        num,
        state.score,
        state.max_possible_points()
    );
    frame.render_widget(
        ProgressBar::new("Progress", ratio, app.theme).caption(caption),
        layout[0],
    );

    frame.render_widget(
        QuestionView::new(question, app.option_cursor, state.current_answer, app.theme),
        layout[1],
    );

    frame.render_widget(Timer::new(state.seconds_remaining, app.theme), layout[2]);
}
