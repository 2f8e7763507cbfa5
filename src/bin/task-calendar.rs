//! A terminal calendar for the tasks of a `/tasks` server.
//!
//! ```bash
//! # Against the default server (http://localhost:8080, or $TASK_CALENDAR_URL)
//! cargo run
//!
//! # Without any server, with a few demo tasks
//! cargo run -- --offline
//!
//! # Just print a month and exit
//! cargo run -- --month 6 --year 2025 --print
//! ```
//!
//! Set the RUST_LOG environment variable to choose what is written to the log file.

use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use task_calendar::App;
use task_calendar::NewTask;
use task_calendar::calendar::{DayMatch, MonthYear};
use task_calendar::client::Client;
use task_calendar::config::{DEFAULT_MONTH, DEFAULT_YEAR};
use task_calendar::memory_source::MemorySource;
use task_calendar::traits::TaskSource;
use task_calendar::ui::{self, UiState};
use task_calendar::view::CalendarView;

/// How long the UI waits for a key press before checking network results again
const POLL_TIMEOUT: Duration = Duration::from_millis(100);


/// Month-grid calendar for the tasks of a REST server
#[derive(Debug, Parser)]
#[command(name = "task-calendar", version, about)]
struct Args {
    /// Base URL of the server (defaults to $TASK_CALENDAR_URL, or http://localhost:8080)
    #[arg(long)]
    url: Option<String>,

    /// Month to display first (1-12)
    #[arg(long, default_value_t = DEFAULT_MONTH)]
    month: u32,

    /// Year to display first
    #[arg(long, default_value_t = DEFAULT_YEAR, allow_negative_numbers = true)]
    year: i32,

    /// Use an in-memory task list instead of a server
    #[arg(long)]
    offline: bool,

    /// Print the month as text and exit, instead of starting the interactive calendar
    #[arg(long)]
    print: bool,

    /// Only show tasks under a day when their whole due date matches (not only the day of the month)
    #[arg(long)]
    exact_dates: bool,

    /// File the logs are written to while the interactive calendar runs
    #[arg(long, default_value = "task-calendar.log")]
    log_file: PathBuf,
}


#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let args = Args::parse();

    if args.print {
        env_logger::init();
    } else {
        init_file_logging(&args.log_file)?;
    }

    let period = MonthYear::new(args.month, args.year)?;
    let mut view = CalendarView::new(period);
    if args.exact_dates {
        view.set_day_match(DayMatch::ExactDate);
    }

    if args.offline {
        log::info!("Running offline, with demo tasks");
        let source = demo_source(period)?;
        run(App::new(source, view), args.print).await
    } else {
        let client = match &args.url {
            Some(url) => Client::new(url)?,
            None => Client::from_config()?,
        };
        log::info!("Using tasks from {}", client.tasks_url());
        run(App::new(client, view), args.print).await
    }
}

fn init_file_logging(path: &Path) -> Result<(), Box<dyn Error + Send + Sync>> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| format!("Unable to open log file {:?}: {}", path, err))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// A few tasks in the displayed month, so that the offline mode shows something
fn demo_source(period: MonthYear) -> Result<MemorySource, Box<dyn Error + Send + Sync>> {
    let source = MemorySource::new();
    let demo = [
        (3, "Water the plants", "balcony and kitchen"),
        (12, "Dentist", "10am"),
        (12, "Call mum", ""),
        (25, "Pay rent", "before noon"),
    ];
    for (day, title, description) in demo.iter() {
        if let Some(date) = period.date(*day) {
            source.insert(NewTask::new(title.to_string(), description.to_string(), date))?;
        }
    }
    Ok(source)
}

async fn run<S>(mut app: App<S>, print_only: bool) -> Result<(), Box<dyn Error + Send + Sync>>
where
    S: TaskSource + 'static,
{
    app.refresh();

    if print_only {
        app.settle().await;
        task_calendar::utils::print_month(app.view());
        return Ok(());
    }

    let guard = TerminalGuard::enter(io::stdout())?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = event_loop(&mut terminal, &mut app);
    drop(guard);

    log::info!("Exiting");
    result.map_err(|err| err.into())
}

/// Raw mode and the alternate screen, for as long as this lives.
///
/// The terminal is restored on drop, so that a panic in the event loop does not leave it unusable
struct TerminalGuard<W: Write> {
    out: W,
}

impl<W: Write> TerminalGuard<W> {
    fn enter(out: W) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut guard = Self { out };
        execute!(guard.out, EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if let Err(err) = disable_raw_mode() {
            log::warn!("Unable to disable raw mode: {}", err);
        }
        if let Err(err) = execute!(self.out, LeaveAlternateScreen, cursor::Show) {
            log::warn!("Unable to leave the alternate screen: {}", err);
        }
    }
}

fn event_loop<S>(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App<S>) -> io::Result<()>
where
    S: TaskSource + 'static,
{
    let mut state = UiState::default();

    loop {
        app.drain_events();
        terminal.draw(|frame| ui::draw(frame, app, &state))?;

        if event::poll(POLL_TIMEOUT)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    ui::handle_key(app, &mut state, key);
                }
            }
        }

        if state.should_quit {
            return Ok(());
        }
    }
}
