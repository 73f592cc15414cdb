use crossterm::event;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::event::Event as TermEvent;
use crossterm::execute;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::Backend;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use time::UtcOffset;

use btcchart::app::App;
use btcchart::coingecko::CoingeckoService;
use btcchart::coingecko::PriceSource;
use btcchart::config::Config;
use btcchart::input;
use btcchart::input::Command;
use btcchart::range::Range;
use btcchart::state::Readout;
use btcchart::ui;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Time to wait for terminal input before redrawing
const UI_POLL_MS: u64 = 50;

fn main() -> Result<(), &'static str> {
    // Must be resolved while the process is still single-threaded
    let local_offset = UtcOffset::current_local_offset();

    let config = Config::from_env().map_err(|e| {
        eprintln!("{e}");
        "invalid configuration"
    })?;

    // Configure tracing subscriber, terminal is reserved for the chart
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .map_err(|_| "could not open log file")?;
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .with_env_filter(config.log_filter.as_str())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|_| "could not set tracing subscriber")?;

    tracing::info!("starting btcchart v{VERSION}");
    tracing::debug!("{config:?}");

    let offset = match local_offset {
        Ok(offset) => offset,
        Err(e) => {
            tracing::warn!("could not determine local time offset ({e}), using UTC");
            UtcOffset::UTC
        }
    };

    let service = CoingeckoService::new(&config.api_url, offset, config.timeout).map_err(|e| {
        tracing::error!("{e}");
        "could not create http client"
    })?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|_| "could not start async runtime")?;

    // Fetches are spawned from the UI thread onto the runtime's workers
    let _guard = runtime.enter();
    let app = App::new(service, config.initial_range);
    run(app, config.initial_range, offset).map_err(|e| {
        tracing::error!("terminal error: {e}");
        "terminal error"
    })?;

    tracing::info!("exiting");
    Ok(())
}

fn run<S: PriceSource>(app: App<S>, range: Range, offset: UtcOffset) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = event_loop(&mut terminal, app, range, offset);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    res
}

/// Draws and handles input until asked to quit.
///
/// Fetches run on the runtime's worker threads while this loop blocks on
/// terminal input.
fn event_loop<B: Backend, S: PriceSource>(
    terminal: &mut Terminal<B>,
    mut app: App<S>,
    range: Range,
    offset: UtcOffset,
) -> io::Result<()> {
    app.select(range);
    let mut area = Rect::default();
    loop {
        app.drain();
        terminal.draw(|f| {
            area = f.area();
            ui::draw(f, app.state(), offset);
        })?;

        if !event::poll(Duration::from_millis(UI_POLL_MS))? {
            continue;
        }
        let command = match event::read()? {
            TermEvent::Key(key) => input::command(key),
            TermEvent::Mouse(mouse) => {
                let target = ui::hit(area, app.state(), offset, mouse.column, mouse.row);
                let hovering = app.state().readout != Readout::Idle;
                input::pointer(target, mouse.kind, hovering)
            }
            _ => None,
        };
        match command {
            Some(Command::Quit) => return Ok(()),
            Some(Command::Select(range)) => app.select(range),
            Some(Command::NextRange) => app.select(app.state().range.next()),
            Some(Command::PreviousRange) => app.select(app.state().range.previous()),
            Some(Command::Step(forward)) => app.step(forward),
            Some(Command::Reload) => app.reload(),
            Some(Command::Hover(index)) => app.hover(index),
            Some(Command::Leave) => app.leave(),
            None => (),
        }
    }
}
