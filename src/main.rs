use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use folio::app::App;
use folio::protocol::DEFAULT_TITLE;
use folio::store::{self, TextEncoding};
use folio::sync::HttpRemote;

#[derive(Parser)]
#[command(name = "folio", version, about = "A terminal word processor with virtual pages")]
struct Cli {
    /// File to import into a standalone session
    file: Option<PathBuf>,

    /// Sync against a folio-serve instance, e.g. http://127.0.0.1:3000
    #[arg(short, long, conflicts_with = "file")]
    remote: Option<String>,

    /// Encoding used to import and export files
    #[arg(short, long, default_value = "utf-8")]
    encoding: TextEncoding,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let app = match cli.remote {
        Some(url) => App::networked(Arc::new(HttpRemote::new(url))),
        None => {
            let (title, content) = match cli.file {
                Some(path) => {
                    let content = match store::read_to_string(&path, cli.encoding) {
                        Ok(content) => content,
                        Err(err) => {
                            eprintln!("Error: {}", err);
                            std::process::exit(1);
                        }
                    };
                    (store::title_from_path(&path), content)
                }
                None => (DEFAULT_TITLE.to_string(), String::new()),
            };
            App::standalone(title, content, cli.encoding)
        }
    };

    run_editor(app)
}

/// Sets up the terminal, runs the TUI editor, and restores the terminal on exit.
fn run_editor(app: App<'static>) -> io::Result<()> {
    // Setup panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app
    let result = run_app(&mut terminal, app);

    // Restore terminal
    restore_terminal()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> io::Result<()> {
    loop {
        app.render_frame(terminal)?;

        // Block up to 100ms waiting for the first event (prevents busy-loop,
        // gives tick() a chance to run ~10x/sec for poll and timer expiry).
        if event::poll(Duration::from_millis(100))? {
            // Drain all queued events without blocking, then render immediately.
            loop {
                let ev = event::read()?;
                app.handle_event(ev);
                if app.should_quit {
                    break;
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // A save acknowledged with "Saving..." must not be abandoned mid-flight.
    if app.sync_in_flight() {
        app.settle_sync();
    }

    Ok(())
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    Ok(())
}
