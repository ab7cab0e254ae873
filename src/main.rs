use anyhow::{anyhow, bail, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::DefaultTerminal;
use std::time::Duration;
use tracing::{error, info};
use tui_geoip::app::App;
use tui_geoip::cli::Cli;
use tui_geoip::{data, logging, lookup, ui};

fn main() -> Result<()> {
    let cli = Cli::parse_or_exit();
    logging::init(cli.log_file.as_deref())?;

    // The lookup happens before the terminal is taken over, so a failure
    // is reported on a normal screen
    let record = match &cli.record {
        Some(path) => lookup::from_file(path),
        None => lookup::fetch(&cli.endpoint, cli.ip, cli.timeout()),
    }
    .inspect_err(|e| error!(error = %e, "lookup failed"))?;

    let shapes = match &cli.shapes {
        Some(path) => data::load_geojson_shapes(path)?,
        None => data::world_shapes(),
    };

    let mut app = App::new(shapes, record);
    if !app.renderer.has_data() {
        bail!("no drawable shapes to render");
    }

    if cli.print {
        return print_once(&mut app);
    }

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Run the app
    let result = run(&mut terminal, &mut app);

    // Restore terminal
    ratatui::restore();

    result
}

/// Render both panes synchronously and write them to stdout
fn print_once(app: &mut App) -> Result<()> {
    let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
    let (cols, rows) = ui::map_extent(Rect::new(0, 0, width, height));

    for handle in app.start(cols, rows) {
        handle
            .join()
            .map_err(|_| anyhow!("render pass panicked"))?;
    }

    print!("{}", ui::render_plain(&app.snapshot()));
    Ok(())
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    let size = terminal.size()?;
    let (cols, rows) = ui::map_extent(Rect::new(0, 0, size.width, size.height));
    info!(cols, rows, "starting render passes");
    app.start(cols, rows);

    // Main loop
    loop {
        // Copy under the lock, draw without it
        let surface = app.snapshot();
        terminal.draw(|frame| ui::render(frame, &surface))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                                app.quit()
                            }
                            _ => {}
                        }
                    }
                }
                Event::Resize(width, height) => {
                    let (cols, rows) = ui::map_extent(Rect::new(0, 0, width, height));
                    app.resize(cols, rows);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
