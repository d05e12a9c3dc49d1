use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Handle;

use floodwatch::api::{FixtureApi, FloodApi, HttpApi};
use floodwatch::config::{Settings, Variant};
use floodwatch::render::{DisplayOptions, DisplayZone};
use floodwatch::ui::Theme;
use floodwatch::{events, export, logging, ui, App};

#[derive(Parser, Debug)]
#[command(name = "floodwatch")]
#[command(about = "Terminal dashboard for river-level monitoring stations")]
struct Args {
    /// Backend base URL (e.g. http://127.0.0.1:8000)
    #[arg(short, long, conflicts_with = "fixtures")]
    api: Option<String>,

    /// Serve stations and readings from a fixture directory instead of HTTP
    #[arg(short, long)]
    fixtures: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Display preset
    #[arg(long, value_enum)]
    variant: Option<Variant>,

    /// Decimal places for reading values
    #[arg(long)]
    precision: Option<usize>,

    /// Timezone for displayed timestamps
    #[arg(long, value_enum)]
    timezone: Option<DisplayZone>,

    /// Station reference to select once the catalog has loaded
    #[arg(short, long)]
    station: Option<String>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Export the station's chart and table to a JSON file and exit
    #[arg(short, long, requires = "station")]
    export: Option<PathBuf>,
}

impl Args {
    /// Command-line flags override file and environment settings.
    fn apply(&self, settings: &mut Settings) {
        if let Some(ref api) = self.api {
            settings.api.base_url = api.clone();
            settings.api.fixtures = None;
        }
        if let Some(ref fixtures) = self.fixtures {
            settings.api.fixtures = Some(fixtures.clone());
        }
        if let Some(variant) = self.variant {
            settings.variant = variant;
        }
        if let Some(precision) = self.precision {
            settings.display.precision = Some(precision);
        }
        if let Some(timezone) = self.timezone {
            settings.display.timezone = timezone;
        }
        if let Some(ref log_file) = self.log_file {
            settings.logging.file = Some(log_file.clone());
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);
    settings.validate()?;

    logging::init(&settings.logging)?;

    let options = settings.display_options()?;
    let api = build_api(&settings)?;
    tracing::info!(backend = api.description(), variant = ?settings.variant, "Starting");

    let rt = tokio::runtime::Runtime::new()?;

    // Handle export mode (non-interactive)
    if let (Some(export_path), Some(station)) = (&args.export, &args.station) {
        let document = rt.block_on(export::export_station(api.as_ref(), station, options))?;
        export::write_export(export_path, &document)?;
        println!("Exported {} to: {}", station, export_path.display());
        return Ok(());
    }

    run_tui(api, rt.handle().clone(), options, args.station)
}

/// Pick the backend: a fixture directory if configured, HTTP otherwise.
fn build_api(settings: &Settings) -> Result<Arc<dyn FloodApi>> {
    if let Some(ref dir) = settings.api.fixtures {
        anyhow::ensure!(dir.is_dir(), "Fixture directory not found: {}", dir.display());
        return Ok(Arc::new(FixtureApi::new(dir)));
    }

    let api = HttpApi::builder()
        .endpoint(settings.api.base_url.clone())
        .timeout(settings.request_timeout()?)
        .build()
        .with_context(|| format!("Invalid api.base_url: {}", settings.api.base_url))?;
    Ok(Arc::new(api))
}

/// Run the TUI against the given backend
fn run_tui(
    api: Arc<dyn FloodApi>,
    runtime: Handle,
    options: DisplayOptions,
    preselect: Option<String>,
) -> Result<()> {
    // Detect before raw mode; the query reads the terminal's reply
    let theme = Theme::auto_detect();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let mut app = App::new(api, runtime, options).with_theme(theme).with_preselect(preselect);
    app.load_stations();

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 70;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        app.poll_pipeline();
        app.tick();

        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let top = (area.height / 2).saturating_sub(2);
                let centered = ratatui::layout::Rect::new(0, top, area.width, 5.min(area.height));
                frame.render_widget(paragraph, centered);
                return;
            }

            ui::render(frame, app, area);
        })?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                _ => {}
            }
        }
    }

    Ok(())
}
