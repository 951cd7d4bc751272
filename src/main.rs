mod app;
mod braille;
mod config;
mod error;
mod export;
mod field;
mod noise;
mod palette;
mod particle;
mod render;
mod rng;
mod simulation;
mod ui;

use app::App;
use clap::Parser;
use config::{ArtConfig, MAX_FRAMES_PER_TICK};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use export::ExportOptions;
use palette::Palette;
use ratatui::{backend::CrosstermBackend, Terminal};
use simulation::clamp_complexity;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "flowfield-art")]
#[command(about = "Seeded flow-field generative art in the terminal")]
struct Args {
    // === Generation Inputs ===
    /// Seed text; identical seeds draw identical art (empty = "default")
    #[arg(short = 's', long)]
    seed: Option<String>,

    /// Color scheme (cosmic, ocean, sunset, forest, fire, neon, monochrome, pastel)
    #[arg(short = 'c', long)]
    scheme: Option<String>,

    /// Complexity level, 100 particles per level (clamped to 1-10)
    #[arg(short = 'x', long, allow_negative_numbers = true)]
    complexity: Option<i64>,

    // === Viewer Parameters ===
    /// Simulated frames per rendered tick (1-20)
    #[arg(long)]
    speed: Option<usize>,

    /// Trail fade alpha painted each frame (0-255)
    #[arg(long)]
    fade: Option<u8>,

    // === Export ===
    /// Render headlessly to a file (.png, .gif, .svg or .json) and exit
    #[arg(short = 'o', long)]
    export: Option<PathBuf>,

    /// Frames to simulate for an export
    #[arg(short = 'f', long, default_value = "300")]
    frames: usize,

    /// Simulated frames per captured GIF frame
    #[arg(long = "gif-step", default_value = "5")]
    gif_step: usize,

    // === Configuration ===
    /// Load settings from a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings to a JSON config file and exit
    #[arg(long = "save-config")]
    save_config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

/// Defaults, then the config file, then CLI flags
fn resolve_config(args: &Args) -> Result<ArtConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ArtConfig::load_from_file(path)?,
        None => ArtConfig::load_default().unwrap_or_default(),
    };

    if let Some(seed) = &args.seed {
        config.seed = seed.clone();
    }
    if let Some(scheme) = &args.scheme {
        config.scheme = Palette::resolve(scheme);
    }
    if let Some(level) = args.complexity {
        config.complexity = clamp_complexity(level);
    }
    if let Some(speed) = args.speed {
        config.frames_per_tick = speed.clamp(1, MAX_FRAMES_PER_TICK);
    }
    if let Some(fade) = args.fade {
        config.fade = fade;
    }

    Ok(config.normalized())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let headless = args.export.is_some() || args.save_config.is_some();

    // The viewer owns the terminal, so only headless runs log to stderr
    if headless {
        init_logging(args.verbose);
    }

    let config = resolve_config(&args)?;

    if let Some(path) = &args.save_config {
        config.save_to_file(path)?;
        println!("Saved config to {}", path.display());
        return Ok(());
    }

    if let Some(path) = &args.export {
        let options = ExportOptions {
            frames: args.frames,
            gif_step: args.gif_step,
            fade: config.fade,
        };
        let summary = export::export(&config.params(), path, &options)?;
        println!(
            "Wrote {} ({} frames, {} segments) to {}",
            summary.format.name(),
            summary.frames,
            summary.segments,
            path.display()
        );
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout
        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                // Only process Press events
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Handle Ctrl+C
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // === Seed editor captures typing ===
                if app.is_editing_seed() {
                    match key.code {
                        KeyCode::Enter => app.commit_seed_edit(),
                        KeyCode::Esc => app.cancel_seed_edit(),
                        KeyCode::Backspace => app.pop_seed_char(),
                        KeyCode::Char(c) => app.push_seed_char(c),
                        _ => {}
                    }
                    continue;
                }

                // === Process normal key events ===
                match key.code {
                    // System controls
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                    KeyCode::Char(' ') => app.toggle_pause(),
                    KeyCode::Char('r') | KeyCode::Char('R') => app.randomize_seed(),
                    KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter => app.begin_seed_edit(),
                    KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
                    KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => app.toggle_help(),
                    KeyCode::Char('p') | KeyCode::Char('P') => app.save_snapshot(),
                    KeyCode::Char('o') | KeyCode::Char('O') => app.save_config(),
                    KeyCode::Char('c') => {
                        app.cycle_scheme();
                        app.focus = app::Focus::Scheme;
                    }
                    KeyCode::Char('C') => {
                        app.cycle_scheme_prev();
                        app.focus = app::Focus::Scheme;
                    }
                    KeyCode::Char('+') | KeyCode::Char('=') => {
                        app.adjust_complexity(1);
                        app.focus = app::Focus::Complexity;
                    }
                    KeyCode::Char('-') | KeyCode::Char('_') => {
                        app.adjust_complexity(-1);
                        app.focus = app::Focus::Complexity;
                    }
                    KeyCode::Char(']') => {
                        app.increase_speed();
                        app.focus = app::Focus::Speed;
                    }
                    KeyCode::Char('[') => {
                        app.decrease_speed();
                        app.focus = app::Focus::Speed;
                    }

                    // Navigation
                    KeyCode::Tab => app.next_focus(),
                    KeyCode::BackTab => app.prev_focus(),
                    KeyCode::Up => {
                        if !app.show_help {
                            if app.focus.is_param() {
                                app.adjust_focused_up();
                            } else {
                                app.scroll_controls_up();
                            }
                        }
                    }
                    KeyCode::Down => {
                        if !app.show_help {
                            if app.focus.is_param() {
                                app.adjust_focused_down();
                            } else {
                                let term_size = terminal.size().unwrap_or_default();
                                let visible = ui::get_controls_visible_lines(term_size.height);
                                app.scroll_controls_down(ui::CONTROLS_CONTENT_LINES.saturating_sub(visible));
                            }
                        }
                    }
                    KeyCode::Esc => {
                        if app.show_help {
                            app.toggle_help();
                        } else if app.focus.is_param() {
                            app.focus = app::Focus::Controls;
                        }
                    }
                    KeyCode::Char('j') | KeyCode::Char('J') => {
                        if app.show_help {
                            app.scroll_help_down(ui::HELP_CONTENT_LINES);
                        }
                    }
                    KeyCode::Char('k') | KeyCode::Char('K') => {
                        if app.show_help {
                            app.scroll_help_up();
                        }
                    }
                    _ => {}
                }
            }
        }

        // Run simulation tick
        app.tick();
    }
}
