use crate::config::{ArtConfig, MAX_FRAMES_PER_TICK};
use crate::error::ArtError;
use crate::particle::Segment;
use crate::render::Canvas;
use crate::simulation::{clamp_complexity, FlowSimulation, CANVAS_HEIGHT, CANVAS_WIDTH};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::path::PathBuf;

const RANDOM_SEED_LEN: usize = 8;
const MAX_SEED_LEN: usize = 64;

/// Focus state for parameter editing in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    Seed,
    Scheme,
    Complexity,
    Speed,
    Fade,
    // Controls box (not a param)
    Controls,
}

impl Focus {
    /// Tab cycles through parameters in sidebar order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Seed,
            Focus::Seed => Focus::Scheme,
            Focus::Scheme => Focus::Complexity,
            Focus::Complexity => Focus::Speed,
            Focus::Speed => Focus::Fade,
            Focus::Fade => Focus::Controls,
        }
    }

    pub fn prev(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Fade,
            Focus::Seed => Focus::Controls,
            Focus::Scheme => Focus::Seed,
            Focus::Complexity => Focus::Scheme,
            Focus::Speed => Focus::Complexity,
            Focus::Fade => Focus::Speed,
        }
    }

    /// Check if focus is on a parameter (not Controls or None)
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None | Focus::Controls)
    }
}

/// Main application state
pub struct App {
    pub simulation: FlowSimulation,
    pub canvas: Canvas,
    pub config: ArtConfig,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    pub controls_scroll: u16,
    /// Seed text being typed, while the seed editor is open
    pub seed_input: Option<String>,
    /// One-line feedback shown in the status box
    pub status_message: Option<String>,
    segments: Vec<Segment>,
}

impl App {
    pub fn new(config: ArtConfig) -> Self {
        let config = config.normalized();
        let simulation = FlowSimulation::new(config.params());
        Self {
            segments: Vec::with_capacity(simulation.particle_count()),
            simulation,
            canvas: Canvas::new(CANVAS_WIDTH as u32, CANVAS_HEIGHT as u32),
            config,
            focus: Focus::Controls,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            controls_scroll: 0,
            seed_input: None,
            status_message: None,
        }
    }

    /// Run simulation frames for the current tick and paint them
    pub fn tick(&mut self) {
        if self.simulation.paused {
            return;
        }
        for _ in 0..self.config.frames_per_tick {
            self.segments.clear();
            self.simulation.step_into(&mut self.segments);
            self.canvas.paint_frame(&self.segments, self.config.fade);
        }
    }

    /// Start a fresh session from the current config and clear the canvas
    pub fn regenerate(&mut self) {
        let params = self.config.params();
        if &params == self.simulation.params() {
            self.simulation.reset();
        } else {
            let paused = self.simulation.paused;
            self.simulation = FlowSimulation::new(params);
            self.simulation.paused = paused;
        }
        self.canvas.clear();
        tracing::debug!(seed = %self.config.seed, "regenerated session");
    }

    /// Replace the seed with a fresh random one
    pub fn randomize_seed(&mut self) {
        let seed: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RANDOM_SEED_LEN)
            .map(char::from)
            .collect();
        self.set_seed(seed);
    }

    pub fn set_seed(&mut self, seed: String) {
        self.config.seed = seed;
        self.config = self.config.clone().normalized();
        self.regenerate();
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::Seed => self.randomize_seed(),
            Focus::Scheme => self.cycle_scheme(),
            Focus::Complexity => self.adjust_complexity(1),
            Focus::Speed => self.increase_speed(),
            Focus::Fade => self.adjust_fade(1),
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::Seed => self.randomize_seed(),
            Focus::Scheme => self.cycle_scheme_prev(),
            Focus::Complexity => self.adjust_complexity(-1),
            Focus::Speed => self.decrease_speed(),
            Focus::Fade => self.adjust_fade(-1),
        }
    }

    /// Cycle to next focus
    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Navigate to previous parameter (Shift+Tab)
    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.simulation.toggle_pause();
    }

    /// Cycle color scheme
    pub fn cycle_scheme(&mut self) {
        self.config.scheme = self.config.scheme.next();
        self.regenerate();
    }

    pub fn cycle_scheme_prev(&mut self) {
        self.config.scheme = self.config.scheme.prev();
        self.regenerate();
    }

    pub fn adjust_complexity(&mut self, delta: i64) {
        let level = clamp_complexity(self.config.complexity as i64 + delta);
        if level != self.config.complexity {
            self.config.complexity = level;
            self.regenerate();
        }
    }

    /// Increase simulation speed
    pub fn increase_speed(&mut self) {
        self.config.frames_per_tick = (self.config.frames_per_tick + 1).min(MAX_FRAMES_PER_TICK);
    }

    /// Decrease simulation speed
    pub fn decrease_speed(&mut self) {
        self.config.frames_per_tick = self.config.frames_per_tick.saturating_sub(1).max(1);
    }

    pub fn adjust_fade(&mut self, delta: i16) {
        self.config.fade = (self.config.fade as i16 + delta).clamp(0, 255) as u8;
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// Scroll controls box up
    pub fn scroll_controls_up(&mut self) {
        self.controls_scroll = self.controls_scroll.saturating_sub(1);
    }

    /// Scroll controls box down
    pub fn scroll_controls_down(&mut self, max_scroll: u16) {
        self.controls_scroll = (self.controls_scroll + 1).min(max_scroll);
    }

    // === Seed editor ===

    pub fn is_editing_seed(&self) -> bool {
        self.seed_input.is_some()
    }

    /// Open the seed editor pre-filled with the current seed
    pub fn begin_seed_edit(&mut self) {
        self.seed_input = Some(self.config.seed.clone());
        self.focus = Focus::Seed;
    }

    pub fn push_seed_char(&mut self, c: char) {
        if let Some(input) = &mut self.seed_input {
            if input.chars().count() < MAX_SEED_LEN && !c.is_control() {
                input.push(c);
            }
        }
    }

    pub fn pop_seed_char(&mut self) {
        if let Some(input) = &mut self.seed_input {
            input.pop();
        }
    }

    /// Apply the typed seed (empty becomes the default seed)
    pub fn commit_seed_edit(&mut self) {
        if let Some(input) = self.seed_input.take() {
            self.set_seed(input);
        }
    }

    pub fn cancel_seed_edit(&mut self) {
        self.seed_input = None;
    }

    // === Persistence ===

    /// Snapshot file name derived from the session inputs and frame
    pub fn snapshot_path(&self) -> PathBuf {
        let seed = self
            .config
            .seed
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect::<String>();
        PathBuf::from(format!(
            "flowfield-{}-{}-{}-f{}.png",
            seed,
            self.config.scheme.name(),
            self.config.complexity,
            self.simulation.frame()
        ))
    }

    /// Save the current canvas as PNG and report the outcome in the status line
    pub fn save_snapshot(&mut self) {
        let path = self.snapshot_path();
        let result = self.canvas.save_png(&path);
        self.report(result.map(|_| format!("Saved {}", path.display())));
    }

    /// Write the current settings to the default config file
    pub fn save_config(&mut self) {
        let result = ArtConfig::default_path().and_then(|path| {
            self.config.save_to_file(&path)?;
            Ok(format!("Config saved to {}", path.display()))
        });
        self.report(result);
    }

    fn report(&mut self, result: Result<String, ArtError>) {
        self.status_message = Some(match result {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(%err, "save failed");
                format!("Error: {}", err)
            }
        });
    }
}
