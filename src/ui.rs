use crate::app::{App, Focus};
use crate::braille;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 40;

/// Number of lines in controls content
pub const CONTROLS_CONTENT_LINES: u16 = 14;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

/// Visible lines of the controls box for a terminal height
pub fn get_controls_visible_lines(terminal_height: u16) -> u16 {
    // Status (7) + Parameters (8) + borders (2)
    terminal_height.saturating_sub(7 + 8 + 2)
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Status
            Constraint::Length(8), // Parameters
            Constraint::Min(6),    // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Flow Field ");

    let (status_text, status_color) = if app.is_editing_seed() {
        ("EDITING SEED", HIGHLIGHT_COLOR)
    } else if app.simulation.paused {
        ("PAUSED", HIGHLIGHT_COLOR)
    } else {
        ("RUNNING", Color::Green)
    };

    let mut content = vec![
        Line::from(Span::styled(
            format!("Frame {}", app.simulation.frame()),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("{} particles", app.simulation.particle_count()),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("Noise {:.0}", app.simulation.noise_seed()),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
        Line::from(Span::styled(status_text, Style::default().fg(status_color))),
    ];

    if let Some(message) = &app.status_message {
        content.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(DIM_TEXT_COLOR),
        )));
    }

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");

    let make_line = |label: &str, value: String, focused: bool| {
        let prefix = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(HIGHLIGHT_COLOR)
        } else {
            Style::default().fg(TEXT_COLOR)
        };
        Line::from(Span::styled(format!("{}{}: {}", prefix, label, value), style))
    };

    let config = &app.config;

    let seed_value = match &app.seed_input {
        Some(input) => format!("{}_", input),
        None => config.seed.clone(),
    };

    // Palette swatch: one block per color
    let mut swatch = vec![Span::raw("  ")];
    for color in config.scheme.colors() {
        swatch.push(Span::styled("██", Style::default().fg((*color).into())));
    }

    let content = vec![
        make_line("Seed", seed_value, app.focus == Focus::Seed),
        make_line(
            "Scheme",
            config.scheme.name().to_string(),
            app.focus == Focus::Scheme,
        ),
        Line::from(swatch),
        make_line(
            "Complexity",
            format!("{}", config.complexity),
            app.focus == Focus::Complexity,
        ),
        make_line(
            "Speed",
            format!("{}", config.frames_per_tick),
            app.focus == Focus::Speed,
        ),
        make_line("Fade", format!("{}", config.fade), app.focus == Focus::Fade),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    // Helper to create a control line
    let make_control = |key: &str, desc: &str| -> Line<'_> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Space", "pause/resume"),
        make_control("H", "help"),
        make_control("R", "random seed"),
        make_control("E", "edit seed"),
        make_control("C", "next scheme"),
        make_control("S-C", "prev scheme"),
        make_control("+/-", "complexity"),
        make_control("[/]", "speed"),
        make_control("Tab", "focus param"),
        make_control("↑↓", "adjust focused"),
        make_control("P", "save PNG"),
        make_control("O", "save config"),
        make_control("V", "fullscreen"),
        make_control("Q", "quit"),
    ];

    let content_height = content.len() as u16;
    let visible_height = area.height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    let title = if is_scrollable {
        " Controls (↑↓) "
    } else {
        " Controls "
    };

    let block = styled_block(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .scroll((app.controls_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        " {} · {} · {} ",
        app.config.seed,
        app.config.scheme.name(),
        app.config.complexity
    );
    let block = styled_block(&title);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cells = braille::render_to_braille(&app.canvas, inner.width, inner.height);

    let buf = frame.buffer_mut();
    for cell in cells {
        let x = inner.x + cell.x;
        let y = inner.y + cell.y;

        if x < inner.x + inner.width && y < inner.y + inner.height {
            if let Some(target) = buf.cell_mut((x, y)) {
                target.set_char(cell.char).set_fg(cell.color);
            }
        }
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    // Calculate the canvas area (exclude sidebar unless fullscreen)
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if app.fullscreen_mode {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(32);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    // Clear the background
    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("SEEDED FLOW FIELD", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Particles drift along a noise-derived vector field, leaving fading trails. The same seed, scheme and complexity always draw the same picture."),
        Line::from(""),
        Line::from(Span::styled("SEED", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("E or Enter opens the seed editor; type, then Enter to apply or Esc to cancel. R picks a random seed."),
        Line::from(""),
        Line::from(Span::styled("SCHEME", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("cosmic, ocean, sunset, forest, fire, neon, monochrome, pastel"),
        Line::from(""),
        Line::from(Span::styled("COMPLEXITY", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("1-10, one hundred particles per level"),
        Line::from(""),
        Line::from(Span::styled("FADE", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Black painted over the canvas each frame; 0 keeps every trail"),
        Line::from(""),
        Line::from(Span::styled("BASIC CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Space=Pause, C=Scheme, +/-=Complexity, [/]=Speed, Tab/Arrows=Adjust, P=PNG, O=Save config, V=Fullscreen, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    // Update title to show scroll hint if scrollable
    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}
