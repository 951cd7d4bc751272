use crate::error::ArtError;
use crate::particle::Segment;
use crate::render::{Canvas, DEFAULT_FADE};
use crate::simulation::{ArtParams, FlowSimulation, CANVAS_HEIGHT, CANVAS_WIDTH};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Output formats, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Last frame as a PNG image
    Png,
    /// Animated GIF
    Gif,
    /// Vector document of every stroke
    Svg,
    /// Raw draw-call trace
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self, ArtError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png") => Ok(ExportFormat::Png),
            Some("gif") => Ok(ExportFormat::Gif),
            Some("svg") => Ok(ExportFormat::Svg),
            Some("json") => Ok(ExportFormat::Json),
            _ => Err(ArtError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Gif => "GIF",
            ExportFormat::Svg => "SVG",
            ExportFormat::Json => "JSON",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    /// Frames to simulate
    pub frames: usize,
    /// Simulated frames per captured GIF frame
    pub gif_step: usize,
    /// Per-frame fade alpha for raster output
    pub fade: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            frames: 300,
            gif_step: 5,
            fade: DEFAULT_FADE,
        }
    }
}

/// What an export produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub format: ExportFormat,
    pub frames: usize,
    pub segments: usize,
}

/// Full draw-call record of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub params: ArtParams,
    pub frames: Vec<Vec<Segment>>,
}

/// Simulate `frames` frames and collect every frame's strokes
pub fn record(params: &ArtParams, frames: usize) -> Trace {
    let mut sim = FlowSimulation::new(params.clone());
    let frames = (0..frames).map(|_| sim.step()).collect();
    Trace {
        params: params.clone(),
        frames,
    }
}

/// Run a fresh session and write it to `path` in the format its extension names
pub fn export(params: &ArtParams, path: &Path, options: &ExportOptions) -> Result<ExportSummary, ArtError> {
    let format = ExportFormat::from_path(path)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    tracing::info!(
        format = format.name(),
        path = %path.display(),
        seed = %params.seed,
        palette = %params.palette,
        complexity = params.complexity,
        frames = options.frames,
        "exporting"
    );

    let segments = match format {
        ExportFormat::Png => export_png(params, path, options)?,
        ExportFormat::Gif => export_gif(params, path, options)?,
        ExportFormat::Svg => {
            let trace = record(params, options.frames);
            fs::write(path, render_svg(&trace))?;
            trace.frames.iter().map(Vec::len).sum()
        }
        ExportFormat::Json => {
            let trace = record(params, options.frames);
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer(&mut writer, &trace)?;
            writer.flush()?;
            trace.frames.iter().map(Vec::len).sum()
        }
    };

    tracing::info!(segments, "export finished");
    Ok(ExportSummary {
        format,
        frames: options.frames,
        segments,
    })
}

fn canvas_for_export() -> Canvas {
    Canvas::new(CANVAS_WIDTH as u32, CANVAS_HEIGHT as u32)
}

fn export_png(params: &ArtParams, path: &Path, options: &ExportOptions) -> Result<usize, ArtError> {
    let mut sim = FlowSimulation::new(params.clone());
    let mut canvas = canvas_for_export();
    let mut segments = Vec::with_capacity(sim.particle_count());
    let mut total = 0;

    for _ in 0..options.frames {
        segments.clear();
        sim.step_into(&mut segments);
        canvas.paint_frame(&segments, options.fade);
        total += segments.len();
    }

    canvas.save_png(path)?;
    Ok(total)
}

fn export_gif(params: &ArtParams, path: &Path, options: &ExportOptions) -> Result<usize, ArtError> {
    let mut sim = FlowSimulation::new(params.clone());
    let mut canvas = canvas_for_export();
    let width = canvas.width() as u16;
    let height = canvas.height() as u16;
    let step = options.gif_step.max(1);

    let mut encoder = gif::Encoder::new(BufWriter::new(File::create(path)?), width, height, &[])?;
    encoder.set_repeat(gif::Repeat::Infinite)?;

    let mut segments = Vec::with_capacity(sim.particle_count());
    let mut total = 0;
    let mut captured = 0;

    for frame in 1..=options.frames {
        segments.clear();
        sim.step_into(&mut segments);
        canvas.paint_frame(&segments, options.fade);
        total += segments.len();

        if frame % step == 0 {
            let mut gif_frame = gif::Frame::from_rgb_speed(width, height, canvas.image().as_raw(), 10);
            // Delay is in hundredths of a second; ~60 fps simulated
            gif_frame.delay = ((step as f64 * 100.0 / 60.0).round() as u16).max(2);
            encoder.write_frame(&gif_frame)?;
            captured += 1;
            tracing::debug!(frame, captured, "captured GIF frame");
        }
    }

    let mut writer = encoder.into_inner()?;
    writer.flush()?;
    Ok(total)
}

/// SVG document of every non-degenerate stroke, one group per frame.
/// Trails accumulate; the raster fade has no vector counterpart.
pub fn render_svg(trace: &Trace) -> String {
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = CANVAS_WIDTH,
        h = CANVAS_HEIGHT
    );
    svg.push_str(&format!(
        "<title>{} / {} / {}</title>\n",
        escape_xml(&trace.params.seed),
        trace.params.palette,
        trace.params.complexity
    ));
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"#000000\"/>\n");

    for segments in &trace.frames {
        svg.push_str("<g stroke-width=\"1\">\n");
        for seg in segments.iter().filter(|s| s.from != s.to) {
            svg.push_str(&format!(
                "<line x1=\"{:.3}\" y1=\"{:.3}\" x2=\"{:.3}\" y2=\"{:.3}\" stroke=\"{}\" stroke-opacity=\"{:.4}\"/>\n",
                seg.from.x,
                seg.from.y,
                seg.to.x,
                seg.to.y,
                seg.color,
                seg.opacity()
            ));
        }
        svg.push_str("</g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn small_params() -> ArtParams {
        ArtParams::new("export", "neon", 1)
    }

    fn quick() -> ExportOptions {
        ExportOptions {
            frames: 4,
            gif_step: 2,
            fade: 5,
        }
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("a.png")).unwrap(), ExportFormat::Png);
        assert_eq!(ExportFormat::from_path(Path::new("a.GIF")).unwrap(), ExportFormat::Gif);
        assert_eq!(ExportFormat::from_path(Path::new("dir/a.svg")).unwrap(), ExportFormat::Svg);
        assert_eq!(ExportFormat::from_path(Path::new("a.json")).unwrap(), ExportFormat::Json);
        assert!(ExportFormat::from_path(Path::new("a.bmp")).is_err());
        assert!(ExportFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_record_is_deterministic() {
        let a = record(&small_params(), 10);
        let b = record(&small_params(), 10);
        assert_eq!(a, b);
        assert_eq!(a.frames.len(), 10);
        assert!(a.frames.iter().all(|f| f.len() == 100));
    }

    #[test]
    fn test_svg_document_shape() {
        let trace = record(&ArtParams::new("<&>", "ocean", 1), 3);
        let svg = render_svg(&trace);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("&lt;&amp;&gt;"));
        assert_eq!(svg.matches("<g ").count(), 3);
        assert!(svg.contains("<line"));
    }

    #[test]
    fn test_export_png_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.png");
        let summary = export(&small_params(), &path, &quick()).unwrap();
        assert_eq!(summary.format, ExportFormat::Png);
        assert_eq!(summary.segments, 400);

        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 800);
        assert_eq!(img.height(), 800);
    }

    #[test]
    fn test_export_gif_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.gif");
        export(&small_params(), &path, &quick()).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
    }

    #[test]
    fn test_export_json_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("trace.json");
        export(&small_params(), &path, &quick()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let trace: Trace = serde_json::from_str(&content).unwrap();
        assert_eq!(trace, record(&small_params(), 4));
    }

    #[test]
    fn test_export_svg_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("art.svg");
        let summary = export(&small_params(), &path, &quick()).unwrap();
        assert_eq!(summary.frames, 4);
        assert!(fs::read_to_string(&path).unwrap().contains("<svg"));
    }

    #[test]
    fn test_export_rejects_unknown_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("art.txt");
        assert!(matches!(
            export(&small_params(), &path, &quick()),
            Err(ArtError::UnsupportedFormat(_))
        ));
        assert!(!path.exists());
    }
}
