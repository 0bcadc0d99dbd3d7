use crate::terminal::{Cell, Frame, Recording, Style};
use std::fmt::Write;

const FONT_FAMILY: &str = "ConsolasFallback,Consolas,monospace";

// GitHub dark ANSI palette: 0-7 normal, 8-15 bright
const ANSI_PALETTE: [&str; 16] = [
    "#484f58", "#ff7b72", "#3fb950", "#d29922", "#58a6ff", "#bc8cff", "#39c5cf", "#b1bac4",
    "#6e7681", "#ffa198", "#56d364", "#e3b341", "#79c0ff", "#d2a8ff", "#56d4dd", "#ffffff",
];

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn color(index: u8) -> &'static str {
    ANSI_PALETTE[index as usize % ANSI_PALETTE.len()]
}

/// Cell geometry shared by every frame.
struct Layout {
    xpad: f32,
    ypad: f32,
    char_width: f32,
    line_height: f32,
    font_size: f32,
}

impl Layout {
    fn x(&self, col: usize) -> f32 {
        self.xpad + col as f32 * self.char_width
    }

    fn top(&self, row: usize) -> f32 {
        self.ypad + row as f32 * self.line_height
    }

    fn baseline(&self, row: usize) -> f32 {
        self.top(row) + self.font_size
    }
}

/// Consecutive non-blank-trailing cells sharing a style.
fn runs(row: &[Cell]) -> Vec<(usize, Style, String)> {
    let end = row
        .iter()
        .rposition(|c| !c.is_blank())
        .map_or(0, |i| i + 1);

    let mut out: Vec<(usize, Style, String)> = Vec::new();
    for (col, cell) in row[..end].iter().enumerate() {
        match out.last_mut() {
            Some((_, style, text)) if *style == cell.style => text.push(cell.ch),
            _ => out.push((col, cell.style, cell.ch.to_string())),
        }
    }
    out
}

fn build_frame_body(frame: &Frame, layout: &Layout, foreground: &str) -> String {
    let mut backgrounds = String::new();
    let mut tspans = String::new();

    for (row, cells) in frame.screen.iter().enumerate() {
        for (col, style, text) in runs(cells) {
            let x = layout.x(col);
            if let Some(bg) = style.bg {
                let _ = writeln!(
                    backgrounds,
                    r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{fill}"/>"#,
                    y = layout.top(row),
                    w = text.chars().count() as f32 * layout.char_width,
                    h = layout.line_height,
                    fill = color(bg),
                );
            }
            if text.trim().is_empty() {
                continue;
            }

            let fill = style.fg.map(color).unwrap_or(foreground);
            let weight = if style.bold { r#" font-weight="bold""# } else { "" };
            let _ = writeln!(
                tspans,
                r#"<tspan x="{x:.1}" y="{y:.1}" fill="{fill}"{weight}>{text}</tspan>"#,
                y = layout.baseline(row),
                text = escape_xml(&text),
            );
        }
    }

    let cursor = frame
        .cursor
        .map(|(row, col)| {
            format!(
                r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{foreground}"/>
"#,
                x = layout.x(col),
                y = layout.top(row),
                w = layout.char_width,
                h = layout.line_height,
            )
        })
        .unwrap_or_default();

    format!("{backgrounds}<text xml:space=\"preserve\">\n{tspans}</text>\n{cursor}")
}

/// Render a recording as a looping animated SVG. Each distinct frame is a
/// group whose visibility is switched on for its share of the loop.
pub fn render(recording: &Recording) -> String {
    let config = &recording.config;
    let layout = Layout {
        xpad: config.xpad as f32,
        ypad: config.ypad as f32,
        char_width: config.char_width(),
        line_height: config.line_height() as f32,
        font_size: config.font_size as f32,
    };

    let total = recording.total_frames().max(1);
    let duration = total as f32 / config.fps.max(1) as f32;
    let single = recording.frames.len() == 1;
    // enough decimals that a one-frame hold never rounds to zero width
    let precision = total.to_string().len() + 2;

    let mut groups = String::new();
    let mut elapsed = 0u32;
    for frame in &recording.frames {
        let body = build_frame_body(frame, &layout, &recording.foreground);
        if single {
            let _ = write!(groups, "<g>\n{body}</g>\n");
            continue;
        }

        let start = elapsed as f64 / total as f64;
        elapsed += frame.count;
        let end = elapsed as f64 / total as f64;
        let _ = write!(
            groups,
            r#"<g visibility="hidden">
<animate attributeName="visibility" values="hidden;visible;hidden" keyTimes="0;{start:.precision$};{end:.precision$}" dur="{duration:.3}s" calcMode="discrete" repeatCount="indefinite"/>
{body}</g>
"#
        );
    }

    format!(
        r#"<?xml version='1.0' encoding='UTF-8'?>
<svg xmlns="http://www.w3.org/2000/svg"
     width="{w}px" height="{h}px"
     font-family="{FONT_FAMILY}"
     font-size="{fs}px">

<rect width="{w}px" height="{h}px" fill="{bg}"/>

{groups}
</svg>
"#,
        w = config.width,
        h = config.height,
        fs = config.font_size,
        bg = recording.background,
    )
}
