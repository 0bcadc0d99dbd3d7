//! terminal.rs
//!
//! A frame recorder for a fake terminal session. Callers issue instructions
//! (write text at a row, type text one character at a time, show a prompt,
//! toggle the cursor) and every instruction appends screen snapshots to a
//! [`Recording`], which a renderer turns into an animated image.
//!
//! Rows and columns in the public API are 1-based. Text may carry ANSI SGR
//! escapes (`ESC[...m`); they change the style of the following characters
//! and never occupy a cell. Writing below the last row scrolls the screen.

const CHAR_WIDTH_RATIO: f32 = 0.6;
const LINE_GAP: u32 = 4;

#[derive(Debug, Clone)]
pub struct TerminalConfig {
    pub width: u32,
    pub height: u32,
    pub xpad: u32,
    pub ypad: u32,
    pub font_size: u32,
    pub line_spacing: u32,
    pub fps: u32,
    pub prompt: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            width: 860,
            height: 520,
            xpad: 10,
            ypad: 10,
            font_size: 16,
            line_spacing: 1,
            fps: 24,
            prompt: "$ ".to_string(),
        }
    }
}

impl TerminalConfig {
    pub fn char_width(&self) -> f32 {
        self.font_size as f32 * CHAR_WIDTH_RATIO
    }

    pub fn line_height(&self) -> u32 {
        self.font_size + LINE_GAP * self.line_spacing
    }

    /// Visible (columns, rows), never less than one of each.
    pub fn grid(&self) -> (usize, usize) {
        let inner_w = self.width.saturating_sub(2 * self.xpad) as f32;
        let inner_h = self.height.saturating_sub(2 * self.ypad);
        // tolerate f32 rounding when the width is an exact multiple
        let cols = (inner_w / self.char_width() + 1e-3).floor() as usize;
        let rows = (inner_h / self.line_height()) as usize;
        (cols.max(1), rows.max(1))
    }
}

/// Cell style. Colors are indexes into the 16-color ANSI palette; `None`
/// means the terminal's default foreground/background.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<u8>,
    pub bg: Option<u8>,
    pub bold: bool,
}

impl Style {
    fn apply_sgr(&mut self, code: u16) {
        match code {
            0 => *self = Style::default(),
            1 => self.bold = true,
            22 => self.bold = false,
            30..=37 => self.fg = Some((code - 30) as u8),
            39 => self.fg = None,
            40..=47 => self.bg = Some((code - 40) as u8),
            49 => self.bg = None,
            90..=97 => self.fg = Some((code - 90 + 8) as u8),
            100..=107 => self.bg = Some((code - 100 + 8) as u8),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        style: Style {
            fg: None,
            bg: None,
            bold: false,
        },
    };

    pub fn is_blank(&self) -> bool {
        *self == Cell::BLANK
    }
}

pub type Screen = Vec<Vec<Cell>>;

/// One distinct screen state, held for `count` frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub screen: Screen,
    /// 0-based (row, col) of a visible cursor.
    pub cursor: Option<(usize, usize)>,
    pub count: u32,
}

#[derive(Debug, Clone)]
pub struct Recording {
    pub config: TerminalConfig,
    pub background: String,
    pub foreground: String,
    pub frames: Vec<Frame>,
}

impl Recording {
    pub fn total_frames(&self) -> u32 {
        self.frames.iter().map(|f| f.count).sum()
    }
}

/// Split text into styled characters, starting from `style`, and return the
/// style in effect at the end. Unterminated or non-SGR escapes are dropped.
pub fn parse_ansi(text: &str, mut style: Style) -> (Vec<(char, Style)>, Style) {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\x1b' {
            out.push((ch, style));
            continue;
        }
        if chars.peek() != Some(&'[') {
            continue;
        }
        chars.next();

        let mut params = String::new();
        let mut terminator = None;
        for c in chars.by_ref() {
            if c.is_ascii_digit() || c == ';' {
                params.push(c);
            } else {
                terminator = Some(c);
                break;
            }
        }

        if terminator == Some('m') {
            if params.is_empty() {
                style = Style::default();
            }
            for code in params.split(';').filter_map(|p| p.parse::<u16>().ok()) {
                style.apply_sgr(code);
            }
        }
    }

    (out, style)
}

pub struct Terminal {
    config: TerminalConfig,
    cols: usize,
    rows: usize,
    background: String,
    foreground: String,
    screen: Screen,
    cursor: (usize, usize),
    show_cursor: bool,
    curr_row: usize,
    /// Rows already scrolled off the top.
    scrolled: usize,
    frames: Vec<Frame>,
}

impl Terminal {
    pub fn new(config: TerminalConfig) -> Self {
        let (cols, rows) = config.grid();
        Self {
            config,
            cols,
            rows,
            background: "#0d1117".to_string(),
            foreground: "#c9d1d9".to_string(),
            screen: vec![vec![Cell::BLANK; cols]; rows],
            cursor: (0, 0),
            show_cursor: false,
            curr_row: 0,
            scrolled: 0,
            frames: Vec::new(),
        }
    }

    pub fn set_bg(&mut self, color: &str) {
        self.background = color.to_string();
    }

    pub fn set_font_color(&mut self, color: &str) {
        self.foreground = color.to_string();
    }

    pub fn toggle_show_cursor(&mut self, show: bool) {
        self.show_cursor = show;
    }

    /// Last absolute row written, 1-based (0 before anything is written).
    pub fn curr_row(&self) -> usize {
        self.curr_row
    }

    /// Write text (one screen row per `\n`-separated line) starting at
    /// `row`/`col`, then hold for `count` frames. With `contin`, the first
    /// line continues from the cursor if it already sits on `row`.
    pub fn gen_text(&mut self, text: &str, row: usize, col: usize, count: u32, contin: bool) {
        let mut style = Style::default();

        for (i, line) in text.split('\n').enumerate() {
            let idx = self.line_index(row + i);
            let start = if i == 0 && contin && self.cursor.0 == idx {
                self.cursor.1
            } else {
                col.saturating_sub(1)
            };

            let (styled, end) = parse_ansi(line, style);
            style = end;
            self.cursor = (idx, start);
            for (ch, s) in styled {
                self.put(ch, s);
            }
        }

        self.push_frame(count);
    }

    /// Clear `row` and write the configured prompt at its start.
    pub fn gen_prompt(&mut self, row: usize) {
        let idx = self.line_index(row);
        self.screen[idx] = vec![Cell::BLANK; self.cols];
        self.cursor = (idx, 0);

        let prompt = self.config.prompt.clone();
        for (ch, s) in parse_ansi(&prompt, Style::default()).0 {
            self.put(ch, s);
        }
        self.push_frame(1);
    }

    /// Type `text` on `row`, one character per frame.
    pub fn gen_typing_text(&mut self, text: &str, row: usize, contin: bool) {
        let idx = self.line_index(row);
        if !(contin && self.cursor.0 == idx) {
            self.cursor = (idx, 0);
        }

        for (ch, s) in parse_ansi(text, Style::default()).0 {
            self.put(ch, s);
            self.push_frame(1);
        }
    }

    pub fn finish(self) -> Recording {
        Recording {
            config: self.config,
            background: self.background,
            foreground: self.foreground,
            frames: self.frames,
        }
    }

    /// Map an absolute 1-based row to a screen index, scrolling only as far
    /// as needed to bring it into view. Rows already scrolled off clamp to
    /// the top line.
    fn line_index(&mut self, row: usize) -> usize {
        let row = row.max(1);
        let visible = row.saturating_sub(self.scrolled);
        if visible > self.rows {
            let needed = visible - self.rows;
            let shift = needed.min(self.rows);
            self.screen.drain(..shift);
            self.screen
                .extend(std::iter::repeat_n(vec![Cell::BLANK; self.cols], shift));
            self.cursor.0 = self.cursor.0.saturating_sub(shift);
            self.scrolled += needed;
        }
        self.curr_row = row;
        row.saturating_sub(self.scrolled).max(1) - 1
    }

    /// Put one character at the cursor and advance it. Characters past the
    /// right edge are clipped.
    fn put(&mut self, ch: char, style: Style) {
        let (row, col) = self.cursor;
        if col < self.cols {
            self.screen[row][col] = Cell { ch, style };
            self.cursor.1 = col + 1;
        }
    }

    fn push_frame(&mut self, count: u32) {
        if count == 0 {
            return;
        }
        let cursor = self.show_cursor.then_some(self.cursor);

        if let Some(last) = self.frames.last_mut() {
            if last.cursor == cursor && last.screen == self.screen {
                last.count += count;
                return;
            }
        }

        self.frames.push(Frame {
            screen: self.screen.clone(),
            cursor,
            count,
        });
    }
}
