//! Screen: owns the terminal and paints framebuffers onto it.
//!
//! The screen remembers what it last showed. Each new frame repaints, per
//! row, only the span from the first to the last changed cell. After
//! [`Screen::invalidate`] or a size change the whole frame is painted again.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::{Attribute, Color, Colors, Print, ResetColor, SetAttribute, SetColors},
    terminal, QueueableCommand,
};

use crate::fb::{Cell, FrameBuffer, Style};

pub struct Screen {
    out: io::Stdout,
    shown: FrameBuffer,
    stale: bool,
    bytes: Vec<u8>,
    key_releases: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            shown: FrameBuffer::new(0, 0),
            stale: true,
            bytes: Vec::with_capacity(32 * 1024),
            key_releases: false,
        }
    }

    /// Raw mode on the alternate screen. Key releases are requested when
    /// the terminal supports the keyboard enhancement protocol.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.key_releases = terminal::supports_keyboard_enhancement().unwrap_or(false);

        self.bytes.clear();
        self.bytes
            .queue(terminal::EnterAlternateScreen)?
            .queue(cursor::Hide)?
            .queue(terminal::DisableLineWrap)?;
        if self.key_releases {
            self.bytes.queue(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        self.write_bytes()?;
        self.stale = true;
        log::debug!("screen entered, key releases: {}", self.key_releases);
        Ok(())
    }

    pub fn reports_key_releases(&self) -> bool {
        self.key_releases
    }

    pub fn exit(&mut self) -> Result<()> {
        self.bytes.clear();
        if self.key_releases {
            self.bytes.queue(PopKeyboardEnhancementFlags)?;
        }
        self.bytes
            .queue(SetAttribute(Attribute::Reset))?
            .queue(ResetColor)?
            .queue(terminal::EnableLineWrap)?
            .queue(cursor::Show)?
            .queue(terminal::LeaveAlternateScreen)?;
        self.write_bytes()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Repaint everything on the next [`Screen::present`].
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Paint `frame`, writing only what differs from the previous frame.
    pub fn present(&mut self, frame: &FrameBuffer) -> Result<()> {
        let resized =
            self.shown.width() != frame.width() || self.shown.height() != frame.height();
        self.bytes.clear();
        let rows = if self.stale || resized {
            self.bytes
                .queue(terminal::Clear(terminal::ClearType::All))?;
            encode_rows(None, frame, &mut self.bytes)?
        } else {
            encode_rows(Some(&self.shown), frame, &mut self.bytes)?
        };
        if !self.bytes.is_empty() {
            self.write_bytes()?;
        }
        log::trace!("presented frame, {rows} rows painted");

        self.shown.copy_from(frame);
        self.stale = false;
        Ok(())
    }

    fn write_bytes(&mut self) -> io::Result<()> {
        self.out.write_all(&self.bytes)?;
        self.out.flush()
    }
}

/// Queue the commands that turn `prev` into `next`, or paint `next` whole
/// when there is no previous frame. Returns how many rows were touched.
pub fn encode_rows(
    prev: Option<&FrameBuffer>,
    next: &FrameBuffer,
    out: &mut Vec<u8>,
) -> io::Result<u16> {
    let mut pen = Pen::default();
    let mut painted = 0;
    for y in 0..next.height() {
        let row = next.row(y);
        let span = match prev {
            Some(prev) => dirty_span(prev.row(y), row),
            None => Some((0, row.len())),
        };
        let Some((start, end)) = span else {
            continue;
        };
        out.queue(cursor::MoveTo(start as u16, y))?;
        for cell in &row[start..end] {
            pen.paint(out, cell)?;
        }
        painted += 1;
    }
    if painted > 0 {
        out.queue(SetAttribute(Attribute::Reset))?.queue(ResetColor)?;
    }
    Ok(painted)
}

/// Half-open range from the first to the last differing cell.
fn dirty_span(old: &[Cell], new: &[Cell]) -> Option<(usize, usize)> {
    if old.len() != new.len() {
        return Some((0, new.len()));
    }
    let differs = |(a, b): (&Cell, &Cell)| a != b;
    let first = old.iter().zip(new).position(differs)?;
    let last = old.iter().zip(new).rposition(differs)?;
    Some((first, last + 1))
}

/// Tracks the style already sent so runs of equal style cost one change.
#[derive(Default)]
struct Pen {
    style: Option<Style>,
}

impl Pen {
    fn paint(&mut self, out: &mut Vec<u8>, cell: &Cell) -> io::Result<()> {
        if self.style != Some(cell.style) {
            let s = cell.style;
            out.queue(SetAttribute(Attribute::Reset))?
                .queue(SetColors(Colors::new(color(s.fg), color(s.bg))))?;
            if s.bold {
                out.queue(SetAttribute(Attribute::Bold))?;
            }
            if s.dim {
                out.queue(SetAttribute(Attribute::Dim))?;
            }
            self.style = Some(s);
        }
        out.queue(Print(cell.ch))?;
        Ok(())
    }
}

fn color(rgb: crate::fb::Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
