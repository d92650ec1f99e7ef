//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, ShapeCatalog};
use crate::fb::{FrameBuffer, Rgb, Style};
use crate::types::{Pos, ShapeKind};

const FIELD_BG: Rgb = Rgb::new(30, 30, 40);
const BLACK: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the game.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
    /// Used to draw the preview shapes; should match the engine's catalog.
    shapes: ShapeCatalog,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

/// Top-left corner of the framed field and its outer size.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w,
            cell_h,
            anchor_y: AnchorY::Center,
            shapes: ShapeCatalog::default(),
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn with_shapes(mut self, shapes: ShapeCatalog) -> Self {
        self.shapes = shapes;
        self
    }

    /// Render a snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.reset(viewport.width, viewport.height);

        let board_px_w = snap.columns.saturating_mul(self.cell_w);
        let board_px_h = snap.rows.saturating_mul(self.cell_h);
        let w = board_px_w.saturating_add(2);
        let h = board_px_h.saturating_add(2);
        let frame = Frame {
            x: viewport.width.saturating_sub(w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(h) / 2,
                AnchorY::Top => 0,
            },
            w,
            h,
        };

        let bg = Style::on(Rgb::new(80, 80, 90), FIELD_BG);
        fb.fill(frame.x + 1, frame.y + 1, board_px_w, board_px_h, ' ', bg);
        draw_border(fb, frame, Style::on(Rgb::new(200, 200, 200), BLACK));

        // Locked cells.
        for row in 0..snap.rows {
            for col in 0..snap.columns {
                match snap.cell(i32::from(row), i32::from(col)) {
                    Some(color) => self.draw_block(fb, frame, row, col, color),
                    None => self.draw_empty_cell(fb, frame, row, col),
                }
            }
        }

        // Ghost first so the active piece covers it where they overlap.
        let ghost_style = Style::on(Rgb::new(140, 140, 140), FIELD_BG).dim();
        for &pos in &snap.ghost {
            if let Some((row, col)) = on_field(snap, pos) {
                self.fill_cell_rect(fb, frame, row, col, '░', ghost_style);
            }
        }

        if let Some(active) = snap.active {
            for &pos in &active.blocks {
                if let Some((row, col)) = on_field(snap, pos) {
                    self.draw_block(fb, frame, row, col, active.color);
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        if snap.game_over {
            draw_overlay_text(fb, frame, 0, "GAME OVER");
            draw_overlay_text(fb, frame, 2, "any key: again");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, frame: Frame, row: u16, col: u16) {
        let style = Style::on(Rgb::new(90, 90, 100), FIELD_BG).dim();
        self.fill_cell_rect(fb, frame, row, col, '·', style);
    }

    fn draw_block(&self, fb: &mut FrameBuffer, frame: Frame, row: u16, col: u16, color: Rgb) {
        self.fill_cell_rect(fb, frame, row, col, '█', Style::on(color, FIELD_BG).bold());
    }

    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        row: u16,
        col: u16,
        ch: char,
        style: Style,
    ) {
        let px = frame.x + 1 + col * self.cell_w;
        let py = frame.y + 1 + row * self.cell_h;
        fb.fill(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        frame: Frame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 10 {
            return;
        }

        let label = Style::PLAIN.bold();
        let value = Style::on(Rgb::new(200, 200, 200), BLACK);

        let mut y = frame.y;
        for (name, v) in [
            ("SCORE", snap.score.score),
            ("LEVEL", snap.score.level),
            ("LINES", snap.score.lines),
        ] {
            fb.text(panel_x, y, name, label);
            fb.number(panel_x, y.saturating_add(1), v, value);
            y = y.saturating_add(3);
        }

        fb.text(panel_x, y, "NEXT", label);
        y = y.saturating_add(2);
        for &kind in &snap.next {
            if y >= viewport.height {
                break;
            }
            y = y.saturating_add(self.draw_preview(fb, panel_x, y, kind) + 1);
        }
    }

    /// Draw `kind` with its top-left at `(x, y)`; returns the rows used.
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, kind: ShapeKind) -> u16 {
        let spec = self.shapes.get(kind);
        let min_col = spec.offsets.iter().map(|o| o.col).min().unwrap_or(0);
        let min_row = spec.offsets.iter().map(|o| o.row).min().unwrap_or(0);
        let max_row = spec.offsets.iter().map(|o| o.row).max().unwrap_or(0);
        let style = Style::on(spec.color, BLACK).bold();
        for o in &spec.offsets {
            let dx = (o.col - min_col) as u16 * self.cell_w;
            let dy = (o.row - min_row) as u16 * self.cell_h;
            fb.fill(
                x.saturating_add(dx),
                y.saturating_add(dy),
                self.cell_w,
                self.cell_h,
                '█',
                style,
            );
        }
        (max_row - min_row + 1) as u16 * self.cell_h
    }
}

fn on_field(snap: &GameSnapshot, pos: Pos) -> Option<(u16, u16)> {
    if pos.row < 0
        || pos.col < 0
        || pos.row >= i32::from(snap.rows)
        || pos.col >= i32::from(snap.columns)
    {
        return None;
    }
    Some((pos.row as u16, pos.col as u16))
}

fn draw_border(fb: &mut FrameBuffer, frame: Frame, style: Style) {
    let Frame { x, y, w, h } = frame;
    if w < 2 || h < 2 {
        return;
    }

    fb.put(x, y, '┌', style);
    fb.put(x + w - 1, y, '┐', style);
    fb.put(x, y + h - 1, '└', style);
    fb.put(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put(x + dx, y, '─', style);
        fb.put(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put(x, y + dy, '│', style);
        fb.put(x + w - 1, y + dy, '│', style);
    }
}

/// Centered text `dy` rows below the middle of the frame.
fn draw_overlay_text(fb: &mut FrameBuffer, frame: Frame, dy: u16, text: &str) {
    let y = frame.y.saturating_add(frame.h / 2).saturating_add(dy);
    let text_w = text.chars().count() as u16;
    let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
    fb.text(x, y, text, Style::on(Rgb::new(255, 255, 255), BLACK).bold());
}
