//! Character framebuffer the game view draws into.

pub use crate::types::Rgb;

/// Colors and weight of one character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub dim: bool,
}

impl Style {
    pub const PLAIN: Style = Style::on(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0));

    pub const fn on(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg,
            bold: false,
            dim: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn dim(mut self) -> Self {
        self.dim = true;
        self
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::PLAIN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        style: Style::PLAIN,
    };
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

/// Row-major grid of cells; writes outside the buffer are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; usize::from(width) * usize::from(height)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells of row `y`; empty when `y` is out of range.
    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = usize::from(y) * usize::from(self.width);
        &self.cells[start..start + usize::from(self.width)]
    }

    /// Resize and blank every cell. Keeps the allocation when it is big enough.
    pub fn reset(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(usize::from(width) * usize::from(height), Cell::BLANK);
    }

    /// Become a copy of `other` without reallocating when sizes match.
    pub fn copy_from(&mut self, other: &FrameBuffer) {
        self.width = other.width;
        self.height = other.height;
        self.cells.clear();
        self.cells.extend_from_slice(&other.cells);
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn put(&mut self, x: u16, y: u16, ch: char, style: Style) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell { ch, style };
        }
    }

    /// Write `text` left to right from `(x, y)`, clipped at the right edge.
    pub fn text(&mut self, x: u16, y: u16, text: &str, style: Style) {
        for (ch, cx) in text.chars().zip(x..self.width) {
            self.put(cx, y, ch, style);
        }
    }

    /// Decimal `value` at `(x, y)` without formatting through a `String`.
    pub fn number(&mut self, x: u16, y: u16, value: u32, style: Style) {
        let mut digits = [b'0'; 10];
        let mut n = value;
        let mut start = digits.len();
        loop {
            start -= 1;
            digits[start] = b'0' + (n % 10) as u8;
            n /= 10;
            if n == 0 {
                break;
            }
        }
        for (i, &d) in digits[start..].iter().enumerate() {
            self.put(x.saturating_add(i as u16), y, char::from(d), style);
        }
    }

    pub fn fill(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: Style) {
        for cy in y..y.saturating_add(h).min(self.height) {
            for cx in x..x.saturating_add(w).min(self.width) {
                self.put(cx, cy, ch, style);
            }
        }
    }

    /// Characters of row `y`.
    pub fn row_text(&self, y: u16) -> String {
        self.row(y).iter().map(|c| c.ch).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_writes_digits() {
        let mut fb = FrameBuffer::new(15, 1);
        fb.number(1, 0, 0, Style::PLAIN);
        fb.number(3, 0, u32::MAX, Style::PLAIN);
        assert_eq!(fb.row_text(0), " 0 4294967295  ");
    }

    #[test]
    fn test_writes_outside_are_clipped() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.text(1, 0, "abcdef", Style::PLAIN);
        fb.put(9, 9, 'x', Style::PLAIN);
        fb.fill(2, 1, 5, 5, '#', Style::PLAIN);
        assert_eq!(fb.row_text(0), " ab");
        assert_eq!(fb.row_text(1), "  #");
        assert!(fb.row(2).is_empty());
    }

    #[test]
    fn test_reset_blanks_and_resizes() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.put(0, 0, 'x', Style::PLAIN.bold());
        fb.reset(4, 3);
        assert_eq!((fb.width(), fb.height()), (4, 3));
        assert!(fb.cells().iter().all(|&c| c == Cell::BLANK));
    }

    #[test]
    fn test_copy_from_matches_source() {
        let mut src = FrameBuffer::new(3, 1);
        src.text(0, 0, "abc", Style::PLAIN.dim());
        let mut dst = FrameBuffer::new(0, 0);
        dst.copy_from(&src);
        assert_eq!(dst, src);
    }
}
