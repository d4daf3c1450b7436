/// Character-grid canvas: the unit every zine frame is painted on.
///
/// How it works:
///   1. `clear()` blanks every cell at the start of a frame
///   2. `put_char` / `put_text` write glyphs; anything outside the grid is clipped
///   3. `render()` serializes the grid row by row into one printable string,
///      switching colors only when a cell's ink differs from the previous one
///
/// The canvas never touches the terminal. The renderer owns the sink.

use std::fmt;

use crossterm::{
    style::{Color, ResetColor, SetBackgroundColor, SetForegroundColor},
    Command,
};

/// Row terminator. Raw mode does not translate `\n`, so return the carriage too.
pub const ROW_END: &str = "\r\n";

// ── Ink: the opaque color token of a cell ──

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Ink {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Ink {
    /// Terminal default colors.
    pub const PLAIN: Ink = Ink { fg: None, bg: None };

    pub const fn fg(color: Color) -> Self {
        Ink { fg: Some(color), bg: None }
    }

    pub const fn on(fg: Color, bg: Color) -> Self {
        Ink { fg: Some(fg), bg: Some(bg) }
    }
}

// ── Cell ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    pub ch: char,
    pub ink: Ink,
}

impl Cell {
    pub const BLANK: Cell = Cell { ch: ' ', ink: Ink::PLAIN };
}

// ── Canvas ──

pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    /// Writes rejected for falling outside the grid since the last `clear()`.
    clipped: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas {
            width,
            height,
            cells: vec![Cell::BLANK; width * height],
            clipped: 0,
        }
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
        self.clipped = 0;
    }

    pub fn clipped_writes(&self) -> usize {
        self.clipped
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 { return None; }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn put_char(&mut self, x: i32, y: i32, ch: char, ink: Ink) {
        match self.index(x, y) {
            Some(i) => self.cells[i] = Cell { ch, ink },
            None => self.clipped += 1,
        }
    }

    /// Write `text` starting at (x, y), one column per char. Never wraps.
    pub fn put_text(&mut self, x: i32, y: i32, text: &str, ink: Ink) {
        for (i, ch) in text.chars().enumerate() {
            self.put_char(x + i as i32, y, ch, ink);
        }
    }

    /// Write `text` horizontally centered on row `y`.
    pub fn put_centered(&mut self, y: i32, text: &str, ink: Ink) {
        let len = text.chars().count() as i32;
        let x = (self.width as i32 - len) / 2;
        self.put_text(x, y, text, ink);
    }

    /// Single-line box outline with its top-left corner at (x, y).
    /// Boxes narrower or shorter than two cells are not drawn.
    pub fn draw_box(&mut self, x: i32, y: i32, w: i32, h: i32, ink: Ink) {
        if w < 2 || h < 2 { return; }
        let (right, bottom) = (x + w - 1, y + h - 1);
        for cx in x + 1..right {
            self.put_char(cx, y, '─', ink);
            self.put_char(cx, bottom, '─', ink);
        }
        for cy in y + 1..bottom {
            self.put_char(x, cy, '│', ink);
            self.put_char(right, cy, '│', ink);
        }
        self.put_char(x, y, '┌', ink);
        self.put_char(right, y, '┐', ink);
        self.put_char(x, bottom, '└', ink);
        self.put_char(right, bottom, '┘', ink);
    }

    /// Paint `w` cells of row `y` with `ch`.
    pub fn fill_row(&mut self, x: i32, y: i32, w: i32, ch: char, ink: Ink) {
        for cx in x..x + w.max(0) {
            self.put_char(cx, y, ch, ink);
        }
    }

    /// Plain glyphs of one row (no color), mostly for tests and summaries.
    pub fn row_text(&self, y: usize) -> String {
        if y >= self.height { return String::new(); }
        self.cells[y * self.width..(y + 1) * self.width]
            .iter()
            .map(|c| c.ch)
            .collect()
    }

    /// Serialize the whole grid. Colors are switched only on change.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.width * self.height * 2 + 64);
        let mut current = Ink::PLAIN;

        for y in 0..self.height {
            if y > 0 {
                out.push_str(ROW_END);
            }
            for cell in &self.cells[y * self.width..(y + 1) * self.width] {
                if cell.ink != current {
                    // Writing into a String cannot fail.
                    let _ = switch_ink(&mut out, current, cell.ink);
                    current = cell.ink;
                }
                out.push(cell.ch);
            }
        }

        if current != Ink::PLAIN {
            let _ = ResetColor.write_ansi(&mut out);
        }
        out
    }
}

/// Emit the minimal escape sequence that turns `from` into `to`.
fn switch_ink(out: &mut String, from: Ink, to: Ink) -> fmt::Result {
    let mut from = from;
    // Dropping back to a terminal default needs a full reset.
    let loses_fg = from.fg.is_some() && to.fg.is_none();
    let loses_bg = from.bg.is_some() && to.bg.is_none();
    if loses_fg || loses_bg {
        ResetColor.write_ansi(out)?;
        from = Ink::PLAIN;
    }
    if to.fg != from.fg {
        if let Some(c) = to.fg {
            SetForegroundColor(c).write_ansi(out)?;
        }
    }
    if to.bg != from.bg {
        if let Some(c) = to.bg {
            SetBackgroundColor(c).write_ansi(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escapes(s: &str) -> usize {
        s.matches('\x1b').count()
    }

    #[test]
    fn new_canvas_is_blank() {
        let c = Canvas::new(4, 2);
        assert_eq!(c.row_text(0), "    ");
        assert_eq!(c.row_text(1), "    ");
        assert_eq!(c.get(0, 0), Some(Cell::BLANK));
    }

    #[test]
    fn put_text_clips_at_right_edge() {
        let mut c = Canvas::new(20, 3);
        c.put_text(18, 1, "0123456789", Ink::PLAIN);
        assert_eq!(c.row_text(1), format!("{}01", " ".repeat(18)));
        // Nothing wrapped onto the next row
        assert_eq!(c.row_text(2).trim(), "");
        assert_eq!(c.clipped_writes(), 8);
    }

    #[test]
    fn negative_and_far_writes_are_ignored() {
        let mut c = Canvas::new(5, 5);
        c.put_char(-1, 0, 'x', Ink::PLAIN);
        c.put_char(0, -1, 'x', Ink::PLAIN);
        c.put_char(5, 0, 'x', Ink::PLAIN);
        c.put_char(0, 5, 'x', Ink::PLAIN);
        assert_eq!(c.clipped_writes(), 4);
        for y in 0..5 {
            assert_eq!(c.row_text(y), "     ");
        }
    }

    #[test]
    fn text_starting_left_of_canvas_keeps_visible_tail() {
        let mut c = Canvas::new(6, 1);
        c.put_text(-2, 0, "abcd", Ink::PLAIN);
        assert_eq!(c.row_text(0), "cd    ");
    }

    #[test]
    fn clear_resets_cells_and_clip_count() {
        let mut c = Canvas::new(3, 1);
        c.put_text(0, 0, "abcdef", Ink::fg(Color::Red));
        c.clear();
        assert_eq!(c.row_text(0), "   ");
        assert_eq!(c.clipped_writes(), 0);
    }

    #[test]
    fn centered_text() {
        let mut c = Canvas::new(9, 1);
        c.put_centered(0, "abc", Ink::PLAIN);
        assert_eq!(c.row_text(0), "   abc   ");
    }

    #[test]
    fn box_outline() {
        let mut c = Canvas::new(5, 3);
        c.draw_box(0, 0, 5, 3, Ink::PLAIN);
        assert_eq!(c.row_text(0), "┌───┐");
        assert_eq!(c.row_text(1), "│   │");
        assert_eq!(c.row_text(2), "└───┘");
        assert_eq!(c.clipped_writes(), 0);
    }

    #[test]
    fn box_partly_offscreen_is_clipped() {
        let mut c = Canvas::new(4, 4);
        c.draw_box(2, 2, 4, 4, Ink::PLAIN);
        assert_eq!(c.row_text(2), "  ┌─");
        assert_eq!(c.row_text(3), "  │ ");
        assert!(c.clipped_writes() > 0);
    }

    #[test]
    fn render_plain_grid_has_no_escapes() {
        let mut c = Canvas::new(3, 2);
        c.put_text(0, 0, "ab", Ink::PLAIN);
        assert_eq!(c.render(), "ab \r\n   ");
    }

    #[test]
    fn render_switches_color_only_on_change() {
        let mut c = Canvas::new(4, 1);
        c.put_text(0, 0, "abcd", Ink::fg(Color::Red));
        let out = c.render();
        // one switch into red, one reset at the end
        assert_eq!(escapes(&out), 2);
        assert!(out.contains("abcd"));
    }

    #[test]
    fn render_color_runs_across_rows() {
        let mut c = Canvas::new(2, 2);
        for y in 0..2 {
            c.put_text(0, y, "xx", Ink::fg(Color::Blue));
        }
        let out = c.render();
        assert_eq!(escapes(&out), 2);
        assert!(out.contains("xx\r\nxx"));
    }

    #[test]
    fn render_resets_before_default_cells() {
        let mut c = Canvas::new(3, 1);
        c.put_char(0, 0, 'a', Ink::fg(Color::Green));
        c.put_char(2, 0, 'b', Ink::fg(Color::Green));
        let out = c.render();
        // green, reset, green, reset
        assert_eq!(escapes(&out), 4);
    }

    #[test]
    fn render_background_switch() {
        let mut c = Canvas::new(2, 1);
        c.put_char(0, 0, 'a', Ink::on(Color::Black, Color::White));
        c.put_char(1, 0, 'b', Ink::on(Color::Black, Color::White));
        let out = c.render();
        // fg + bg once, reset once
        assert_eq!(escapes(&out), 3);
    }
}
