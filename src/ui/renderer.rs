/// Presentation layer: frame composition and the terminal sink.
///
/// How it works:
///   1. `compose_frame` clears the canvas, paints every live entity through
///      its zine, then the zine HUD on top, and serializes the grid
///   2. `present` writes that string at the home position and flushes once
///   3. `print_summary` runs after `cleanup`, on the restored terminal
///
/// Composition is pure, so every frame can be checked without a terminal.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::error::{Result, ZineError};
use crate::sim::world::World;
use crate::zines::Zine;
use super::canvas::Canvas;
use super::theme::{Role, Theme};

/// Paint one frame of `world` and return it serialized.
pub fn compose_frame(world: &World, zine: &dyn Zine, theme: &Theme, canvas: &mut Canvas) -> String {
    canvas.clear();
    for entity in world.store.iter() {
        zine.draw_entity(entity, world, theme, canvas);
    }
    zine.draw_hud(world, theme, canvas);
    canvas.render()
}

/// Title card shown before an issue: title in accent, subtitle below it.
pub fn compose_splash(title: &str, subtitle: &str, theme: &Theme, canvas: &mut Canvas) -> String {
    canvas.clear();
    let mid = canvas.height() as i32 / 2;
    canvas.put_centered(mid - 1, title, theme.accent);
    canvas.put_centered(mid, subtitle, theme.secondary);
    canvas.render()
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    active: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            active: false,
        }
    }

    pub fn init(&mut self) -> Result<()> {
        terminal::enable_raw_mode().map_err(ZineError::Terminal)?;
        self.active = true;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )
        .map_err(ZineError::Terminal)
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn cleanup(&mut self) -> Result<()> {
        if !self.active { return Ok(()); }
        self.active = false;
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Write a composed frame over the previous one in a single flush.
    pub fn present(&mut self, frame: &str) -> Result<()> {
        queue!(self.writer, MoveTo(0, 0), Print(frame))?;
        self.writer.flush()?;
        Ok(())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        // Last resort on panic paths; errors have nowhere to go here.
        let _ = self.cleanup();
    }
}

/// Print the closing lines of a run in the run's colors.
pub fn print_summary(lines: &[(Role, String)], theme: &Theme) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out)?;
    for (role, line) in lines {
        match theme.role(*role).fg {
            Some(color) => queue!(out, SetForegroundColor(color), Print(line), ResetColor, Print("\n"))?,
            None => queue!(out, Print(line), Print("\n"))?,
        }
    }
    out.flush()
}
