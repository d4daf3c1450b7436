/// TTYKit sampler: the house components drawn in each of the kit themes.
///
/// The kit carries its own theme rotation, so the run theme handed to
/// `draw_hud` is ignored here.

use crate::sim::event::SimEvent;
use crate::sim::step::SimRng;
use crate::sim::world::World;
use crate::ui::canvas::{Canvas, Ink};
use crate::ui::input::{Command, KeyMap, SpaceAction};
use crate::ui::theme::{self, Role, Theme};
use super::Zine;

const KIT_THEMES: [Theme; 3] = [theme::GRUVBOX_LIGHT, theme::SOLARIZED_DARK, theme::FUNCTIONAL];

const BUTTON_AT: (i32, i32) = (10, 5);
const BAR_AT: (i32, i32) = (10, 7);
const BAR_WIDTH: usize = 20;
const PROGRESS: f32 = 0.75;
const MODAL_WIDTH: usize = 40;

// ── Components ──

/// `[ label ]`, followed by an accent `>` while selected.
pub fn button(canvas: &mut Canvas, x: i32, y: i32, label: &str, selected: bool, theme: &Theme) {
    let face = format!("[ {label} ]");
    canvas.put_text(x, y, &face, theme.primary);
    if selected {
        canvas.put_char(x + face.chars().count() as i32, y, '>', theme.accent);
    }
}

/// Bordered box centered on the canvas, with a title row and a separator.
/// Returns the top-left corner it was drawn at.
pub fn modal(canvas: &mut Canvas, title: &str, lines: &[&str], width: usize, theme: &Theme) -> (i32, i32) {
    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let w = width.max(widest + 4).max(title.chars().count() + 4) as i32;
    let h = lines.len() as i32 + 4;
    let x = (canvas.width() as i32 - w) / 2;
    let y = (canvas.height() as i32 - h) / 2;

    canvas.draw_box(x, y, w, h, theme.border);
    let inner = w - 2;
    canvas.fill_row(x + 1, y + 1, inner, ' ', theme.primary);
    put_middle(canvas, x + 1, y + 1, inner, title, theme.accent);
    canvas.put_char(x, y + 2, '├', theme.border);
    canvas.fill_row(x + 1, y + 2, inner, '─', theme.border);
    canvas.put_char(x + w - 1, y + 2, '┤', theme.border);
    for (i, line) in lines.iter().enumerate() {
        let row = y + 3 + i as i32;
        canvas.fill_row(x + 1, row, inner, ' ', theme.primary);
        put_middle(canvas, x + 1, row, inner, line, theme.primary);
    }
    (x, y)
}

/// `[ ####      ] 75%`
pub fn progress_bar(canvas: &mut Canvas, x: i32, y: i32, progress: f32, width: usize, theme: &Theme) {
    let progress = progress.clamp(0.0, 1.0);
    let filled = (progress * width as f32) as usize;
    canvas.put_text(x, y, "[ ", theme.text);
    let bar_x = x + 2;
    canvas.fill_row(bar_x, y, filled as i32, '#', theme.accent);
    canvas.fill_row(bar_x + filled as i32, y, (width - filled) as i32, ' ', theme.secondary);
    let tail = format!(" ] {}%", (progress * 100.0) as u32);
    canvas.put_text(bar_x + width as i32, y, &tail, theme.text);
}

fn put_middle(canvas: &mut Canvas, x: i32, y: i32, span: i32, text: &str, ink: Ink) {
    let pad = (span - text.chars().count() as i32).max(0) / 2;
    canvas.put_text(x + pad, y, text, ink);
}

// ── Sampler ──

pub struct TtyKit {
    theme: usize,
    selected: bool,
    /// Kit themes shown at least once.
    seen: [bool; 3],
}

impl Default for TtyKit {
    fn default() -> Self {
        Self::new()
    }
}

impl TtyKit {
    pub fn new() -> Self {
        TtyKit { theme: 0, selected: true, seen: [true, false, false] }
    }

    pub fn kit_theme(&self) -> Theme {
        KIT_THEMES[self.theme]
    }

    pub fn selected(&self) -> bool {
        self.selected
    }
}

impl Zine for TtyKit {
    fn title(&self) -> &'static str { "TTYKit Sampler" }

    fn theme(&self) -> Theme { KIT_THEMES[0] }

    fn keymap(&self) -> KeyMap {
        KeyMap::navigation().with_space(SpaceAction::ToggleMode)
    }

    fn handle(&mut self, cmd: Command, _world: &mut World, _rng: &mut SimRng, _events: &mut Vec<SimEvent>) {
        match cmd {
            Command::MoveCursor { dy: -1, .. } => self.selected = false,
            Command::MoveCursor { dy: 1, .. } => self.selected = true,
            Command::ToggleMode => {
                self.theme = (self.theme + 1) % KIT_THEMES.len();
                self.seen[self.theme] = true;
            }
            _ => {}
        }
    }

    fn draw_hud(&self, world: &World, _run_theme: &Theme, canvas: &mut Canvas) {
        let t = self.kit_theme();
        canvas.put_centered(2, "TTYKit Sampler - arrows toggle the button, SPACE switches theme", t.text);

        button(canvas, BUTTON_AT.0, BUTTON_AT.1, "Click Me", self.selected, &t);
        progress_bar(canvas, BAR_AT.0, BAR_AT.1, PROGRESS, BAR_WIDTH, &t);
        modal(canvas, "Welcome to TTYKit", &["Small parts for terminal pages.", t.name], MODAL_WIDTH, &t);

        let status = format!(" Theme {}/{}: {}  |  q to quit", self.theme + 1, KIT_THEMES.len(), t.name);
        let h = world.height as i32;
        canvas.fill_row(0, h - 1, world.width as i32, ' ', t.accent);
        canvas.put_text(0, h - 1, &status, t.accent);
    }

    fn summary(&self, _world: &World) -> Vec<(Role, String)> {
        let seen: Vec<&str> = KIT_THEMES
            .iter()
            .zip(self.seen)
            .filter(|(_, s)| *s)
            .map(|(t, _)| t.name)
            .collect();
        vec![
            (Role::Accent, self.title().to_string()),
            (Role::Text, String::new()),
            (Role::Secondary, format!("Themes tried: {}", seen.join(", "))),
        ]
    }
}
