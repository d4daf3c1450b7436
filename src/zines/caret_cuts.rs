/// Caret Cuts: three small experiments with glyphs in motion.
///
/// Free symbols jitter in place, constellations orbit a shared center with
/// a breathing radius, micro-interactions burst around a point. Space moves
/// to the next experiment and wipes the grid; `s` swaps the symbol set.

use std::f32::consts::TAU;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::entity::{Entity, Kind, Motion, Orbit};
use crate::sim::clock::SpawnWindow;
use crate::sim::event::SimEvent;
use crate::sim::step::SimRng;
use crate::sim::world::World;
use crate::ui::canvas::{Canvas, Ink};
use crate::ui::input::{Command, KeyMap, SpaceAction};
use crate::ui::theme::{self, Role, Theme};
use super::Zine;

const SYMBOL_SETS: [(&str, &[char]); 5] = [
    ("basic", &['*', '+', 'x', 'o', '.', '·', '•', '◦', '○', '●']),
    ("geometric", &['△', '▲', '▽', '▼', '◇', '◆', '□', '■', '◯', '◉']),
    ("arrows", &['↑', '↓', '←', '→', '↖', '↗', '↘', '↙', '↕', '↔']),
    ("math", &['∞', '∑', '∆', '∇', '∂', '∫', '√', '±', '≈', '≠']),
    ("misc", &['^', 'v', '<', '>', '~', '`', '\'', '"', '|', '-']),
];

/// Drift shared by free symbols and burst sparks.
const DRIFT: Motion = Motion::Jitter { chance: 0.1, dx: 0.5, dy: 0.3 };

const MAX_FREE: usize = 20;
const MAX_GROUPS: usize = 3;
const MAX_BURST_SYMBOLS: usize = 15;
/// Past this age every glyph is drawn in the secondary color.
const OLD_AGE: u32 = 200;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    FreeSymbols,
    Constellations,
    MicroInteractions,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::FreeSymbols => "Free Symbols",
            Mode::Constellations => "Constellations",
            Mode::MicroInteractions => "Micro-Interactions",
        }
    }

    fn index(self) -> usize {
        match self {
            Mode::FreeSymbols => 0,
            Mode::Constellations => 1,
            Mode::MicroInteractions => 2,
        }
    }

    fn next(self) -> Mode {
        match self {
            Mode::FreeSymbols => Mode::Constellations,
            Mode::Constellations => Mode::MicroInteractions,
            Mode::MicroInteractions => Mode::FreeSymbols,
        }
    }
}

pub struct CaretCuts {
    spawn: SpawnWindow,
    mode: Mode,
    set: usize,
    next_group: u32,
    manifested: u32,
}

impl CaretCuts {
    pub fn new(spawn: SpawnWindow) -> Self {
        CaretCuts { spawn, mode: Mode::FreeSymbols, set: 0, next_group: 0, manifested: 0 }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_name(&self) -> &'static str {
        SYMBOL_SETS[self.set].0
    }

    fn glyph(&self, rng: &mut SimRng) -> String {
        SYMBOL_SETS[self.set].1.choose(rng).copied().unwrap_or('*').to_string()
    }

    fn place(&mut self, world: &mut World, entity: Entity, events: &mut Vec<SimEvent>) {
        world.spawn(entity, events);
        self.manifested += 1;
    }

    fn spawn_free(&mut self, world: &mut World, rng: &mut SimRng, events: &mut Vec<SimEvent>) {
        let x = rng.gen_range(2..=(world.width as i32 - 3).max(2)) as f32;
        let y = rng.gen_range(2..=(world.height as i32 - 5).max(2)) as f32;
        let symbol = Entity::new(Kind::Symbol, x, y, self.glyph(rng))
            .with_motion(DRIFT)
            .pulsing(rng.gen_range(0.0..TAU), rng.gen_range(0.05..0.15));
        self.place(world, symbol, events);
    }

    fn spawn_constellation(&mut self, world: &mut World, rng: &mut SimRng, events: &mut Vec<SimEvent>) {
        self.next_group += 1;
        let group = self.next_group;
        let cx = rng.gen_range(10..=(world.width as i32 - 10).max(10)) as f32;
        let cy = rng.gen_range(5..=(world.height as i32 - 8).max(5)) as f32;
        let count = rng.gen_range(3..=7);
        let lifetime = rng.gen_range(200..500);
        // One speed per group, so the members turn as one body.
        let angular_speed = rng.gen_range(-0.02..0.02);

        for i in 0..count {
            let orbit = Orbit {
                cx,
                cy,
                base_radius: 3.0,
                breath_amplitude: 2.0,
                breath_rate: 0.02,
                phase: TAU * i as f32 / count as f32,
                angular_speed,
            };
            let (x, y) = orbit.position(0);
            let star = Entity::new(Kind::Orbiter, x, y, self.glyph(rng))
                .with_motion(Motion::Orbit(orbit))
                .with_max_age(lifetime)
                .in_group(group)
                .pulsing(rng.gen_range(0.0..TAU), rng.gen_range(0.03..0.08));
            self.place(world, star, events);
        }
    }

    fn spawn_burst(&mut self, world: &mut World, rng: &mut SimRng, events: &mut Vec<SimEvent>) {
        let cx = rng.gen_range(5..=(world.width as i32 - 5).max(5)) as f32;
        let cy = rng.gen_range(3..=(world.height as i32 - 5).max(3)) as f32;
        for _ in 0..rng.gen_range(3..=6) {
            let angle = rng.gen_range(0.0..TAU);
            let dist = rng.gen_range(1.0..4.0);
            let spark = Entity::new(Kind::Symbol, cx + dist * angle.cos(), cy + dist * angle.sin(), self.glyph(rng))
                .with_motion(DRIFT)
                .pulsing(0.0, rng.gen_range(0.1..0.3));
            self.place(world, spark, events);
        }
    }
}

impl Zine for CaretCuts {
    fn title(&self) -> &'static str { "Caret Cuts" }

    fn subtitle(&self) -> Option<&'static str> { Some("Issue #6 - Symbol Constellation Experiments") }

    fn theme(&self) -> Theme { theme::MINIMAL }

    fn keymap(&self) -> KeyMap {
        KeyMap::navigation().with_space(SpaceAction::ToggleMode).with_cycle('s')
    }

    fn spawn_window(&self) -> Option<SpawnWindow> {
        Some(self.spawn)
    }

    fn at_capacity(&self, world: &World) -> bool {
        match self.mode {
            Mode::FreeSymbols => world.store.count(Kind::Symbol) >= MAX_FREE,
            Mode::Constellations => world.store.group_count() >= MAX_GROUPS,
            Mode::MicroInteractions => world.store.count(Kind::Symbol) >= MAX_BURST_SYMBOLS,
        }
    }

    fn spawn(&mut self, world: &mut World, rng: &mut SimRng, events: &mut Vec<SimEvent>) {
        match self.mode {
            Mode::FreeSymbols => self.spawn_free(world, rng, events),
            Mode::Constellations => self.spawn_constellation(world, rng, events),
            Mode::MicroInteractions => self.spawn_burst(world, rng, events),
        }
    }

    fn handle(&mut self, cmd: Command, world: &mut World, _rng: &mut SimRng, events: &mut Vec<SimEvent>) {
        match cmd {
            Command::ToggleMode => {
                self.mode = self.mode.next();
                world.store.clear(events);
            }
            Command::Cycle => self.set = (self.set + 1) % SYMBOL_SETS.len(),
            _ => {}
        }
    }

    fn ink_for(&self, entity: &Entity, theme: &Theme) -> Ink {
        if entity.age > OLD_AGE {
            return theme.secondary;
        }
        let pulse = entity.pulse();
        if pulse > 0.7 {
            theme.accent
        } else if pulse > 0.4 {
            theme.primary
        } else {
            theme.secondary
        }
    }

    fn draw_hud(&self, world: &World, theme: &Theme, canvas: &mut Canvas) {
        let h = world.height as i32;
        canvas.put_centered(0, &format!("Caret Cuts - {}", self.mode.name()), theme.accent);

        let status = format!(
            "Mode: {} | Symbols: {} | Constellations: {} | Set: {}",
            self.mode.name(),
            world.store.count(Kind::Symbol),
            world.store.group_count(),
            self.set_name()
        );
        if status.chars().count() <= world.width {
            canvas.put_text(0, h - 2, &status, theme.text);
        }

        let controls = "SPACE: mode | S: symbol set | Q: quit";
        if controls.len() <= world.width {
            canvas.put_text(0, h - 1, controls, theme.secondary);
        }
    }

    fn summary(&self, _world: &World) -> Vec<(Role, String)> {
        vec![
            (Role::Accent, self.title().to_string()),
            (Role::Text, String::new()),
            (Role::Primary, "Symbol constellation experiments complete.".into()),
            (Role::Text, String::new()),
            (Role::Secondary, format!("Patterns explored: {}/3", self.mode.index() + 1)),
            (Role::Secondary, format!("Symbols manifested: {}", self.manifested)),
            (Role::Text, String::new()),
            (Role::Text, "The constellations fade, but their patterns remain in memory...".into()),
        ]
    }
}
