/// Winter Hush: snow falls, a small shelter moves under it, and some
/// flakes carry a whisper that is revealed when the shelter catches them.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::WinterHushConfig;
use crate::domain::catch::{CatchRule, Tolerance};
use crate::domain::entity::{Entity, Kind};
use crate::sim::clock::SpawnWindow;
use crate::sim::event::SimEvent;
use crate::sim::step::SimRng;
use crate::sim::world::World;
use crate::ui::canvas::{Canvas, Ink};
use crate::ui::input::{Command, KeyMap};
use crate::ui::theme::{self, Role, Theme};
use super::{truncate_end, Zine};

const FLAKES: &[char] = &['❄', '❅', '❆', '*', '·', '•', '○'];

const WHISPERS: [&str; 15] = [
    "winter whispers secrets",
    "silence falls like snow",
    "each flake a memory",
    "cold breath on glass",
    "footprints fade away",
    "the world sleeps white",
    "stars hide behind clouds",
    "time moves slowly here",
    "everything is hushed",
    "beauty in the quiet",
    "snow covers all wounds",
    "peace in the falling",
    "white blanket of dreams",
    "winter's gentle touch",
    "stillness speaks volumes",
];

const TRAIL_LEN: usize = 5;
const INSTRUCTIONS: &str = "Move with ← → to catch snowflakes. Press 'q' to quit.";

pub struct WinterHush {
    spawn: SpawnWindow,
    tolerance: Tolerance,
    payload_chance: f64,
    /// Whispers not yet caught.
    pool: Vec<&'static str>,
    cursor_x: i32,
}

impl WinterHush {
    pub fn new(config: &WinterHushConfig) -> Self {
        WinterHush {
            spawn: config.spawn,
            tolerance: config.tolerance,
            payload_chance: config.payload_chance,
            pool: WHISPERS.to_vec(),
            cursor_x: 0,
        }
    }

    pub fn cursor_x(&self) -> i32 {
        self.cursor_x
    }

    fn shelter_row(world: &World) -> i32 {
        world.height as i32 - 2
    }
}

impl Zine for WinterHush {
    fn title(&self) -> &'static str { "Winter Hush" }

    fn subtitle(&self) -> Option<&'static str> { Some("Issue #1 - A TinyTUI Experience") }

    fn theme(&self) -> Theme { theme::WINTER }

    fn keymap(&self) -> KeyMap { KeyMap::navigation() }

    fn spawn_window(&self) -> Option<SpawnWindow> {
        Some(self.spawn)
    }

    fn setup(&mut self, world: &mut World, _rng: &mut SimRng, _events: &mut Vec<SimEvent>) {
        self.cursor_x = world.width as i32 / 2;
    }

    fn spawn(&mut self, world: &mut World, rng: &mut SimRng, events: &mut Vec<SimEvent>) {
        let max_x = (world.width as f32 - 1.0).max(1.0);
        let flake = FLAKES.choose(rng).copied().unwrap_or('*');
        let mut entity = Entity::new(Kind::Snowflake, rng.gen_range(0.0..max_x), 0.0, flake.to_string())
            .moving(rng.gen_range(-0.1..0.1), rng.gen_range(0.1..0.3));
        if rng.gen_bool(self.payload_chance) {
            if let Some(whisper) = self.pool.choose(rng) {
                entity = entity.with_payload(*whisper);
            }
        }
        world.spawn(entity, events);
    }

    fn handle(&mut self, cmd: Command, world: &mut World, _rng: &mut SimRng, _events: &mut Vec<SimEvent>) {
        if let Command::MoveCursor { dx, .. } = cmd {
            let max_x = (world.width as i32 - 1).max(0);
            self.cursor_x = (self.cursor_x + dx).clamp(0, max_x);
        }
    }

    fn after_update(&mut self, world: &mut World, _rng: &mut SimRng, events: &mut Vec<SimEvent>) {
        let rule = CatchRule::Proximity {
            cx: self.cursor_x as f32,
            cy: Self::shelter_row(world) as f32,
            tolerance: self.tolerance,
        };
        let n = world.catch(rule, events);
        for whisper in world.recent_catches(n) {
            self.pool.retain(|w| w != whisper);
        }
    }

    fn ink_for(&self, entity: &Entity, theme: &Theme) -> Ink {
        if entity.is_caught() {
            theme.secondary
        } else if entity.payload.is_some() {
            theme.accent
        } else {
            theme.primary
        }
    }

    fn draw_hud(&self, world: &World, theme: &Theme, canvas: &mut Canvas) {
        canvas.put_char(self.cursor_x, Self::shelter_row(world), '^', theme.text);

        let bottom = world.height as i32 - 1;
        if world.caught.is_empty() {
            if INSTRUCTIONS.chars().count() <= world.width {
                canvas.put_centered(bottom, INSTRUCTIONS, theme.secondary);
            }
        } else {
            let trail = world.recent_catches(TRAIL_LEN).join(" • ");
            let trail = truncate_end(&trail, world.width.saturating_sub(2));
            canvas.put_text(1, bottom, &trail, theme.secondary);
        }
    }

    fn summary(&self, world: &World) -> Vec<(Role, String)> {
        let mut lines = vec![(Role::Accent, self.title().to_string()), (Role::Text, String::new())];
        if world.caught.is_empty() {
            lines.push((Role::Secondary, "The snow falls silently...".into()));
        } else {
            lines.push((Role::Primary, "You caught these whispers:".into()));
            lines.extend(world.caught.iter().map(|w| (Role::Secondary, format!("  • {w}"))));
        }
        lines
    }
}
