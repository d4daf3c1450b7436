/// Echo Chamber: typed lines come back as echoes that distort, then fade.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::entity::{Entity, Kind};
use crate::domain::visual::distort;
use crate::sim::event::SimEvent;
use crate::sim::step::SimRng;
use crate::sim::world::World;
use crate::ui::canvas::{Canvas, Ink};
use crate::ui::input::{Command, KeyMap};
use crate::ui::theme::{self, Role, Theme};
use super::Zine;

const MAX_INPUT: usize = 100;
const RESPONSE_CHANCE: f64 = 0.3;
/// Echoes kept when the echo area runs out of rows (fewer on short terminals).
const KEEP_ON_FULL: usize = 10;
const FIRST_ROW: i32 = 5;
const PROMPT: &str = "Say something: ";

const RESPONSES: &[&str] = &[
    "hello... hello... hello...",
    "is anyone there?",
    "the void stares back",
    "your words dissolve here",
    "echo... echo... echo...",
    "silence speaks louder",
    "digital ghosts whisper",
    "fragments of meaning",
    "lost in translation",
    "the chamber remembers",
    "words become noise",
    "meaning fades away",
    "only echoes remain",
];

const WELCOME: [&str; 3] = [
    "Welcome to the echo chamber...",
    "  Your words will be transformed here",
    "    Speak into the digital void",
];

#[derive(Default)]
pub struct EchoChamber {
    input: String,
    echo_count: u32,
}

impl EchoChamber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    fn add_echo(world: &mut World, rng: &mut SimRng, text: &str, delay: i32, events: &mut Vec<SimEvent>) {
        if text.trim().is_empty() { return; }
        let floor = world.height as i32 - 6;
        let mut row = FIRST_ROW + 2 * world.store.len() as i32;
        if row >= floor {
            let fits = ((floor - FIRST_ROW) / 2).max(0) as usize;
            world.store.keep_latest(KEEP_ON_FULL.min(fits), events);
            row = FIRST_ROW + 2 * world.store.len() as i32;
        }
        let len = text.chars().count() as i32;
        let max_x = (world.width as i32 - len - 2).max(2);
        let x = rng.gen_range(2..=max_x);
        world.spawn(Entity::new(Kind::Echo, x as f32, (row + delay) as f32, text), events);
    }

    /// Echo a submitted line with its variations.
    fn process(&mut self, text: &str, world: &mut World, rng: &mut SimRng, events: &mut Vec<SimEvent>) {
        if text.trim().is_empty() { return; }
        Self::add_echo(world, rng, &format!("> {text}"), 0, events);

        let variations = variations(text);
        for (i, v) in variations.iter().enumerate() {
            if v != text {
                Self::add_echo(world, rng, &format!("  {v}"), i as i32 + 1, events);
            }
        }
        if rng.gen_bool(RESPONSE_CHANCE) {
            if let Some(response) = RESPONSES.choose(rng) {
                let delay = variations.len() as i32 + 1;
                Self::add_echo(world, rng, &format!("    [{response}]"), delay, events);
            }
        }
        self.echo_count += 1;
    }
}

/// Lowercase, uppercase, reversed and word-reversed forms of `text`.
fn variations(text: &str) -> [String; 4] {
    [
        text.to_lowercase(),
        text.to_uppercase(),
        text.chars().rev().collect(),
        text.split_whitespace().rev().collect::<Vec<_>>().join(" "),
    ]
}

/// Distortion seed for an echo at its current age.
fn glitch_seed(entity: &Entity) -> u64 {
    entity.id.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ u64::from(entity.age)
}

impl Zine for EchoChamber {
    fn title(&self) -> &'static str { "Echo Chamber" }

    fn subtitle(&self) -> Option<&'static str> { Some("Issue #4 - A TinyTUI Experience") }

    fn theme(&self) -> Theme { theme::MINIMAL }

    fn keymap(&self) -> KeyMap { KeyMap::text_entry() }

    fn setup(&mut self, world: &mut World, rng: &mut SimRng, events: &mut Vec<SimEvent>) {
        for line in WELCOME {
            Self::add_echo(world, rng, line, 0, events);
        }
    }

    fn handle(&mut self, cmd: Command, world: &mut World, rng: &mut SimRng, events: &mut Vec<SimEvent>) {
        match cmd {
            Command::AppendChar(c) => {
                if self.input.chars().count() < MAX_INPUT {
                    self.input.push(c);
                }
            }
            Command::DeleteChar => {
                self.input.pop();
            }
            Command::Submit => {
                let line = std::mem::take(&mut self.input);
                self.process(&line, world, rng, events);
            }
            _ => {}
        }
    }

    fn ink_for(&self, entity: &Entity, theme: &Theme) -> Ink {
        let fade = entity.opacity();
        if fade >= 0.8 {
            theme.primary
        } else if fade >= 0.5 {
            theme.text
        } else {
            theme.secondary
        }
    }

    fn draw_entity(&self, entity: &Entity, _world: &World, theme: &Theme, canvas: &mut Canvas) {
        let (x, y) = entity.cell();
        let text = distort(&entity.text, entity.distortion(), glitch_seed(entity));
        canvas.put_text(x, y, &text, self.ink_for(entity, theme));
    }

    fn draw_hud(&self, world: &World, theme: &Theme, canvas: &mut Canvas) {
        let (w, h) = (world.width, world.height as i32);
        canvas.put_centered(1, "ECHO CHAMBER", theme.accent);
        let subtitle = "Type and press ENTER to echo into the void";
        if subtitle.len() <= w {
            canvas.put_centered(2, subtitle, theme.secondary);
        }

        let input_row = h - 4;
        canvas.put_text(0, input_row, PROMPT, theme.accent);
        let room = w.saturating_sub(PROMPT.len() + 2);
        let shown: String = {
            let len = self.input.chars().count();
            self.input.chars().skip(len.saturating_sub(room)).collect()
        };
        let x = PROMPT.len() as i32;
        canvas.put_text(x, input_row, &shown, theme.text);
        canvas.put_char(x + shown.chars().count() as i32, input_row, '_', theme.primary);

        let stats = format!(
            "Echoes created: {} | Active: {} | Ctrl-C to quit",
            self.echo_count,
            world.store.len()
        );
        if stats.len() <= w {
            canvas.put_text(0, h - 2, &stats, theme.secondary);
        }
    }

    fn summary(&self, _world: &World) -> Vec<(Role, String)> {
        let mut lines = vec![
            (Role::Accent, self.title().to_string()),
            (Role::Text, String::new()),
            (Role::Primary, "Your words have joined the eternal echo...".to_string()),
            (Role::Text, String::new()),
        ];
        if self.echo_count > 0 {
            lines.push((Role::Secondary, format!("You created {} echoes in the digital void.", self.echo_count)));
            lines.push((Role::Secondary, "Each one a fragment of meaning, transformed by repetition.".into()));
        } else {
            lines.push((Role::Secondary, "The chamber remains silent, waiting for your voice...".into()));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn started() -> (EchoChamber, World, SimRng) {
        let mut zine = EchoChamber::new();
        let mut world = World::new(80, 40, 0.05);
        let mut rng = SimRng::seed_from_u64(21);
        zine.setup(&mut world, &mut rng, &mut vec![]);
        (zine, world, rng)
    }

    fn type_line(zine: &mut EchoChamber, world: &mut World, rng: &mut SimRng, line: &str) {
        for c in line.chars() {
            zine.handle(Command::AppendChar(c), world, rng, &mut vec![]);
        }
        zine.handle(Command::Submit, world, rng, &mut vec![]);
    }

    #[test]
    fn three_welcome_echoes() {
        let (_, world, _) = started();
        let rows: Vec<f32> = world.store.iter().map(|e| e.y).collect();
        assert_eq!(rows, vec![5.0, 7.0, 9.0]);
    }

    #[test]
    fn variations_that_differ_are_echoed() {
        let (mut zine, mut world, mut rng) = started();
        let before = world.store.len();
        type_line(&mut zine, &mut world, &mut rng, "hello there");
        let texts: Vec<&str> = world.store.iter().skip(before).map(|e| e.text.as_str()).collect();
        assert_eq!(texts[0], "> hello there");
        // lowercase equals the input, so it is skipped
        assert!(!texts.contains(&"  hello there"));
        assert!(texts.contains(&"  HELLO THERE"));
        assert!(texts.contains(&"  ereht olleh"));
        assert!(texts.contains(&"  there hello"));
        assert!(zine.input().is_empty());
    }

    #[test]
    fn blank_submit_does_nothing() {
        let (mut zine, mut world, mut rng) = started();
        type_line(&mut zine, &mut world, &mut rng, "   ");
        assert_eq!(world.store.len(), 3);
        assert_eq!(zine.echo_count, 0);
    }

    #[test]
    fn input_is_capped_and_editable() {
        let (mut zine, mut world, mut rng) = started();
        for _ in 0..150 {
            zine.handle(Command::AppendChar('q'), &mut world, &mut rng, &mut vec![]);
        }
        assert_eq!(zine.input().len(), MAX_INPUT);
        zine.handle(Command::DeleteChar, &mut world, &mut rng, &mut vec![]);
        assert_eq!(zine.input().len(), MAX_INPUT - 1);
    }

    #[test]
    fn full_area_keeps_latest_ten() {
        let mut zine = EchoChamber::new();
        let mut world = World::new(80, 24, 0.05);
        let mut rng = SimRng::seed_from_u64(2);
        for i in 0..12 {
            type_line(&mut zine, &mut world, &mut rng, &format!("Line {i}"));
        }
        assert!(world.store.len() <= 16);
        assert!(world.store.iter().all(|e| e.y < 24.0));
    }

    #[test]
    fn distortion_is_stable_for_an_age() {
        let (_, world, _) = started();
        let mut e = world.store.iter().next().unwrap().clone();
        e.age = 45;
        let a = distort(&e.text, e.distortion(), glitch_seed(&e));
        let b = distort(&e.text, e.distortion(), glitch_seed(&e));
        assert_eq!(a, b);
        assert_ne!(a, e.text);
    }

    #[test]
    fn color_follows_fade() {
        let zine = EchoChamber::new();
        let t = theme::MINIMAL;
        let mut e = Entity::new(Kind::Echo, 0.0, 0.0, "x");
        e.age = 10;
        assert_eq!(zine.ink_for(&e, &t), t.primary);
        e.age = 56; // fade 0.3 gone: opacity 0.7
        assert_eq!(zine.ink_for(&e, &t), t.text);
        e.age = 62; // opacity 0.4
        assert_eq!(zine.ink_for(&e, &t), t.secondary);
    }

    #[test]
    fn hud_prompt_and_cursor() {
        let (mut zine, mut world, mut rng) = started();
        zine.handle(Command::AppendChar('h'), &mut world, &mut rng, &mut vec![]);
        zine.handle(Command::AppendChar('i'), &mut world, &mut rng, &mut vec![]);
        let mut canvas = Canvas::new(80, 40);
        zine.draw_hud(&world, &theme::MINIMAL, &mut canvas);
        assert!(canvas.row_text(36).starts_with("Say something: hi_"));
        assert!(canvas.row_text(1).contains("ECHO CHAMBER"));
        assert!(canvas.row_text(38).starts_with("Echoes created: 0 | Active: 3"));
    }

    #[test]
    fn summary_counts_echoes() {
        let (mut zine, mut world, mut rng) = started();
        let quiet = zine.summary(&world);
        assert!(quiet.iter().any(|(_, l)| l.contains("remains silent")));
        type_line(&mut zine, &mut world, &mut rng, "anyone");
        let lines = zine.summary(&world);
        assert!(lines.iter().any(|(_, l)| l == "You created 1 echoes in the digital void."));
    }
}
