/// Fragments.txt: words fall past a catch zone; space snags whatever is
/// inside it and the caught words are stitched into a story.

use crossterm::style::Color;
use log::trace;
use rand::Rng;

use crate::config::FragmentsConfig;
use crate::domain::catch::CatchRule;
use crate::domain::entity::{Entity, Kind};
use crate::sim::clock::SpawnWindow;
use crate::sim::event::SimEvent;
use crate::sim::step::SimRng;
use crate::sim::world::World;
use crate::ui::canvas::{Canvas, Ink};
use crate::ui::input::{Command, KeyMap, SpaceAction};
use crate::ui::theme::{self, Role, Theme};
use super::{truncate_start, word_wrap, Zine};

const WORDS: &[&str] = &[
    "memory", "fragments", "scattered", "thoughts", "broken", "pieces",
    "whispers", "echoes", "remnants", "traces", "shadows", "glimpses",
    "fleeting", "moments", "lost", "words", "fading", "dreams",
    "half", "remembered", "stories", "untold", "secrets", "hidden",
    "meanings", "between", "lines", "spaces", "silence", "speaks",
    "volumes", "unspoken", "truths", "buried", "deep", "within",
    "consciousness", "streams", "flowing", "endless", "rivers",
    "time", "carries", "everything", "away", "nothing", "remains",
    "except", "these", "small", "fragments", "of", "what", "was",
    "once", "whole", "now", "scattered", "like", "leaves", "in",
    "autumn", "wind", "gathering", "them", "together", "again",
    "piece", "by", "piece", "slowly", "rebuilding", "the", "story",
];

const ZONE_MARKER: &str = "[ CATCH ZONE ]";
const TRAIL_LEN: usize = 8;
const STORY_WIDTH: usize = 60;
const INSTRUCTIONS: &str = "Press SPACE to catch fragments in the catch zone. 'q' to quit.";

pub struct Fragments {
    spawn: SpawnWindow,
    band: f32,
    zone_offset: usize,
    /// Words still to fall; one copy leaves per catch.
    pool: Vec<&'static str>,
}

impl Fragments {
    pub fn new(config: &FragmentsConfig) -> Self {
        Fragments {
            spawn: config.spawn,
            band: config.catch_band,
            zone_offset: config.zone_offset,
            pool: WORDS.to_vec(),
        }
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    fn zone_row(&self, world: &World) -> i32 {
        world.height as i32 - self.zone_offset as i32
    }
}

/// Green glow scaled by what is left of the catch fade.
fn glow(fade: f32) -> Ink {
    let f = fade.clamp(0.0, 1.0);
    Ink::fg(Color::Rgb {
        r: (100.0 * f) as u8,
        g: (255.0 * f) as u8,
        b: (150.0 * f) as u8,
    })
}

impl Zine for Fragments {
    fn title(&self) -> &'static str { "Fragments.txt" }

    fn subtitle(&self) -> Option<&'static str> { Some("Issue #2 - A TinyTUI Experience") }

    fn theme(&self) -> Theme { theme::NEBULA }

    fn keymap(&self) -> KeyMap {
        KeyMap::navigation().with_space(SpaceAction::Catch)
    }

    fn spawn_window(&self) -> Option<SpawnWindow> {
        Some(self.spawn)
    }

    fn spawn(&mut self, world: &mut World, rng: &mut SimRng, events: &mut Vec<SimEvent>) {
        if self.pool.is_empty() {
            trace!("fragment pool exhausted");
            return;
        }
        let word = self.pool[rng.gen_range(0..self.pool.len())];
        let room = world.width as f32 - word.chars().count() as f32 - 1.0;
        let x = if room > 0.0 { rng.gen_range(0.0..room) } else { 0.0 };
        let entity = Entity::new(Kind::Fragment, x, 0.0, word)
            .moving(0.0, rng.gen_range(0.2..0.5))
            .with_payload(word);
        world.spawn(entity, events);
    }

    fn handle(&mut self, cmd: Command, world: &mut World, _rng: &mut SimRng, _events: &mut Vec<SimEvent>) {
        if cmd == Command::CatchAttempt {
            world.catch_requested = true;
        }
    }

    fn after_update(&mut self, world: &mut World, _rng: &mut SimRng, events: &mut Vec<SimEvent>) {
        if !world.catch_requested { return; }
        let rule = CatchRule::Zone { row: self.zone_row(world) as f32, band: self.band };
        let n = world.catch(rule, events);
        for word in world.recent_catches(n) {
            if let Some(i) = self.pool.iter().position(|w| w == word) {
                self.pool.swap_remove(i);
            }
        }
    }

    fn ink_for(&self, entity: &Entity, theme: &Theme) -> Ink {
        if entity.is_caught() {
            glow(entity.opacity())
        } else {
            theme.primary
        }
    }

    fn draw_hud(&self, world: &World, theme: &Theme, canvas: &mut Canvas) {
        canvas.put_centered(self.zone_row(world), ZONE_MARKER, theme.accent);

        let h = world.height as i32;
        if world.caught.is_empty() {
            if INSTRUCTIONS.chars().count() <= world.width {
                canvas.put_centered(h - 2, INSTRUCTIONS, theme.secondary);
            }
            return;
        }

        let trail = world.recent_catches(TRAIL_LEN).join(" → ");
        let trail = truncate_start(&trail, world.width.saturating_sub(2));
        canvas.put_text(1, h - 4, "Caught:", theme.secondary);
        canvas.put_text(1, h - 3, &trail, theme.text);

        let count = format!("Fragments caught: {}", world.caught.len());
        let x = world.width as i32 - count.chars().count() as i32 - 1;
        canvas.put_text(x, h - 2, &count, theme.secondary);
    }

    fn summary(&self, world: &World) -> Vec<(Role, String)> {
        let mut lines = vec![(Role::Accent, self.title().to_string()), (Role::Text, String::new())];
        if world.caught.is_empty() {
            lines.push((Role::Secondary, "The fragments scattered in the wind...".into()));
            return lines;
        }
        lines.push((Role::Primary, "You stitched together these fragments:".into()));
        let story = world.caught.join(" ");
        lines.extend(word_wrap(&story, STORY_WIDTH).into_iter().map(|l| (Role::Secondary, format!("  {l}"))));
        lines.push((Role::Text, String::new()));
        lines.push((Role::Text, format!("Total fragments: {}", world.caught.len())));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZineConfig;
    use rand::SeedableRng;

    fn fresh() -> (Fragments, World, SimRng) {
        let zine = Fragments::new(&ZineConfig::default().fragments);
        (zine, World::new(80, 24, 0.05), SimRng::seed_from_u64(8))
    }

    #[test]
    fn words_spawn_at_top_with_payload() {
        let (mut zine, mut world, mut rng) = fresh();
        let mut events = vec![];
        for _ in 0..30 {
            zine.spawn(&mut world, &mut rng, &mut events);
        }
        for e in world.store.iter() {
            assert_eq!(e.y, 0.0);
            assert_eq!(e.payload.as_deref(), Some(e.text.as_str()));
            assert!(e.x + e.text.len() as f32 <= 80.0);
        }
    }

    #[test]
    fn catch_needs_an_attempt() {
        let (mut zine, mut world, mut rng) = fresh();
        let mut events = vec![];
        world.spawn(Entity::new(Kind::Fragment, 3.0, 16.5, "memory").with_payload("memory"), &mut events);

        zine.after_update(&mut world, &mut rng, &mut events);
        assert!(world.caught.is_empty());

        zine.handle(Command::CatchAttempt, &mut world, &mut rng, &mut events);
        zine.after_update(&mut world, &mut rng, &mut events);
        assert_eq!(world.caught, vec!["memory".to_string()]);
        assert_eq!(zine.pool_len(), WORDS.len() - 1);
    }

    #[test]
    fn words_outside_band_escape() {
        let (mut zine, mut world, mut rng) = fresh();
        let mut events = vec![];
        world.spawn(Entity::new(Kind::Fragment, 3.0, 14.5, "traces").with_payload("traces"), &mut events);
        world.catch_requested = true;
        zine.after_update(&mut world, &mut rng, &mut events);
        assert!(world.caught.is_empty());
    }

    #[test]
    fn exhausted_pool_skips_spawn() {
        let (mut zine, mut world, mut rng) = fresh();
        zine.pool.clear();
        let mut events = vec![];
        zine.spawn(&mut world, &mut rng, &mut events);
        assert!(world.store.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn glow_dims_with_fade() {
        assert_eq!(glow(1.0), Ink::fg(Color::Rgb { r: 100, g: 255, b: 150 }));
        assert_eq!(glow(0.0), Ink::fg(Color::Rgb { r: 0, g: 0, b: 0 }));
        assert_eq!(glow(0.5), Ink::fg(Color::Rgb { r: 50, g: 127, b: 75 }));
    }

    #[test]
    fn hud_trail_and_counter() {
        let (zine, mut world, _) = fresh();
        let mut canvas = Canvas::new(80, 24);
        zine.draw_hud(&world, &theme::NEBULA, &mut canvas);
        assert!(canvas.row_text(16).contains(ZONE_MARKER));
        assert!(canvas.row_text(22).contains("Press SPACE"));

        world.caught = vec!["silence".into(), "speaks".into(), "volumes".into()];
        canvas.clear();
        zine.draw_hud(&world, &theme::NEBULA, &mut canvas);
        assert_eq!(canvas.row_text(20).trim_end(), " Caught:");
        assert_eq!(canvas.row_text(21).trim_end(), " silence → speaks → volumes");
        assert!(canvas.row_text(22).trim_end().ends_with("Fragments caught: 3"));
    }

    #[test]
    fn summary_wraps_story() {
        let (zine, mut world, _) = fresh();
        world.caught = std::iter::repeat("rebuilding".to_string()).take(20).collect();
        let lines = zine.summary(&world);
        let story: Vec<_> = lines.iter().filter(|(r, _)| *r == Role::Secondary).collect();
        assert!(story.len() > 1);
        assert!(story.iter().all(|(_, l)| l.len() <= STORY_WIDTH + 2));
        assert_eq!(lines.last().unwrap().1, "Total fragments: 20");
    }
}
