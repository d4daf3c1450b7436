/// The engine: advances one zine's world by one tick.
///
/// Processing order:
///   1. Spawn decision (timer, population cap, zine factory)
///   2. Commands drained this tick, in arrival order; `Quit` halts
///   3. Per-kind entity update and removal
///   4. Zine after-update work (catch evaluation, trimming)
///
/// Rendering is not part of a step: the run loop renders once per frame,
/// after however many steps the fixed-step clock asked for.

use log::{info, trace};
use rand::rngs::StdRng;

use crate::ui::input::Command;
use crate::ui::theme::Theme;
use crate::zines::Zine;
use super::clock::SpawnTimer;
use super::event::SimEvent;
use super::world::World;

/// The single RNG type threaded through the simulation.
pub type SimRng = StdRng;

pub struct Engine<'z> {
    pub world: World,
    pub zine: &'z mut dyn Zine,
    pub theme: Theme,
    spawner: Option<SpawnTimer>,
    rng: SimRng,
}

impl<'z> Engine<'z> {
    pub fn new(
        zine: &'z mut dyn Zine,
        width: usize,
        height: usize,
        tick_secs: f64,
        theme: Theme,
        mut rng: SimRng,
    ) -> Self {
        let mut world = World::new(width, height, tick_secs);
        let spawner = zine
            .spawn_window()
            .map(|window| SpawnTimer::from_window(window, tick_secs, &mut rng));
        let mut events = Vec::new();
        zine.setup(&mut world, &mut rng, &mut events);
        info!(
            "{} started on {width}x{height}, theme {}, {} entities at setup",
            zine.title(),
            theme.name,
            world.store.len()
        );
        Engine { world, zine, theme, spawner, rng }
    }

    pub fn running(&self) -> bool {
        self.world.running
    }

    pub fn step(&mut self, commands: &[Command]) -> Vec<SimEvent> {
        if !self.world.running { return vec![]; }

        let mut events = Vec::new();
        self.world.tick += 1;

        self.resolve_spawn(&mut events);

        for &cmd in commands {
            if cmd == Command::Quit {
                self.world.stop();
                break;
            }
            self.zine.handle(cmd, &mut self.world, &mut self.rng, &mut events);
            if !self.world.running { break; }
        }
        if !self.world.running {
            info!("{} stopped at tick {}", self.zine.title(), self.world.tick);
            return events;
        }

        let bounds = self.world.bounds();
        self.world.store.update(bounds, &mut self.rng, &mut events);
        self.zine.after_update(&mut self.world, &mut self.rng, &mut events);
        self.world.catch_requested = false;

        trace!("tick {}: {} entities", self.world.tick, self.world.store.len());
        events
    }

    fn resolve_spawn(&mut self, events: &mut Vec<SimEvent>) {
        let Some(timer) = self.spawner.as_mut() else { return };
        if !timer.tick(&mut self.rng) { return; }
        if self.zine.at_capacity(&self.world) {
            trace!("spawn suppressed at capacity");
            return;
        }
        self.zine.spawn(&mut self.world, &mut self.rng, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::config::ZineConfig;
    use crate::domain::entity::Kind;
    use crate::zines::fragments::Fragments;
    use crate::zines::winter_hush::WinterHush;

    fn rng() -> SimRng {
        StdRng::seed_from_u64(11)
    }

    fn spawned(events: &[SimEvent]) -> usize {
        events.iter().filter(|e| matches!(e, SimEvent::Spawned { .. })).count()
    }

    #[test]
    fn quit_halts_the_run() {
        let mut zine = WinterHush::new(&ZineConfig::default().winter_hush);
        let mut engine = Engine::new(&mut zine, 80, 24, 0.05, crate::ui::theme::WINTER, rng());
        engine.step(&[]);
        assert!(engine.running());
        engine.step(&[Command::MoveCursor { dx: 1, dy: 0 }, Command::Quit]);
        assert!(!engine.running());
        let tick = engine.world.tick;
        assert!(engine.step(&[]).is_empty());
        assert_eq!(engine.world.tick, tick);
    }

    #[test]
    fn commands_after_quit_are_ignored() {
        let mut zine = WinterHush::new(&ZineConfig::default().winter_hush);
        let mut engine = Engine::new(&mut zine, 80, 24, 0.05, crate::ui::theme::WINTER, rng());
        engine.step(&[Command::Quit, Command::MoveCursor { dx: 1, dy: 0 }]);
        drop(engine);
        assert_eq!(zine.cursor_x(), 40);
    }

    #[test]
    fn spawns_follow_the_configured_window() {
        // Snow: 0.1 s to 0.5 s at 50 ms ticks is 2 to 10 ticks
        let mut zine = WinterHush::new(&ZineConfig::default().winter_hush);
        let mut engine = Engine::new(&mut zine, 80, 24, 0.05, crate::ui::theme::WINTER, rng());
        let mut last = 0;
        let mut total = 0;
        for tick in 1..=400u64 {
            let events = engine.step(&[]);
            if spawned(&events) > 0 {
                let gap = tick - last;
                assert!(gap > 2 && gap <= 10, "gap {gap} at tick {tick}");
                last = tick;
                total += 1;
            }
        }
        assert!(total > 40);
    }

    #[test]
    fn zone_catch_only_on_attempt_tick() {
        let cfg = ZineConfig::default().fragments;
        let mut zine = Fragments::new(&cfg);
        let mut engine = Engine::new(&mut zine, 80, 24, 0.05, crate::ui::theme::NEBULA, rng());
        // Zone row is 24 - 8 = 16; place a still word right on it
        let mut events = vec![];
        engine.world.spawn(
            crate::domain::entity::Entity::new(Kind::Fragment, 10.0, 16.0, "moth").with_payload("moth"),
            &mut events,
        );

        engine.step(&[]);
        assert!(engine.world.caught.is_empty());

        let events = engine.step(&[Command::CatchAttempt]);
        assert_eq!(engine.world.caught, vec!["moth".to_string()]);
        assert!(events.iter().any(|e| matches!(e, SimEvent::Caught { .. })));

        engine.step(&[Command::CatchAttempt]);
        assert_eq!(engine.world.caught.len(), 1);
    }

    #[test]
    fn fixed_seed_replays_identically() {
        let run = || {
            let mut zine = WinterHush::new(&ZineConfig::default().winter_hush);
            let mut engine = Engine::new(&mut zine, 60, 20, 0.05, crate::ui::theme::WINTER, rng());
            for _ in 0..300 {
                engine.step(&[]);
            }
            engine.world.store.iter().map(|e| (e.id, e.cell())).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
