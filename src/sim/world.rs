/// World: the complete simulation state of one running zine.
///
/// The engine owns exactly one `World` per run. Zines read and mutate it
/// through the `Zine` hooks; the renderer only reads it.

use crate::domain::catch::CatchRule;
use crate::domain::entity::{Entity, EntityId};
use super::event::SimEvent;
use super::store::{Bounds, EntityStore};

pub struct World {
    pub width: usize,
    pub height: usize,
    pub store: EntityStore,
    /// Payloads revealed by catches, oldest first. Each appears once.
    pub caught: Vec<String>,
    pub tick: u64,
    pub tick_secs: f64,
    pub running: bool,
    /// A catch attempt arrived this tick.
    pub catch_requested: bool,
}

impl World {
    pub fn new(width: usize, height: usize, tick_secs: f64) -> Self {
        World {
            width,
            height,
            store: EntityStore::new(),
            caught: Vec::new(),
            tick: 0,
            tick_secs,
            running: true,
            catch_requested: false,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    /// Simulated time since the run started.
    pub fn elapsed_secs(&self) -> f64 {
        self.tick as f64 * self.tick_secs
    }

    pub fn spawn(&mut self, entity: Entity, events: &mut Vec<SimEvent>) -> EntityId {
        let kind = entity.kind;
        let id = self.store.insert(entity);
        events.push(SimEvent::Spawned { id, kind });
        id
    }

    /// Apply `rule` to the store and append any revealed payloads.
    /// Returns how many payloads were added.
    pub fn catch(&mut self, rule: CatchRule, events: &mut Vec<SimEvent>) -> usize {
        let payloads = self.store.catch(rule, events);
        let n = payloads.len();
        self.caught.extend(payloads);
        n
    }

    /// The newest `n` caught payloads, oldest of them first.
    pub fn recent_catches(&self, n: usize) -> &[String] {
        &self.caught[self.caught.len().saturating_sub(n)..]
    }

    pub fn stop(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Kind;

    #[test]
    fn spawn_emits_event_with_fresh_id() {
        let mut world = World::new(40, 20, 0.05);
        let mut events = vec![];
        let a = world.spawn(Entity::new(Kind::Snowflake, 1.0, 0.0, "*"), &mut events);
        let b = world.spawn(Entity::new(Kind::Snowflake, 2.0, 0.0, "*"), &mut events);
        assert_ne!(a, b);
        assert_eq!(events[1], SimEvent::Spawned { id: b, kind: Kind::Snowflake });
    }

    #[test]
    fn catches_land_in_history_once() {
        let mut world = World::new(40, 20, 0.05);
        let mut events = vec![];
        world.spawn(Entity::new(Kind::Fragment, 5.0, 12.0, "moth").with_payload("moth"), &mut events);
        let rule = CatchRule::Zone { row: 12.0, band: 1.0 };
        assert_eq!(world.catch(rule, &mut events), 1);
        assert_eq!(world.catch(rule, &mut events), 0);
        assert_eq!(world.caught, vec!["moth".to_string()]);
    }

    #[test]
    fn recent_catches_tail() {
        let mut world = World::new(10, 10, 0.05);
        world.caught = (1..=7).map(|i| i.to_string()).collect();
        assert_eq!(world.recent_catches(3), ["5", "6", "7"]);
        assert_eq!(world.recent_catches(50).len(), 7);
    }

    #[test]
    fn elapsed_follows_ticks() {
        let mut world = World::new(10, 10, 0.05);
        world.tick = 40;
        assert!((world.elapsed_secs() - 2.0).abs() < 1e-9);
    }
}
