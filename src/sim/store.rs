/// Entity store: the ordered pool of live entities and the per-tick rules.
///
/// Processing order inside `update`, per entity:
///   1. Age advances (never decreases)
///   2. Caught entities lose fade and stay put
///   3. Motion: drift, jitter or orbit recompute
///   4. Horizontal wrap / margin clamp
///   5. Removal checks: bottom edge, lifetime, fade
///
/// Removal happens in the same call that makes a condition true, so a
/// removed entity is never handed to the renderer.

use rand::Rng;

use crate::domain::catch::CatchRule;
use crate::domain::entity::{Entity, EntityId, Kind, Lifecycle, Motion};
use super::event::{RemovalReason, SimEvent};

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: usize, height: usize) -> Self {
        Bounds { width: width as f32, height: height as f32 }
    }
}

#[derive(Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
    next_id: EntityId,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, assigning it a fresh id.
    pub fn insert(&mut self, mut entity: Entity) -> EntityId {
        self.next_id += 1;
        entity.id = self.next_id;
        self.entities.push(entity);
        self.next_id
    }

    pub fn len(&self) -> usize { self.entities.len() }
    pub fn is_empty(&self) -> bool { self.entities.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }

    /// Number of distinct constellation groups present.
    pub fn group_count(&self) -> usize {
        let mut groups: Vec<u32> = self.entities.iter().filter_map(|e| e.group).collect();
        groups.sort_unstable();
        groups.dedup();
        groups.len()
    }

    /// Advance every entity one tick and drop the ones that must go.
    pub fn update<R: Rng>(&mut self, bounds: Bounds, rng: &mut R, events: &mut Vec<SimEvent>) {
        self.entities.retain_mut(|e| match update_entity(e, bounds, rng) {
            Some(reason) => {
                events.push(SimEvent::Removed { id: e.id, reason });
                false
            }
            None => true,
        });
    }

    /// Mark every alive entity matching `rule` as caught.
    /// Returns the payloads revealed, in store order.
    pub fn catch(&mut self, rule: CatchRule, events: &mut Vec<SimEvent>) -> Vec<String> {
        let mut payloads = Vec::new();
        for e in self.entities.iter_mut().filter(|e| e.is_alive()) {
            if !rule.hits(e.x, e.y) { continue; }
            e.state = Lifecycle::Caught { fade: 1.0 };
            events.push(SimEvent::Caught { id: e.id, payload: e.payload.clone() });
            if let Some(p) = &e.payload {
                payloads.push(p.clone());
            }
        }
        payloads
    }

    /// Drop every entity matching `pred`.
    pub fn discard_where<F>(&mut self, mut pred: F, events: &mut Vec<SimEvent>)
    where
        F: FnMut(&Entity) -> bool,
    {
        self.entities.retain(|e| {
            if pred(e) {
                events.push(SimEvent::Removed { id: e.id, reason: RemovalReason::Discarded });
                false
            } else {
                true
            }
        });
    }

    pub fn clear(&mut self, events: &mut Vec<SimEvent>) {
        self.discard_where(|_| true, events);
    }

    /// Keep only the newest `n` entities.
    pub fn keep_latest(&mut self, n: usize, events: &mut Vec<SimEvent>) {
        if self.entities.len() <= n { return; }
        let cut = self.entities.len() - n;
        for e in self.entities.drain(..cut) {
            events.push(SimEvent::Removed { id: e.id, reason: RemovalReason::Discarded });
        }
    }
}

/// One tick for one entity. Returns why it must be removed, if it must.
pub fn update_entity<R: Rng>(e: &mut Entity, bounds: Bounds, rng: &mut R) -> Option<RemovalReason> {
    e.age = e.age.saturating_add(1);
    let spec = e.spec();

    if let Lifecycle::Caught { fade } = e.state {
        let fade = fade - spec.catch_fade_step;
        if fade <= 0.0 { return Some(RemovalReason::Faded); }
        e.state = Lifecycle::Caught { fade };
        return None;
    }

    match e.motion {
        Motion::Still => {}
        Motion::Drift { vx, vy } => {
            e.x += vx;
            e.y += vy;
        }
        Motion::Jitter { chance, dx, dy } => {
            if rng.gen::<f32>() < chance {
                if dx > 0.0 { e.x += rng.gen_range(-dx..dx); }
                if dy > 0.0 { e.y += rng.gen_range(-dy..dy); }
            }
        }
        Motion::Orbit(orbit) => {
            let (x, y) = orbit.position(e.age);
            e.x = x;
            e.y = y;
        }
    }

    if spec.wrap_x && bounds.width > 0.0 {
        e.x = wrap(e.x, bounds.width);
    }
    if let Some(m) = spec.clamp_margin {
        e.x = e.x.min(bounds.width - 1.0 - m).max(m);
        e.y = e.y.min(bounds.height - 1.0 - m).max(m);
    }

    if spec.falls_off && e.y >= bounds.height {
        return Some(RemovalReason::LeftBounds);
    }
    if e.max_age.is_some_and(|max| e.age >= max) {
        return Some(RemovalReason::Aged);
    }
    if spec.fade.is_some() && e.opacity() <= 0.0 {
        return Some(RemovalReason::Faded);
    }
    None
}

/// Wrap a horizontal position into `[0, width)`.
fn wrap(x: f32, width: f32) -> f32 {
    let wrapped = x.rem_euclid(width);
    // rem_euclid rounds tiny negatives up to `width` itself
    if wrapped >= width { width - 1.0 } else { wrapped }
}
