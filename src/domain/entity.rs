/// Entities: every animated element on the grid is one `Entity`.
/// The kind tag selects a row of the kind table; motion is carried per entity.

use super::visual::AgeCurve;

pub type EntityId = u64;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Kind {
    Snowflake,
    Fragment,
    Echo,
    Symbol,
    LogLine,
    Orbiter,
}

/// Alive → Caught (fading) → removed. Expiry removes an entity straight
/// from `Alive` and is reported as `RemovalReason::Aged`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Lifecycle {
    Alive,
    Caught { fade: f32 },
}

/// Orbit around a fixed center, recomputed from age every tick.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Orbit {
    pub cx: f32,
    pub cy: f32,
    pub base_radius: f32,
    pub breath_amplitude: f32,
    pub breath_rate: f32,
    pub phase: f32,
    pub angular_speed: f32,
}

impl Orbit {
    pub fn radius(&self, age: u32) -> f32 {
        self.base_radius + self.breath_amplitude * (age as f32 * self.breath_rate).sin()
    }

    pub fn angle(&self, age: u32) -> f32 {
        self.phase + self.angular_speed * age as f32
    }

    pub fn position(&self, age: u32) -> (f32, f32) {
        let (r, theta) = (self.radius(age), self.angle(age));
        (self.cx + r * theta.cos(), self.cy + r * theta.sin())
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Motion {
    Still,
    /// Constant per-tick delta.
    Drift { vx: f32, vy: f32 },
    /// With probability `chance` per tick, nudge by up to ±dx / ±dy.
    Jitter { chance: f32, dx: f32, dy: f32 },
    Orbit(Orbit),
}

/// Kind table row: the rules the store applies to every entity of a kind.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct KindSpec {
    /// Lifetime ceiling in ticks; per-entity `max_age` may override it.
    pub max_age: Option<u32>,
    /// Horizontal position wraps modulo the canvas width.
    pub wrap_x: bool,
    /// Removed once it passes the bottom edge.
    pub falls_off: bool,
    /// Kept inside an inner margin of this many cells.
    pub clamp_margin: Option<f32>,
    pub distortion: Option<AgeCurve>,
    /// Age-driven fade; opacity is `1 - fade(age)`.
    pub fade: Option<AgeCurve>,
    /// Fade lost per tick once caught.
    pub catch_fade_step: f32,
}

impl KindSpec {
    const BASE: KindSpec = KindSpec {
        max_age: None,
        wrap_x: false,
        falls_off: false,
        clamp_margin: None,
        distortion: None,
        fade: None,
        catch_fade_step: 1.0,
    };
}

impl Kind {
    pub const fn spec(self) -> KindSpec {
        match self {
            Kind::Snowflake => KindSpec {
                wrap_x: true,
                falls_off: true,
                catch_fade_step: 0.25,
                ..KindSpec::BASE
            },
            Kind::Fragment => KindSpec {
                falls_off: true,
                catch_fade_step: 0.0625,
                ..KindSpec::BASE
            },
            Kind::Echo => KindSpec {
                distortion: Some(AgeCurve::new(20, 0.02, 0.8)),
                fade: Some(AgeCurve::new(50, 0.05, 1.0)),
                ..KindSpec::BASE
            },
            Kind::Symbol => KindSpec {
                max_age: Some(300),
                clamp_margin: Some(1.0),
                ..KindSpec::BASE
            },
            // Glow decays to a floor of 0.3 and never reaches zero.
            Kind::LogLine => KindSpec {
                fade: Some(AgeCurve::new(0, 0.02, 0.7)),
                ..KindSpec::BASE
            },
            Kind::Orbiter => KindSpec {
                max_age: Some(500),
                ..KindSpec::BASE
            },
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LogStamp {
    /// `HH:MM:SS.mmm`
    pub time: String,
    pub level: &'static str,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Entity {
    /// Assigned by the store on insertion.
    pub id: EntityId,
    pub kind: Kind,
    pub x: f32,
    pub y: f32,
    pub motion: Motion,
    pub age: u32,
    pub max_age: Option<u32>,
    /// What gets drawn.
    pub text: String,
    /// Timestamp and level of a log line.
    pub stamp: Option<LogStamp>,
    /// Revealed into the caught history when caught.
    pub payload: Option<String>,
    pub state: Lifecycle,
    /// Constellation this entity belongs to.
    pub group: Option<u32>,
    pub pulse_phase: f32,
    pub pulse_speed: f32,
}

impl Entity {
    pub fn new(kind: Kind, x: f32, y: f32, text: impl Into<String>) -> Self {
        Entity {
            id: 0,
            kind,
            x,
            y,
            motion: Motion::Still,
            age: 0,
            max_age: kind.spec().max_age,
            text: text.into(),
            stamp: None,
            payload: None,
            state: Lifecycle::Alive,
            group: None,
            pulse_phase: 0.0,
            pulse_speed: 0.0,
        }
    }

    pub fn moving(self, vx: f32, vy: f32) -> Self {
        Entity { motion: Motion::Drift { vx, vy }, ..self }
    }

    pub fn with_motion(self, motion: Motion) -> Self {
        Entity { motion, ..self }
    }

    pub fn with_payload(self, payload: impl Into<String>) -> Self {
        Entity { payload: Some(payload.into()), ..self }
    }

    pub fn with_stamp(self, stamp: LogStamp) -> Self {
        Entity { stamp: Some(stamp), ..self }
    }

    pub fn with_max_age(self, max_age: u32) -> Self {
        Entity { max_age: Some(max_age), ..self }
    }

    pub fn in_group(self, group: u32) -> Self {
        Entity { group: Some(group), ..self }
    }

    pub fn pulsing(self, phase: f32, speed: f32) -> Self {
        Entity { pulse_phase: phase, pulse_speed: speed, ..self }
    }

    pub fn spec(&self) -> KindSpec {
        self.kind.spec()
    }

    pub fn is_alive(&self) -> bool {
        self.state == Lifecycle::Alive
    }

    pub fn is_caught(&self) -> bool {
        matches!(self.state, Lifecycle::Caught { .. })
    }

    /// Integer cell the entity occupies (truncation, like the terminal grid).
    pub fn cell(&self) -> (i32, i32) {
        (self.x.floor() as i32, self.y.floor() as i32)
    }

    /// 1.0 = fully visible. Caught entities follow their catch fade.
    pub fn opacity(&self) -> f32 {
        match self.state {
            Lifecycle::Caught { fade } => fade.max(0.0),
            Lifecycle::Alive => match self.spec().fade {
                Some(curve) => 1.0 - curve.value(self.age),
                None => 1.0,
            },
        }
    }

    pub fn distortion(&self) -> f32 {
        self.spec().distortion.map_or(0.0, |c| c.value(self.age))
    }

    /// Pulse intensity in [0, 1], a pure function of age.
    pub fn pulse(&self) -> f32 {
        let angle = self.pulse_phase + self.pulse_speed * self.age as f32;
        (angle.sin() + 1.0) / 2.0
    }

    pub fn highlighted(&self) -> bool {
        self.is_caught() || self.payload.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entity_defaults() {
        let e = Entity::new(Kind::Symbol, 1.5, 2.9, "*");
        assert_eq!(e.age, 0);
        assert_eq!(e.state, Lifecycle::Alive);
        assert_eq!(e.max_age, Some(300));
        assert_eq!(e.cell(), (1, 2));
        assert_eq!(e.motion, Motion::Still);
    }

    #[test]
    fn builder_chain() {
        let e = Entity::new(Kind::Snowflake, 0.0, 0.0, "*")
            .moving(0.1, 0.2)
            .with_payload("cold breath on glass")
            .with_max_age(9);
        assert_eq!(e.motion, Motion::Drift { vx: 0.1, vy: 0.2 });
        assert_eq!(e.payload.as_deref(), Some("cold breath on glass"));
        assert_eq!(e.max_age, Some(9));
        assert!(e.highlighted());
    }

    #[test]
    fn negative_positions_truncate_down() {
        let e = Entity::new(Kind::Fragment, -0.5, -0.1, "x");
        assert_eq!(e.cell(), (-1, -1));
    }

    #[test]
    fn echo_visual_state_is_pure_in_age() {
        let mut e = Entity::new(Kind::Echo, 0.0, 0.0, "hello");
        e.age = 20;
        assert_eq!(e.distortion(), 0.0);
        assert_eq!(e.opacity(), 1.0);
        e.age = 30;
        assert!((e.distortion() - 0.2).abs() < 1e-5);
        let first = e.distortion();
        assert_eq!(e.distortion(), first);
        e.age = 200;
        assert!((e.distortion() - 0.8).abs() < 1e-5);
        assert!(e.opacity() <= 0.0);
    }

    #[test]
    fn log_glow_floors_at_point_three() {
        let mut e = Entity::new(Kind::LogLine, 0.0, 0.0, "boot");
        e.age = 10;
        assert!((e.opacity() - 0.8).abs() < 1e-5);
        e.age = 10_000;
        assert!((e.opacity() - 0.3).abs() < 1e-5);
    }

    #[test]
    fn caught_opacity_follows_fade() {
        let mut e = Entity::new(Kind::Fragment, 0.0, 0.0, "word");
        e.state = Lifecycle::Caught { fade: 0.4 };
        assert!((e.opacity() - 0.4).abs() < 1e-6);
        assert!(e.highlighted());
        assert!(!e.is_alive());
    }

    #[test]
    fn orbit_is_recomputed_from_age() {
        let orbit = Orbit {
            cx: 10.0,
            cy: 5.0,
            base_radius: 3.0,
            breath_amplitude: 2.0,
            breath_rate: 0.02,
            phase: 0.0,
            angular_speed: 0.0,
        };
        let (x, y) = orbit.position(0);
        assert!((x - 13.0).abs() < 1e-5);
        assert!((y - 5.0).abs() < 1e-5);
        // Same age, same answer, however many times it is asked
        assert_eq!(orbit.position(1234), orbit.position(1234));
        // Radius stays within base ± amplitude
        for age in 0..1000 {
            let r = orbit.radius(age);
            assert!((1.0..=5.0).contains(&r));
        }
    }

    #[test]
    fn pulse_in_unit_range() {
        let mut e = Entity::new(Kind::Symbol, 0.0, 0.0, "o").pulsing(1.0, 0.1);
        for age in 0..200 {
            e.age = age;
            let p = e.pulse();
            assert!((0.0..=1.0).contains(&p));
        }
    }
}
