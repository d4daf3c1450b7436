/// Events emitted during a simulation step.
/// The run loop logs them; tests assert on them.

use std::fmt;

use log::Level;

use crate::domain::entity::{EntityId, Kind};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RemovalReason {
    /// Fell past the bottom edge.
    LeftBounds,
    /// Age reached the lifetime ceiling.
    Aged,
    /// Fade reached zero, after a catch or by age.
    Faded,
    /// Dropped by the zine (trimming, mode change).
    Discarded,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    Spawned { id: EntityId, kind: Kind },
    Caught { id: EntityId, payload: Option<String> },
    Removed { id: EntityId, reason: RemovalReason },
}

impl SimEvent {
    pub fn log_level(&self) -> Level {
        match self {
            SimEvent::Spawned { .. } | SimEvent::Caught { .. } => Level::Debug,
            SimEvent::Removed { .. } => Level::Trace,
        }
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::Spawned { id, kind } => write!(f, "spawn {kind:?} #{id}"),
            SimEvent::Caught { id, payload: Some(p) } => write!(f, "caught #{id}: {p}"),
            SimEvent::Caught { id, payload: None } => write!(f, "caught #{id}"),
            SimEvent::Removed { id, reason } => write!(f, "removed #{id} ({reason:?})"),
        }
    }
}
