/// Amber Light: a machine log streams by on an amber monitor.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::entity::{Entity, Kind, LogStamp};
use crate::sim::clock::SpawnWindow;
use crate::sim::event::SimEvent;
use crate::sim::step::SimRng;
use crate::sim::world::World;
use crate::ui::canvas::Canvas;
use crate::ui::input::KeyMap;
use crate::ui::theme::{self, Role, Theme};
use super::{truncate_end, Zine};

const LEVELS: [&str; 5] = ["INFO", "DEBUG", "WARN", "ERROR", "TRACE"];

const MESSAGES: &[&str] = &[
    "System initialization complete",
    "Loading kernel modules...",
    "Network interface configured",
    "Memory check passed",
    "Disk subsystem ready",
    "User authentication enabled",
    "Process scheduler active",
    "File system mounted",
    "Device drivers loaded",
    "Security protocols engaged",
    "Background services started",
    "System ready for operation",
    "Monitoring processes...",
    "Cache optimization running",
    "Garbage collection cycle",
    "Buffer flush completed",
    "Connection pool refreshed",
    "Session cleanup performed",
    "Log rotation executed",
    "Backup verification passed",
    "Performance metrics updated",
    "Resource allocation adjusted",
    "Thread pool expanded",
    "Database connection stable",
    "SSL certificates validated",
    "Firewall rules updated",
    "Load balancer healthy",
    "Service mesh synchronized",
    "Container orchestration active",
    "Microservices responding",
    "API gateway operational",
    "Message queue processing",
    "Event stream flowing",
    "Data pipeline active",
    "Analytics engine running",
    "Machine learning model trained",
    "Neural network converged",
    "Pattern recognition enabled",
    "Anomaly detection active",
    "Predictive algorithms loaded",
    "Real-time processing online",
];

const MAX_LINES: usize = 100;
const TRIM_TO: usize = 50;
const FIRST_ROW: i32 = 3;
const LEVEL_COL: i32 = 16;
const MESSAGE_COL: i32 = 22;
const HEADER: &str = "AMBER TERMINAL v2.1 - SYSTEM LOG MONITOR";

pub struct AmberLight {
    spawn: SpawnWindow,
    log_count: u32,
}

impl AmberLight {
    pub fn new(spawn: SpawnWindow) -> Self {
        AmberLight { spawn, log_count: 0 }
    }

    pub fn log_count(&self) -> u32 {
        self.log_count
    }
}

/// `HH:MM:SS.mmm` for a simulated time in seconds.
pub fn timestamp(secs: f64) -> String {
    let ms = (secs.max(0.0) * 1000.0).round() as u64;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        (ms / 3_600_000) % 24,
        (ms / 60_000) % 60,
        (ms / 1000) % 60,
        ms % 1000
    )
}

fn decorate(message: &str, rng: &mut SimRng) -> String {
    match rng.gen_range(0..4) {
        0 => format!("{message} [{}]", rng.gen_range(1000..=9999)),
        1 => format!("{message} (PID: {})", rng.gen_range(100..=9999)),
        2 => {
            let word = ["OK", "DONE", "READY", "ACTIVE"].choose(rng).copied().unwrap_or("OK");
            format!("{message} - {word}")
        }
        _ => format!("{message} in {}ms", rng.gen_range(1..=999)),
    }
}

fn is_alarm(level: &str) -> bool {
    matches!(level, "WARN" | "ERROR")
}

impl Zine for AmberLight {
    fn title(&self) -> &'static str { "Amber Light" }

    fn subtitle(&self) -> Option<&'static str> { Some("Issue #5 - Retro Terminal Experience") }

    fn theme(&self) -> Theme { theme::AMBER }

    fn keymap(&self) -> KeyMap { KeyMap::navigation() }

    fn spawn_window(&self) -> Option<SpawnWindow> {
        Some(self.spawn)
    }

    fn spawn(&mut self, world: &mut World, rng: &mut SimRng, events: &mut Vec<SimEvent>) {
        let level = LEVELS.choose(rng).copied().unwrap_or("INFO");
        let base = MESSAGES.choose(rng).copied().unwrap_or("Idle");
        let message = if rng.gen_bool(0.3) { decorate(base, rng) } else { base.to_string() };
        let stamp = LogStamp { time: timestamp(world.elapsed_secs()), level };
        world.spawn(Entity::new(Kind::LogLine, 1.0, -1.0, message).with_stamp(stamp), events);
        self.log_count += 1;

        if world.store.len() > MAX_LINES {
            world.store.keep_latest(TRIM_TO, events);
        }
    }

    /// Lay the newest lines out from row 3 down; older lines are parked off-screen.
    fn after_update(&mut self, world: &mut World, _rng: &mut SimRng, _events: &mut Vec<SimEvent>) {
        let rows = (world.height as i32 - 2 - FIRST_ROW).max(0) as usize;
        let total = world.store.len();
        let first_visible = total.saturating_sub(rows);
        for (i, line) in world.store.iter_mut().enumerate() {
            line.y = if i >= first_visible {
                (FIRST_ROW + (i - first_visible) as i32) as f32
            } else {
                -1.0
            };
        }
    }

    fn draw_entity(&self, entity: &Entity, world: &World, theme: &Theme, canvas: &mut Canvas) {
        let (_, y) = entity.cell();
        if y < FIRST_ROW { return; }
        if let Some(stamp) = &entity.stamp {
            canvas.put_text(1, y, &format!("[{}]", stamp.time), theme.secondary);
            let level_ink = if is_alarm(stamp.level) { theme.accent } else { theme.primary };
            canvas.put_text(LEVEL_COL, y, &format!("{:>5}", stamp.level), level_ink);
        }

        let glow = entity.opacity();
        let ink = if glow > 0.8 {
            theme.text
        } else if glow > 0.5 {
            theme.primary
        } else {
            theme.secondary
        };
        let room = (world.width as i32 - MESSAGE_COL - 1).max(0) as usize;
        canvas.put_text(MESSAGE_COL, y, &truncate_end(&entity.text, room), ink);
    }

    fn draw_hud(&self, world: &World, theme: &Theme, canvas: &mut Canvas) {
        let (w, h) = (world.width as i32, world.height as i32);
        canvas.put_centered(0, HEADER, theme.accent);
        let sep = "=".repeat((w - 2).clamp(0, 60) as usize);
        canvas.put_centered(1, &sep, theme.border);

        let status = format!(
            "LOG ENTRIES: {} | ACTIVE: {} | PRESS 'q' TO EXIT",
            self.log_count,
            world.store.len()
        );
        if status.len() as i32 <= w {
            canvas.put_text(0, h - 2, &status, theme.accent);
        }

        // Two blinks per second of simulated time.
        let on = (world.elapsed_secs() * 2.0) as u64 % 2 == 1;
        canvas.put_char(w - 1, h - 3, if on { '█' } else { ' ' }, theme.accent);
    }

    fn summary(&self, _world: &World) -> Vec<(Role, String)> {
        vec![
            (Role::Accent, self.title().to_string()),
            (Role::Text, String::new()),
            (Role::Primary, "System log monitoring session complete.".into()),
            (Role::Text, String::new()),
            (Role::Secondary, format!("Total log entries processed: {}", self.log_count)),
            (Role::Secondary, "The amber glow fades, but the memories remain...".into()),
        ]
    }
}
