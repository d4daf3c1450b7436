/// Zines: the content modules driven by the engine.
///
/// A zine supplies entity factories, string pools, a keymap, a theme and
/// its HUD. Everything else (ticks, input, entity rules, frame output) is
/// the engine's job.

pub mod amber_light;
pub mod caret_cuts;
pub mod echo_chamber;
pub mod fragments;
pub mod gutter;
pub mod rack;
pub mod ttykit;
pub mod winter_hush;

use crate::config::ZineConfig;
use crate::domain::entity::Entity;
use crate::error::{Result, ZineError};
use crate::sim::clock::SpawnWindow;
use crate::sim::event::SimEvent;
use crate::sim::step::SimRng;
use crate::sim::world::World;
use crate::ui::canvas::{Canvas, Ink};
use crate::ui::input::{Command, KeyMap};
use crate::ui::theme::{Role, Theme};

pub trait Zine {
    fn title(&self) -> &'static str;

    /// Second line of the title card; `None` skips the card.
    fn subtitle(&self) -> Option<&'static str> {
        None
    }

    fn theme(&self) -> Theme;

    fn keymap(&self) -> KeyMap;

    /// Spawn cadence; `None` means the zine never spawns on a timer.
    fn spawn_window(&self) -> Option<SpawnWindow> {
        None
    }

    /// Population cap reached: the due spawn is skipped.
    fn at_capacity(&self, _world: &World) -> bool {
        false
    }

    fn setup(&mut self, _world: &mut World, _rng: &mut SimRng, _events: &mut Vec<SimEvent>) {}

    fn spawn(&mut self, _world: &mut World, _rng: &mut SimRng, _events: &mut Vec<SimEvent>) {}

    fn handle(
        &mut self,
        _cmd: Command,
        _world: &mut World,
        _rng: &mut SimRng,
        _events: &mut Vec<SimEvent>,
    ) {
    }

    /// Runs after the store update: catch evaluation, trimming.
    fn after_update(&mut self, _world: &mut World, _rng: &mut SimRng, _events: &mut Vec<SimEvent>) {}

    fn ink_for(&self, _entity: &Entity, theme: &Theme) -> Ink {
        theme.primary
    }

    fn draw_entity(&self, entity: &Entity, _world: &World, theme: &Theme, canvas: &mut Canvas) {
        let (x, y) = entity.cell();
        canvas.put_text(x, y, &entity.text, self.ink_for(entity, theme));
    }

    fn draw_hud(&self, world: &World, theme: &Theme, canvas: &mut Canvas);

    /// Lines printed once the terminal is restored.
    fn summary(&self, world: &World) -> Vec<(Role, String)>;
}

// ── Catalog ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ZineId {
    WinterHush,
    Fragments,
    Gutter,
    EchoChamber,
    AmberLight,
    CaretCuts,
    TtyKit,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
    Available,
    ComingSoon,
    Prototype,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Available => "available",
            Status::ComingSoon => "coming soon",
            Status::Prototype => "prototype",
        }
    }

    pub fn icon(self) -> char {
        match self {
            Status::Available => '●',
            Status::ComingSoon => '○',
            Status::Prototype => '◐',
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CatalogItem {
    pub number: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub status: Status,
    pub target: Option<ZineId>,
}

impl CatalogItem {
    /// The zine this item launches, if it can be launched at all.
    pub fn launchable(&self) -> Option<ZineId> {
        match self.status {
            Status::ComingSoon => None,
            Status::Available | Status::Prototype => self.target,
        }
    }
}

const fn item(
    number: u32,
    title: &'static str,
    description: &'static str,
    status: Status,
    target: Option<ZineId>,
) -> CatalogItem {
    CatalogItem { number, title, description, status, target }
}

pub const CATALOG: &[CatalogItem] = &[
    item(1, "Winter Hush",
        "Snow drifts down the terminal. Shelter under it and some flakes give up a whisper.",
        Status::Available, Some(ZineId::WinterHush)),
    item(2, "Fragments.txt",
        "Loose words fall past a catch zone. Snag them with space and read what you stitched.",
        Status::Available, Some(ZineId::Fragments)),
    item(3, "Gutter",
        "A comic read panel by panel in box-drawing characters. Arrows turn the pages.",
        Status::Available, Some(ZineId::Gutter)),
    item(4, "Echo Chamber",
        "Type into the void. It answers with your words, rearranged and slowly corrupted.",
        Status::Available, Some(ZineId::EchoChamber)),
    item(5, "Amber Light",
        "An amber monitor streams the log of a machine nobody else is watching.",
        Status::Available, Some(ZineId::AmberLight)),
    item(6, "Caret Cuts",
        "Symbols pulse, orbit and burst. Three small experiments with glyphs in motion.",
        Status::Available, Some(ZineId::CaretCuts)),
    item(7, "Exquisite Pane",
        "A comic passed between contributors, each adding a panel without seeing the rest.",
        Status::ComingSoon, None),
    item(8, "The Prompt",
        "The terminal asks and your answers steer the story. Fiction kept like a diary.",
        Status::ComingSoon, None),
    item(9, "Monospace Dreams",
        "Half-remembered lines drift apart and recombine into something new each night.",
        Status::ComingSoon, None),
    item(10, "TTYKit Sampler",
        "Buttons, modals and progress bars from the house component kit, in three themes.",
        Status::Prototype, Some(ZineId::TtyKit)),
];

impl ZineId {
    pub const ALL: [ZineId; 7] = [
        ZineId::WinterHush,
        ZineId::Fragments,
        ZineId::Gutter,
        ZineId::EchoChamber,
        ZineId::AmberLight,
        ZineId::CaretCuts,
        ZineId::TtyKit,
    ];

    /// Command-line name.
    pub fn slug(self) -> &'static str {
        match self {
            ZineId::WinterHush => "winter-hush",
            ZineId::Fragments => "fragments",
            ZineId::Gutter => "gutter",
            ZineId::EchoChamber => "echo-chamber",
            ZineId::AmberLight => "amber-light",
            ZineId::CaretCuts => "caret-cuts",
            ZineId::TtyKit => "ttykit",
        }
    }

    /// Accepts a slug (underscores allowed) or a catalog number.
    pub fn from_name(name: &str) -> Result<ZineId> {
        let wanted = name.trim().to_ascii_lowercase().replace('_', "-");
        if let Ok(n) = wanted.parse::<u32>() {
            return CATALOG
                .iter()
                .find(|i| i.number == n)
                .and_then(|i| i.launchable())
                .ok_or_else(|| ZineError::UnknownZine(name.to_string()));
        }
        ZineId::ALL
            .into_iter()
            .find(|id| id.slug() == wanted || (wanted == "fragments.txt" && *id == ZineId::Fragments))
            .ok_or_else(|| ZineError::UnknownZine(name.to_string()))
    }

    pub fn open(self, config: &ZineConfig) -> Box<dyn Zine> {
        match self {
            ZineId::WinterHush => Box::new(winter_hush::WinterHush::new(&config.winter_hush)),
            ZineId::Fragments => Box::new(fragments::Fragments::new(&config.fragments)),
            ZineId::Gutter => Box::new(gutter::Gutter::new()),
            ZineId::EchoChamber => Box::new(echo_chamber::EchoChamber::new()),
            ZineId::AmberLight => Box::new(amber_light::AmberLight::new(config.amber_light)),
            ZineId::CaretCuts => Box::new(caret_cuts::CaretCuts::new(config.caret_cuts)),
            ZineId::TtyKit => Box::new(ttykit::TtyKit::new()),
        }
    }
}

/// Plain-text catalog listing for `--list`.
pub fn catalog_listing() -> Vec<String> {
    CATALOG
        .iter()
        .map(|i| {
            let slug = i.launchable().map_or("", |id| id.slug());
            format!(
                "#{:02} {} {:<18} {:<12} {:<13} {}",
                i.number,
                i.status.icon(),
                i.title,
                slug,
                i.status.label(),
                i.description
            )
        })
        .collect()
}

// ── Text helpers shared by HUDs ──

/// Cut `text` to `max` columns, ending in "..." when cut.
pub fn truncate_end(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Keep the last columns of `text`, starting with "..." when cut.
pub fn truncate_start(text: &str, max: usize) -> String {
    let len = text.chars().count();
    if len <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out = String::from("...");
    out.extend(text.chars().skip(len - keep));
    out
}

/// Greedy word wrap at `width` columns. A single long word gets its own line.
pub fn word_wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
