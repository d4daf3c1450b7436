/// Gutter: a three-page comic of boxed panels.
///
/// Page mode flips pages with ← →. Space switches to panel mode, where
/// ← → step through the panels of the current page; the current panel is
/// outlined in the accent color and its caption shown below the page.
/// There are no entities: the engine only drives ticks and frames.

use crate::sim::event::SimEvent;
use crate::sim::step::SimRng;
use crate::sim::world::World;
use crate::ui::canvas::Canvas;
use crate::ui::input::{Command, KeyMap, SpaceAction};
use crate::ui::theme::{self, Role, Theme};
use super::Zine;

struct Panel {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    art: &'static [&'static str],
    caption: &'static str,
}

struct Page {
    title: &'static str,
    panels: &'static [Panel],
}

const PAGES: &[Page] = &[
    Page {
        title: "TEETH",
        panels: &[
            Panel {
                x: 2, y: 2, w: 25, h: 5,
                art: &["WWWWWWWWWWWWWWWWWWWWW", "W W W W W W W W W W W", "WWWWWWWWWWWWWWWWWWWWW"],
                caption: "TEETH TEETH TEETH",
            },
            Panel {
                x: 30, y: 2, w: 25, h: 5,
                art: &["▼▼▼▼▼▼▼▼▼▼▼▼▼▼▼▼▼▼▼", "▼ ▼ ▼ ▼ ▼ ▼ ▼ ▼ ▼ ▼", "▼▼▼▼▼▼▼▼▼▼▼▼▼▼▼▼▼▼▼"],
                caption: "GROWING DOWNWARD",
            },
            Panel {
                x: 2, y: 9, w: 53, h: 7,
                art: &[
                    "",
                    "I FORGOT TO BRUSH MY TEETH FOR 47 YEARS",
                    "NOW THEY HAVE THEIR OWN ECOSYSTEM",
                    "SMALL BIRDS NEST IN MY MOLARS",
                ],
                caption: "The narrator explains calmly.",
            },
        ],
    },
    Page {
        title: "THE BIRDS",
        panels: &[
            Panel {
                x: 2, y: 2, w: 30, h: 8,
                art: &[
                    "",
                    "   ^   ^   ^   ^   ^",
                    "  ( ) ( ) ( ) ( ) ( )",
                    "   v   v   v   v   v",
                    "",
                    "TWEET TWEET TWEET TWEET",
                ],
                caption: "The birds are very small.",
            },
            Panel {
                x: 35, y: 2, w: 30, h: 9,
                art: &[
                    "THEY SING OPERA",
                    "",
                    "♪ LA LA LA LA LA ♪",
                    "♫ DO RE MI FA SO ♫",
                    "",
                    "BUT ONLY WAGNER",
                    "EXCLUSIVELY WAGNER",
                ],
                caption: "This is a problem.",
            },
            Panel {
                x: 2, y: 12, w: 63, h: 5,
                art: &[
                    "MY DENTIST SAYS THIS IS 'HIGHLY IRREGULAR'",
                    "I SAY 'WHAT ABOUT THE BEAUTY OF INTERSPECIES COOPERATION?'",
                    "SHE DOES NOT APPRECIATE ART",
                ],
                caption: "Conflict arises.",
            },
        ],
    },
    Page {
        title: "RESOLUTION?",
        panels: &[Panel {
            x: 2, y: 2, w: 66, h: 14,
            art: &[
                "",
                "I HAVE DECIDED TO BECOME A PERFORMANCE ARTIST",
                "",
                "MY MOUTH IS NOW A VENUE",
                "",
                "TICKETS: $47 (CASH ONLY)",
                "",
                "SHOWTIMES:",
                "- TUESDAYS: THE RING CYCLE (FULL 15 HOURS)",
                "- WEDNESDAYS: EXPERIMENTAL JAZZ FUSION",
                "- THURSDAYS: BIRD POETRY SLAM",
            ],
            caption: "The end. Or is it?",
        }],
    },
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Page,
    Panel,
}

pub struct Gutter {
    page: usize,
    panel: usize,
    mode: Mode,
    /// Pages the reader has opened at least once.
    seen: Vec<bool>,
}

impl Default for Gutter {
    fn default() -> Self {
        Self::new()
    }
}

impl Gutter {
    pub fn new() -> Self {
        let mut seen = vec![false; PAGES.len()];
        seen[0] = true;
        Gutter { page: 0, panel: 0, mode: Mode::Page, seen }
    }

    pub fn page(&self) -> usize { self.page }
    pub fn panel(&self) -> usize { self.panel }
    pub fn mode(&self) -> Mode { self.mode }

    fn current(&self) -> &'static Page {
        &PAGES[self.page]
    }

    fn step(&mut self, dx: i32) {
        match self.mode {
            Mode::Page => {
                self.page = shift(self.page, dx, PAGES.len());
                self.seen[self.page] = true;
            }
            Mode::Panel => {
                self.panel = shift(self.panel, dx, self.current().panels.len());
            }
        }
    }
}

/// Move `i` by `dx`, clamped to `0..len`.
fn shift(i: usize, dx: i32, len: usize) -> usize {
    let last = len.saturating_sub(1) as i64;
    (i as i64 + dx as i64).clamp(0, last) as usize
}

impl Zine for Gutter {
    fn title(&self) -> &'static str { "Gutter" }

    fn subtitle(&self) -> Option<&'static str> { Some("Issue #3 - ASCII Comic Reader") }

    fn theme(&self) -> Theme { theme::MINIMAL }

    fn keymap(&self) -> KeyMap {
        KeyMap::navigation().with_space(SpaceAction::ToggleMode)
    }

    fn handle(&mut self, cmd: Command, _world: &mut World, _rng: &mut SimRng, _events: &mut Vec<SimEvent>) {
        match cmd {
            Command::ToggleMode => {
                self.mode = match self.mode {
                    Mode::Page => {
                        self.panel = 0;
                        Mode::Panel
                    }
                    Mode::Panel => Mode::Page,
                };
            }
            Command::MoveCursor { dx, .. } if dx != 0 => self.step(dx),
            _ => {}
        }
    }

    fn draw_hud(&self, world: &World, theme: &Theme, canvas: &mut Canvas) {
        let page = self.current();
        let h = world.height as i32;
        canvas.put_text(2, 0, &format!("Page {}: {}", self.page + 1, page.title), theme.accent);

        for (i, panel) in page.panels.iter().enumerate() {
            let current = self.mode == Mode::Panel && i == self.panel;
            let border = if current { theme.accent } else { theme.border };
            canvas.draw_box(panel.x, panel.y, panel.w, panel.h, border);
            for (row, line) in panel.art.iter().enumerate() {
                canvas.put_text(panel.x + 2, panel.y + 1 + row as i32, line, theme.text);
            }
            if current {
                canvas.put_text(2, h - 5, &format!("» {}", panel.caption), theme.secondary);
            }
        }

        let nav = match self.mode {
            Mode::Page => format!(
                "Page {}/{} | ← → to navigate | SPACE for panel mode | Q to quit",
                self.page + 1,
                PAGES.len()
            ),
            Mode::Panel => format!(
                "Panel {}/{} | ← → to navigate | SPACE for page mode | Q to quit",
                self.panel + 1,
                page.panels.len()
            ),
        };
        if nav.chars().count() <= world.width {
            canvas.put_text(0, h - 3, &nav, theme.secondary);
        }
    }

    fn summary(&self, _world: &World) -> Vec<(Role, String)> {
        let read = self.seen.iter().filter(|s| **s).count();
        vec![
            (Role::Accent, self.title().to_string()),
            (Role::Text, String::new()),
            (Role::Primary, "Thanks for reading about the tooth birds!".into()),
            (Role::Text, String::new()),
            (Role::Secondary, "Sequential art in the terminal - where every character counts.".into()),
            (Role::Secondary, format!("Pages read: {read}/{}", PAGES.len())),
        ]
    }
}
