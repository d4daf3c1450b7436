/// Rack of Zines: the catalog launcher shown when no zine is named.
///
/// Enter ends the rack run either way: with a zine to launch, or with a
/// notice for an item that cannot be opened yet. The caller reopens the
/// same `Rack` afterwards, so the selection survives between runs.

use crate::sim::event::SimEvent;
use crate::sim::step::SimRng;
use crate::sim::world::World;
use crate::ui::canvas::Canvas;
use crate::ui::input::{Command, KeyMap};
use crate::ui::theme::{self, Role, Theme};
use super::{truncate_end, word_wrap, CatalogItem, Status, Zine, ZineId, CATALOG};

const LIST_TOP: i32 = 4;
const DETAILS_HEIGHT: i32 = 6;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RackOutcome {
    Launch(ZineId),
    Notice(String),
}

pub struct Rack {
    selected: usize,
    notice: Option<String>,
    outcome: Option<RackOutcome>,
    launched: u32,
}

impl Default for Rack {
    fn default() -> Self {
        Self::new()
    }
}

impl Rack {
    pub fn new() -> Self {
        Rack { selected: 0, notice: None, outcome: None, launched: 0 }
    }

    pub fn selected(&self) -> &'static CatalogItem {
        &CATALOG[self.selected]
    }

    /// What the last run ended with; `None` after a quit.
    pub fn take_outcome(&mut self) -> Option<RackOutcome> {
        self.outcome.take()
    }

    /// Shown on the next run until the selection moves.
    pub fn show_notice(&mut self, notice: String) {
        self.notice = Some(notice);
    }

    fn choose(&mut self) -> RackOutcome {
        let item = self.selected();
        match item.launchable() {
            Some(id) => {
                self.launched += 1;
                RackOutcome::Launch(id)
            }
            None => RackOutcome::Notice(format!("{} is {}. Check back soon.", item.title, item.status.label())),
        }
    }
}

impl Zine for Rack {
    fn title(&self) -> &'static str { "Rack of Zines" }

    fn theme(&self) -> Theme { theme::MINIMAL }

    fn keymap(&self) -> KeyMap {
        KeyMap::navigation().closing_submit()
    }

    fn handle(&mut self, cmd: Command, world: &mut World, _rng: &mut SimRng, _events: &mut Vec<SimEvent>) {
        match cmd {
            Command::MoveCursor { dy, .. } if dy != 0 => {
                let last = CATALOG.len() as i64 - 1;
                self.selected = (self.selected as i64 + dy as i64).clamp(0, last) as usize;
                self.notice = None;
            }
            Command::Submit => {
                self.outcome = Some(self.choose());
                world.stop();
            }
            _ => {}
        }
    }

    fn draw_hud(&self, world: &World, theme: &Theme, canvas: &mut Canvas) {
        let (w, h) = (world.width as i32, world.height as i32);
        canvas.put_centered(1, "RACK OF ZINES", theme.accent);
        canvas.put_centered(2, "small pages for the terminal", theme.secondary);

        let details_top = h - DETAILS_HEIGHT - 2;
        for (i, item) in CATALOG.iter().enumerate() {
            let row = LIST_TOP + i as i32;
            if row >= details_top { break; }
            let spine = format!("#{:02} {} {}", item.number, item.status.icon(), item.title);
            if i == self.selected {
                canvas.put_text(2, row, &format!("> {spine}"), theme.accent);
            } else {
                let ink = if item.status == Status::ComingSoon { theme.secondary } else { theme.text };
                canvas.put_text(4, row, &spine, ink);
            }
        }

        let item = self.selected();
        canvas.draw_box(1, details_top, w - 2, DETAILS_HEIGHT, theme.border);
        let room = (w - 6).max(0) as usize;
        canvas.put_text(3, details_top + 1, &truncate_end(item.title, room), theme.primary);
        for (i, line) in word_wrap(item.description, room).iter().take(2).enumerate() {
            canvas.put_text(3, details_top + 2 + i as i32, line, theme.text);
        }
        let status = format!("{} {}", item.status.icon(), item.status.label());
        canvas.put_text(3, details_top + 4, &status, theme.secondary);

        match &self.notice {
            Some(notice) => canvas.put_text(1, h - 1, &truncate_end(notice, (w - 2).max(0) as usize), theme.warning),
            None => canvas.put_text(1, h - 1, "↑ ↓ choose | ENTER open | Q quit", theme.secondary),
        }
    }

    fn summary(&self, _world: &World) -> Vec<(Role, String)> {
        vec![
            (Role::Accent, self.title().to_string()),
            (Role::Text, String::new()),
            (Role::Secondary, format!("Zines opened: {}", self.launched)),
            (Role::Primary, "The rack folds shut. See you next issue.".into()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn press(rack: &mut Rack, world: &mut World, cmd: Command) {
        let mut rng = SimRng::seed_from_u64(0);
        rack.handle(cmd, world, &mut rng, &mut vec![]);
    }

    const DOWN: Command = Command::MoveCursor { dx: 0, dy: 1 };
    const UP: Command = Command::MoveCursor { dx: 0, dy: -1 };

    #[test]
    fn selection_moves_and_clamps() {
        let mut rack = Rack::new();
        let mut world = World::new(80, 24, 0.05);
        press(&mut rack, &mut world, UP);
        assert_eq!(rack.selected().number, 1);
        for _ in 0..20 {
            press(&mut rack, &mut world, DOWN);
        }
        assert_eq!(rack.selected().number, CATALOG.last().unwrap().number);
    }

    #[test]
    fn enter_on_available_launches() {
        let mut rack = Rack::new();
        let mut world = World::new(80, 24, 0.05);
        press(&mut rack, &mut world, DOWN);
        press(&mut rack, &mut world, Command::Submit);
        assert!(!world.running);
        assert_eq!(rack.take_outcome(), Some(RackOutcome::Launch(ZineId::Fragments)));
        assert_eq!(rack.take_outcome(), None);
    }

    #[test]
    fn enter_on_coming_soon_gives_notice() {
        let mut rack = Rack::new();
        let mut world = World::new(80, 24, 0.05);
        for _ in 0..6 {
            press(&mut rack, &mut world, DOWN);
        }
        assert_eq!(rack.selected().status, Status::ComingSoon);
        press(&mut rack, &mut world, Command::Submit);
        let Some(RackOutcome::Notice(text)) = rack.take_outcome() else { panic!("expected a notice") };
        assert!(text.contains("coming soon"));

        rack.show_notice(text.clone());
        let mut canvas = Canvas::new(80, 24);
        rack.draw_hud(&World::new(80, 24, 0.05), &theme::MINIMAL, &mut canvas);
        assert!(canvas.row_text(23).contains(&text));

        press(&mut rack, &mut world, UP);
        canvas.clear();
        rack.draw_hud(&World::new(80, 24, 0.05), &theme::MINIMAL, &mut canvas);
        assert!(canvas.row_text(23).contains("ENTER open"));
    }

    #[test]
    fn prototype_launches() {
        let mut rack = Rack::new();
        let mut world = World::new(80, 24, 0.05);
        for _ in 0..20 {
            press(&mut rack, &mut world, DOWN);
        }
        press(&mut rack, &mut world, Command::Submit);
        assert_eq!(rack.take_outcome(), Some(RackOutcome::Launch(ZineId::TtyKit)));
    }

    #[test]
    fn spines_and_details() {
        let mut rack = Rack::new();
        let mut world = World::new(80, 24, 0.05);
        press(&mut rack, &mut world, DOWN);
        let mut canvas = Canvas::new(80, 24);
        rack.draw_hud(&world, &theme::MINIMAL, &mut canvas);
        assert!(canvas.row_text(4).contains("#01 ● Winter Hush"));
        assert!(canvas.row_text(5).contains("> #02 ● Fragments.txt"));
        assert_eq!(canvas.get(2, 5).map(|c| c.ink), Some(theme::MINIMAL.accent));
        // details box: rows 16..=21
        assert!(canvas.row_text(16).contains('┌'));
        assert!(canvas.row_text(17).contains("Fragments.txt"));
        assert!(canvas.row_text(20).contains("available"));
        assert_eq!(canvas.clipped_writes(), 0);
    }
}
