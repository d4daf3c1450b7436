/// Input channel: a capture thread that turns keystrokes into commands.
///
/// The capture thread owns the byte source and the decoder. It is the only
/// place in the program allowed to block on input. Everything it learns is
/// sent downstream as `Command` values over an unbounded channel, so:
///   - sending never blocks the capture thread
///   - the simulation drains whatever is queued once per tick, never waiting
///   - no simulation field is ever touched from this thread
///
/// The thread is detached. It ends by itself after delivering a closing
/// command (`Quit`, or `Submit` when the keymap says so), at end of input,
/// or once the receiver is gone.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use log::{debug, trace};

use super::keys::{self, ByteSource, DecodeError, Direction, Key};

/// Back-off after a failed read so a broken source cannot spin the CPU.
const READ_ERROR_BACKOFF: Duration = Duration::from_millis(10);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Quit,
    MoveCursor { dx: i32, dy: i32 },
    ToggleMode,
    Cycle,
    AppendChar(char),
    DeleteChar,
    Submit,
    CatchAttempt,
}

/// What the space bar means outside text entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SpaceAction {
    Catch,
    ToggleMode,
    Ignore,
}

/// Per-zine key → command translation table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct KeyMap {
    /// Printable keys (including `q`) are typed instead of interpreted.
    pub text_entry: bool,
    pub space: SpaceAction,
    pub cycle_key: Option<char>,
    /// `Submit` ends the capture thread, like `Quit` does.
    pub submit_closes: bool,
}

impl KeyMap {
    pub const fn navigation() -> Self {
        KeyMap {
            text_entry: false,
            space: SpaceAction::Ignore,
            cycle_key: None,
            submit_closes: false,
        }
    }

    pub const fn text_entry() -> Self {
        KeyMap { text_entry: true, ..KeyMap::navigation() }
    }

    pub const fn with_space(self, space: SpaceAction) -> Self {
        KeyMap { space, ..self }
    }

    pub const fn with_cycle(self, key: char) -> Self {
        KeyMap { cycle_key: Some(key), ..self }
    }

    pub const fn closing_submit(self) -> Self {
        KeyMap { submit_closes: true, ..self }
    }

    pub fn translate(&self, key: Key) -> Option<Command> {
        match key {
            Key::Quit => Some(Command::Quit),
            Key::Directional(dir) => {
                let (dx, dy) = match dir {
                    Direction::Up => (0, -1),
                    Direction::Down => (0, 1),
                    Direction::Left => (-1, 0),
                    Direction::Right => (1, 0),
                };
                Some(Command::MoveCursor { dx, dy })
            }
            Key::Enter => Some(Command::Submit),
            Key::Backspace if self.text_entry => Some(Command::DeleteChar),
            Key::Backspace => None,
            Key::Space if self.text_entry => Some(Command::AppendChar(' ')),
            Key::Space => match self.space {
                SpaceAction::Catch => Some(Command::CatchAttempt),
                SpaceAction::ToggleMode => Some(Command::ToggleMode),
                SpaceAction::Ignore => None,
            },
            Key::Char(c) if self.text_entry => Some(Command::AppendChar(c)),
            Key::Char('q') | Key::Char('Q') => Some(Command::Quit),
            Key::Char(c) if self.cycle_key.is_some_and(|k| k.eq_ignore_ascii_case(&c)) => {
                Some(Command::Cycle)
            }
            Key::Char(_) => None,
        }
    }

    /// Does delivering `cmd` end the capture thread?
    pub fn closes(&self, cmd: Command) -> bool {
        cmd == Command::Quit || (self.submit_closes && cmd == Command::Submit)
    }
}

// ── Channel ──

pub struct InputChannel {
    rx: Receiver<Command>,
}

impl InputChannel {
    /// Start a detached capture thread reading from `source`.
    pub fn spawn<S>(source: S, keymap: KeyMap) -> io::Result<Self>
    where
        S: ByteSource + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("input".into())
            .spawn(move || capture_loop(source, keymap, tx))?;
        Ok(InputChannel { rx })
    }

    /// Take every queued command without blocking.
    ///
    /// Once the capture thread is gone and the queue is empty, the run can
    /// never receive another key, so a `Quit` is reported instead.
    pub fn drain(&self) -> Vec<Command> {
        let mut out = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(cmd) => out.push(cmd),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    out.push(Command::Quit);
                    break;
                }
            }
        }
        out
    }
}

fn capture_loop<S: ByteSource>(mut source: S, keymap: KeyMap, tx: Sender<Command>) {
    loop {
        let key = match keys::decode(&mut source) {
            Ok(Some(key)) => key,
            Ok(None) => continue,
            Err(DecodeError::EndOfInput) => {
                debug!("input: end of input, capture stopped");
                return;
            }
            Err(e) => {
                debug!("input: swallowed read error: {e}");
                thread::sleep(READ_ERROR_BACKOFF);
                continue;
            }
        };

        let Some(cmd) = keymap.translate(key) else {
            trace!("input: {key:?} has no binding");
            continue;
        };

        if tx.send(cmd).is_err() {
            debug!("input: receiver dropped, capture stopped");
            return;
        }
        if keymap.closes(cmd) {
            debug!("input: {cmd:?} delivered, capture stopped");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    /// Drain until a Quit shows up (or give up after a second).
    fn collect(channel: &InputChannel) -> Vec<Command> {
        let deadline = Instant::now() + Duration::from_secs(1);
        let mut all = vec![];
        while Instant::now() < deadline {
            all.extend(channel.drain());
            if all.contains(&Command::Quit) { break; }
            thread::sleep(Duration::from_millis(2));
        }
        all
    }

    #[test]
    fn navigation_translation() {
        let km = KeyMap::navigation().with_space(SpaceAction::Catch).with_cycle('s');
        assert_eq!(km.translate(Key::Char('q')), Some(Command::Quit));
        assert_eq!(km.translate(Key::Quit), Some(Command::Quit));
        assert_eq!(km.translate(Key::Space), Some(Command::CatchAttempt));
        assert_eq!(km.translate(Key::Char('S')), Some(Command::Cycle));
        assert_eq!(km.translate(Key::Char('x')), None);
        assert_eq!(km.translate(Key::Backspace), None);
        assert_eq!(
            km.translate(Key::Directional(Direction::Left)),
            Some(Command::MoveCursor { dx: -1, dy: 0 })
        );
        assert_eq!(
            km.translate(Key::Directional(Direction::Down)),
            Some(Command::MoveCursor { dx: 0, dy: 1 })
        );
    }

    #[test]
    fn text_entry_types_q() {
        let km = KeyMap::text_entry();
        assert_eq!(km.translate(Key::Char('q')), Some(Command::AppendChar('q')));
        assert_eq!(km.translate(Key::Space), Some(Command::AppendChar(' ')));
        assert_eq!(km.translate(Key::Backspace), Some(Command::DeleteChar));
        assert_eq!(km.translate(Key::Enter), Some(Command::Submit));
        // Ctrl-C still leaves
        assert_eq!(km.translate(Key::Quit), Some(Command::Quit));
    }

    #[test]
    fn space_toggles_mode_when_asked() {
        let km = KeyMap::navigation().with_space(SpaceAction::ToggleMode);
        assert_eq!(km.translate(Key::Space), Some(Command::ToggleMode));
    }

    #[test]
    fn closing_commands() {
        let km = KeyMap::navigation();
        assert!(km.closes(Command::Quit));
        assert!(!km.closes(Command::Submit));
        assert!(km.closing_submit().closes(Command::Submit));
    }

    #[test]
    fn channel_delivers_decoded_commands_in_order() {
        let km = KeyMap::navigation().with_space(SpaceAction::Catch);
        let channel = InputChannel::spawn(&b"\x1b[D \x1b[Cq"[..], km).unwrap();
        let cmds = collect(&channel);
        assert_eq!(
            cmds[..4],
            [
                Command::MoveCursor { dx: -1, dy: 0 },
                Command::CatchAttempt,
                Command::MoveCursor { dx: 1, dy: 0 },
                Command::Quit,
            ]
        );
    }

    #[test]
    fn malformed_escape_is_skipped_by_the_thread() {
        let channel = InputChannel::spawn(&b"\x1bOx \x03"[..], KeyMap::text_entry()).unwrap();
        let cmds = collect(&channel);
        assert_eq!(cmds[..2], [Command::AppendChar(' '), Command::Quit]);
    }

    #[test]
    fn end_of_input_reports_quit_once_drained() {
        let channel = InputChannel::spawn(&b"ab"[..], KeyMap::text_entry()).unwrap();
        let cmds = collect(&channel);
        assert_eq!(
            cmds,
            vec![Command::AppendChar('a'), Command::AppendChar('b'), Command::Quit]
        );
    }

    #[test]
    fn drain_never_blocks_on_an_idle_source() {
        // A source that never produces anything within the test's lifetime.
        struct Idle;
        impl ByteSource for Idle {
            fn read_byte(&mut self) -> io::Result<Option<u8>> {
                thread::sleep(Duration::from_secs(3600));
                Ok(None)
            }
        }
        let channel = InputChannel::spawn(Idle, KeyMap::navigation()).unwrap();
        let start = Instant::now();
        assert!(channel.drain().is_empty());
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
