/// Key decoder: raw terminal bytes → logical keys.
///
/// Reads one byte at a time from a `ByteSource`. Escape sequences are
/// resolved with exactly two follow-up reads (`[` then `A`..`D`); anything
/// else after ESC is dropped, never surfaced as typed text.

use std::io::{self, Read};

use thiserror::Error;

const ESC: u8 = 0x1b;
const CTRL_C: u8 = 0x03;
const BS: u8 = 0x08;
const DEL: u8 = 0x7f;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key {
    Char(char),
    Quit,
    Enter,
    Backspace,
    Space,
    Directional(Direction),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("end of input")]
    EndOfInput,
    #[error("input read failed: {0}")]
    Io(#[from] io::Error),
}

/// A blocking source of raw input bytes. `Ok(None)` means end of input.
pub trait ByteSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<R: Read> ByteSource for R {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Decode the next logical key.
///
/// `Ok(None)` means bytes were consumed but produced nothing (a malformed
/// escape sequence, an unmapped control byte, broken UTF-8).
pub fn decode<S: ByteSource + ?Sized>(src: &mut S) -> Result<Option<Key>, DecodeError> {
    let byte = match src.read_byte()? {
        Some(b) => b,
        None => return Err(DecodeError::EndOfInput),
    };

    let key = match byte {
        CTRL_C => Some(Key::Quit),
        b'\r' | b'\n' => Some(Key::Enter),
        BS | DEL => Some(Key::Backspace),
        b' ' => Some(Key::Space),
        ESC => decode_escape(src),
        0x21..=0x7e => Some(Key::Char(byte as char)),
        0x80..=0xff => decode_utf8(src, byte).map(Key::Char),
        _ => None,
    };
    Ok(key)
}

/// ESC already consumed. Failed or mismatched reads discard the sequence.
fn decode_escape<S: ByteSource + ?Sized>(src: &mut S) -> Option<Key> {
    let first = src.read_byte().ok().flatten();
    let second = src.read_byte().ok().flatten();
    if first != Some(b'[') {
        return None;
    }
    let dir = match second? {
        b'A' => Direction::Up,
        b'B' => Direction::Down,
        b'C' => Direction::Right,
        b'D' => Direction::Left,
        _ => return None,
    };
    Some(Key::Directional(dir))
}

fn decode_utf8<S: ByteSource + ?Sized>(src: &mut S, lead: u8) -> Option<char> {
    let extra = match lead {
        0xc2..=0xdf => 1,
        0xe0..=0xef => 2,
        0xf0..=0xf4 => 3,
        _ => return None,
    };
    let mut buf = [lead, 0, 0, 0];
    for slot in buf.iter_mut().skip(1).take(extra) {
        *slot = src.read_byte().ok().flatten()?;
    }
    let ch = std::str::from_utf8(&buf[..=extra]).ok()?.chars().next()?;
    if ch.is_control() { None } else { Some(ch) }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Decode everything until end of input, dropping no-op results.
    fn decode_all(bytes: &[u8]) -> Vec<Key> {
        let mut src = bytes;
        let mut keys = vec![];
        loop {
            match decode(&mut src) {
                Ok(Some(k)) => keys.push(k),
                Ok(None) => {}
                Err(DecodeError::EndOfInput) => break,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        keys
    }

    /// Source that fails every read after the given bytes.
    struct Failing(Vec<u8>);

    impl ByteSource for Failing {
        fn read_byte(&mut self) -> io::Result<Option<u8>> {
            if self.0.is_empty() {
                Err(io::Error::new(io::ErrorKind::Other, "boom"))
            } else {
                Ok(Some(self.0.remove(0)))
            }
        }
    }

    #[test]
    fn printable_and_controls() {
        assert_eq!(
            decode_all(b"a Z\r\x7f\x08\n\x03"),
            vec![
                Key::Char('a'),
                Key::Space,
                Key::Char('Z'),
                Key::Enter,
                Key::Backspace,
                Key::Backspace,
                Key::Enter,
                Key::Quit,
            ]
        );
    }

    #[test]
    fn q_is_a_plain_character() {
        // Mapping q to quit is a keymap decision, not a decoding one.
        assert_eq!(decode_all(b"q"), vec![Key::Char('q')]);
    }

    #[test]
    fn arrow_sequences() {
        assert_eq!(
            decode_all(b"\x1b[A\x1b[B\x1b[C\x1b[D"),
            vec![
                Key::Directional(Direction::Up),
                Key::Directional(Direction::Down),
                Key::Directional(Direction::Right),
                Key::Directional(Direction::Left),
            ]
        );
    }

    #[test]
    fn lone_escape_then_end_of_input() {
        let mut src: &[u8] = b"\x1b";
        assert!(matches!(decode(&mut src), Ok(None)));
        assert!(matches!(decode(&mut src), Err(DecodeError::EndOfInput)));
    }

    #[test]
    fn escape_with_one_follow_up_byte() {
        let mut src: &[u8] = b"\x1b[";
        assert!(matches!(decode(&mut src), Ok(None)));
    }

    #[test]
    fn malformed_escape_does_not_leak_text() {
        // ESC O P (F1 on some terminals), then ESC [ Z (shift-tab)
        assert_eq!(decode_all(b"\x1bOP\x1b[Zx"), vec![Key::Char('x')]);
    }

    #[test]
    fn escape_consumes_exactly_two_bytes() {
        // "ab" are swallowed as the (bad) continuation, "c" survives
        assert_eq!(decode_all(b"\x1babc"), vec![Key::Char('c')]);
    }

    #[test]
    fn failed_continuation_read_is_a_no_op() {
        let mut src = Failing(vec![ESC]);
        assert!(matches!(decode(&mut src), Ok(None)));
        // The next read surfaces the I/O error to the caller
        assert!(matches!(decode(&mut src), Err(DecodeError::Io(_))));
    }

    #[test]
    fn utf8_characters() {
        assert_eq!(
            decode_all("é❄".as_bytes()),
            vec![Key::Char('é'), Key::Char('❄')]
        );
    }

    #[test]
    fn broken_utf8_is_dropped() {
        // A 3-byte lead swallows two bytes even when they are not continuations
        assert_eq!(decode_all(&[0xe2, 0x28, 0x28, b'k']), vec![Key::Char('k')]);
        assert_eq!(decode_all(&[0xff, b'k']), vec![Key::Char('k')]);
    }

    #[test]
    fn other_control_bytes_are_dropped() {
        assert_eq!(decode_all(&[0x01, 0x09, b'k']), vec![Key::Char('k')]);
    }
}
