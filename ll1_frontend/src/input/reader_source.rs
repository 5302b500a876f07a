//! Streaming character source over any `BufRead`

use super::{CharSource, InputError};
use crate::config::runtime::InputPreferences;
use crate::utils::Position;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// UTF-8 decoding reader with a bounded rewind window
///
/// While a mark is active every character read is recorded. A rewind replays
/// the recorded characters before touching the reader again. Reading more
/// than `window` characters past the mark invalidates it, and a later rewind
/// fails with `InputError::RewindWindowExceeded`.
pub struct ReaderSource<R: BufRead> {
    reader: R,
    window: usize,
    replay: VecDeque<char>,
    history: Option<Vec<char>>,
    mark_position: Position,
    mark_overrun: bool,
    position: Position,
    exhausted: bool,
}

impl<R: BufRead> ReaderSource<R> {
    /// Reader with the rewind window from runtime preferences
    pub fn new(reader: R) -> Self {
        Self::with_window(reader, InputPreferences::default().rewind_window)
    }

    pub fn with_window(reader: R, window: usize) -> Self {
        Self {
            reader,
            window,
            replay: VecDeque::new(),
            history: None,
            mark_position: Position::start(),
            mark_overrun: false,
            position: Position::start(),
            exhausted: false,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    fn next_byte(&mut self) -> Result<Option<u8>, InputError> {
        loop {
            let buffer = match self.reader.fill_buf() {
                Ok(buffer) => buffer,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            let Some(&byte) = buffer.first() else {
                return Ok(None);
            };
            self.reader.consume(1);
            return Ok(Some(byte));
        }
    }

    fn decode_char(&mut self) -> Result<Option<char>, InputError> {
        if self.exhausted {
            return Ok(None);
        }

        let Some(first) = self.next_byte()? else {
            self.exhausted = true;
            return Ok(None);
        };

        let width = match first {
            0x00..=0x7F => return Ok(Some(first as char)),
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => {
                return Err(InputError::InvalidEncoding {
                    offset: self.position.offset,
                })
            }
        };

        let mut bytes = [first, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            *slot = self
                .next_byte()?
                .ok_or(InputError::InvalidEncoding {
                    offset: self.position.offset,
                })?;
        }

        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or(InputError::InvalidEncoding {
                offset: self.position.offset,
            })
    }
}

impl ReaderSource<BufReader<File>> {
    /// Open a file for streaming
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, InputError> {
        Self::from_path_with_window(path, InputPreferences::default().rewind_window)
    }

    pub fn from_path_with_window<P: AsRef<Path>>(path: P, window: usize) -> Result<Self, InputError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => InputError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => InputError::from(e),
        })?;
        Ok(Self::with_window(BufReader::new(file), window))
    }
}

impl<R: BufRead> CharSource for ReaderSource<R> {
    fn read(&mut self) -> Result<Option<char>, InputError> {
        let next = match self.replay.pop_front() {
            Some(ch) => Some(ch),
            None => self.decode_char()?,
        };

        let Some(ch) = next else {
            return Ok(None);
        };

        if let Some(history) = self.history.as_mut() {
            history.push(ch);
            if history.len() > self.window {
                self.history = None;
                self.mark_overrun = true;
            }
        }

        self.position = self.position.advance(ch);
        Ok(Some(ch))
    }

    fn mark(&mut self) {
        self.history = Some(Vec::new());
        self.mark_position = self.position;
        self.mark_overrun = false;
    }

    fn rewind(&mut self) -> Result<(), InputError> {
        match self.history.take() {
            Some(history) => {
                for ch in history.into_iter().rev() {
                    self.replay.push_front(ch);
                }
                self.history = Some(Vec::new());
                self.position = self.mark_position;
                Ok(())
            }
            None if self.mark_overrun => Err(InputError::RewindWindowExceeded {
                window: self.window,
            }),
            None => Err(InputError::NoActiveMark),
        }
    }

    fn release_mark(&mut self) {
        self.history = None;
        self.mark_overrun = false;
    }

    fn position(&self) -> Position {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::{Cursor, Write};

    fn drain<S: CharSource>(source: &mut S) -> String {
        let mut out = String::new();
        while let Some(ch) = source.read().unwrap() {
            out.push(ch);
        }
        out
    }

    #[test]
    fn test_decodes_multibyte_utf8() {
        let mut source = ReaderSource::with_window(Cursor::new("aλ€😀".as_bytes()), 16);
        assert_eq!(drain(&mut source), "aλ€😀");
        assert_eq!(source.position().offset, 4);
        assert_eq!(source.read().unwrap(), None);
    }

    #[test]
    fn test_invalid_utf8_is_reported() {
        let mut source = ReaderSource::with_window(Cursor::new(vec![b'a', 0xFF]), 16);
        assert_eq!(source.read().unwrap(), Some('a'));
        assert_matches!(
            source.read(),
            Err(InputError::InvalidEncoding { offset: 1 })
        );
    }

    #[test]
    fn test_rewind_replays_history() {
        let mut source = ReaderSource::with_window(Cursor::new("ab cd"), 16);
        source.read().unwrap();
        source.mark();
        source.read().unwrap();
        source.read().unwrap();
        source.read().unwrap();

        source.rewind().unwrap();
        assert_eq!(source.position(), Position::new(1, 1, 2));

        // Rewinding twice from the same mark replays the same characters
        source.read().unwrap();
        source.rewind().unwrap();
        assert_eq!(drain(&mut source), "b cd");
    }

    #[test]
    fn test_rewind_beyond_window_fails() {
        let mut source = ReaderSource::with_window(Cursor::new("abcdefghijklmnop"), 10);
        source.mark();
        for _ in 0..11 {
            source.read().unwrap();
        }
        assert_matches!(
            source.rewind(),
            Err(InputError::RewindWindowExceeded { window: 10 })
        );
    }

    #[test]
    fn test_rewind_within_window_succeeds_at_limit() {
        let mut source = ReaderSource::with_window(Cursor::new("abcdefghijklmnop"), 10);
        source.mark();
        for _ in 0..10 {
            source.read().unwrap();
        }
        assert!(source.rewind().is_ok());
        assert_eq!(source.read().unwrap(), Some('a'));
    }

    #[test]
    fn test_release_mark() {
        let mut source = ReaderSource::with_window(Cursor::new("abc"), 10);
        source.mark();
        source.read().unwrap();
        source.release_mark();
        assert_matches!(source.rewind(), Err(InputError::NoActiveMark));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "ab&&").unwrap();

        let mut source = ReaderSource::from_path(file.path()).unwrap();
        assert_eq!(drain(&mut source), "ab&&");
    }

    #[test]
    fn test_from_missing_path() {
        let result = ReaderSource::from_path("/no/such/input.txt");
        assert_matches!(result.err(), Some(InputError::FileNotFound { .. }));
    }
}
