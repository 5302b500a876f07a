//! In-memory character source

use super::{CharSource, InputError};
use crate::utils::Position;

/// Character source over owned text; rewinds are unbounded
#[derive(Debug, Clone)]
pub struct StrSource {
    chars: Vec<char>,
    index: usize,
    position: Position,
    mark: Option<(usize, Position)>,
}

impl StrSource {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            index: 0,
            position: Position::start(),
            mark: None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.chars.len()
    }

    /// Characters not yet read
    pub fn remaining(&self) -> String {
        self.chars[self.index..].iter().collect()
    }
}

impl CharSource for StrSource {
    fn read(&mut self) -> Result<Option<char>, InputError> {
        match self.chars.get(self.index).copied() {
            Some(ch) => {
                self.index += 1;
                self.position = self.position.advance(ch);
                Ok(Some(ch))
            }
            None => Ok(None),
        }
    }

    fn mark(&mut self) {
        self.mark = Some((self.index, self.position));
    }

    fn rewind(&mut self) -> Result<(), InputError> {
        let (index, position) = self.mark.ok_or(InputError::NoActiveMark)?;
        self.index = index;
        self.position = position;
        Ok(())
    }

    fn release_mark(&mut self) {
        self.mark = None;
    }

    fn position(&self) -> Position {
        self.position
    }
}
