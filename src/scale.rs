//! Builds the eight notes of a major or natural-minor scale.
//!
//! Names and frequencies are both derived from one list of scale-degree
//! offsets, so a note's spelling always matches the pitch it sounds at.

use std::fmt;

use clap::ValueEnum;

use crate::note::{self, Letter, Note};

/// Notes per scale, root to octave inclusive
pub const NUM_NOTES: usize = 8;

/// Scale mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    /// Semitones between consecutive degrees
    pub fn step_pattern(self) -> [i32; NUM_NOTES - 1] {
        match self {
            Mode::Major => [2, 2, 1, 2, 2, 2, 1],
            Mode::Minor => [2, 1, 2, 2, 1, 2, 2],
        }
    }

    /// Offsets of each degree relative to the root
    pub fn degree_offsets(self) -> [i32; NUM_NOTES] {
        let mut offsets = [0; NUM_NOTES];
        for (i, step) in self.step_pattern().into_iter().enumerate() {
            offsets[i + 1] = offsets[i] + step;
        }
        offsets
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Major => write!(f, "major"),
            Mode::Minor => write!(f, "minor"),
        }
    }
}

/// An ordered run of eight notes from the root to its octave
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    mode: Mode,
    notes: Vec<Note>,
}

impl Scale {
    /// Build the scale for `root` in `mode`.
    ///
    /// A root that does not name a known pitch falls back to A.
    pub fn build(root: &str, mode: Mode) -> Self {
        let letter = root.chars().next().and_then(Letter::from_char);
        let (letter, root_offset) = match (letter, note::root_offset(root)) {
            (Some(letter), Some(offset)) => (letter, offset),
            _ => (Letter::A, 0),
        };

        let notes = mode
            .degree_offsets()
            .into_iter()
            .enumerate()
            .map(|(degree, offset)| Note::new(letter.advance(degree), root_offset + offset))
            .collect();

        Self { mode, notes }
    }

    /// Spelled name of the root actually used
    pub fn root(&self) -> &str {
        &self.notes[0].name
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.notes().iter()
    }
}

impl<'a> IntoIterator for &'a Scale {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
