use std::fmt;

/// Reference pitch (A4) in Hz
pub const A4_FREQ_HZ: f64 = 440.0;

/// Pitch classes of the C4..B4 octave, as semitone offsets from A4, with
/// every spelling that names them.
static PITCH_CLASSES: [(i32, &[&str]); 12] = [
    (-9, &["C", "B#"]),
    (-8, &["C#", "Db"]),
    (-7, &["D"]),
    (-6, &["D#", "Eb"]),
    (-5, &["E", "Fb"]),
    (-4, &["F", "E#"]),
    (-3, &["F#", "Gb"]),
    (-2, &["G"]),
    (-1, &["G#", "Ab"]),
    (0, &["A"]),
    (1, &["A#", "Bb"]),
    (2, &["B", "Cb"]),
];

/// Natural note letters, in alphabet order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Letter {
    const ALL: [Letter; 7] = [
        Letter::A,
        Letter::B,
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
    ];

    /// Case-insensitive letter lookup
    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::A => 'A',
            Letter::B => 'B',
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
        }
    }

    /// Offset of the natural note from A4, within the C4..B4 octave
    pub fn natural_offset(self) -> i32 {
        match self {
            Letter::C => -9,
            Letter::D => -7,
            Letter::E => -5,
            Letter::F => -4,
            Letter::G => -2,
            Letter::A => 0,
            Letter::B => 2,
        }
    }

    /// The letter `steps` places further along the alphabet (G wraps to A)
    pub fn advance(self, steps: usize) -> Letter {
        Self::ALL[(self as usize + steps) % Self::ALL.len()]
    }
}

/// Semitone offset from A4 of a spelled pitch such as "C#" or "bb".
///
/// The letter is matched case-insensitively, the accidental exactly.
pub fn root_offset(name: &str) -> Option<i32> {
    let mut chars = name.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let spelled: String = std::iter::once(letter).chain(chars).collect();
    PITCH_CLASSES
        .iter()
        .find(|(_, names)| names.contains(&spelled.as_str()))
        .map(|(offset, _)| *offset)
}

/// Equal-tempered frequency of a pitch `offset` semitones from A4
pub fn frequency_for_offset(offset: i32) -> f64 {
    A4_FREQ_HZ * 2.0_f64.powf(offset as f64 / 12.0)
}

/// Spell the pitch at `offset` using `letter`, adding whatever sharps or
/// flats are needed to reach it.
pub fn spell(letter: Letter, offset: i32) -> String {
    let mut shift = (offset - letter.natural_offset()).rem_euclid(12);
    if shift > 6 {
        shift -= 12;
    }
    let accidental = if shift >= 0 { "#" } else { "b" };
    let mut name = String::with_capacity(3);
    name.push(letter.as_char());
    name.push_str(&accidental.repeat(shift.unsigned_abs() as usize));
    name
}

/// One pitch of a scale
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub name: String,
    pub semitone_offset: i32,
    pub frequency_hz: f64,
}

impl Note {
    pub fn new(letter: Letter, semitone_offset: i32) -> Self {
        Self {
            name: spell(letter, semitone_offset),
            semitone_offset,
            frequency_hz: frequency_for_offset(semitone_offset),
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} Hz)", self.name, self.frequency_hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_frequency() {
        assert!((frequency_for_offset(0) - 440.0).abs() < 1e-9);
        assert!((frequency_for_offset(12) - 880.0).abs() < 1e-9);
        assert!((frequency_for_offset(-9) - 261.6256).abs() < 0.001);
    }

    #[test]
    fn test_root_offsets() {
        assert_eq!(root_offset("C"), Some(-9));
        assert_eq!(root_offset("B#"), Some(-9));
        assert_eq!(root_offset("Db"), Some(-8));
        assert_eq!(root_offset("Cb"), Some(2));
        assert_eq!(root_offset("A"), Some(0));
        assert_eq!(root_offset("B"), Some(2));
    }

    #[test]
    fn test_root_offset_letter_case() {
        assert_eq!(root_offset("c"), Some(-9));
        assert_eq!(root_offset("bb"), Some(1));
        assert_eq!(root_offset("f#"), Some(-3));
    }

    #[test]
    fn test_unknown_roots() {
        assert_eq!(root_offset("H"), None);
        assert_eq!(root_offset(""), None);
        assert_eq!(root_offset("C#b"), None);
        assert_eq!(root_offset("CB"), None);
    }

    #[test]
    fn test_every_spelling_round_trips() {
        for (offset, names) in PITCH_CLASSES.iter() {
            for name in names.iter() {
                let letter = name.chars().next().and_then(Letter::from_char).unwrap();
                assert_eq!(spell(letter, *offset), *name);
            }
        }
    }

    #[test]
    fn test_double_accidentals() {
        assert_eq!(spell(Letter::F, -2), "F##");
        assert_eq!(spell(Letter::B, 0), "Bbb");
    }

    #[test]
    fn test_octave_spelling() {
        // C5 sits an octave above the table's C4
        assert_eq!(spell(Letter::C, 3), "C");
        assert_eq!(spell(Letter::A, 12), "A");
    }

    #[test]
    fn test_letter_wraps() {
        assert_eq!(Letter::G.advance(1), Letter::A);
        assert_eq!(Letter::C.advance(7), Letter::C);
        assert_eq!(Letter::F.advance(3), Letter::B);
    }

    #[test]
    fn test_display() {
        let note = Note::new(Letter::A, 0);
        assert_eq!(note.to_string(), "A (440.00 Hz)");
    }
}
