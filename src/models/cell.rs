//! Braille cell and dot definitions.

use serde::{Deserialize, Serialize};

/// First code point of the Unicode braille patterns block.
const BRAILLE_BASE: u32 = 0x2800;

/// One of the six dot positions of a braille cell.
///
/// Dots 1-3 form the left column (top to bottom), dots 4-6 the right column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dot {
    /// Dot 1 (left column, top)
    Dot1,
    /// Dot 2 (left column, middle)
    Dot2,
    /// Dot 3 (left column, bottom)
    Dot3,
    /// Dot 4 (right column, top)
    Dot4,
    /// Dot 5 (right column, middle)
    Dot5,
    /// Dot 6 (right column, bottom)
    Dot6,
}

impl Dot {
    /// All dots in index order.
    pub const ALL: [Self; 6] = [
        Self::Dot1,
        Self::Dot2,
        Self::Dot3,
        Self::Dot4,
        Self::Dot5,
        Self::Dot6,
    ];

    /// Converts an array index (0-5) into a dot.
    ///
    /// Returns `None` for anything outside 0-5; callers at the input boundary
    /// use this to reject malformed events before they reach the engine.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Dot1),
            1 => Some(Self::Dot2),
            2 => Some(Self::Dot3),
            3 => Some(Self::Dot4),
            4 => Some(Self::Dot5),
            5 => Some(Self::Dot6),
            _ => None,
        }
    }

    /// Array index of this dot (0-5).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Dot1 => 0,
            Self::Dot2 => 1,
            Self::Dot3 => 2,
            Self::Dot4 => 3,
            Self::Dot5 => 4,
            Self::Dot6 => 5,
        }
    }

    /// Conventional braille dot number (1-6).
    #[must_use]
    pub const fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

impl std::fmt::Display for Dot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dot {}", self.number())
    }
}

/// A single braille cell holding six dot states.
///
/// Cells are plain values: reading one out of the grid copies it, so a
/// chord being built never aliases the cell stored in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cell {
    dots: [bool; 6],
}

impl Cell {
    /// The empty cell (no dots raised).
    pub const EMPTY: Self = Self { dots: [false; 6] };

    /// Visual order of dot indices when a cell is drawn row by row
    /// (1 4 / 2 5 / 3 6).
    pub const DISPLAY_ORDER: [usize; 6] = [0, 3, 1, 4, 2, 5];

    /// Returns a fresh empty cell.
    #[must_use]
    pub const fn empty() -> Self {
        Self::EMPTY
    }

    /// Creates a cell from raw dot states.
    #[must_use]
    pub const fn from_dots(dots: [bool; 6]) -> Self {
        Self { dots }
    }

    /// Creates a cell with the given dots raised.
    #[must_use]
    pub fn with_dots(raised: &[Dot]) -> Self {
        let mut cell = Self::EMPTY;
        for dot in raised {
            cell.raise(*dot);
        }
        cell
    }

    /// Raw dot states in index order.
    #[must_use]
    pub const fn dots(&self) -> [bool; 6] {
        self.dots
    }

    /// Whether the given dot is raised.
    #[must_use]
    pub const fn is_raised(&self, dot: Dot) -> bool {
        self.dots[dot.index()]
    }

    /// Raises a dot. Raising an already raised dot is harmless.
    pub fn raise(&mut self, dot: Dot) {
        self.dots[dot.index()] = true;
    }

    /// Whether no dot is raised.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.dots.iter().any(|d| *d)
    }

    /// The raised dots in index order.
    #[must_use]
    pub fn raised_dots(&self) -> Vec<Dot> {
        Dot::ALL
            .into_iter()
            .filter(|dot| self.is_raised(*dot))
            .collect()
    }

    /// Bit mask with dot n stored in bit n-1.
    #[must_use]
    pub fn mask(&self) -> u8 {
        self.dots
            .iter()
            .enumerate()
            .filter(|(_, raised)| **raised)
            .fold(0u8, |acc, (i, _)| acc | (1 << i))
    }

    /// The Unicode braille pattern for this cell (U+2800 block).
    #[must_use]
    pub fn to_unicode(&self) -> char {
        // Masks stay below 0x40, always a valid braille code point
        char::from_u32(BRAILLE_BASE + u32::from(self.mask())).unwrap_or('\u{2800}')
    }

    /// Parses a six-dot Unicode braille pattern.
    ///
    /// Eight-dot patterns (dots 7 and 8) are rejected.
    #[must_use]
    pub fn from_unicode(c: char) -> Option<Self> {
        let offset = (c as u32).checked_sub(BRAILLE_BASE)?;
        if offset >= 0x40 {
            return None;
        }
        let mut dots = [false; 6];
        for (i, dot) in dots.iter_mut().enumerate() {
            *dot = offset & (1 << i) != 0;
        }
        Some(Self { dots })
    }
}
