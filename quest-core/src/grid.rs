//! Grid geometry with letter-row / number-column cell labels

use serde::{Deserialize, Serialize};

/// Maximum rows/columns for a board
pub const MAX_DIM: u16 = 100;

/// A cell position: zero-based row, one-based column.
///
/// Labels read like spreadsheet references rotated 90 degrees: the row
/// carries the letters ("A", "B", ... "Z", "AA", "AB", ...) and the column
/// carries the number, so row 0 / column 1 is "A1".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: u16,
    pub col: u16,
}

impl Coord {
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// Cell label, e.g. "A1" or "AB7"
    pub fn label(&self) -> String {
        format!("{}{}", row_letters(self.row), self.col)
    }

    /// Parse a label back into a coordinate. Accepts lowercase letters.
    /// Zero-padded columns are rejected so every coordinate has exactly one
    /// parseable label.
    pub fn parse(label: &str) -> Option<Self> {
        let split = label.find(|c: char| c.is_ascii_digit())?;
        let (letters, digits) = label.split_at(split);
        if digits.starts_with('0') {
            return None;
        }
        let col: u16 = digits.parse().ok()?;
        let row = row_index(letters)?;
        Some(Self { row, col })
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", row_letters(self.row), self.col)
    }
}

/// Letter part of a row label: A-Z for rows 0-25, then AA, AB, ... Excel-style
pub fn row_letters(row: u16) -> String {
    if row < 26 {
        ((b'A' + row as u8) as char).to_string()
    } else {
        let first = (b'A' + (row / 26) as u8 - 1) as char;
        let second = (b'A' + (row % 26) as u8) as char;
        format!("{first}{second}")
    }
}

fn row_index(letters: &str) -> Option<u16> {
    let upper = letters.to_ascii_uppercase();
    let bytes = upper.as_bytes();
    match bytes {
        [a] if a.is_ascii_uppercase() => Some((a - b'A') as u16),
        [a, b] if a.is_ascii_uppercase() && b.is_ascii_uppercase() => {
            Some(((a - b'A') as u16 + 1) * 26 + (b - b'A') as u16)
        }
        _ => None,
    }
}

/// Chebyshev distance: the number of king-style steps between two cells
pub fn chebyshev(a: Coord, b: Coord) -> u32 {
    let dr = (a.row as i32 - b.row as i32).unsigned_abs();
    let dc = (a.col as i32 - b.col as i32).unsigned_abs();
    dr.max(dc)
}

/// All coordinates of a rows x columns board in row-major order
pub fn coords(rows: u16, columns: u16) -> impl Iterator<Item = Coord> {
    (0..rows).flat_map(move |row| (1..=columns).map(move |col| Coord::new(row, col)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Coord::new(0, 1).label(), "A1");
        assert_eq!(Coord::new(4, 12).label(), "E12");
        assert_eq!(Coord::new(25, 3).label(), "Z3");
        assert_eq!(Coord::new(26, 1).label(), "AA1");
        assert_eq!(Coord::new(27, 9).label(), "AB9");
        assert_eq!(Coord::new(52, 2).label(), "BA2");
    }

    #[test]
    fn test_parse_round_trip() {
        for coord in coords(60, 15) {
            assert_eq!(Coord::parse(&coord.label()), Some(coord));
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Coord::parse(""), None);
        assert_eq!(Coord::parse("A"), None);
        assert_eq!(Coord::parse("7"), None);
        assert_eq!(Coord::parse("A0"), None);
        assert_eq!(Coord::parse("A07"), None);
        assert_eq!(Coord::parse("AAA1"), None);
    }

    #[test]
    fn test_parse_lowercase() {
        assert_eq!(Coord::parse("c3"), Some(Coord::new(2, 3)));
    }

    #[test]
    fn test_chebyshev_symmetry() {
        let a = Coord::new(0, 1);
        let b = Coord::new(3, 4);
        assert_eq!(chebyshev(a, b), chebyshev(b, a));
        assert_eq!(chebyshev(a, a), 0);
    }

    #[test]
    fn test_chebyshev_distances() {
        // A1 -> C3 is two diagonal steps, A1 -> D4 is three
        let a1 = Coord::parse("A1").unwrap();
        assert_eq!(chebyshev(a1, Coord::parse("C3").unwrap()), 2);
        assert_eq!(chebyshev(a1, Coord::parse("D4").unwrap()), 3);
        assert_eq!(chebyshev(a1, Coord::parse("A5").unwrap()), 4);
    }

    #[test]
    fn test_coords_count() {
        assert_eq!(coords(5, 5).count(), 25);
        let first: Vec<_> = coords(2, 3).map(|c| c.label()).collect();
        assert_eq!(first, ["A1", "A2", "A3", "B1", "B2", "B3"]);
    }
}
