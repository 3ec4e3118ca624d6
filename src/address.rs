//! Launchpad address space.
//!
//! Maps hardware key codes to logical grid coordinates and back.
//!
//! # Addressable space (9x9)
//!
//! ```text
//!        x=0 .. x=7              x=8
//! y=0    top controls (CC)       unused corner
//! y=1    pad row 1               right control 1
//! ...    ...                     ...
//! y=8    pad row 8               right control 8
//! ```
//!
//! Top controls live in the control-change namespace (104-111); pads and right
//! controls live in the note namespace. Note values skip between rows, so
//! translation is table-driven rather than arithmetic.

use thiserror::Error;

/// Note codes for the 8x8 pad grid, indexed `PADS[y][x]` with y counted from
/// the row just above the top control row.
const PADS: [[u8; 8]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7],
    [16, 17, 18, 19, 20, 21, 22, 23],
    [32, 33, 34, 35, 36, 37, 38, 39],
    [48, 49, 50, 51, 52, 53, 54, 55],
    [64, 65, 66, 67, 68, 69, 70, 71],
    [80, 81, 82, 83, 84, 85, 86, 87],
    [96, 97, 98, 99, 100, 101, 102, 103],
    [112, 113, 114, 115, 116, 117, 118, 119],
];

/// Note codes for the right-hand control column, top to bottom.
const CONTROLS_RIGHT: [u8; 8] = [8, 24, 40, 56, 72, 88, 104, 120];

/// Control-change codes for the top control row, left to right.
const CONTROLS_TOP: [u8; 8] = [104, 105, 106, 107, 108, 109, 110, 111];

/// Hardware identifier for a single button/LED.
///
/// The two variants are disjoint namespaces: `Note(104)` is the seventh right
/// control while `Control(104)` is the first top control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Note-namespace code: grid pads and right-side controls.
    Note(u8),
    /// Control-change-namespace code: top-row controls only.
    Control(u8),
}

/// Logical (column, row) address in the 9x9 addressable space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub x: u8,
    pub y: u8,
}

impl Coordinate {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// The (8,0) corner has no button or LED behind it.
    pub const fn is_corner(self) -> bool {
        self.x == 8 && self.y == 0
    }
}

/// A key code with no coordinate behind it, or vice versa.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UnmappedKeyError {
    #[error("key {0:?} does not exist as a control or pad")]
    UnknownKey(KeyCode),

    #[error("coordinate ({0}, {1}) has no hardware key")]
    UnknownCoordinate(u8, u8),
}

/// Check if a key is part of the top row of control buttons.
///
/// Only control-change codes can be top controls; a note code with a value in
/// the 104-111 range is still a note.
pub fn is_top_control(key: KeyCode) -> bool {
    matches!(key, KeyCode::Control(code) if CONTROLS_TOP.contains(&code))
}

/// Check if a key is part of the right-hand column of control buttons.
pub fn is_right_control(key: KeyCode) -> bool {
    matches!(key, KeyCode::Note(code) if CONTROLS_RIGHT.contains(&code))
}

/// Check if a key is part of one of the control rows.
pub fn is_control(key: KeyCode) -> bool {
    is_top_control(key) || is_right_control(key)
}

/// Check if a key is part of the main 8x8 pad grid.
///
/// Defined by exclusion: any key that is not a control is assumed to be a pad.
pub fn is_pad(key: KeyCode) -> bool {
    !is_control(key)
}

/// Translate a hardware key to its grid coordinate.
pub fn to_coordinate(key: KeyCode) -> Result<Coordinate, UnmappedKeyError> {
    match key {
        KeyCode::Note(code) => {
            if let Some(index) = CONTROLS_RIGHT.iter().position(|&c| c == code) {
                return Ok(Coordinate::new(8, index as u8 + 1));
            }

            for y in 0..8 {
                for x in 0..8 {
                    if PADS[y][x] == code {
                        return Ok(Coordinate::new(x as u8, y as u8 + 1));
                    }
                }
            }

            Err(UnmappedKeyError::UnknownKey(key))
        }
        KeyCode::Control(code) => CONTROLS_TOP
            .iter()
            .position(|&c| c == code)
            .map(|index| Coordinate::new(index as u8, 0))
            .ok_or(UnmappedKeyError::UnknownKey(key)),
    }
}

/// Translate a grid coordinate to its hardware key.
///
/// The unused (8,0) corner is rejected: it denotes "no control", not a pad.
pub fn to_key_code(coordinate: Coordinate) -> Result<KeyCode, UnmappedKeyError> {
    match (coordinate.x, coordinate.y) {
        (8, 0) => Err(UnmappedKeyError::UnknownCoordinate(8, 0)),
        (x @ 0..=7, 0) => Ok(KeyCode::Control(CONTROLS_TOP[x as usize])),
        (8, y @ 1..=8) => Ok(KeyCode::Note(CONTROLS_RIGHT[y as usize - 1])),
        (x @ 0..=7, y @ 1..=8) => Ok(KeyCode::Note(PADS[y as usize - 1][x as usize])),
        (x, y) => Err(UnmappedKeyError::UnknownCoordinate(x, y)),
    }
}
