//! Axial hex coordinates.
//!
//! The board uses flat-topped hexes addressed by axial `(q, r)` coordinates.
//! Distances, rings and straight-line translation are all integer arithmetic,
//! so scatter and blast geometry are exactly reproducible.

use std::fmt;

use arrayvec::ArrayVec;

/// A board hex in axial coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const ORIGIN: Self = Self { q: 0, r: 0 };

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Hex-grid distance (number of steps between centres).
    pub fn distance(self, other: Hex) -> u32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        ((dq.abs() + dr.abs() + (dq + dr).abs()) / 2) as u32
    }

    pub fn neighbor(self, direction: HexDirection) -> Hex {
        let (dq, dr) = direction.offset();
        Hex::new(self.q + dq, self.r + dr)
    }

    /// Moves `distance` hexes in a straight line.
    pub fn translated(self, direction: HexDirection, distance: u32) -> Hex {
        let (dq, dr) = direction.offset();
        let n = distance as i32;
        Hex::new(self.q + dq * n, self.r + dr * n)
    }

    pub fn neighbors(self) -> ArrayVec<Hex, 6> {
        HexDirection::ALL
            .iter()
            .map(|&direction| self.neighbor(direction))
            .collect()
    }

    /// All hexes exactly `radius` steps away, walked clockwise.
    ///
    /// Radius zero yields the hex itself.
    pub fn ring(self, radius: u32) -> Vec<Hex> {
        if radius == 0 {
            return vec![self];
        }

        let mut hexes = Vec::with_capacity(6 * radius as usize);
        let mut cursor = self.translated(HexDirection::SouthWest, radius);
        for direction in HexDirection::RING_WALK {
            for _ in 0..radius {
                hexes.push(cursor);
                cursor = cursor.neighbor(direction);
            }
        }
        hexes
    }

    /// Every hex within `radius`, ordered ring by ring from the centre.
    pub fn spiral(self, radius: u32) -> Vec<(u32, Hex)> {
        (0..=radius)
            .flat_map(|ring| self.ring(ring).into_iter().map(move |hex| (ring, hex)))
            .collect()
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// The six directions out of a flat-topped hex.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HexDirection {
    #[strum(serialize = "north")]
    North,
    #[strum(serialize = "north-east")]
    NorthEast,
    #[strum(serialize = "south-east")]
    SouthEast,
    #[strum(serialize = "south")]
    South,
    #[strum(serialize = "south-west")]
    SouthWest,
    #[strum(serialize = "north-west")]
    NorthWest,
}

impl HexDirection {
    pub const ALL: [HexDirection; 6] = [
        HexDirection::North,
        HexDirection::NorthEast,
        HexDirection::SouthEast,
        HexDirection::South,
        HexDirection::SouthWest,
        HexDirection::NorthWest,
    ];

    /// Walk order for `Hex::ring` when starting from the south-west corner.
    const RING_WALK: [HexDirection; 6] = [
        HexDirection::SouthEast,
        HexDirection::NorthEast,
        HexDirection::North,
        HexDirection::NorthWest,
        HexDirection::SouthWest,
        HexDirection::South,
    ];

    /// Maps a d6 face (1..=6) onto a direction, clockwise from north.
    pub fn from_die_face(face: u32) -> Self {
        Self::ALL[((face.max(1) - 1) % 6) as usize]
    }

    pub const fn offset(self) -> (i32, i32) {
        match self {
            HexDirection::North => (0, -1),
            HexDirection::NorthEast => (1, -1),
            HexDirection::SouthEast => (1, 0),
            HexDirection::South => (0, 1),
            HexDirection::SouthWest => (-1, 1),
            HexDirection::NorthWest => (-1, 0),
        }
    }
}
