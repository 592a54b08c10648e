use crate::effects::MineKind;
use crate::state::{BuildingId, EntityId, Hex};
use crate::tohit::Modifier;

/// Board and terrain queries served by the game-state store.
///
/// Reads reflect the store as it was when the current attack started; damage
/// written through [`super::DamageSink`] is not expected to show up mid-attack.
pub trait BoardOracle: Send + Sync {
    /// Whether `hex` is on the playable area.
    fn contains(&self, hex: Hex) -> bool;

    fn building(&self, hex: Hex) -> Option<BuildingView>;

    fn minefield(&self, _hex: Hex) -> Option<MinefieldView> {
        None
    }

    /// Units standing in `hex`, in a stable order.
    fn occupants(&self, hex: Hex) -> Vec<EntityId>;

    fn has_line_of_sight(&self, from: Hex, to: Hex) -> bool;

    /// Weather, light and terrain modifiers affecting shots into `target`.
    fn environment_modifiers(&self, _target: Hex) -> Vec<Modifier> {
        Vec::new()
    }
}

/// Structure occupying a hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildingView {
    pub id: BuildingId,
    /// Damage the structure can still soak up in this hex.
    pub remaining_capacity: u32,
}

impl BuildingView {
    pub const fn new(id: BuildingId, remaining_capacity: u32) -> Self {
        Self {
            id,
            remaining_capacity,
        }
    }
}

/// Minefield already present in a hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinefieldView {
    pub kind: MineKind,
    pub density: u8,
}
