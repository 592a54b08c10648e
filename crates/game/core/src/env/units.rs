use bitflags::bitflags;

use crate::intercept::DefenseRegime;
use crate::state::{EntityId, Hex, TeamId};
use crate::tohit::SkillRating;

/// Unit queries served by the game-state store.
pub trait UnitOracle: Send + Sync {
    fn unit(&self, id: EntityId) -> Option<UnitView>;

    /// Point defenses protecting `id` against incoming homing rounds.
    fn point_defenses(&self, _id: EntityId) -> Option<DefenseRegime> {
        None
    }
}

bitflags! {
    /// Status bits relevant to artillery resolution.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitStatus: u16 {
        const DESTROYED        = 1 << 0;
        const WITHDRAWN        = 1 << 1;
        const DISENGAGED       = 1 << 2;
        /// Trained forward observer; improves adjusted fire it spots for.
        const FORWARD_OBSERVER = 1 << 3;
        /// Shares a comm/neural link with friendly artillery.
        const COMM_LINK        = 1 << 4;
    }
}

impl UnitStatus {
    /// Any of these removes the unit from play.
    pub const GONE: Self = Self::DESTROYED.union(Self::WITHDRAWN).union(Self::DISENGAGED);
}

/// Read-only snapshot of a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitView {
    pub id: EntityId,
    pub team: TeamId,
    /// `None` when the unit is off the board (fleeing, off-board artillery).
    pub position: Option<Hex>,
    /// Height above the ground of its hex.
    pub elevation: i32,
    pub gunnery: u8,
    pub artillery: u8,
    pub status: UnitStatus,
}

impl UnitView {
    pub fn new(id: EntityId, team: TeamId, position: Option<Hex>) -> Self {
        Self {
            id,
            team,
            position,
            elevation: 0,
            gunnery: 4,
            artillery: 4,
            status: UnitStatus::empty(),
        }
    }

    pub fn with_skills(mut self, gunnery: u8, artillery: u8) -> Self {
        self.gunnery = gunnery;
        self.artillery = artillery;
        self
    }

    pub fn with_status(mut self, status: UnitStatus) -> Self {
        self.status |= status;
        self
    }

    pub fn with_elevation(mut self, elevation: i32) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn has_left_game(&self) -> bool {
        self.status.intersects(UnitStatus::GONE)
    }

    pub fn is_off_board(&self) -> bool {
        self.position.is_none()
    }

    pub fn skill(&self, rating: SkillRating) -> u8 {
        match rating {
            SkillRating::Gunnery => self.gunnery,
            SkillRating::Artillery => self.artillery,
        }
    }
}
