//! Narrative report log.
//!
//! Every resolution step that a player should hear about becomes a
//! [`ReportEntry`]. Entries are append-only and their text is stable, so the
//! SHA-256 digest of a log identifies a replay exactly.

use sha2::{Digest, Sha256};

use crate::attack::TargetSpec;
use crate::effects::{MineKind, SmokeKind};
use crate::homing::LockSelection;
use crate::intercept::DefenseStatus;
use crate::scatter::Landing;
use crate::state::{AttackId, BuildingId, DefenseId, EntityId, Hex, HexDirection, Turn};
use crate::tohit::ToHitResult;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReportKind {
    Declared {
        firer: EntityId,
        target: TargetSpec,
        turns_until_impact: u8,
    },
    /// The round lands this turn; the scheduler names the firer now.
    Imminent { firer: EntityId },
    HomingLock {
        target: TargetSpec,
        selection: LockSelection,
    },
    Defense {
        defense: DefenseId,
        status: DefenseStatus,
    },
    DestroyedInFlight,
    ToHit {
        to_hit: ToHitResult,
        roll: Option<u32>,
    },
    Hit { target: TargetSpec },
    Missed { margin_of_failure: u32 },
    Scattered {
        round: u8,
        direction: Option<HexDirection>,
        landing: Landing,
    },
    Impossible { reason: String },
    TargetLost { target: TargetSpec },
    EntityDamaged { entity: EntityId, amount: u32 },
    BuildingDamaged {
        building: BuildingId,
        hex: Hex,
        amount: u32,
    },
    Ignited { hex: Hex },
    Illuminated { hex: Hex, radius: u32 },
    SmokeDeployed { hex: Hex, kind: SmokeKind },
    MinefieldLaid { hex: Hex, kind: MineKind },
    MinefieldCleared { hex: Hex },
    MinefieldDetonated { hex: Hex },
}

impl core::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReportKind::Declared {
                firer,
                target,
                turns_until_impact,
            } => write!(
                f,
                "unit {firer} fires at {target}, impact in {turns_until_impact} turn(s)"
            ),
            ReportKind::Imminent { firer } => write!(f, "incoming round from unit {firer}"),
            ReportKind::HomingLock { target, selection } => match selection {
                LockSelection::Automatic => write!(f, "round homes onto {target}"),
                LockSelection::Arbitrated(index) => {
                    write!(f, "round homes onto {target} (choice {index})")
                }
                LockSelection::SafeDefault(response) => {
                    write!(f, "round homes onto {target} (default after {response:?})")
                }
            },
            ReportKind::Defense { defense, status } => write!(f, "defense {} {status}", defense.0),
            ReportKind::DestroyedInFlight => write!(f, "round destroyed in flight"),
            ReportKind::ToHit { to_hit, roll } => match roll {
                Some(roll) => write!(f, "to-hit {to_hit}, rolled {roll}"),
                None => write!(f, "to-hit {to_hit}"),
            },
            ReportKind::Hit { target } => write!(f, "direct hit on {target}"),
            ReportKind::Missed { margin_of_failure } => {
                write!(f, "missed by {margin_of_failure}")
            }
            ReportKind::Scattered {
                round,
                direction,
                landing,
            } => {
                write!(f, "round {round} ")?;
                match (landing, direction) {
                    (Landing::Hex(hex), Some(direction)) => {
                        write!(f, "scatters {direction} to {hex}")
                    }
                    (Landing::Hex(hex), None) => write!(f, "comes down on {hex} anyway"),
                    (Landing::LostOffBoard { would_be }, _) => {
                        write!(f, "scatters off the board towards {would_be}")
                    }
                    (Landing::OffBoardTarget { distance }, _) => {
                        write!(f, "lands {distance} hex(es) from its off-board target")
                    }
                }
            }
            ReportKind::Impossible { reason } => write!(f, "attack impossible: {reason}"),
            ReportKind::TargetLost { target } => {
                write!(f, "{target} has left the field; round wasted")
            }
            ReportKind::EntityDamaged { entity, amount } => {
                write!(f, "unit {entity} takes {amount} damage")
            }
            ReportKind::BuildingDamaged {
                building,
                hex,
                amount,
            } => write!(f, "{building} at {hex} takes {amount} damage"),
            ReportKind::Ignited { hex } => write!(f, "fire starts at {hex}"),
            ReportKind::Illuminated { hex, radius } => {
                write!(f, "flare lights {hex} (radius {radius})")
            }
            ReportKind::SmokeDeployed { hex, kind } => write!(f, "{kind} smoke fills {hex}"),
            ReportKind::MinefieldLaid { hex, kind } => write!(f, "{kind} laid at {hex}"),
            ReportKind::MinefieldCleared { hex } => write!(f, "minefield at {hex} cleared"),
            ReportKind::MinefieldDetonated { hex } => {
                write!(f, "minefield at {hex} detonates")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReportEntry {
    pub turn: Turn,
    pub attack: AttackId,
    pub kind: ReportKind,
}

impl core::fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[turn {}] {}: {}", self.turn.0, self.attack, self.kind)
    }
}

/// Append-only consumer of report entries.
pub trait ReportSink {
    fn push(&mut self, entry: ReportEntry);
}

impl ReportSink for Vec<ReportEntry> {
    fn push(&mut self, entry: ReportEntry) {
        Vec::push(self, entry);
    }
}

/// In-memory report log with an audit digest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportLog {
    entries: Vec<ReportEntry>,
}

impl ReportLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn for_attack(&self, attack: AttackId) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(move |entry| entry.attack == attack)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// SHA-256 over every entry's text, one line each.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for entry in &self.entries {
            hasher.update(entry.to_string().as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize().into()
    }
}

impl ReportSink for ReportLog {
    fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }
}
