//! Homing retarget resolution.
//!
//! A homing round locks onto a target designated by a friendly laser this
//! turn. Candidates are the successful designations of the firer's side within
//! the homing radius of the round's original hex. One candidate locks
//! automatically; several go to the [`Arbiter`] exactly once.

use crate::attack::TargetSpec;
use crate::env::{Arbiter, ArbitrationRequest, ArbitrationResponse, UnitOracle};
use crate::state::{AttackId, EntityId, Hex, TeamId, Turn};

/// A laser designation recorded by the targeting subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagDesignation {
    pub tagger: EntityId,
    pub team: TeamId,
    pub target: TargetSpec,
    pub hit: bool,
    pub turn: Turn,
}

/// Designations for the current turn, in the order they were made.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DesignationSet {
    designations: Vec<TagDesignation>,
}

impl DesignationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, designation: TagDesignation) {
        self.designations.push(designation);
    }

    pub fn clear(&mut self) {
        self.designations.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagDesignation> {
        self.designations.iter()
    }

    pub fn len(&self) -> usize {
        self.designations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.designations.is_empty()
    }
}

/// A target a homing round could lock onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HomingCandidate {
    pub target: TargetSpec,
    /// Where the target is now.
    pub hex: Hex,
    pub tagger: EntityId,
    /// Distance from the round's original hex.
    pub distance: u32,
}

/// How the lock was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LockSelection {
    /// Only one candidate qualified.
    Automatic,
    /// The arbiter picked this index.
    Arbitrated(usize),
    /// The arbiter failed to answer usefully; the safe default was taken.
    SafeDefault(ArbitrationResponse),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HomingLock {
    pub candidate: HomingCandidate,
    /// Hex the round was aimed at before homing; misses scatter from here.
    pub original_hex: Hex,
    pub selection: LockSelection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HomingFailure {
    #[error("no valid designation")]
    NoValidDesignation,
}

/// The round being retargeted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HomingQuery {
    pub attack: AttackId,
    pub firer: EntityId,
    pub team: TeamId,
    pub original_hex: Hex,
    pub radius: u32,
    pub turn: Turn,
}

/// Eligible candidates, one per target, in designation order.
pub fn eligible_candidates(
    query: &HomingQuery,
    designations: &DesignationSet,
    units: &dyn UnitOracle,
) -> Vec<HomingCandidate> {
    let mut candidates: Vec<HomingCandidate> = Vec::new();

    for designation in designations.iter() {
        if designation.team != query.team || designation.turn != query.turn || !designation.hit {
            continue;
        }
        if candidates
            .iter()
            .any(|candidate| candidate.target == designation.target)
        {
            continue;
        }

        let hex = match designation.target {
            TargetSpec::Entity(id) => match units.unit(id) {
                Some(view) if !view.has_left_game() => view.position,
                _ => None,
            },
            target => target.fixed_hex(),
        };
        let Some(hex) = hex else { continue };

        let distance = query.original_hex.distance(hex);
        if distance > query.radius {
            continue;
        }

        candidates.push(HomingCandidate {
            target: designation.target,
            hex,
            tagger: designation.tagger,
            distance,
        });
    }

    candidates
}

/// Index of the candidate taken when arbitration fails: lowest entity id,
/// then lowest hex for non-unit targets.
pub fn safe_default(candidates: &[HomingCandidate]) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .min_by_key(|(_, candidate)| match candidate.target {
            TargetSpec::Entity(id) => (0, id, candidate.hex),
            _ => (1, EntityId(u32::MAX), candidate.hex),
        })
        .map(|(index, _)| index)
}

/// Resolves which designated target the round homes onto.
pub fn resolve_homing(
    query: &HomingQuery,
    designations: &DesignationSet,
    units: &dyn UnitOracle,
    arbiter: &dyn Arbiter,
) -> Result<HomingLock, HomingFailure> {
    let candidates = eligible_candidates(query, designations, units);

    let (index, selection) = match candidates.len() {
        0 => return Err(HomingFailure::NoValidDesignation),
        1 => (0, LockSelection::Automatic),
        _ => {
            let request = ArbitrationRequest {
                attack: query.attack,
                firer: query.firer,
                team: query.team,
                original_hex: query.original_hex,
                candidates: candidates.clone(),
            };
            match arbiter.choose(&request) {
                ArbitrationResponse::Chosen(index) if index < candidates.len() => {
                    (index, LockSelection::Arbitrated(index))
                }
                response => {
                    let index =
                        safe_default(&candidates).ok_or(HomingFailure::NoValidDesignation)?;
                    (index, LockSelection::SafeDefault(response))
                }
            }
        }
    };

    Ok(HomingLock {
        candidate: candidates[index],
        original_hex: query.original_hex,
        selection,
    })
}
