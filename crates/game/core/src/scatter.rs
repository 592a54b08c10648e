//! Where a missed round actually comes down.
//!
//! Distance is a pure function of the margin of failure; direction is one d6
//! roll per round. Bays call [`scatter_round`] once per weapon with the same
//! margin and a per-round seed.

use crate::env::{BoardOracle, RngOracle};
use crate::state::{Hex, HexDirection};

/// Converts a margin of failure into a scatter distance.
///
/// `distance = margin * per_margin / divisor`, rounded down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScatterRule {
    pub per_margin: u32,
    pub divisor: u32,
}

impl ScatterRule {
    /// One hex per point of failure.
    pub const INDIRECT: Self = Self {
        per_margin: 1,
        divisor: 1,
    };

    /// Half a hex per point of failure; a near miss lands on the target hex.
    pub const DIRECT: Self = Self {
        per_margin: 1,
        divisor: 2,
    };

    pub fn distance(&self, margin_of_failure: u32) -> u32 {
        margin_of_failure.saturating_mul(self.per_margin) / self.divisor.max(1)
    }
}

impl Default for ScatterRule {
    fn default() -> Self {
        Self::INDIRECT
    }
}

/// Final resting place of one round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Landing {
    Hex(Hex),
    /// Scattered past the board edge; no damage.
    LostOffBoard { would_be: Hex },
    /// Target is not on the board, so only the miss distance is known.
    OffBoardTarget { distance: u32 },
}

impl Landing {
    pub fn hex(&self) -> Option<Hex> {
        match self {
            Landing::Hex(hex) => Some(*hex),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScatteredRound {
    /// Index of the weapon within its bay; zero for single weapons.
    pub round: u8,
    pub direction: Option<HexDirection>,
    pub distance: u32,
    pub landing: Landing,
}

impl ScatteredRound {
    /// Landed exactly where it was aimed even though it missed.
    pub fn is_zero_displacement(&self) -> bool {
        self.distance == 0 && matches!(self.landing, Landing::Hex(_))
    }
}

/// Scatters one missed round aimed at `aim` (`None` for an off-board target).
///
/// Draws a direction only when there is a board to move across and a
/// non-zero distance to move.
pub fn scatter_round(
    rule: ScatterRule,
    aim: Option<Hex>,
    margin_of_failure: u32,
    round: u8,
    board: &dyn BoardOracle,
    rng: &dyn RngOracle,
    seed: u64,
) -> ScatteredRound {
    let distance = rule.distance(margin_of_failure);

    let Some(aim) = aim else {
        return ScatteredRound {
            round,
            direction: None,
            distance,
            landing: Landing::OffBoardTarget { distance },
        };
    };

    if distance == 0 {
        return ScatteredRound {
            round,
            direction: None,
            distance,
            landing: Landing::Hex(aim),
        };
    }

    let direction = HexDirection::from_die_face(rng.roll_die(seed, 6));
    let hex = aim.translated(direction, distance);
    let landing = if board.contains(hex) {
        Landing::Hex(hex)
    } else {
        Landing::LostOffBoard { would_be: hex }
    };

    ScatteredRound {
        round,
        direction: Some(direction),
        distance,
        landing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestWorld, SequenceRng};

    #[test]
    fn distance_is_monotonic_in_margin() {
        for rule in [ScatterRule::INDIRECT, ScatterRule::DIRECT] {
            let distances: Vec<u32> = (0..=12).map(|margin| rule.distance(margin)).collect();
            assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
            assert!(rule.distance(0) <= rule.distance(5));
            assert_eq!(rule.distance(0), 0);
        }
    }

    #[test]
    fn direct_fire_scatters_half_as_far() {
        assert_eq!(ScatterRule::DIRECT.distance(1), 0);
        assert_eq!(ScatterRule::DIRECT.distance(5), 2);
        assert_eq!(ScatterRule::INDIRECT.distance(5), 5);
    }

    #[test]
    fn scatter_lands_exactly_distance_away() {
        let board = TestWorld::new(20);
        let aim = Hex::new(10, 10);
        let rng = SequenceRng::new(&[SequenceRng::die_face(3)]);

        let scattered = scatter_round(ScatterRule::INDIRECT, Some(aim), 3, 0, &board, &rng, 0);

        assert_eq!(scattered.direction, Some(HexDirection::SouthEast));
        let landed = scattered.landing.hex().unwrap();
        assert_eq!(aim.distance(landed), 3);
    }

    #[test]
    fn scatter_past_the_edge_is_lost() {
        let board = TestWorld::new(5);
        let rng = SequenceRng::new(&[SequenceRng::die_face(1)]);

        let scattered = scatter_round(
            ScatterRule::INDIRECT,
            Some(Hex::new(2, 0)),
            4,
            0,
            &board,
            &rng,
            0,
        );

        assert_eq!(
            scattered.landing,
            Landing::LostOffBoard {
                would_be: Hex::new(2, -4)
            }
        );
    }

    #[test]
    fn zero_displacement_stays_on_aim_without_rolling() {
        let board = TestWorld::new(10);
        let rng = SequenceRng::new(&[]);
        let aim = Hex::new(3, 3);

        let scattered = scatter_round(ScatterRule::DIRECT, Some(aim), 1, 0, &board, &rng, 0);

        assert!(scattered.is_zero_displacement());
        assert_eq!(scattered.landing, Landing::Hex(aim));
        assert_eq!(rng.calls(), 0);
    }

    #[test]
    fn off_board_target_reports_distance_only() {
        let board = TestWorld::new(10);
        let rng = SequenceRng::new(&[]);

        let scattered = scatter_round(ScatterRule::INDIRECT, None, 4, 2, &board, &rng, 0);

        assert_eq!(scattered.landing, Landing::OffBoardTarget { distance: 4 });
        assert_eq!(scattered.round, 2);
        assert_eq!(scattered.direction, None);
    }
}
