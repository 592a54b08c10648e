//! Point-defense interception of incoming homing rounds.
//!
//! A lone mount makes one percentile check. A battery pools the counter value
//! of every mount that engages and subtracts it from the round's missile
//! armor; a round that survives carries a to-hit penalty proportional to the
//! armor it lost.

use crate::config::ArtilleryConfig;
use crate::env::{CooldownTracker, RngOracle};
use crate::state::{DefenseId, EntityId};

/// Whether a mount fires on its own or waits for its controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefenseMode {
    #[default]
    Automatic,
    /// Controller decided ahead of time whether to engage.
    Manual { engage: bool },
    Off,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefenseSystem {
    pub id: DefenseId,
    pub owner: EntityId,
    /// Missile armor removed when this mount engages as part of a battery.
    pub counter_value: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: DefenseMode,
}

impl DefenseSystem {
    pub fn new(id: DefenseId, owner: EntityId, counter_value: u32) -> Self {
        Self {
            id,
            owner,
            counter_value,
            mode: DefenseMode::Automatic,
        }
    }

    pub fn with_mode(mut self, mode: DefenseMode) -> Self {
        self.mode = mode;
        self
    }

    fn wants_to_engage(&self) -> bool {
        match self.mode {
            DefenseMode::Automatic => true,
            DefenseMode::Manual { engage } => engage,
            DefenseMode::Off => false,
        }
    }
}

/// Defenses protecting one target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefenseRegime {
    Single(DefenseSystem),
    Batched(Vec<DefenseSystem>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefenseStatus {
    Engaged,
    /// Wanted to fire but the cooldown tracker refused.
    Overheated,
    Declined,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefenseReport {
    pub defense: DefenseId,
    pub status: DefenseStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterceptResult {
    Destroyed,
    /// The round got through; `to_hit_penalty` is added to its target number.
    Survived { to_hit_penalty: i32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterceptReport {
    pub defenses: Vec<DefenseReport>,
    pub result: InterceptResult,
}

impl InterceptReport {
    pub fn destroyed(&self) -> bool {
        self.result == InterceptResult::Destroyed
    }

    pub fn to_hit_penalty(&self) -> i32 {
        match self.result {
            InterceptResult::Destroyed => 0,
            InterceptResult::Survived { to_hit_penalty } => to_hit_penalty,
        }
    }
}

fn engage(defense: &DefenseSystem, cooldowns: &mut dyn CooldownTracker) -> DefenseStatus {
    if !defense.wants_to_engage() {
        return DefenseStatus::Declined;
    }
    if !cooldowns.is_available(defense.id) {
        return DefenseStatus::Overheated;
    }
    cooldowns.record_engagement(defense.id);
    DefenseStatus::Engaged
}

/// Runs the defenses against one incoming round.
///
/// Consumes one d100 roll only when a single mount engages.
pub fn intercept(
    regime: &DefenseRegime,
    missile_armor: u32,
    config: &ArtilleryConfig,
    cooldowns: &mut dyn CooldownTracker,
    rng: &dyn RngOracle,
    seed: u64,
) -> InterceptReport {
    match regime {
        DefenseRegime::Single(defense) => {
            let status = engage(defense, cooldowns);
            let result = if status == DefenseStatus::Engaged
                && rng.roll_d100(seed) <= config.single_intercept_chance
            {
                InterceptResult::Destroyed
            } else {
                InterceptResult::Survived { to_hit_penalty: 0 }
            };
            InterceptReport {
                defenses: vec![DefenseReport {
                    defense: defense.id,
                    status,
                }],
                result,
            }
        }
        DefenseRegime::Batched(defenses) => {
            let mut reports = Vec::with_capacity(defenses.len());
            let mut absorbed = 0u32;
            let mut any_engaged = false;
            for defense in defenses {
                let status = engage(defense, cooldowns);
                if status == DefenseStatus::Engaged {
                    any_engaged = true;
                    absorbed = absorbed.saturating_add(defense.counter_value);
                }
                reports.push(DefenseReport {
                    defense: defense.id,
                    status,
                });
            }

            let result = if any_engaged && absorbed >= missile_armor {
                InterceptResult::Destroyed
            } else {
                InterceptResult::Survived {
                    to_hit_penalty: batch_penalty(absorbed, missile_armor, config),
                }
            };
            InterceptReport {
                defenses: reports,
                result,
            }
        }
    }
}

/// Penalty for a round that lost `absorbed` of its `armor`, rounded up.
fn batch_penalty(absorbed: u32, armor: u32, config: &ArtilleryConfig) -> i32 {
    if absorbed == 0 || armor == 0 {
        return 0;
    }
    let max = config.batch_max_penalty.max(0) as u32;
    (absorbed.min(armor) * max).div_ceil(armor) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{LimitedCooldowns, SequenceRng};
    use crate::env::UnlimitedCooldowns;

    fn mount(id: u32, counter: u32) -> DefenseSystem {
        DefenseSystem::new(DefenseId(id), EntityId(9), counter)
    }

    #[test]
    fn single_mount_destroys_on_low_roll() {
        let config = ArtilleryConfig::default();
        let regime = DefenseRegime::Single(mount(1, 0));

        let rng = SequenceRng::new(&[SequenceRng::d100(50)]);
        let report = intercept(&regime, 10, &config, &mut UnlimitedCooldowns, &rng, 0);
        assert!(report.destroyed());
        assert_eq!(report.defenses[0].status, DefenseStatus::Engaged);

        let rng = SequenceRng::new(&[SequenceRng::d100(51)]);
        let report = intercept(&regime, 10, &config, &mut UnlimitedCooldowns, &rng, 0);
        assert_eq!(report.result, InterceptResult::Survived { to_hit_penalty: 0 });
    }

    #[test]
    fn declined_and_overheated_mounts_do_not_roll() {
        let config = ArtilleryConfig::default();
        let rng = SequenceRng::new(&[]);

        let off = DefenseRegime::Single(mount(1, 0).with_mode(DefenseMode::Off));
        let report = intercept(&off, 10, &config, &mut UnlimitedCooldowns, &rng, 0);
        assert_eq!(report.defenses[0].status, DefenseStatus::Declined);

        let mut cooldowns = LimitedCooldowns::exhausted([DefenseId(2)]);
        let hot = DefenseRegime::Single(mount(2, 0));
        let report = intercept(&hot, 10, &config, &mut cooldowns, &rng, 0);
        assert_eq!(report.defenses[0].status, DefenseStatus::Overheated);
        assert!(!report.destroyed());

        assert_eq!(rng.calls(), 0);
    }

    #[test]
    fn battery_exceeding_armor_destroys_round() {
        let config = ArtilleryConfig::default();
        let regime = DefenseRegime::Batched(vec![mount(1, 4), mount(2, 4), mount(3, 3)]);
        let rng = SequenceRng::new(&[]);

        let report = intercept(&regime, 10, &config, &mut UnlimitedCooldowns, &rng, 0);

        assert!(report.destroyed());
        assert!(
            report
                .defenses
                .iter()
                .all(|defense| defense.status == DefenseStatus::Engaged)
        );
    }

    #[test]
    fn battery_short_of_armor_penalises_proportionally() {
        let config = ArtilleryConfig::default();
        let rng = SequenceRng::new(&[]);

        let regime = DefenseRegime::Batched(vec![
            mount(1, 5),
            mount(2, 4).with_mode(DefenseMode::Manual { engage: false }),
        ]);
        let report = intercept(&regime, 10, &config, &mut UnlimitedCooldowns, &rng, 0);
        // 5 of 10 armor absorbed: half of the maximum penalty of 4
        assert_eq!(report.to_hit_penalty(), 2);
        assert_eq!(report.defenses[1].status, DefenseStatus::Declined);

        let regime = DefenseRegime::Batched(vec![mount(1, 1)]);
        let report = intercept(&regime, 10, &config, &mut UnlimitedCooldowns, &rng, 0);
        assert_eq!(report.to_hit_penalty(), 1);
    }

    #[test]
    fn battery_that_never_engages_leaves_round_alone() {
        let config = ArtilleryConfig::default();
        let rng = SequenceRng::new(&[]);
        let regime = DefenseRegime::Batched(vec![mount(1, 5).with_mode(DefenseMode::Off)]);

        let report = intercept(&regime, 0, &config, &mut UnlimitedCooldowns, &rng, 0);

        assert_eq!(report.result, InterceptResult::Survived { to_hit_penalty: 0 });
    }
}
