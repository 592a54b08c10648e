//! To-hit evaluation for artillery shots.
//!
//! The target number is the firer's skill plus every modifier that applies,
//! rolled against 2d6. Externally computed modifiers (weapon accuracy, target
//! type, range, weather) arrive as labelled [`Modifier`]s; this module adds
//! the two the artillery rules own: the fire adjustment and the spotter.

use crate::attack::FireMode;
use crate::config::ArtilleryConfig;
use crate::convergence::FireAdjustment;
use crate::env::{BoardOracle, UnitOracle, UnitStatus, UnitView};
use crate::state::{EntityId, Hex};

/// Which skill statistic firers and spotters roll with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillRating {
    Gunnery,
    Artillery,
}

impl SkillRating {
    /// Picked once per resolution and used for the firer and the spotter alike.
    pub fn for_config(config: &ArtilleryConfig) -> Self {
        if config.use_artillery_skill {
            SkillRating::Artillery
        } else {
            SkillRating::Gunnery
        }
    }
}

/// One labelled line of a to-hit breakdown.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    pub label: String,
    pub delta: i32,
}

impl Modifier {
    pub fn new(label: impl Into<String>, delta: i32) -> Self {
        Self {
            label: label.into(),
            delta,
        }
    }
}

impl core::fmt::Display for Modifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {:+}", self.label, self.delta)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ToHitClass {
    /// Cannot succeed whatever is rolled; nothing is fired at the board.
    Impossible,
    /// Target number above the highest roll.
    AutomaticFail,
    /// Target number at or below the lowest roll, or an adjusted auto-hit hex.
    AutomaticSuccess,
    Normal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToHitResult {
    /// 2d6 result needed to hit.
    pub value: i32,
    pub modifiers: Vec<Modifier>,
    pub class: ToHitClass,
    /// Why the class is not `Normal`, when that needs explaining.
    pub reason: Option<String>,
}

impl ToHitResult {
    pub fn impossible(reason: impl Into<String>) -> Self {
        Self {
            value: ArtilleryConfig::MAX_ROLL + 1,
            modifiers: Vec::new(),
            class: ToHitClass::Impossible,
            reason: Some(reason.into()),
        }
    }

    fn from_modifiers(modifiers: Vec<Modifier>) -> Self {
        let value = modifiers.iter().map(|modifier| modifier.delta).sum();
        Self {
            value,
            modifiers,
            class: Self::classify(value),
            reason: None,
        }
    }

    pub fn classify(value: i32) -> ToHitClass {
        if value > ArtilleryConfig::MAX_ROLL {
            ToHitClass::AutomaticFail
        } else if value <= ArtilleryConfig::MIN_ROLL {
            ToHitClass::AutomaticSuccess
        } else {
            ToHitClass::Normal
        }
    }

    /// Adds a late modifier to a shot that still needs a roll.
    ///
    /// Shots already decided (automatic or impossible) are left alone.
    /// Returns whether the modifier was applied.
    pub fn apply_late_modifier(&mut self, modifier: Modifier) -> bool {
        if self.class != ToHitClass::Normal {
            return false;
        }
        self.value += modifier.delta;
        self.modifiers.push(modifier);
        self.class = Self::classify(self.value);
        true
    }

    /// Whether resolving this shot consumes a 2d6 roll.
    ///
    /// Automatic failures still roll so the miss has a margin to scatter by.
    pub fn needs_roll(&self) -> bool {
        matches!(self.class, ToHitClass::Normal | ToHitClass::AutomaticFail)
    }

    pub fn is_hit(&self, roll: Option<u32>) -> bool {
        match self.class {
            ToHitClass::AutomaticSuccess => true,
            ToHitClass::Impossible | ToHitClass::AutomaticFail => false,
            ToHitClass::Normal => roll.is_some_and(|roll| roll as i32 >= self.value),
        }
    }

    /// Roll minus target; negative on a miss.
    pub fn margin(&self, roll: u32) -> i32 {
        roll as i32 - self.value
    }

    pub fn margin_of_failure(&self, roll: u32) -> u32 {
        (-self.margin(roll)).max(0) as u32
    }
}

impl core::fmt::Display for ToHitResult {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.class {
            ToHitClass::Normal => write!(f, "needs {}", self.value)?,
            class => write!(f, "{class}")?,
        }
        if let Some(reason) = &self.reason {
            write!(f, " ({reason})")?;
        }
        if !self.modifiers.is_empty() {
            let parts: Vec<String> = self.modifiers.iter().map(ToString::to_string).collect();
            write!(f, " [{}]", parts.join(", "))?;
        }
        Ok(())
    }
}

/// The spotter a shot would be adjusted through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpotterQuality {
    pub spotter: EntityId,
    /// Skill under the same [`SkillRating`] as the firer.
    pub skill: u8,
    pub forward_observer: bool,
    pub comm_link: bool,
}

impl SpotterQuality {
    pub fn from_view(view: &UnitView, rating: SkillRating) -> Self {
        Self {
            spotter: view.id,
            skill: view.skill(rating),
            forward_observer: view.status.contains(UnitStatus::FORWARD_OBSERVER),
            comm_link: view.status.contains(UnitStatus::COMM_LINK),
        }
    }

    /// Spotter skill with its observer bonuses folded in; lower is better.
    fn effective_skill(&self) -> i32 {
        self.skill as i32 - self.forward_observer as i32 - self.comm_link as i32
    }

    pub fn modifiers(&self, firer_skill: u8) -> Vec<Modifier> {
        let mut modifiers = Vec::new();
        let relative = (self.skill as i32 - firer_skill as i32).signum();
        if relative != 0 {
            modifiers.push(Modifier::new("spotter skill", relative));
        }
        if self.forward_observer {
            modifiers.push(Modifier::new("forward observer", -1));
        }
        if self.comm_link {
            modifiers.push(Modifier::new("comm link", -1));
        }
        modifiers
    }
}

/// Picks the best eligible spotter among the declared candidates.
///
/// A spotter must still be in play on the board, share the firer's team and
/// see the target hex. Ties go to the candidate declared first.
pub fn select_spotter(
    candidates: &[EntityId],
    firer: &UnitView,
    target: Option<Hex>,
    rating: SkillRating,
    units: &dyn UnitOracle,
    board: &dyn BoardOracle,
) -> Option<SpotterQuality> {
    let target = target?;
    candidates
        .iter()
        .filter(|&&id| id != firer.id)
        .filter_map(|&id| units.unit(id))
        .filter(|view| !view.has_left_game() && view.team == firer.team)
        .filter(|view| {
            view.position
                .is_some_and(|position| board.has_line_of_sight(position, target))
        })
        .map(|view| SpotterQuality::from_view(&view, rating))
        .min_by_key(SpotterQuality::effective_skill)
}

/// Everything the evaluator needs for one shot.
#[derive(Clone, Copy, Debug)]
pub struct ToHitInputs<'a> {
    pub firer_skill: u8,
    pub fire_mode: FireMode,
    /// Modifiers supplied with the declaration.
    pub carried: &'a [Modifier],
    /// Modifiers supplied by the board for the target hex.
    pub environment: &'a [Modifier],
    /// `None` for a first shot at the hex.
    pub adjustment: Option<FireAdjustment>,
    pub spotter: Option<&'a SpotterQuality>,
}

pub fn evaluate(config: &ArtilleryConfig, inputs: &ToHitInputs<'_>) -> ToHitResult {
    let indirect = inputs.fire_mode == FireMode::Indirect;
    let adjustment = if indirect { inputs.adjustment } else { None };

    let mut modifiers = vec![Modifier::new("skill", inputs.firer_skill as i32)];
    if indirect {
        modifiers.push(Modifier::new("indirect fire", config.indirect_fire_modifier));
    }
    modifiers.extend(inputs.carried.iter().cloned());
    modifiers.extend(inputs.environment.iter().cloned());

    // Spotters only help walk in fire that has already landed here.
    if let Some(adjustment) = adjustment {
        if adjustment.offset() != 0 {
            modifiers.push(Modifier::new("fire adjustment", adjustment.offset()));
        }
        if let Some(spotter) = inputs.spotter {
            modifiers.extend(spotter.modifiers(inputs.firer_skill));
        }
    }

    let mut result = ToHitResult::from_modifiers(modifiers);
    if adjustment.is_some_and(|adjustment| adjustment.is_auto_hit()) {
        result.class = ToHitClass::AutomaticSuccess;
        result.reason = Some("fire adjusted onto target hex".into());
    }
    result
}
