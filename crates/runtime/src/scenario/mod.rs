//! Scripted artillery scenarios for replays, demos and integration tests.
//!
//! A scenario describes the board, the units and their defenses, and a list of
//! scripted turns. Each turn runs the phase order the tabletop rules use:
//! targeting countdown, designations and new declarations, off-board fire,
//! then on-board fire.

use std::path::{Path, PathBuf};

use barrage_content::ContentFactory;
use barrage_core::{
    AmmoId, AttackDeclaration, AttackId, BuildingId, DefenseRegime, EntityId, Hex, MinefieldView,
    Modifier, Phase, ResolutionReport, TagDesignation, TargetSpec, TeamId, UnitStatus, UnitView,
    WeaponId,
};
use serde::{Deserialize, Serialize};

use crate::api::{
    ClosestToOriginProvider, FixedChoiceProvider, LowestIdProvider, Result, RuntimeError,
};
use crate::oracle::Battlefield;
use crate::runtime::{Runtime, RuntimeConfig};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub id: EntityId,
    pub team: TeamId,
    /// `None` for units off the board edge.
    pub position: Option<Hex>,
    #[serde(default)]
    pub elevation: i32,
    pub gunnery: u8,
    pub artillery: u8,
    pub durability: u32,
    #[serde(default)]
    pub forward_observer: bool,
    #[serde(default)]
    pub comm_link: bool,
    #[serde(default)]
    pub defenses: Option<DefenseRegime>,
}

impl UnitSpec {
    fn view(&self) -> UnitView {
        let mut status = UnitStatus::empty();
        status.set(UnitStatus::FORWARD_OBSERVER, self.forward_observer);
        status.set(UnitStatus::COMM_LINK, self.comm_link);
        UnitView::new(self.id, self.team, self.position)
            .with_elevation(self.elevation)
            .with_skills(self.gunnery, self.artillery)
            .with_status(status)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingSpec {
    pub id: BuildingId,
    pub hex: Hex,
    pub capacity: u32,
}

/// How homing arbitration prompts are answered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArbitrationSpec {
    #[default]
    LowestId,
    ClosestToOrigin,
    Fixed(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignationSpec {
    pub tagger: EntityId,
    pub target: TargetSpec,
    #[serde(default = "default_true")]
    pub hit: bool,
}

fn default_true() -> bool {
    true
}

/// One artillery shot as written in a scenario file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackSpec {
    pub firer: EntityId,
    pub weapon: WeaponId,
    pub ammo: AmmoId,
    pub target: TargetSpec,
    #[serde(default)]
    pub turns_until_impact: u8,
    #[serde(default)]
    pub spotters: Vec<EntityId>,
    #[serde(default)]
    pub direct: bool,
    #[serde(default)]
    pub offboard: bool,
    #[serde(default)]
    pub bay: Option<u8>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

impl AttackSpec {
    fn declaration(&self, origin: Hex) -> AttackDeclaration {
        let mut declaration =
            AttackDeclaration::new(self.firer, self.weapon, self.ammo, self.target, origin)
                .with_turns_until_impact(self.turns_until_impact)
                .with_spotters(self.spotters.iter().copied());
        declaration.modifiers = self.modifiers.clone();
        if self.direct {
            declaration = declaration.direct();
        }
        if self.offboard {
            declaration = declaration.offboard();
        }
        if let Some(weapons) = self.bay {
            declaration = declaration.bay(weapons);
        }
        declaration
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedTurn {
    #[serde(default)]
    pub designations: Vec<DesignationSpec>,
    #[serde(default)]
    pub attacks: Vec<AttackSpec>,
}

/// Scenario configuration for a scripted session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub seed: u64,
    pub width: i32,
    pub height: i32,
    pub units: Vec<UnitSpec>,
    #[serde(default)]
    pub buildings: Vec<BuildingSpec>,
    #[serde(default)]
    pub minefields: Vec<(Hex, MinefieldView)>,
    #[serde(default)]
    pub blocked_sight: Vec<(Hex, Hex)>,
    #[serde(default)]
    pub arbitration: ArbitrationSpec,
    /// Content directory with `rules.toml` and `munitions.ron`; defaults to the bundled data.
    #[serde(default)]
    pub content: Option<PathBuf>,
    pub turns: Vec<ScriptedTurn>,
}

/// Everything one scripted turn produced.
#[derive(Clone, Debug, Default)]
pub struct TurnSummary {
    pub declared: Vec<AttackId>,
    pub reports: Vec<ResolutionReport>,
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Scenario = ron::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(RuntimeError::InvalidScenario(format!(
                "board must have a positive size, got {}x{}",
                self.width, self.height
            )));
        }
        let mut ids: Vec<EntityId> = self.units.iter().map(|unit| unit.id).collect();
        ids.sort();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(RuntimeError::InvalidScenario(format!(
                "unit {} is listed twice",
                pair[0]
            )));
        }
        Ok(())
    }

    pub fn battlefield(&self) -> Battlefield {
        let mut battlefield = Battlefield::new(self.width, self.height);
        for unit in &self.units {
            battlefield.add_unit(unit.view(), unit.durability);
            if let Some(regime) = &unit.defenses {
                battlefield.set_defenses(unit.id, regime.clone());
            }
        }
        for building in &self.buildings {
            battlefield.add_building(building.hex, building.id, building.capacity);
        }
        for &(hex, minefield) in &self.minefields {
            battlefield.add_minefield(hex, minefield);
        }
        for &(a, b) in &self.blocked_sight {
            battlefield.block_sight(a, b);
        }
        battlefield
    }

    /// Loads content and builds a runtime positioned before the first turn.
    pub fn build_runtime(&self) -> Result<Runtime> {
        let factory = match &self.content {
            Some(dir) => ContentFactory::new(dir),
            None => ContentFactory::bundled(),
        };
        let rules = factory.load_config()?;
        let munitions = factory.load_munitions()?;

        let config = RuntimeConfig {
            rules,
            session_seed: self.seed,
            ..RuntimeConfig::default()
        };
        let builder = Runtime::builder()
            .config(config)
            .battlefield(self.battlefield())
            .munitions(munitions);
        let builder = match self.arbitration {
            ArbitrationSpec::LowestId => builder.arbitration(LowestIdProvider),
            ArbitrationSpec::ClosestToOrigin => builder.arbitration(ClosestToOriginProvider),
            ArbitrationSpec::Fixed(index) => builder.arbitration(FixedChoiceProvider(index)),
        };
        builder.build()
    }

    /// Plays scripted turn `index` on `runtime`.
    ///
    /// The first scripted turn plays in the runtime's current turn; later ones
    /// start a new turn first.
    pub async fn play_turn(&self, runtime: &mut Runtime, index: usize) -> Result<TurnSummary> {
        let Some(turn) = self.turns.get(index) else {
            return Err(RuntimeError::InvalidScenario(format!(
                "scenario has no turn {index}"
            )));
        };
        if index > 0 {
            runtime.begin_turn();
        }

        runtime.tick_targeting_phase()?;

        let mut summary = TurnSummary::default();
        for designation in &turn.designations {
            let team = runtime
                .battlefield()
                .unit_record(designation.tagger)
                .map(|record| record.view.team)
                .ok_or_else(|| {
                    RuntimeError::InvalidScenario(format!(
                        "designation by unknown unit {}",
                        designation.tagger
                    ))
                })?;
            runtime.record_designation(TagDesignation {
                tagger: designation.tagger,
                team,
                target: designation.target,
                hit: designation.hit,
                turn: runtime.turn(),
            });
        }
        for attack in &turn.attacks {
            let origin = runtime
                .battlefield()
                .unit_record(attack.firer)
                .and_then(|record| record.view.position)
                .unwrap_or(Hex::ORIGIN);
            summary
                .declared
                .push(runtime.declare_attack(attack.declaration(origin))?);
        }

        summary
            .reports
            .extend(runtime.resolve_phase(Phase::Offboard).await?);
        summary
            .reports
            .extend(runtime.resolve_phase(Phase::Firing).await?);
        Ok(summary)
    }

    /// Plays every scripted turn in order.
    pub async fn play(&self, runtime: &mut Runtime) -> Result<Vec<TurnSummary>> {
        let mut summaries = Vec::with_capacity(self.turns.len());
        for index in 0..self.turns.len() {
            summaries.push(self.play_turn(runtime, index).await?);
        }
        Ok(summaries)
    }
}
