//! In-crate test doubles for the oracle traits.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::effects::{MineKind, SmokeKind};
use crate::env::{
    Arbiter, ArbitrationRequest, ArbitrationResponse, BoardOracle, BuildingView, CooldownTracker,
    DamageSink, MinefieldView, RngOracle, UnitOracle, UnitView,
};
use crate::intercept::DefenseRegime;
use crate::state::{AttackId, BuildingId, DefenseId, EntityId, Hex};
use crate::tohit::Modifier;

/// Square board of `size × size` axial hexes plus the units on it.
#[derive(Clone, Debug, Default)]
pub struct TestWorld {
    size: i32,
    units: BTreeMap<EntityId, UnitView>,
    buildings: BTreeMap<Hex, BuildingView>,
    minefields: BTreeMap<Hex, MinefieldView>,
    defenses: BTreeMap<EntityId, DefenseRegime>,
    blocked: Vec<(Hex, Hex)>,
    environment: Vec<Modifier>,
}

impl TestWorld {
    pub fn new(size: i32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn add_unit(&mut self, unit: UnitView) {
        self.units.insert(unit.id, unit);
    }

    pub fn unit_mut(&mut self, id: EntityId) -> &mut UnitView {
        self.units.get_mut(&id).expect("unit registered")
    }

    pub fn add_building(&mut self, hex: Hex, building: BuildingView) {
        self.buildings.insert(hex, building);
    }

    pub fn add_minefield(&mut self, hex: Hex, minefield: MinefieldView) {
        self.minefields.insert(hex, minefield);
    }

    pub fn add_defenses(&mut self, owner: EntityId, regime: DefenseRegime) {
        self.defenses.insert(owner, regime);
    }

    pub fn block_sight(&mut self, from: Hex, to: Hex) {
        self.blocked.push((from, to));
    }

    pub fn add_environment(&mut self, modifier: Modifier) {
        self.environment.push(modifier);
    }
}

impl BoardOracle for TestWorld {
    fn contains(&self, hex: Hex) -> bool {
        (0..self.size).contains(&hex.q) && (0..self.size).contains(&hex.r)
    }

    fn building(&self, hex: Hex) -> Option<BuildingView> {
        self.buildings.get(&hex).copied()
    }

    fn minefield(&self, hex: Hex) -> Option<MinefieldView> {
        self.minefields.get(&hex).copied()
    }

    fn occupants(&self, hex: Hex) -> Vec<EntityId> {
        self.units
            .values()
            .filter(|unit| unit.position == Some(hex))
            .map(|unit| unit.id)
            .collect()
    }

    fn has_line_of_sight(&self, from: Hex, to: Hex) -> bool {
        !self
            .blocked
            .iter()
            .any(|&(a, b)| (a, b) == (from, to) || (a, b) == (to, from))
    }

    fn environment_modifiers(&self, _target: Hex) -> Vec<Modifier> {
        self.environment.clone()
    }
}

impl UnitOracle for TestWorld {
    fn unit(&self, id: EntityId) -> Option<UnitView> {
        self.units.get(&id).cloned()
    }

    fn point_defenses(&self, id: EntityId) -> Option<DefenseRegime> {
        self.defenses.get(&id).cloned()
    }
}

/// Hands out scripted raw values in call order, then `0`.
#[derive(Debug, Default)]
pub struct SequenceRng {
    values: Mutex<VecDeque<u32>>,
    calls: AtomicUsize,
}

impl SequenceRng {
    pub fn new(values: &[u32]) -> Self {
        Self {
            values: Mutex::new(values.iter().copied().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Raw value that `roll_2d6` turns into dice `a` and `b`.
    pub const fn two_d6(a: u32, b: u32) -> u32 {
        (a - 1) + 6 * (b - 1)
    }

    pub const fn die_face(face: u32) -> u32 {
        face - 1
    }

    pub const fn d100(percent: u32) -> u32 {
        percent - 1
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RngOracle for SequenceRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.values
            .lock()
            .expect("rng lock")
            .pop_front()
            .unwrap_or(0)
    }
}

/// Arbiter that always answers the same way and counts how often it is asked.
#[derive(Debug)]
pub struct CountingArbiter {
    response: ArbitrationResponse,
    calls: AtomicUsize,
    last: Mutex<Option<ArbitrationRequest>>,
}

impl CountingArbiter {
    pub fn new(response: ArbitrationResponse) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ArbitrationRequest> {
        self.last.lock().expect("arbiter lock").clone()
    }
}

impl Arbiter for CountingArbiter {
    fn choose(&self, request: &ArbitrationRequest) -> ArbitrationResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().expect("arbiter lock") = Some(request.clone());
        self.response
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkCall {
    Entity { target: EntityId, amount: u32 },
    Building { building: BuildingId, hex: Hex, amount: u32 },
    Ignite(Hex),
    Illuminate { hex: Hex, radius: u32 },
    Smoke { hex: Hex, kind: SmokeKind },
    LayMines { hex: Hex, kind: MineKind, density: u8 },
    ClearMines(Hex),
    DetonateMines(Hex),
}

#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
}

impl RecordingSink {
    pub fn entity_damage(&self, target: EntityId) -> u32 {
        self.calls
            .iter()
            .map(|call| match call {
                SinkCall::Entity { target: t, amount } if *t == target => *amount,
                _ => 0,
            })
            .sum()
    }

    pub fn total_damage(&self) -> u32 {
        self.calls
            .iter()
            .map(|call| match call {
                SinkCall::Entity { amount, .. } | SinkCall::Building { amount, .. } => *amount,
                _ => 0,
            })
            .sum()
    }
}

impl DamageSink for RecordingSink {
    fn damage_entity(&mut self, _attack: AttackId, target: EntityId, amount: u32) {
        self.calls.push(SinkCall::Entity { target, amount });
    }

    fn damage_building(&mut self, _attack: AttackId, building: BuildingId, hex: Hex, amount: u32) {
        self.calls.push(SinkCall::Building {
            building,
            hex,
            amount,
        });
    }

    fn ignite(&mut self, _attack: AttackId, hex: Hex) {
        self.calls.push(SinkCall::Ignite(hex));
    }

    fn illuminate(&mut self, _attack: AttackId, hex: Hex, radius: u32) {
        self.calls.push(SinkCall::Illuminate { hex, radius });
    }

    fn deploy_smoke(&mut self, _attack: AttackId, hex: Hex, kind: SmokeKind) {
        self.calls.push(SinkCall::Smoke { hex, kind });
    }

    fn lay_minefield(&mut self, _attack: AttackId, hex: Hex, kind: MineKind, density: u8) {
        self.calls.push(SinkCall::LayMines { hex, kind, density });
    }

    fn clear_minefield(&mut self, _attack: AttackId, hex: Hex) {
        self.calls.push(SinkCall::ClearMines(hex));
    }

    fn detonate_minefield(&mut self, _attack: AttackId, hex: Hex) {
        self.calls.push(SinkCall::DetonateMines(hex));
    }
}

/// Cooldown tracker where some defenses are already spent.
#[derive(Clone, Debug, Default)]
pub struct LimitedCooldowns {
    exhausted: BTreeSet<DefenseId>,
    pub engagements: Vec<DefenseId>,
}

impl LimitedCooldowns {
    pub fn exhausted(defenses: impl IntoIterator<Item = DefenseId>) -> Self {
        Self {
            exhausted: defenses.into_iter().collect(),
            engagements: Vec::new(),
        }
    }
}

impl CooldownTracker for LimitedCooldowns {
    fn is_available(&self, defense: DefenseId) -> bool {
        !self.exhausted.contains(&defense)
    }

    fn record_engagement(&mut self, defense: DefenseId) {
        self.engagements.push(defense);
    }
}
