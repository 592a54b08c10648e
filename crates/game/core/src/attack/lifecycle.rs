//! Attack lifecycle: `Declared → Targeting(n) → ReadyToResolve → Resolved`.
//!
//! The queue is the single owner of every declaration. Counters only go down,
//! an attack is handed out for resolution at most once, and a resolved attack
//! can never re-enter the pipeline.

use super::declaration::AttackDeclaration;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{AttackId, EntityId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackLifecycle {
    Declared,
    Targeting,
    ReadyToResolve,
    Resolved,
}

/// A declaration plus where it is in its lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAttack {
    pub id: AttackId,
    pub declaration: AttackDeclaration,
    pub lifecycle: AttackLifecycle,
}

impl PendingAttack {
    pub fn turns_until_impact(&self) -> u8 {
        self.declaration.turns_until_impact
    }

    /// Whether the firing/offboard phase may resolve it now.
    pub fn is_due(&self) -> bool {
        matches!(
            self.lifecycle,
            AttackLifecycle::Declared | AttackLifecycle::Targeting
        ) && self.declaration.turns_until_impact == 0
    }
}

/// Result of one targeting-phase tick for one attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetingTick {
    pub attack: AttackId,
    pub firer: EntityId,
    pub turns_remaining: u8,
    /// Set on the tick the counter reaches zero, so the scheduler can
    /// announce the firer before the round lands.
    pub imminent: bool,
}

/// Scheduler misuse of the lifecycle. Always fatal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifecycleError {
    #[error("{0} was never declared")]
    UnknownAttack(AttackId),

    #[error("{0} has already been resolved")]
    AlreadyResolved(AttackId),

    #[error("{0} is already being resolved")]
    InProgress(AttackId),

    #[error("{attack} is not due: {turns_remaining} turn(s) until impact")]
    NotDue {
        attack: AttackId,
        turns_remaining: u8,
    },

    #[error("{0} reached impact but was never resolved")]
    Overdue(AttackId),
}

impl LifecycleError {
    /// The attack the scheduler mishandled.
    pub fn attack(&self) -> AttackId {
        match *self {
            LifecycleError::UnknownAttack(attack)
            | LifecycleError::AlreadyResolved(attack)
            | LifecycleError::InProgress(attack)
            | LifecycleError::NotDue { attack, .. }
            | LifecycleError::Overdue(attack) => attack,
        }
    }
}

impl GameError for LifecycleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            LifecycleError::UnknownAttack(_) => "LIFECYCLE_UNKNOWN_ATTACK",
            LifecycleError::AlreadyResolved(_) => "LIFECYCLE_ALREADY_RESOLVED",
            LifecycleError::InProgress(_) => "LIFECYCLE_IN_PROGRESS",
            LifecycleError::NotDue { .. } => "LIFECYCLE_NOT_DUE",
            LifecycleError::Overdue(_) => "LIFECYCLE_OVERDUE",
        }
    }
}

/// Declared attacks in declaration order.
#[derive(Clone, Debug, Default)]
pub struct AttackQueue {
    next_id: AttackId,
    attacks: Vec<PendingAttack>,
}

impl AttackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, declaration: AttackDeclaration) -> AttackId {
        let id = self.next_id;
        self.next_id = id.next();
        self.attacks.push(PendingAttack {
            id,
            declaration,
            lifecycle: AttackLifecycle::Declared,
        });
        id
    }

    pub fn get(&self, id: AttackId) -> Option<&PendingAttack> {
        self.attacks.iter().find(|attack| attack.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingAttack> {
        self.attacks.iter()
    }

    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }

    /// Advances every in-flight attack by one targeting phase.
    ///
    /// An attack still waiting at zero missed its resolution phase; the tick
    /// is refused and no counter moves.
    pub fn tick(&mut self) -> Result<Vec<TargetingTick>, LifecycleError> {
        let in_flight = |attack: &PendingAttack| {
            matches!(
                attack.lifecycle,
                AttackLifecycle::Declared | AttackLifecycle::Targeting
            )
        };

        if let Some(overdue) = self
            .attacks
            .iter()
            .find(|attack| in_flight(attack) && attack.declaration.turns_until_impact == 0)
        {
            return Err(LifecycleError::Overdue(overdue.id));
        }

        let mut ticks = Vec::new();
        for attack in self.attacks.iter_mut().filter(|attack| in_flight(attack)) {
            attack.lifecycle = AttackLifecycle::Targeting;
            attack.declaration.turns_until_impact -= 1;

            let turns_remaining = attack.declaration.turns_until_impact;
            ticks.push(TargetingTick {
                attack: attack.id,
                firer: attack.declaration.firer,
                turns_remaining,
                imminent: turns_remaining == 0,
            });
        }

        Ok(ticks)
    }

    /// Attacks that can be resolved now, in declaration order.
    pub fn due(&self) -> Vec<AttackId> {
        self.attacks
            .iter()
            .filter(|attack| attack.is_due())
            .map(|attack| attack.id)
            .collect()
    }

    /// The declaration of `id` if it may be resolved now.
    pub fn check_due(&self, id: AttackId) -> Result<&AttackDeclaration, LifecycleError> {
        let attack = self.get(id).ok_or(LifecycleError::UnknownAttack(id))?;
        match attack.lifecycle {
            AttackLifecycle::Resolved => Err(LifecycleError::AlreadyResolved(id)),
            AttackLifecycle::ReadyToResolve => Err(LifecycleError::InProgress(id)),
            AttackLifecycle::Declared | AttackLifecycle::Targeting => {
                match attack.declaration.turns_until_impact {
                    0 => Ok(&attack.declaration),
                    turns_remaining => Err(LifecycleError::NotDue {
                        attack: id,
                        turns_remaining,
                    }),
                }
            }
        }
    }

    /// Moves an attack to `ReadyToResolve` and hands out its declaration.
    pub(crate) fn begin_resolution(
        &mut self,
        id: AttackId,
    ) -> Result<AttackDeclaration, LifecycleError> {
        let declaration = self.check_due(id)?.clone();
        if let Some(attack) = self.attacks.iter_mut().find(|attack| attack.id == id) {
            attack.lifecycle = AttackLifecycle::ReadyToResolve;
        }
        Ok(declaration)
    }

    pub(crate) fn finish_resolution(&mut self, id: AttackId) {
        if let Some(attack) = self.attacks.iter_mut().find(|attack| attack.id == id) {
            debug_assert_eq!(attack.lifecycle, AttackLifecycle::ReadyToResolve);
            attack.lifecycle = AttackLifecycle::Resolved;
        }
    }

    /// Drops resolved declarations. Their ids stay burned.
    pub fn discard_resolved(&mut self) -> usize {
        let before = self.attacks.len();
        self.attacks
            .retain(|attack| attack.lifecycle != AttackLifecycle::Resolved);
        before - self.attacks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::TargetSpec;
    use crate::state::{AmmoId, Hex, WeaponId};

    fn declaration(turns: u8) -> AttackDeclaration {
        AttackDeclaration::new(
            EntityId(1),
            WeaponId(1),
            AmmoId(1),
            TargetSpec::Hex(Hex::new(4, 4)),
            Hex::ORIGIN,
        )
        .with_turns_until_impact(turns)
    }

    #[test]
    fn counter_strictly_decreases_and_flags_imminent_once() {
        let mut queue = AttackQueue::new();
        let id = queue.declare(declaration(3));

        let mut seen = Vec::new();
        let mut imminent_ticks = 0;
        for _ in 0..3 {
            for tick in queue.tick().unwrap() {
                assert_eq!(tick.attack, id);
                seen.push(tick.turns_remaining);
                if tick.imminent {
                    imminent_ticks += 1;
                }
            }
        }

        assert_eq!(seen, vec![2, 1, 0]);
        assert!(seen.windows(2).all(|pair| pair[1] + 1 == pair[0]));
        assert_eq!(imminent_ticks, 1);
    }

    #[test]
    fn ticking_past_impact_is_refused() {
        let mut queue = AttackQueue::new();
        let due = queue.declare(declaration(1));
        let later = queue.declare(declaration(3));
        queue.tick().unwrap();

        let error = queue.tick().unwrap_err();

        assert_eq!(error, LifecycleError::Overdue(due));
        assert_eq!(error.severity(), ErrorSeverity::Fatal);
        // nothing moved
        assert_eq!(queue.get(due).unwrap().turns_until_impact(), 0);
        assert_eq!(queue.get(later).unwrap().turns_until_impact(), 2);
        assert_eq!(queue.due(), vec![due]);
    }

    #[test]
    fn attacks_declared_at_zero_must_resolve_before_the_next_tick() {
        let mut queue = AttackQueue::new();
        let id = queue.declare(declaration(0));

        assert_eq!(queue.tick(), Err(LifecycleError::Overdue(id)));

        queue.begin_resolution(id).unwrap();
        queue.finish_resolution(id);
        assert_eq!(queue.tick(), Ok(Vec::new()));
    }

    #[test]
    fn not_due_until_counter_reaches_zero() {
        let mut queue = AttackQueue::new();
        let id = queue.declare(declaration(1));

        assert!(queue.due().is_empty());
        assert_eq!(
            queue.begin_resolution(id),
            Err(LifecycleError::NotDue {
                attack: id,
                turns_remaining: 1
            })
        );

        queue.tick().unwrap();
        assert_eq!(queue.due(), vec![id]);
        assert!(queue.begin_resolution(id).is_ok());
    }

    #[test]
    fn resolves_exactly_once() {
        let mut queue = AttackQueue::new();
        let id = queue.declare(declaration(0));

        queue.begin_resolution(id).unwrap();
        assert_eq!(
            queue.begin_resolution(id),
            Err(LifecycleError::InProgress(id))
        );
        queue.finish_resolution(id);
        assert_eq!(
            queue.begin_resolution(id),
            Err(LifecycleError::AlreadyResolved(id))
        );
        assert!(queue.due().is_empty());

        // resolved attacks are not ticked either
        assert_eq!(queue.tick(), Ok(Vec::new()));
    }

    #[test]
    fn due_lists_attacks_in_declaration_order() {
        let mut queue = AttackQueue::new();
        let first = queue.declare(declaration(0));
        let _later = queue.declare(declaration(2));
        let third = queue.declare(declaration(0));

        assert_eq!(queue.due(), vec![first, third]);
    }

    #[test]
    fn discarding_keeps_ids_unique() {
        let mut queue = AttackQueue::new();
        let first = queue.declare(declaration(0));
        queue.begin_resolution(first).unwrap();
        queue.finish_resolution(first);
        assert_eq!(queue.discard_resolved(), 1);

        let second = queue.declare(declaration(0));
        assert_ne!(first, second);
        assert_eq!(
            queue.begin_resolution(first),
            Err(LifecycleError::UnknownAttack(first))
        );
    }
}
