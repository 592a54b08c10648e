//! Attack declarations and their lifecycle.
mod declaration;
mod lifecycle;

pub use declaration::{AttackDeclaration, FireMode, RoundFlags, TargetSpec};
pub use lifecycle::{AttackLifecycle, AttackQueue, LifecycleError, PendingAttack, TargetingTick};
