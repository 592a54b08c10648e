use std::collections::BTreeSet;

use barrage_core::{CooldownTracker, DefenseId};

/// Each point-defense mount engages at most once per turn.
#[derive(Clone, Debug, Default)]
pub struct DefenseCooldowns {
    engaged: BTreeSet<DefenseId>,
}

impl DefenseCooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called at the start of every turn.
    pub fn reset(&mut self) {
        self.engaged.clear();
    }

    pub fn engaged(&self) -> impl Iterator<Item = DefenseId> + '_ {
        self.engaged.iter().copied()
    }
}

impl CooldownTracker for DefenseCooldowns {
    fn is_available(&self, defense: DefenseId) -> bool {
        !self.engaged.contains(&defense)
    }

    fn record_engagement(&mut self, defense: DefenseId) {
        self.engaged.insert(defense);
    }
}
