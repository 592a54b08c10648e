//! Events emitted during resolution for front-ends to observe.
//!
//! Consumers subscribe to [`ReportEvent`] to follow the narrative without
//! holding a borrow on the runtime.
use barrage_core::ReportEntry;
use serde::{Deserialize, Serialize};

/// One report line, in the order the rules produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEvent {
    /// Position of the entry in the session log.
    pub sequence: usize,
    pub entry: ReportEntry,
    /// Human-readable rendering of `entry`.
    pub text: String,
}

impl ReportEvent {
    pub fn new(sequence: usize, entry: ReportEntry) -> Self {
        let text = entry.to_string();
        Self {
            sequence,
            entry,
            text,
        }
    }

    /// Wire encoding used by transports.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use barrage_core::{AttackId, EntityId, ReportKind, Turn};

    use super::*;

    #[test]
    fn json_carries_the_rendered_text() {
        let event = ReportEvent::new(
            0,
            ReportEntry {
                turn: Turn::FIRST,
                attack: AttackId(3),
                kind: ReportKind::Imminent {
                    firer: EntityId(2),
                },
            },
        );

        let json = event.to_json().unwrap();
        let decoded: ReportEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, event);
        assert!(json.contains("incoming round"));
    }
}
