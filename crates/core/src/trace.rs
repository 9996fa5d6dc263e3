//! Cascade trace - the ordered record of one resolution
//!
//! A trace is both the result of a swap request and the script an external
//! renderer replays at its own pace.

use crate::gravity::MoveStep;
use crate::matcher::Match;
use crate::spawn::SpawnedToken;
use crate::types::{Position, SwapRejection};

/// Result of a shuffle, enough for a renderer to animate it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleSummary {
    /// 1-based attempt number within the current deadlock
    pub attempt: u32,
    /// `(from, to)` for every token that moved
    pub relocations: Vec<(Position, Position)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// The swap did not go through. `reverted` is set when the tokens were
    /// traded and traded back (legal swap, no match).
    SwapRejected {
        reason: SwapRejection,
        reverted: bool,
    },
    SwapCommitted {
        a: Position,
        b: Position,
    },
    MatchesFound(Vec<Match>),
    Destroyed {
        positions: Vec<Position>,
        cascade_level: u32,
    },
    Fell(Vec<MoveStep>),
    Refilled(Vec<SpawnedToken>),
    /// The board is quiescent with at least one move available
    Settled,
    /// The destroy loop hit its iteration cap with matches still on the board
    CascadeCapped {
        iterations: u32,
    },
    /// No legal swap produces a match
    Deadlocked,
    Shuffled(ShuffleSummary),
}

impl TraceEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TraceEvent::SwapRejected { .. } => "swap_rejected",
            TraceEvent::SwapCommitted { .. } => "swap_committed",
            TraceEvent::MatchesFound(_) => "matches_found",
            TraceEvent::Destroyed { .. } => "destroyed",
            TraceEvent::Fell(_) => "fell",
            TraceEvent::Refilled(_) => "refilled",
            TraceEvent::Settled => "settled",
            TraceEvent::CascadeCapped { .. } => "cascade_capped",
            TraceEvent::Deadlocked => "deadlocked",
            TraceEvent::Shuffled(_) => "shuffled",
        }
    }
}

/// Ordered events of one resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeTrace {
    events: Vec<TraceEvent>,
}

impl CascadeTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Every match found during the resolution, in order
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.events.iter().flat_map(|e| match e {
            TraceEvent::MatchesFound(ms) => ms.as_slice(),
            _ => &[][..],
        })
    }

    /// Highest cascade level reached (0 when nothing was destroyed)
    pub fn cascade_depth(&self) -> u32 {
        self.events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::Destroyed { cascade_level, .. } => Some(*cascade_level),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Number of shuffles performed
    pub fn shuffles(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Shuffled(_)))
            .count()
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.events.last(), Some(TraceEvent::Settled))
    }
}

impl IntoIterator for CascadeTrace {
    type Item = TraceEvent;
    type IntoIter = std::vec::IntoIter<TraceEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a CascadeTrace {
    type Item = &'a TraceEvent;
    type IntoIter = std::slice::Iter<'a, TraceEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_and_settled() {
        let mut trace = CascadeTrace::new();
        assert_eq!(trace.cascade_depth(), 0);
        assert!(!trace.is_settled());
        trace.push(TraceEvent::Destroyed {
            positions: vec![],
            cascade_level: 1,
        });
        trace.push(TraceEvent::Destroyed {
            positions: vec![],
            cascade_level: 2,
        });
        trace.push(TraceEvent::Settled);
        assert_eq!(trace.cascade_depth(), 2);
        assert!(trace.is_settled());
        assert_eq!(trace.len(), 3);
    }

    #[test]
    fn event_names() {
        assert_eq!(TraceEvent::Settled.name(), "settled");
        assert_eq!(
            TraceEvent::CascadeCapped { iterations: 4 }.name(),
            "cascade_capped"
        );
        assert_eq!(
            TraceEvent::Shuffled(ShuffleSummary {
                attempt: 1,
                relocations: vec![],
            })
            .name(),
            "shuffled"
        );
    }
}
