use crate::domain::model::LookupKind;
use std::sync::atomic::{AtomicU64, Ordering};

/// 每種查詢各自的世代計數器；只有最新開始的查詢可以寫入表單
#[derive(Debug, Default)]
pub struct InFlightTracker {
    generations: [AtomicU64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    kind: LookupKind,
    generation: u64,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, kind: LookupKind) -> Ticket {
        let generation = self.generations[kind.index()].fetch_add(1, Ordering::SeqCst) + 1;
        Ticket { kind, generation }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generations[ticket.kind.index()].load(Ordering::SeqCst) == ticket.generation
    }
}
