use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DisenchantOutcome — Result of turning cards into Meme Dust
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisenchantOutcome {
    /// Dust credited for the removed cards.
    pub dust: u64,
    /// Number of cards actually removed from the collection.
    pub cards: usize,
}
