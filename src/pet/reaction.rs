use super::state::Reaction;

/// Sequence cycled through by clicks on the pet.
pub const CLICK_REACTIONS: [Reaction; 4] = [
    Reaction::Love,
    Reaction::Cool,
    Reaction::Surprised,
    Reaction::Waving,
];

/// Cursor into a fixed reaction sequence.
#[derive(Debug, Clone)]
pub struct ReactionCycle {
    sequence: &'static [Reaction],
    cursor: usize,
}

impl ReactionCycle {
    pub fn new(sequence: &'static [Reaction]) -> Self {
        Self {
            sequence,
            cursor: 0,
        }
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current reaction, then advance (wrapping).
    pub fn next(&mut self) -> Reaction {
        let reaction = self.sequence[self.cursor];
        self.cursor = (self.cursor + 1) % self.sequence.len();
        reaction
    }
}

impl Default for ReactionCycle {
    fn default() -> Self {
        Self::new(&CLICK_REACTIONS)
    }
}
