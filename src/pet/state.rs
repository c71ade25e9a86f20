use instant::Instant;

use crate::sprite::Sprite;

/// A sprite shown as a click/tray reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Love,
    Cool,
    Surprised,
    Waving,
    Happy,
}

impl Reaction {
    pub fn sprite(self) -> Sprite {
        match self {
            Reaction::Love => Sprite::Love,
            Reaction::Cool => Sprite::Cool,
            Reaction::Surprised => Sprite::Surprised,
            Reaction::Waving => Sprite::Waving,
            Reaction::Happy => Sprite::Happy,
        }
    }
}

/// Behavior the pet is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetState {
    Idle,
    Walking,
    Sleeping,
    Typing,
    Thinking,
    Eating,
    Happy,
    Excited,
    Stargazing,
    /// Suspends the autonomous cycle; a return to Idle is owed.
    Reacting(Reaction),
}

impl PetState {
    /// Resting sprite for this state (blink and mirroring are overlays).
    pub fn sprite(self) -> Sprite {
        match self {
            PetState::Idle => Sprite::Idle,
            PetState::Walking => Sprite::Walking,
            PetState::Sleeping => Sprite::Sleeping,
            PetState::Typing => Sprite::Typing,
            PetState::Thinking => Sprite::Thinking,
            PetState::Eating => Sprite::Eating,
            PetState::Happy => Sprite::Happy,
            PetState::Excited => Sprite::Excited,
            PetState::Stargazing => Sprite::Stargazing,
            PetState::Reacting(reaction) => reaction.sprite(),
        }
    }

    pub fn is_reacting(self) -> bool {
        matches!(self, PetState::Reacting(_))
    }
}

/// Mutable core record of the state machine.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub current: PetState,
    /// Last non-reacting state before `current`.
    pub previous: PetState,
    pub state_start: Instant,
    /// Only meaningful while `current == Idle`.
    pub idle_since: Instant,
    /// Tray override: pinned asleep, autonomy and clicks suppressed.
    pub force_sleep: bool,
    pub blinking: bool,
}

impl EngineState {
    pub fn new(now: Instant) -> Self {
        Self {
            current: PetState::Idle,
            previous: PetState::Idle,
            state_start: now,
            idle_since: now,
            force_sleep: false,
            blinking: false,
        }
    }

    pub fn sleep_indicator_visible(&self) -> bool {
        self.current == PetState::Sleeping
    }
}
