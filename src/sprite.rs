//! Sprite resolver: maps visual states to image resources.

/// Every image the pet can show. Closed set, one file per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Idle,
    IdleBlink,
    Happy,
    Love,
    Cool,
    Surprised,
    Excited,
    Thinking,
    Sleeping,
    Typing,
    Eating,
    Waving,
    Walking,
    Stargazing,
}

impl Sprite {
    #[cfg(test)]
    pub const ALL: [Sprite; 14] = [
        Self::Idle,
        Self::IdleBlink,
        Self::Happy,
        Self::Love,
        Self::Cool,
        Self::Surprised,
        Self::Excited,
        Self::Thinking,
        Self::Sleeping,
        Self::Typing,
        Self::Eating,
        Self::Waving,
        Self::Walking,
        Self::Stargazing,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::IdleBlink => "idle-blink",
            Self::Happy => "happy",
            Self::Love => "love",
            Self::Cool => "cool",
            Self::Surprised => "surprised",
            Self::Excited => "excited",
            Self::Thinking => "thinking",
            Self::Sleeping => "sleeping",
            Self::Typing => "typing",
            Self::Eating => "eating",
            Self::Waving => "waving",
            Self::Walking => "walking",
            Self::Stargazing => "stargazing",
        }
    }

    /// Resource path relative to the asset root.
    pub fn path(self) -> String {
        format!("sprites/sprite-{}-128.png", self.name())
    }
}

/// What the host should currently draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteFrame {
    pub sprite: Sprite,
    /// Flip horizontally (walking left).
    pub mirrored: bool,
}

impl SpriteFrame {
    pub fn new(sprite: Sprite) -> Self {
        Self {
            sprite,
            mirrored: false,
        }
    }

    /// Walking sprite facing the given horizontal sign.
    pub fn walking(direction: f32) -> Self {
        Self {
            sprite: Sprite::Walking,
            mirrored: direction < 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_unique() {
        let mut paths: Vec<String> = Sprite::ALL.iter().map(|s| s.path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), Sprite::ALL.len());
        assert_eq!(Sprite::IdleBlink.path(), "sprites/sprite-idle-blink-128.png");
    }

    #[test]
    fn only_left_walk_is_mirrored() {
        assert!(SpriteFrame::walking(-1.0).mirrored);
        assert!(!SpriteFrame::walking(1.0).mirrored);
        assert!(!SpriteFrame::new(Sprite::Happy).mirrored);
    }
}
