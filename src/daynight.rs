//! Day/night awareness based on the local system clock.
//! Night hours add stargazing to the behavior catalog.

use chrono::Timelike;

use crate::pet::catalog;

/// Time-of-day state computed from the system clock.
#[derive(Debug, Clone, Copy)]
pub struct DayNightState {
    /// Current local hour (0-23).
    pub hour: u32,
    /// Pinned hours ignore the system clock.
    pinned: bool,
}

impl DayNightState {
    pub fn new() -> Self {
        let mut s = Self {
            hour: 12,
            pinned: false,
        };
        s.update();
        s
    }

    /// Fixed hour that `update` never changes.
    pub fn pinned(hour: u32) -> Self {
        Self {
            hour: hour % 24,
            pinned: true,
        }
    }

    /// Refresh from system clock. Call before every behavior pick.
    pub fn update(&mut self) {
        if !self.pinned {
            self.hour = chrono::Local::now().hour();
        }
    }

    pub fn is_night(&self) -> bool {
        catalog::is_night_hour(self.hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_hour_survives_update() {
        let mut dn = DayNightState::pinned(22);
        dn.update();
        assert_eq!(dn.hour, 22);
        assert!(dn.is_night());

        let mut noon = DayNightState::pinned(12);
        noon.update();
        assert!(!noon.is_night());
    }

    #[test]
    fn system_hour_is_valid() {
        assert!(DayNightState::new().hour < 24);
    }
}
