use std::ops::Range;

use super::state::PetState;

/// One selectable autonomous behavior.
#[derive(Debug, Clone, Copy)]
pub struct BehaviorSpec {
    pub state: PetState,
    pub weight: u32,
    /// Episode length in milliseconds, `[min, max)`.
    pub duration_ms: (u64, u64),
}

impl BehaviorSpec {
    const fn new(state: PetState, weight: u32, min_ms: u64, max_ms: u64) -> Self {
        Self {
            state,
            weight,
            duration_ms: (min_ms, max_ms),
        }
    }

    /// Draw an episode length uniformly from the duration range.
    pub fn draw_duration_ms(&self, rng: &mut fastrand::Rng) -> u64 {
        let (min, max) = self.duration_ms;
        if max <= min {
            return min;
        }
        rng.u64(min..max)
    }
}

/// Daytime catalog in selection order. Order matters for tie-breaks.
pub const BASE_CATALOG: [BehaviorSpec; 7] = [
    BehaviorSpec::new(PetState::Walking, 30, 5_000, 12_000),
    BehaviorSpec::new(PetState::Thinking, 15, 3_000, 6_000),
    BehaviorSpec::new(PetState::Eating, 12, 3_000, 5_000),
    BehaviorSpec::new(PetState::Happy, 10, 2_000, 4_000),
    BehaviorSpec::new(PetState::Excited, 8, 2_000, 3_500),
    BehaviorSpec::new(PetState::Typing, 10, 4_000, 8_000),
    BehaviorSpec::new(PetState::Idle, 15, 3_000, 8_000),
];

/// Appended to the catalog during night hours.
pub const STARGAZING: BehaviorSpec = BehaviorSpec::new(PetState::Stargazing, 20, 5_000, 10_000);

/// Night is 21:00 through 04:59 local time.
const NIGHT_START_HOUR: u32 = 21;
const NIGHT_END_HOUR: u32 = 5;

pub fn is_night_hour(hour: u32) -> bool {
    hour >= NIGHT_START_HOUR || hour < NIGHT_END_HOUR
}

/// Candidates for the given local hour, in fixed catalog order.
pub fn candidates(hour: u32) -> Vec<BehaviorSpec> {
    let mut list = BASE_CATALOG.to_vec();
    if is_night_hour(hour) {
        list.push(STARGAZING);
    }
    list
}

pub fn total_weight(candidates: &[BehaviorSpec]) -> u32 {
    candidates.iter().map(|b| b.weight).sum()
}

/// Walk the candidates subtracting weights from `roll`; the first one that
/// brings it to `<= 0` wins, so exact boundaries go to the earlier entry.
pub fn select_with_roll(candidates: &[BehaviorSpec], mut roll: f64) -> BehaviorSpec {
    for spec in candidates {
        roll -= spec.weight as f64;
        if roll <= 0.0 {
            return *spec;
        }
    }
    candidates[0]
}

/// Weighted random pick plus a drawn episode duration.
pub fn pick(candidates: &[BehaviorSpec], rng: &mut fastrand::Rng) -> (PetState, u64) {
    let roll = rng.f64() * total_weight(candidates) as f64;
    let chosen = select_with_roll(candidates, roll);
    (chosen.state, chosen.draw_duration_ms(rng))
}

/// Uniform millisecond draw from a half-open range.
pub fn draw_ms(rng: &mut fastrand::Rng, range: Range<u64>) -> u64 {
    if range.is_empty() {
        return range.start;
    }
    rng.u64(range)
}
