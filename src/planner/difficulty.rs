// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Difficulty and duration rules for mock sessions

use crate::constants::age_steps;
use crate::models::{Difficulty, ExperienceLevel};

/// Target difficulty for a user. Experience sets the base rank (unknown counts
/// as intermediate); age lowers it one step from 50 and two from 65.
pub fn target_difficulty(experience: Option<ExperienceLevel>, age: Option<i64>) -> Difficulty {
    let base = experience.map_or(1, ExperienceLevel::rank) as i64;

    let age_step = match age {
        Some(age) if age >= age_steps::SENIOR => 2,
        Some(age) if age >= age_steps::MATURE => 1,
        _ => 0,
    };

    Difficulty::from_rank((base - age_step).clamp(0, 2) as u8)
}

/// Difficulty actually prescribed for an exercise with the given ceiling
pub fn prescribed_difficulty(target: Difficulty, ceiling: Difficulty) -> Difficulty {
    target.min(ceiling)
}

/// Minutes of a session, split into warm-up, work and cool-down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    pub warm_up: i64,
    pub per_exercise: i64,
    pub cool_down: i64,
}

/// Warm-up and cool-down take a sixth of the target each (1 to 10 minutes);
/// the rest is shared evenly by the exercises, at least one minute apiece.
pub fn apportion(target_minutes: i64, exercise_count: usize) -> SessionTiming {
    let edge = (target_minutes / 6).clamp(1, 10);
    let count = exercise_count.max(1) as i64;
    let remaining = target_minutes - 2 * edge;

    SessionTiming {
        warm_up: edge,
        per_exercise: (remaining / count).max(1),
        cool_down: edge,
    }
}
