// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Markdown rendering of mock sessions

use super::difficulty::SessionTiming;
use crate::models::{Difficulty, Exercise, SportType};
use std::fmt::Write;

/// Rendered workout with one table row per exercise
pub fn render_session(
    title: &str,
    sport_type: &SportType,
    day_date: &str,
    target_minutes: i64,
    difficulty: Difficulty,
    exercises: &[Exercise],
    timing: SessionTiming,
) -> String {
    let mut md = String::new();

    let _ = writeln!(md, "# {}", title);
    let _ = writeln!(md);
    let _ = writeln!(
        md,
        "**Date:** {} | **Focus:** {} | **Target duration:** {} minutes | **Level:** {}",
        day_date,
        sport_type.label(),
        target_minutes,
        difficulty.as_str().to_lowercase()
    );
    let _ = writeln!(md);

    let _ = writeln!(md, "## Warm-up ({} min)", timing.warm_up);
    let _ = writeln!(md);
    let _ = writeln!(md, "{}", warm_up_text(sport_type));
    let _ = writeln!(md);

    let _ = writeln!(md, "## Main Session (about {} min per exercise)", timing.per_exercise);
    let _ = writeln!(md);
    let _ = writeln!(md, "| # | Exercise | Sets / Reps / Duration | Coaching Cue |");
    let _ = writeln!(md, "|---|----------|------------------------|--------------|");
    for exercise in exercises {
        let _ = writeln!(
            md,
            "| {} | {} | {} | {} |",
            exercise.sequence_order,
            exercise.exercise_name,
            exercise.prescribed_sets_reps_duration,
            exercise.voice_script_cue_text
        );
    }
    let _ = writeln!(md);

    let _ = writeln!(md, "## Cool-down ({} min)", timing.cool_down);
    let _ = writeln!(md);
    let _ = writeln!(md, "{}", COOL_DOWN);
    let _ = writeln!(md);
    let _ = writeln!(md, "*Rest 45-90 seconds between sets and stop any movement that causes pain.*");

    md
}

/// Recovery-day narrative without any scheduled exercises
pub fn render_rest_day(title: &str, day_date: &str) -> String {
    let mut md = String::new();

    let _ = writeln!(md, "# {}", title);
    let _ = writeln!(md);
    let _ = writeln!(md, "**Date:** {} | **Focus:** Rest & recovery", day_date);
    let _ = writeln!(md);
    let _ = writeln!(
        md,
        "Today is a recovery day. No structured training is scheduled so your body can adapt to the work of the past days."
    );
    let _ = writeln!(md);
    let _ = writeln!(md, "## Recovery Checklist");
    let _ = writeln!(md);
    let _ = writeln!(md, "- **Hydration:** drink water steadily through the day, more if it is hot.");
    let _ = writeln!(md, "- **Sleep:** aim for 7-9 hours; deep sleep is when most repair happens.");
    let _ = writeln!(
        md,
        "- **Gentle movement:** a 20-30 minute easy walk or light stretching keeps blood flowing without adding fatigue."
    );
    let _ = writeln!(md, "- **Nutrition:** include a good portion of protein with each meal.");

    md
}

fn warm_up_text(sport_type: &SportType) -> &'static str {
    match sport_type {
        SportType::YogaMobility => {
            "- Slow nasal breathing while seated\n- Gentle neck and shoulder circles\n- Easy side bends"
        }
        SportType::RunningIntervals => {
            "- Brisk walk building to a relaxed trot\n- Leg swings front to back and side to side\n- Ankle circles"
        }
        SportType::Hiit => {
            "- Marching on the spot building to light skipping\n- Arm circles\n- Hip openers and leg swings"
        }
        _ => "- Light marching on the spot\n- Arm circles and shoulder rolls\n- Hip circles and leg swings",
    }
}

const COOL_DOWN: &str =
    "- Walk slowly until your breathing settles\n- Hold static stretches for the muscles you worked, 30 seconds each\n- Finish with a few deep breaths";
