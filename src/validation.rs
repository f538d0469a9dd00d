// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Validation
//!
//! Two gates guard generation. Request contexts are checked before any work
//! starts, and plans produced by a generation backend are checked before they
//! reach the caller. Both gates only read their input.

use crate::config::SportTypePolicy;
use crate::errors::GenerationError;
use crate::models::{
    DailyFocus, DailyWorkout, PromptContext, RecentWorkout, SportType, UserPreferences,
    UserProfile, WeeklyPlan, WeeklyPromptContext,
};
use chrono::{Duration, NaiveDate};
use serde_json::Value;

/// A daily request that passed validation, borrowed from the original context
#[derive(Debug, Clone, Copy)]
pub struct ValidDaily<'a> {
    pub profile: &'a UserProfile,
    pub preferences: &'a UserPreferences,
    pub focus: &'a DailyFocus,
    pub sport_type: &'a SportType,
    pub history: &'a [RecentWorkout],
    pub text_prompt: &'a str,
}

/// A weekly request that passed validation
#[derive(Debug, Clone, Copy)]
pub struct ValidWeekly<'a> {
    pub profile: &'a UserProfile,
    pub preferences: &'a UserPreferences,
    pub history: &'a [RecentWorkout],
    pub text_prompt: &'a str,
}

/// Check a daily context. The first failing rule wins.
pub fn validate_daily(
    context: &PromptContext,
    policy: SportTypePolicy,
) -> Result<ValidDaily<'_>, GenerationError> {
    let profile = context
        .user_profile
        .as_ref()
        .ok_or_else(|| GenerationError::missing("user_profile"))?;

    let focus = context
        .daily_focus
        .as_ref()
        .ok_or_else(|| GenerationError::missing("daily_focus"))?;

    check_age(profile.age)?;

    if let Some(minutes) = focus.target_total_duration_minutes {
        if minutes <= 0 {
            return Err(GenerationError::invalid(
                "daily_focus.target_total_duration_minutes",
                format!("must be positive, got {}", minutes),
            ));
        }
    }

    let sport_type = focus
        .focus_sport_type_for_the_day
        .as_ref()
        .ok_or_else(|| GenerationError::missing("daily_focus.focus_sport_type_for_the_day"))?;

    if policy == SportTypePolicy::Reject && !sport_type.is_known() {
        return Err(GenerationError::invalid(
            "daily_focus.focus_sport_type_for_the_day",
            format!("unknown sport type '{}'", sport_type),
        ));
    }

    Ok(ValidDaily {
        profile,
        preferences: &context.user_preferences,
        focus,
        sport_type,
        history: &context.last_7_days_exercises,
        text_prompt: &context.text_prompt,
    })
}

/// Check a weekly context. An age derived from `date_of_birth` is resolved
/// against `today`.
pub fn validate_weekly(
    context: &WeeklyPromptContext,
    today: NaiveDate,
) -> Result<ValidWeekly<'_>, GenerationError> {
    let profile = context
        .user_profile
        .as_ref()
        .ok_or_else(|| GenerationError::missing("user_profile"))?;

    check_age(profile.effective_age(today))?;

    Ok(ValidWeekly {
        profile,
        preferences: &context.user_preferences,
        history: &context.last_7_days_exercises,
        text_prompt: &context.text_prompt,
    })
}

fn check_age(age: Option<i64>) -> Result<(), GenerationError> {
    match age {
        Some(age) if age <= 0 => Err(GenerationError::invalid(
            "user_profile.age",
            format!("must be positive, got {}", age),
        )),
        _ => Ok(()),
    }
}

/// Parse a backend reply for a single day. Accepts the `{daily_workout}`
/// envelope or a bare workout object.
pub fn parse_daily_plan(value: Value) -> Result<DailyWorkout, GenerationError> {
    let workout_value = match value {
        Value::Object(mut map) if map.contains_key("daily_workout") => map
            .remove("daily_workout")
            .unwrap_or(Value::Null),
        other => other,
    };

    let workout: DailyWorkout = serde_json::from_value(workout_value)
        .map_err(|e| GenerationError::MalformedBackendResponse(e.to_string()))?;

    check_workout_shape(&workout)?;
    Ok(workout)
}

/// Parse a backend reply for a week starting at `start`
pub fn parse_weekly_plan(value: Value, start: NaiveDate) -> Result<WeeklyPlan, GenerationError> {
    let plan: WeeklyPlan = match value {
        Value::Array(days) => serde_json::from_value(serde_json::json!({ "workouts": days })),
        other => serde_json::from_value(other),
    }
    .map_err(|e| GenerationError::MalformedBackendResponse(e.to_string()))?;

    if plan.workouts.len() != 7 {
        return Err(GenerationError::MalformedBackendResponse(format!(
            "expected 7 workouts, got {}",
            plan.workouts.len()
        )));
    }

    for (offset, workout) in plan.workouts.iter().enumerate() {
        let expected = (start + Duration::days(offset as i64)).format("%Y-%m-%d").to_string();
        if workout.day_date != expected {
            return Err(GenerationError::MalformedBackendResponse(format!(
                "workout {} is dated {}, expected {}",
                offset + 1,
                workout.day_date,
                expected
            )));
        }
        check_workout_shape(workout)?;
    }

    Ok(plan)
}

/// Structural rules every returned day has to satisfy
pub fn check_workout_shape(workout: &DailyWorkout) -> Result<(), GenerationError> {
    let malformed = |reason: String| GenerationError::MalformedBackendResponse(reason);
    let sport = &workout.focus_sport_type_for_the_day;

    if sport.is_rest() && !workout.scheduled_exercises.is_empty() {
        return Err(malformed(format!(
            "REST day {} schedules {} exercises",
            workout.day_date,
            workout.scheduled_exercises.len()
        )));
    }

    if !sport.is_rest() && workout.scheduled_exercises.is_empty() {
        return Err(malformed(format!(
            "{} day {} has no exercises",
            sport, workout.day_date
        )));
    }

    for (index, exercise) in workout.scheduled_exercises.iter().enumerate() {
        let expected = index as u32 + 1;
        if exercise.sequence_order != expected {
            return Err(malformed(format!(
                "exercise '{}' has sequence_order {}, expected {}",
                exercise.exercise_name, exercise.sequence_order, expected
            )));
        }
        if exercise.exercise_name.trim().is_empty() {
            return Err(malformed(format!("exercise {} has no name", expected)));
        }
        if exercise.applicable_sport_types.is_empty() {
            return Err(malformed(format!(
                "exercise '{}' lists no applicable sport types",
                exercise.exercise_name
            )));
        }
        if exercise.muscle_groups_primary.is_empty() {
            return Err(malformed(format!(
                "exercise '{}' lists no primary muscle groups",
                exercise.exercise_name
            )));
        }
    }

    Ok(())
}
