// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Deterministic plan synthesis
//!
//! Mock plans are a pure function of the validated request and the date the
//! caller treats as today.

use super::catalog::{catalog_for, Catalog, CatalogEntry};
use super::difficulty::{apportion, prescribed_difficulty, target_difficulty};
use super::narrative::{render_rest_day, render_session};
use crate::models::{
    recent_exercise_names, DailyWorkout, Difficulty, Exercise, SportType, UserPreferences,
    WeeklyPlan,
};
use crate::validation::{ValidDaily, ValidWeekly};
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

/// Focus and session title of each day of a mock week
pub const WEEKLY_ROTATION: [(SportType, &str); 7] = [
    (SportType::Strength, "Upper Push"),
    (SportType::Strength, "Lower Power"),
    (SportType::YogaMobility, "Recovery Flow"),
    (SportType::Rest, "Active Rest"),
    (SportType::Strength, "Upper Pull"),
    (SportType::Hiit, "HIIT Blast"),
    (SportType::Rest, "Complete Rest"),
];

const REST_DAY_TITLE: &str = "Rest & Recovery Day";

/// Single-day plan for a validated request
pub fn daily_plan(request: &ValidDaily<'_>, today: NaiveDate, default_minutes: i64) -> DailyWorkout {
    let day_date = request
        .focus
        .day_date
        .as_deref()
        .map(str::trim)
        .filter(|date| !date.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| iso_date(today));

    if request.sport_type.is_rest() {
        return DailyWorkout {
            markdown_content: render_rest_day(REST_DAY_TITLE, &day_date),
            day_date,
            focus_sport_type_for_the_day: SportType::Rest,
            target_total_duration_minutes: request.focus.target_total_duration_minutes,
            scheduled_exercises: Vec::new(),
        };
    }

    let target_minutes = request
        .focus
        .target_total_duration_minutes
        .or_else(|| request.preferences.preferred_duration_minutes())
        .unwrap_or(default_minutes);

    let difficulty = target_difficulty(
        request.preferences.experience(),
        request.profile.effective_age(today),
    );

    let session = Session {
        title: format!("{} Workout", request.sport_type.label()),
        sport_type: request.sport_type,
        day_date,
        target_minutes,
        difficulty,
    };

    let avoid = recent_exercise_names(request.history);
    session.build(request.preferences, &avoid)
}

/// Seven day plan starting at `today`
pub fn weekly_plan(request: &ValidWeekly<'_>, today: NaiveDate, default_minutes: i64) -> WeeklyPlan {
    let target_minutes = request
        .preferences
        .preferred_duration_minutes()
        .unwrap_or(default_minutes);
    let difficulty = target_difficulty(
        request.preferences.experience(),
        request.profile.effective_age(today),
    );

    // Exercises already placed this week count as recent for later days
    let mut avoid = recent_exercise_names(request.history);
    let mut workouts = Vec::with_capacity(WEEKLY_ROTATION.len());

    for (offset, (sport_type, title)) in WEEKLY_ROTATION.iter().enumerate() {
        let day_date = iso_date(today + Duration::days(offset as i64));

        if sport_type.is_rest() {
            workouts.push(DailyWorkout {
                markdown_content: render_rest_day(title, &day_date),
                day_date,
                focus_sport_type_for_the_day: SportType::Rest,
                target_total_duration_minutes: None,
                scheduled_exercises: Vec::new(),
            });
            continue;
        }

        let session = Session {
            title: title.to_string(),
            sport_type,
            day_date,
            target_minutes,
            difficulty,
        };
        let workout = session.build(request.preferences, &avoid);
        avoid.extend(
            workout
                .scheduled_exercises
                .iter()
                .map(|exercise| exercise.exercise_name.to_lowercase()),
        );
        workouts.push(workout);
    }

    WeeklyPlan { workouts }
}

struct Session<'a> {
    title: String,
    sport_type: &'a SportType,
    day_date: String,
    target_minutes: i64,
    difficulty: Difficulty,
}

impl Session<'_> {
    fn build(self, preferences: &UserPreferences, avoid: &HashSet<String>) -> DailyWorkout {
        let catalog = catalog_for(self.sport_type);
        let exercises: Vec<Exercise> = select_exercises(catalog, preferences, avoid)
            .into_iter()
            .enumerate()
            .map(|(index, entry)| to_exercise(entry, index as u32 + 1, self.difficulty))
            .collect();

        let timing = apportion(self.target_minutes, exercises.len());
        let markdown_content = render_session(
            &self.title,
            self.sport_type,
            &self.day_date,
            self.target_minutes,
            self.difficulty,
            &exercises,
            timing,
        );

        DailyWorkout {
            day_date: self.day_date,
            focus_sport_type_for_the_day: self.sport_type.clone(),
            target_total_duration_minutes: Some(self.target_minutes),
            scheduled_exercises: exercises,
            markdown_content,
        }
    }
}

/// Pick the session's exercises: disliked entries and entries needing missing
/// equipment are dropped, recently done ones move behind fresh ones. When
/// nothing survives the filters the primary selection is used as-is.
pub fn select_exercises(
    catalog: &'static Catalog,
    preferences: &UserPreferences,
    avoid: &HashSet<String>,
) -> Vec<&'static CatalogEntry> {
    let (fresh, stale): (Vec<_>, Vec<_>) = catalog
        .entries()
        .filter(|entry| !preferences.dislikes(entry.name))
        .filter(|entry| entry.fits_equipment(&preferences.available_equipment))
        .partition(|entry| !avoid.contains(&entry.name.to_lowercase()));

    let selection: Vec<_> = fresh
        .into_iter()
        .chain(stale)
        .take(catalog.session_size())
        .collect();

    if selection.is_empty() {
        catalog.primary.iter().collect()
    } else {
        selection
    }
}

fn to_exercise(entry: &CatalogEntry, sequence_order: u32, target: Difficulty) -> Exercise {
    let difficulty = prescribed_difficulty(target, entry.ceiling);

    Exercise {
        sequence_order,
        exercise_name: entry.name.to_string(),
        description: entry.description.to_string(),
        applicable_sport_types: entry.sport_types.iter().map(|s| SportType::from(*s)).collect(),
        muscle_groups_primary: to_strings(entry.primary_muscles),
        muscle_groups_secondary: to_strings(entry.secondary_muscles),
        equipment_needed: to_strings(entry.equipment),
        difficulty,
        prescribed_sets_reps_duration: entry.prescription(difficulty).to_string(),
        voice_script_cue_text: entry.cue.to_string(),
        video_url: None,
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
