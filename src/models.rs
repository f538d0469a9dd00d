// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Wire and domain structures shared by the validator, the planner and the
//! HTTP boundary.
//!
//! ## Design Principles
//!
//! - **Tolerant input**: request structures accept partially populated JSON so
//!   that the validator, not the deserializer, decides what is missing
//! - **Verbatim pass-through**: sport types outside the known set round-trip
//!   unchanged through [`SportType::Other`]
//! - **Strict output**: [`DailyWorkout`] and [`Exercise`] require every field,
//!   which is what backend responses are checked against
//!
//! ## Core Models
//!
//! - [`PromptContext`] / [`WeeklyPromptContext`]: inbound requests
//! - [`DailyWorkout`] / [`WeeklyPlan`]: generated plans
//! - [`Exercise`]: a single scheduled exercise
//! - [`SportType`], [`Difficulty`], [`ExperienceLevel`]: enum-like tokens

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Focus sport type of a training day
///
/// Known tokens map to dedicated variants. Anything else is kept verbatim in
/// `Other` and serialized back exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SportType {
    /// Weightlifting and resistance training
    Strength,
    /// High-intensity interval training
    Hiit,
    /// Yoga, stretching and flexibility work
    YogaMobility,
    /// Running and cardio intervals
    RunningIntervals,
    /// Recovery day without structured exercises
    Rest,
    /// Provider-specific or unrecognized token
    Other(String),
}

impl SportType {
    /// The sport types the planner has catalogs for, in canonical order
    pub const KNOWN: [SportType; 5] = [
        SportType::Strength,
        SportType::Hiit,
        SportType::YogaMobility,
        SportType::RunningIntervals,
        SportType::Rest,
    ];

    /// Parse a token. Matching is exact so that the original spelling survives.
    pub fn from_token(token: &str) -> Self {
        match token {
            "STRENGTH" => Self::Strength,
            "HIIT" => Self::Hiit,
            "YOGA_MOBILITY" => Self::YogaMobility,
            "RUNNING_INTERVALS" => Self::RunningIntervals,
            "REST" => Self::Rest,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Strength => "STRENGTH",
            Self::Hiit => "HIIT",
            Self::YogaMobility => "YOGA_MOBILITY",
            Self::RunningIntervals => "RUNNING_INTERVALS",
            Self::Rest => "REST",
            Self::Other(token) => token,
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Self::Rest)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Human-readable label for narratives
    pub fn label(&self) -> &str {
        match self {
            Self::Strength => "Strength",
            Self::Hiit => "HIIT",
            Self::YogaMobility => "Yoga & Mobility",
            Self::RunningIntervals => "Running Intervals",
            Self::Rest => "Rest",
            Self::Other(token) => token,
        }
    }
}

impl From<String> for SportType {
    fn from(value: String) -> Self {
        match Self::from_token(&value) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

impl From<&str> for SportType {
    fn from(value: &str) -> Self {
        Self::from_token(value)
    }
}

impl From<SportType> for String {
    fn from(value: SportType) -> Self {
        match value {
            SportType::Other(token) => token,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty of a single exercise
///
/// Serialized upper-case. Parsing is case-insensitive because language models
/// tend to answer with "Beginner" rather than "BEGINNER".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "BEGINNER",
            Self::Intermediate => "INTERMEDIATE",
            Self::Advanced => "ADVANCED",
        }
    }

    /// Position on the 0..=2 difficulty ladder
    pub fn rank(self) -> u8 {
        match self {
            Self::Beginner => 0,
            Self::Intermediate => 1,
            Self::Advanced => 2,
        }
    }

    /// Inverse of [`Difficulty::rank`], saturating at `Advanced`
    pub fn from_rank(rank: u8) -> Self {
        match rank {
            0 => Self::Beginner,
            1 => Self::Intermediate,
            _ => Self::Advanced,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BEGINNER" => Some(Self::Beginner),
            "INTERMEDIATE" => Some(Self::Intermediate),
            "ADVANCED" => Some(Self::Advanced),
            _ => None,
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown difficulty '{}'", value))
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported training experience
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BEGINNER" => Some(Self::Beginner),
            "INTERMEDIATE" => Some(Self::Intermediate),
            "ADVANCED" => Some(Self::Advanced),
            _ => None,
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Self::Beginner => 0,
            Self::Intermediate => 1,
            Self::Advanced => 2,
        }
    }
}

/// Physical profile of the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Age in years; signed so that nonsense values reach the validator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Sent instead of `age` by the weekly planning caller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

impl UserProfile {
    /// Age in whole years, derived from `date_of_birth` when `age` is absent
    pub fn effective_age(&self, today: NaiveDate) -> Option<i64> {
        if let Some(age) = self.age {
            return Some(age);
        }

        let born = NaiveDate::parse_from_str(self.date_of_birth.as_deref()?, "%Y-%m-%d").ok()?;
        let mut years = i64::from(today.year() - born.year());
        if (today.month(), today.day()) < (born.month(), born.day()) {
            years -= 1;
        }
        Some(years)
    }
}

/// Training preferences as stored by the user service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub experience_level: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub fitness_goals: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub preferred_sport_types: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub available_equipment: Vec<String>,
    pub workout_duration_range: Option<String>,
    pub intensity_preference: Option<String>,
    pub health_notes: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub disliked_exercises: Vec<String>,
}

impl UserPreferences {
    /// Parsed experience level; unknown spellings count as absent
    pub fn experience(&self) -> Option<ExperienceLevel> {
        self.experience_level.as_deref().and_then(ExperienceLevel::parse)
    }

    pub fn dislikes(&self, exercise_name: &str) -> bool {
        self.disliked_exercises
            .iter()
            .any(|d| d.trim().eq_ignore_ascii_case(exercise_name))
    }

    /// Upper bound of `workoutDurationRange` ("30-45", "MIN_30_45", "60")
    pub fn preferred_duration_minutes(&self) -> Option<i64> {
        let range = self.workout_duration_range.as_deref()?;
        range
            .split(|c: char| !c.is_ascii_digit())
            .filter_map(|part| part.parse::<i64>().ok())
            .filter(|minutes| *minutes > 0)
            .max()
    }
}

/// Focus of the day being planned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyFocus {
    #[serde(default)]
    pub day_date: Option<String>,
    #[serde(default)]
    pub focus_sport_type_for_the_day: Option<SportType>,
    #[serde(default)]
    pub target_total_duration_minutes: Option<i64>,
}

/// One exercise of a recent session, either a bare name or a detailed record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecentExercise {
    Name(String),
    Detailed {
        #[serde(alias = "name")]
        exercise_name: String,
    },
}

impl RecentExercise {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Detailed { exercise_name } => exercise_name,
        }
    }
}

/// Summary of one day from the prior week of training
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentWorkout {
    pub day_date: Option<String>,
    pub sport_type: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub exercises: Vec<RecentExercise>,
    #[serde(deserialize_with = "null_as_default")]
    pub muscle_groups_worked: Vec<String>,
    pub completion_status: Option<String>,
}

/// Request for a single day's plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptContext {
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_preferences: UserPreferences,
    #[serde(default)]
    pub daily_focus: Option<DailyFocus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_7_days_exercises: Vec<RecentWorkout>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text_prompt: String,
}

/// Request for a seven day plan; the planner picks each day's focus
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPromptContext {
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_preferences: UserPreferences,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text_prompt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_7_days_exercises: Vec<RecentWorkout>,
}

/// Lower-cased names of every exercise done in the recent history
pub fn recent_exercise_names(history: &[RecentWorkout]) -> HashSet<String> {
    history
        .iter()
        .flat_map(|day| day.exercises.iter())
        .map(|exercise| exercise.name().trim().to_lowercase())
        .collect()
}

/// A scheduled exercise within a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub sequence_order: u32,
    pub exercise_name: String,
    pub description: String,
    pub applicable_sport_types: Vec<SportType>,
    pub muscle_groups_primary: Vec<String>,
    pub muscle_groups_secondary: Vec<String>,
    pub equipment_needed: Vec<String>,
    pub difficulty: Difficulty,
    pub prescribed_sets_reps_duration: String,
    pub voice_script_cue_text: String,
    #[serde(default)]
    pub video_url: Option<String>,
}

/// One day of training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWorkout {
    pub day_date: String,
    pub focus_sport_type_for_the_day: SportType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_total_duration_minutes: Option<i64>,
    pub scheduled_exercises: Vec<Exercise>,
    pub markdown_content: String,
}

/// Envelope returned by `/generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyResponse {
    pub daily_workout: DailyWorkout,
}

/// Seven consecutive days of training, returned as-is by `/generate-weekly`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub workouts: Vec<DailyWorkout>,
}

/// Treat an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
