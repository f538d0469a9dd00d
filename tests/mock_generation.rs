// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Integration tests for mock plan synthesis
//!
//! These tests drive the generator in mock mode through its public API and
//! check the properties callers rely on.

use chrono::NaiveDate;
use flexfit_genai_worker::errors::GenerationError;
use flexfit_genai_worker::models::{
    Difficulty, PromptContext, SportType, WeeklyPromptContext,
};
use flexfit_genai_worker::planner::{GeneratorSettings, PlanSource, WorkoutPlanGenerator};
use serde_json::{json, Value};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 29).unwrap()
}

fn generator() -> WorkoutPlanGenerator {
    WorkoutPlanGenerator::new(GeneratorSettings::default())
}

fn daily_context(sport: &str, minutes: Value, experience: &str) -> PromptContext {
    serde_json::from_value(json!({
        "user_profile": {"age": 30, "gender": "FEMALE", "height_cm": 170, "weight_kg": 65},
        "user_preferences": {
            "experienceLevel": experience,
            "fitnessGoals": ["STRENGTH_GAIN"],
            "availableEquipment": []
        },
        "daily_focus": {
            "day_date": "2025-06-29",
            "focus_sport_type_for_the_day": sport,
            "target_total_duration_minutes": minutes
        },
        "last_7_days_exercises": [],
        "text_prompt": ""
    }))
    .unwrap()
}

#[tokio::test]
async fn test_strength_beginner_plan() {
    let generated = generator()
        .generate_daily(&daily_context("STRENGTH", json!(45), "BEGINNER"), today())
        .await
        .unwrap();
    assert_eq!(generated.source, PlanSource::Mock);

    let plan = generated.plan;
    assert_eq!(plan.day_date, "2025-06-29");
    assert_eq!(plan.focus_sport_type_for_the_day, SportType::Strength);
    assert_eq!(plan.target_total_duration_minutes, Some(45));

    let names: Vec<&str> = plan
        .scheduled_exercises
        .iter()
        .map(|e| e.exercise_name.as_str())
        .collect();
    assert_eq!(names, vec!["Push-ups", "Squats", "Plank"]);

    let beginner = plan
        .scheduled_exercises
        .iter()
        .filter(|e| e.difficulty == Difficulty::Beginner)
        .count();
    assert!(beginner >= 2);

    for (index, exercise) in plan.scheduled_exercises.iter().enumerate() {
        assert_eq!(exercise.sequence_order as usize, index + 1);
        assert!(!exercise.applicable_sport_types.is_empty());
        assert!(!exercise.muscle_groups_primary.is_empty());
        assert_eq!(
            plan.markdown_content.matches(exercise.exercise_name.as_str()).count(),
            1,
            "{} should appear once in the narrative",
            exercise.exercise_name
        );
    }
}

#[tokio::test]
async fn test_every_sport_gets_ordered_exercises() {
    for sport in ["STRENGTH", "HIIT", "YOGA_MOBILITY", "RUNNING_INTERVALS"] {
        let plan = generator()
            .generate_daily(&daily_context(sport, json!(30), "INTERMEDIATE"), today())
            .await
            .unwrap()
            .plan;

        assert!(!plan.scheduled_exercises.is_empty(), "{} plan is empty", sport);
        let orders: Vec<u32> = plan.scheduled_exercises.iter().map(|e| e.sequence_order).collect();
        let expected: Vec<u32> = (1..=orders.len() as u32).collect();
        assert_eq!(orders, expected);
        assert_eq!(plan.focus_sport_type_for_the_day.as_str(), sport);
    }
}

#[tokio::test]
async fn test_rest_day_has_no_exercises() {
    let plan = generator()
        .generate_daily(&daily_context("REST", json!(30), "BEGINNER"), today())
        .await
        .unwrap()
        .plan;

    assert_eq!(plan.focus_sport_type_for_the_day, SportType::Rest);
    assert!(plan.scheduled_exercises.is_empty());
    let narrative = plan.markdown_content.to_lowercase();
    assert!(narrative.contains("recovery"));
    assert!(narrative.contains("hydration"));
    assert!(narrative.contains("sleep"));
}

#[tokio::test]
async fn test_extreme_durations_are_kept() {
    for minutes in [5, 180] {
        let plan = generator()
            .generate_daily(&daily_context("HIIT", json!(minutes), "ADVANCED"), today())
            .await
            .unwrap()
            .plan;
        assert_eq!(plan.target_total_duration_minutes, Some(minutes));
        assert!(!plan.scheduled_exercises.is_empty());
    }
}

#[tokio::test]
async fn test_mock_plans_are_deterministic() {
    let context = daily_context("YOGA_MOBILITY", json!(40), "BEGINNER");
    let first = generator().generate_daily(&context, today()).await.unwrap().plan;
    let second = generator().generate_daily(&context, today()).await.unwrap().plan;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_weekly_mock_plans_are_deterministic() {
    let context: WeeklyPromptContext = serde_json::from_value(json!({
        "user_profile": {"date_of_birth": "1988-11-02"},
        "user_preferences": {"experienceLevel": "ADVANCED", "workoutDurationRange": "30-45"},
        "text_prompt": "more conditioning"
    }))
    .unwrap();

    let first = generator().generate_weekly(&context, today()).await.unwrap().plan;
    let second = generator().generate_weekly(&context, today()).await.unwrap().plan;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
    let no_profile: PromptContext = serde_json::from_value(json!({
        "daily_focus": {"focus_sport_type_for_the_day": "STRENGTH"}
    }))
    .unwrap();
    let err = generator().generate_daily(&no_profile, today()).await.unwrap_err();
    assert_eq!(err, GenerationError::missing("user_profile"));

    let no_focus: PromptContext =
        serde_json::from_value(json!({"user_profile": {"age": 30}})).unwrap();
    let err = generator().generate_daily(&no_focus, today()).await.unwrap_err();
    assert_eq!(err, GenerationError::missing("daily_focus"));

    let no_sport: PromptContext = serde_json::from_value(json!({
        "user_profile": {"age": 30},
        "daily_focus": {"day_date": "2025-06-29"}
    }))
    .unwrap();
    let err = generator().generate_daily(&no_sport, today()).await.unwrap_err();
    assert!(matches!(err, GenerationError::MissingField(_)));
}

#[tokio::test]
async fn test_non_positive_values_are_rejected() {
    let mut context = daily_context("STRENGTH", json!(0), "BEGINNER");
    let err = generator().generate_daily(&context, today()).await.unwrap_err();
    assert!(matches!(err, GenerationError::InvalidValue { .. }));

    context = daily_context("STRENGTH", json!(30), "BEGINNER");
    context.user_profile.as_mut().unwrap().age = Some(-4);
    let err = generator().generate_daily(&context, today()).await.unwrap_err();
    assert!(matches!(err, GenerationError::InvalidValue { .. }));
}

#[tokio::test]
async fn test_weekly_plan_covers_seven_days() {
    let context: WeeklyPromptContext = serde_json::from_value(json!({
        "user_profile": {"age": 41},
        "user_preferences": {"experienceLevel": "INTERMEDIATE", "workoutDurationRange": "45-60"},
        "text_prompt": "balanced week"
    }))
    .unwrap();

    let plan = generator().generate_weekly(&context, today()).await.unwrap().plan;
    assert_eq!(plan.workouts.len(), 7);

    for (offset, workout) in plan.workouts.iter().enumerate() {
        let expected = today() + chrono::Duration::days(offset as i64);
        assert_eq!(workout.day_date, expected.format("%Y-%m-%d").to_string());

        if workout.focus_sport_type_for_the_day.is_rest() {
            assert!(workout.scheduled_exercises.is_empty());
        } else {
            assert!(!workout.scheduled_exercises.is_empty());
        }
    }

    assert!(plan
        .workouts
        .iter()
        .any(|w| w.focus_sport_type_for_the_day.is_rest()));
}

#[tokio::test]
async fn test_weekly_requires_profile() {
    let context: WeeklyPromptContext = serde_json::from_value(json!({})).unwrap();
    let err = generator().generate_weekly(&context, today()).await.unwrap_err();
    assert_eq!(err, GenerationError::missing("user_profile"));
}

#[tokio::test]
async fn test_weekly_rejects_future_date_of_birth() {
    let context: WeeklyPromptContext = serde_json::from_value(json!({
        "user_profile": {"date_of_birth": "2031-05-20"}
    }))
    .unwrap();
    let err = generator().generate_weekly(&context, today()).await.unwrap_err();
    assert!(matches!(err, GenerationError::InvalidValue { .. }));
}
