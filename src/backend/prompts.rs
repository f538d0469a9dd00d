// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Prompt construction for live generation

use crate::constants::equipment;
use crate::knowledge::KnowledgeHit;
use crate::validation::{ValidDaily, ValidWeekly};
use serde_json::json;
use std::fmt::Write;

const COACH_ROLE: &str = "You are an experienced strength and conditioning coach. \
Design a safe, personalized workout from the user context below. \
Reply with a single JSON object and nothing else.";

const PROGRAMMING_RULES: &str = "\
## Programming rules
- Match exercises to experienceLevel, fitnessGoals and intensityPreference.
- Respect healthNotes and never schedule anything listed in dislikedExercises.
- Check last_7_days_exercises: avoid repeating recent exercises and give recently trained muscle groups a break.
- Only use equipment from availableEquipment. NO_EQUIPMENT means bodyweight only.
- The scheduled work, rests included, should roughly fill target_total_duration_minutes.
- If text_prompt is not empty, follow its instructions where they are safe.
";

const FORMAT_RULES: &str = r#"
## Output format
Sport types must be one of: "STRENGTH", "HIIT", "YOGA_MOBILITY", "RUNNING_INTERVALS", "REST".
A REST day has an empty scheduled_exercises array and a recovery-focused markdown_content
(hydration, sleep, gentle movement). Every other day has at least one exercise.

Each exercise needs: sequence_order (1, 2, 3 ... without gaps), exercise_name, description,
applicable_sport_types (non-empty), muscle_groups_primary (non-empty), muscle_groups_secondary,
equipment_needed, difficulty ("Beginner", "Intermediate" or "Advanced"),
prescribed_sets_reps_duration, voice_script_cue_text and video_url (string or null).

markdown_content holds the readable plan: title, warm-up, a table of the main exercises
(header row, separator row, one row per line), cool-down and short tips.
"#;

const DAILY_EXAMPLE: &str = r##"
## Example
{
  "daily_workout": {
    "day_date": "2025-01-13",
    "focus_sport_type_for_the_day": "HIIT",
    "target_total_duration_minutes": 30,
    "scheduled_exercises": [
      {
        "sequence_order": 1,
        "exercise_name": "Burpees",
        "description": "Squat down, kick back to a high plank, return and jump.",
        "applicable_sport_types": ["HIIT"],
        "muscle_groups_primary": ["Full Body"],
        "muscle_groups_secondary": ["Core"],
        "equipment_needed": ["NO_EQUIPMENT"],
        "difficulty": "Intermediate",
        "prescribed_sets_reps_duration": "4 rounds of 30 seconds on, 30 seconds off",
        "voice_script_cue_text": "Keep your core tight every time you hit the floor.",
        "video_url": null
      }
    ],
    "markdown_content": "# HIIT Workout\n\n## Warm-up\n- Light jog in place: 3 minutes\n\n## Main Workout\n\n| Exercise | Work | Rest |\n|---|---|---|\n| Burpees | 30s | 30s |\n\n## Cool-down\n- Static stretching: 5 minutes"
  }
}
"##;

/// Prompt for a single day
pub fn daily_prompt(request: &ValidDaily<'_>, knowledge: &[KnowledgeHit]) -> String {
    let context = json!({
        "user_profile": request.profile,
        "user_preferences": request.preferences,
        "daily_focus": request.focus,
        "last_7_days_exercises": request.history,
        "text_prompt": request.text_prompt,
    });

    let mut prompt = String::with_capacity(4096);
    prompt.push_str(COACH_ROLE);
    prompt.push_str("\n\n## User context\n");
    push_json(&mut prompt, &context);
    prompt.push_str(&knowledge_section(knowledge));
    prompt.push_str(PROGRAMMING_RULES);
    push_equipment(&mut prompt);
    prompt.push_str(FORMAT_RULES);
    let _ = writeln!(
        prompt,
        "Plan the day {} with focus {}. Wrap the workout in a \"daily_workout\" object.",
        request.focus.day_date.as_deref().unwrap_or("today"),
        request.sport_type
    );
    prompt.push_str(DAILY_EXAMPLE);
    prompt
}

/// Prompt for seven consecutive days
pub fn weekly_prompt(request: &ValidWeekly<'_>, dates: &[String], knowledge: &[KnowledgeHit]) -> String {
    let context = json!({
        "user_profile": request.profile,
        "user_preferences": request.preferences,
        "last_7_days_exercises": request.history,
        "text_prompt": request.text_prompt,
        "start_date": dates.first(),
        "dates": dates,
    });

    let mut prompt = String::with_capacity(4096);
    prompt.push_str(COACH_ROLE);
    prompt.push_str("\n\n## User context\n");
    push_json(&mut prompt, &context);
    prompt.push_str(&knowledge_section(knowledge));
    prompt.push_str(PROGRAMMING_RULES);
    push_equipment(&mut prompt);
    prompt.push_str(FORMAT_RULES);
    let _ = writeln!(
        prompt,
        "\nPlan exactly {} days, one per date in \"dates\" and in that order. \
         Include at least one REST day and vary the sport types across the week. \
         Reply as {{\"workouts\": [ ...{} daily workout objects... ]}}.",
        dates.len(),
        dates.len()
    );
    prompt
}

/// Numbered evidence list, or a short note when nothing was found
pub fn knowledge_section(hits: &[KnowledgeHit]) -> String {
    let mut section = String::from("\n## Evidence-based knowledge\n");
    if hits.is_empty() {
        section.push_str("Apply established training science.\n");
        return section;
    }

    for (index, hit) in hits.iter().enumerate() {
        let _ = writeln!(
            section,
            "{}. [{} evidence] {}: {}",
            index + 1,
            hit.metadata.evidence_level,
            title_case(&hit.metadata.category),
            hit.content
        );
    }
    section
}

fn push_json(prompt: &mut String, value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => prompt.push_str(&text),
        Err(_) => prompt.push_str(&value.to_string()),
    }
    prompt.push('\n');
}

fn push_equipment(prompt: &mut String) {
    let _ = writeln!(prompt, "Valid equipment values: {}", equipment::ALL.join(", "));
}

fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
