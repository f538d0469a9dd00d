// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Hand-authored exercise catalog used by mock synthesis

use crate::constants::equipment::{
    FOAM_ROLLER, JUMP_ROPE, KETTLEBELL, NO_EQUIPMENT, PULL_UP_BAR, TREADMILL, YOGA_MAT,
};
use crate::models::{Difficulty, SportType};

/// One catalog exercise
#[derive(Debug)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub sport_types: &'static [&'static str],
    pub primary_muscles: &'static [&'static str],
    pub secondary_muscles: &'static [&'static str],
    pub equipment: &'static [&'static str],
    /// Hardest difficulty this exercise is prescribed at
    pub ceiling: Difficulty,
    /// Prescription per difficulty rank
    pub prescriptions: [&'static str; 3],
    pub cue: &'static str,
}

impl CatalogEntry {
    pub fn prescription(&self, difficulty: Difficulty) -> &'static str {
        self.prescriptions[difficulty.rank() as usize]
    }

    /// Bodyweight entries fit any equipment list. An empty list means the
    /// user did not say, so nothing is filtered.
    pub fn fits_equipment(&self, available: &[String]) -> bool {
        if available.is_empty() {
            return true;
        }
        self.equipment
            .iter()
            .filter(|item| **item != NO_EQUIPMENT)
            .all(|item| available.iter().any(|a| a.eq_ignore_ascii_case(item)))
    }
}

/// Exercises for one sport type
#[derive(Debug)]
pub struct Catalog {
    /// Default selection, in order
    pub primary: &'static [CatalogEntry],
    /// Replacements for disliked or recently done primaries
    pub alternates: &'static [CatalogEntry],
}

impl Catalog {
    pub fn entries(&self) -> impl Iterator<Item = &'static CatalogEntry> {
        self.primary.iter().chain(self.alternates.iter())
    }

    /// Number of exercises in a mock session
    pub fn session_size(&self) -> usize {
        self.primary.len()
    }
}

/// Catalog for a sport type. Anything without its own catalog, REST included,
/// falls back to STRENGTH; REST days never reach selection.
pub fn catalog_for(sport_type: &SportType) -> &'static Catalog {
    match sport_type {
        SportType::Hiit => &HIIT,
        SportType::YogaMobility => &YOGA_MOBILITY,
        SportType::RunningIntervals => &RUNNING_INTERVALS,
        SportType::Strength | SportType::Rest | SportType::Other(_) => &STRENGTH,
    }
}

/// Every name in every catalog
pub fn all_names() -> impl Iterator<Item = &'static str> {
    [&STRENGTH, &HIIT, &YOGA_MOBILITY, &RUNNING_INTERVALS]
        .into_iter()
        .flat_map(|catalog| catalog.entries())
        .map(|entry| entry.name)
}

pub static STRENGTH: Catalog = Catalog {
    primary: &[
        CatalogEntry {
            name: "Push-ups",
            description: "Bodyweight horizontal press from a straight-arm position, lowering the chest to just above the floor.",
            sport_types: &["STRENGTH"],
            primary_muscles: &["Chest", "Triceps"],
            secondary_muscles: &["Shoulders", "Core"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Advanced,
            prescriptions: [
                "3 sets of 8-10 reps, knees down if needed",
                "3 sets of 12-15 reps",
                "4 sets of 15-20 reps with a 3 second lowering phase",
            ],
            cue: "Hands under shoulders, body in one straight line, lower with control.",
        },
        CatalogEntry {
            name: "Squats",
            description: "Bodyweight squat with feet shoulder-width apart, sitting the hips back and down until the thighs are parallel.",
            sport_types: &["STRENGTH"],
            primary_muscles: &["Quadriceps", "Glutes"],
            secondary_muscles: &["Hamstrings", "Core"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Advanced,
            prescriptions: [
                "3 sets of 10-12 reps",
                "3 sets of 15-20 reps",
                "4 sets of 20 reps with a 2 second pause at the bottom",
            ],
            cue: "Chest up, knees tracking over the toes, drive through the heels.",
        },
        CatalogEntry {
            name: "Plank",
            description: "Forearm hold with the body straight from head to heels, bracing the trunk against sagging.",
            sport_types: &["STRENGTH"],
            primary_muscles: &["Core"],
            secondary_muscles: &["Shoulders", "Glutes"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Advanced,
            prescriptions: [
                "3 holds of 20-30 seconds",
                "3 holds of 45 seconds",
                "4 holds of 60 seconds",
            ],
            cue: "Squeeze your glutes, keep your hips level and breathe steadily.",
        },
    ],
    alternates: &[
        CatalogEntry {
            name: "Glute Bridges",
            description: "Lying on the back with knees bent, lift the hips until the body forms a line from shoulders to knees.",
            sport_types: &["STRENGTH"],
            primary_muscles: &["Glutes", "Hamstrings"],
            secondary_muscles: &["Core"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Intermediate,
            prescriptions: [
                "3 sets of 12 reps",
                "3 sets of 15 reps with a 2 second hold at the top",
                "3 sets of 15 reps with a 2 second hold at the top",
            ],
            cue: "Press through your heels and squeeze at the top without arching your lower back.",
        },
        CatalogEntry {
            name: "Reverse Lunges",
            description: "Step one foot back and lower the back knee toward the floor, then return to standing. Alternate legs.",
            sport_types: &["STRENGTH"],
            primary_muscles: &["Quadriceps", "Glutes"],
            secondary_muscles: &["Hamstrings", "Calves"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Advanced,
            prescriptions: [
                "2 sets of 8 reps per leg",
                "3 sets of 10 reps per leg",
                "4 sets of 12 reps per leg",
            ],
            cue: "Keep your torso upright and let the back knee hover just above the floor.",
        },
        CatalogEntry {
            name: "Superman Hold",
            description: "Lying face down, lift the arms, chest and legs off the floor and hold.",
            sport_types: &["STRENGTH"],
            primary_muscles: &["Lower Back"],
            secondary_muscles: &["Glutes", "Shoulders"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Intermediate,
            prescriptions: [
                "3 holds of 15 seconds",
                "3 holds of 30 seconds",
                "3 holds of 30 seconds",
            ],
            cue: "Reach long through your fingertips and keep your neck neutral.",
        },
        CatalogEntry {
            name: "Kettlebell Deadlift",
            description: "Hinge at the hips to lift a kettlebell from between the feet to a tall standing position.",
            sport_types: &["STRENGTH"],
            primary_muscles: &["Hamstrings", "Glutes"],
            secondary_muscles: &["Lower Back", "Forearms"],
            equipment: &[KETTLEBELL],
            ceiling: Difficulty::Advanced,
            prescriptions: [
                "3 sets of 8 reps with a light bell",
                "3 sets of 10 reps",
                "4 sets of 12 reps with a heavy bell",
            ],
            cue: "Push the hips back, keep a flat back and stand up tall at the top.",
        },
        CatalogEntry {
            name: "Pull-ups",
            description: "Hang from a bar with an overhand grip and pull until the chin clears the bar.",
            sport_types: &["STRENGTH"],
            primary_muscles: &["Lats", "Biceps"],
            secondary_muscles: &["Rear Delts", "Core"],
            equipment: &[PULL_UP_BAR],
            ceiling: Difficulty::Advanced,
            prescriptions: [
                "3 sets of 3-5 negatives",
                "3 sets of 5-8 reps",
                "4 sets of 8-12 reps",
            ],
            cue: "Start from a dead hang, pull your elbows down and avoid swinging.",
        },
    ],
};

pub static HIIT: Catalog = Catalog {
    primary: &[
        CatalogEntry {
            name: "Jumping Jacks",
            description: "Jump the feet wide while raising the arms overhead, then return. Keeps the heart rate high between harder efforts.",
            sport_types: &["HIIT"],
            primary_muscles: &["Full Body"],
            secondary_muscles: &["Calves", "Shoulders"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Intermediate,
            prescriptions: [
                "3 rounds of 30 seconds on, 30 seconds off",
                "4 rounds of 40 seconds on, 20 seconds off",
                "4 rounds of 40 seconds on, 20 seconds off",
            ],
            cue: "Land softly on the balls of your feet and keep a steady rhythm.",
        },
        CatalogEntry {
            name: "Burpees",
            description: "Drop to the floor, kick the feet back, return the feet under the hips and jump up.",
            sport_types: &["HIIT"],
            primary_muscles: &["Full Body"],
            secondary_muscles: &["Core", "Chest"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Advanced,
            prescriptions: [
                "3 rounds of 20 seconds on, 40 seconds off, step back instead of jumping",
                "4 rounds of 30 seconds on, 30 seconds off",
                "8 rounds of 20 seconds on, 10 seconds off",
            ],
            cue: "Move with intent but keep your core tight every time you hit the floor.",
        },
        CatalogEntry {
            name: "Mountain Climbers",
            description: "From a high hand position, drive the knees toward the chest one at a time at speed.",
            sport_types: &["HIIT"],
            primary_muscles: &["Core", "Hip Flexors"],
            secondary_muscles: &["Shoulders", "Quadriceps"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Advanced,
            prescriptions: [
                "3 rounds of 20 seconds on, 40 seconds off",
                "4 rounds of 30 seconds on, 30 seconds off",
                "6 rounds of 40 seconds on, 20 seconds off",
            ],
            cue: "Hips low, shoulders over your hands, quick light feet.",
        },
    ],
    alternates: &[
        CatalogEntry {
            name: "High Knees",
            description: "Run on the spot driving the knees to hip height with an active arm swing.",
            sport_types: &["HIIT", "RUNNING_INTERVALS"],
            primary_muscles: &["Hip Flexors", "Quadriceps"],
            secondary_muscles: &["Calves", "Core"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Advanced,
            prescriptions: [
                "3 rounds of 20 seconds on, 40 seconds off",
                "4 rounds of 30 seconds on, 30 seconds off",
                "6 rounds of 40 seconds on, 20 seconds off",
            ],
            cue: "Stay tall, pump your arms and stay on the balls of your feet.",
        },
        CatalogEntry {
            name: "Speed Skaters",
            description: "Leap laterally from one foot to the other, reaching the trailing leg behind.",
            sport_types: &["HIIT"],
            primary_muscles: &["Glutes", "Quadriceps"],
            secondary_muscles: &["Adductors", "Calves"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Advanced,
            prescriptions: [
                "3 rounds of 20 seconds on, 40 seconds off",
                "4 rounds of 30 seconds on, 30 seconds off",
                "6 rounds of 40 seconds on, 20 seconds off",
            ],
            cue: "Stick each landing for a moment before pushing off again.",
        },
        CatalogEntry {
            name: "Jump Rope Intervals",
            description: "Fast skipping intervals with a rope, alternating between two-foot and alternate-foot bounces.",
            sport_types: &["HIIT"],
            primary_muscles: &["Calves"],
            secondary_muscles: &["Shoulders", "Forearms"],
            equipment: &[JUMP_ROPE],
            ceiling: Difficulty::Advanced,
            prescriptions: [
                "5 rounds of 30 seconds on, 30 seconds off",
                "6 rounds of 45 seconds on, 15 seconds off",
                "8 rounds of 60 seconds on, 15 seconds off",
            ],
            cue: "Turn from the wrists and keep the jumps small.",
        },
        CatalogEntry {
            name: "Kettlebell Swings",
            description: "Hinge and snap the hips to swing a kettlebell to chest height.",
            sport_types: &["HIIT", "STRENGTH"],
            primary_muscles: &["Glutes", "Hamstrings"],
            secondary_muscles: &["Core", "Shoulders"],
            equipment: &[KETTLEBELL],
            ceiling: Difficulty::Advanced,
            prescriptions: [
                "4 rounds of 20 seconds on, 40 seconds off",
                "5 rounds of 30 seconds on, 30 seconds off",
                "8 rounds of 20 seconds on, 10 seconds off",
            ],
            cue: "The power comes from your hips, your arms only guide the bell.",
        },
    ],
};

pub static YOGA_MOBILITY: Catalog = Catalog {
    primary: &[
        CatalogEntry {
            name: "Cat-Cow Flow",
            description: "On hands and knees, alternate between rounding and arching the spine with the breath.",
            sport_types: &["YOGA_MOBILITY"],
            primary_muscles: &["Spine", "Core"],
            secondary_muscles: &["Neck"],
            equipment: &[YOGA_MAT],
            ceiling: Difficulty::Beginner,
            prescriptions: [
                "10 slow breaths",
                "10 slow breaths",
                "10 slow breaths",
            ],
            cue: "Inhale as you lift your chest, exhale as you round and tuck your chin.",
        },
        CatalogEntry {
            name: "Downward Dog",
            description: "From hands and knees, lift the hips up and back into an inverted V.",
            sport_types: &["YOGA_MOBILITY"],
            primary_muscles: &["Hamstrings", "Calves"],
            secondary_muscles: &["Shoulders", "Spine"],
            equipment: &[YOGA_MAT],
            ceiling: Difficulty::Intermediate,
            prescriptions: [
                "3 holds of 20 seconds with bent knees",
                "3 holds of 45 seconds",
                "3 holds of 45 seconds",
            ],
            cue: "Press the floor away and let your heels sink toward the mat.",
        },
        CatalogEntry {
            name: "Child's Pose",
            description: "Kneel, sit back on the heels and fold forward with the arms extended.",
            sport_types: &["YOGA_MOBILITY", "REST"],
            primary_muscles: &["Lower Back", "Hips"],
            secondary_muscles: &["Shoulders"],
            equipment: &[YOGA_MAT],
            ceiling: Difficulty::Beginner,
            prescriptions: [
                "2 holds of 60 seconds",
                "2 holds of 60 seconds",
                "2 holds of 60 seconds",
            ],
            cue: "Let your forehead rest and breathe into your back.",
        },
    ],
    alternates: &[
        CatalogEntry {
            name: "World's Greatest Stretch",
            description: "From a deep lunge, drop the inside elbow toward the instep, then rotate and reach to the ceiling.",
            sport_types: &["YOGA_MOBILITY"],
            primary_muscles: &["Hips", "Thoracic Spine"],
            secondary_muscles: &["Hamstrings", "Shoulders"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Intermediate,
            prescriptions: [
                "2 sets of 4 per side",
                "3 sets of 5 per side",
                "3 sets of 5 per side",
            ],
            cue: "Move slowly and follow your top hand with your eyes.",
        },
        CatalogEntry {
            name: "Pigeon Pose",
            description: "Bring one shin forward across the mat and extend the other leg back, folding over the front leg.",
            sport_types: &["YOGA_MOBILITY"],
            primary_muscles: &["Glutes", "Hips"],
            secondary_muscles: &["Hip Flexors"],
            equipment: &[YOGA_MAT],
            ceiling: Difficulty::Intermediate,
            prescriptions: [
                "1 hold of 45 seconds per side",
                "2 holds of 60 seconds per side",
                "2 holds of 60 seconds per side",
            ],
            cue: "Keep your hips square and relax a little more on every exhale.",
        },
        CatalogEntry {
            name: "Thoracic Rotations",
            description: "On hands and knees, place one hand behind the head and rotate the elbow toward the ceiling.",
            sport_types: &["YOGA_MOBILITY"],
            primary_muscles: &["Thoracic Spine"],
            secondary_muscles: &["Obliques", "Shoulders"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Beginner,
            prescriptions: [
                "2 sets of 8 per side",
                "2 sets of 8 per side",
                "2 sets of 8 per side",
            ],
            cue: "Keep your hips still and let the upper back do the turning.",
        },
        CatalogEntry {
            name: "Foam Roller Release",
            description: "Slow passes over the thighs, calves and upper back on a foam roller.",
            sport_types: &["YOGA_MOBILITY", "REST"],
            primary_muscles: &["Quadriceps", "Upper Back"],
            secondary_muscles: &["Calves"],
            equipment: &[FOAM_ROLLER],
            ceiling: Difficulty::Beginner,
            prescriptions: [
                "60 seconds per area",
                "60 seconds per area",
                "60 seconds per area",
            ],
            cue: "Pause on tender spots and keep breathing.",
        },
    ],
};

pub static RUNNING_INTERVALS: Catalog = Catalog {
    primary: &[
        CatalogEntry {
            name: "Easy Jog",
            description: "Conversational-pace running to build the aerobic base before the faster work.",
            sport_types: &["RUNNING_INTERVALS"],
            primary_muscles: &["Cardiovascular", "Legs"],
            secondary_muscles: &["Core"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Intermediate,
            prescriptions: [
                "8 minutes at conversational pace",
                "10 minutes at conversational pace",
                "10 minutes at conversational pace",
            ],
            cue: "Relax your shoulders and keep breathing easy enough to talk.",
        },
        CatalogEntry {
            name: "Tempo Intervals",
            description: "Sustained efforts at a comfortably hard pace separated by easy recovery.",
            sport_types: &["RUNNING_INTERVALS"],
            primary_muscles: &["Cardiovascular", "Legs"],
            secondary_muscles: &["Glutes"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Advanced,
            prescriptions: [
                "4 x 1 minute hard, 2 minutes easy",
                "5 x 2 minutes hard, 90 seconds easy",
                "6 x 3 minutes at 10K pace, 90 seconds easy",
            ],
            cue: "Settle into a rhythm you could hold for twenty minutes, not an all-out sprint.",
        },
        CatalogEntry {
            name: "Hill Sprints",
            description: "Short uphill bursts with a walk back down as recovery.",
            sport_types: &["RUNNING_INTERVALS", "HIIT"],
            primary_muscles: &["Glutes", "Calves"],
            secondary_muscles: &["Hamstrings", "Core"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Advanced,
            prescriptions: [
                "4 x 10 seconds uphill, walk back down",
                "6 x 15 seconds uphill, walk back down",
                "8 x 20 seconds uphill, walk back down",
            ],
            cue: "Lean into the slope and drive your knees forward.",
        },
    ],
    alternates: &[
        CatalogEntry {
            name: "Fartlek Run",
            description: "Unstructured pace changes, picking landmarks to surge toward.",
            sport_types: &["RUNNING_INTERVALS"],
            primary_muscles: &["Cardiovascular", "Legs"],
            secondary_muscles: &["Core"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Advanced,
            prescriptions: [
                "10 minutes with 30 second surges",
                "15 minutes with 1 minute surges",
                "20 minutes with 90 second surges",
            ],
            cue: "Surge until the next landmark, then jog until your breathing settles.",
        },
        CatalogEntry {
            name: "Treadmill Incline Walk",
            description: "Brisk walking on a steep treadmill incline.",
            sport_types: &["RUNNING_INTERVALS"],
            primary_muscles: &["Glutes", "Calves"],
            secondary_muscles: &["Hamstrings"],
            equipment: &[TREADMILL],
            ceiling: Difficulty::Intermediate,
            prescriptions: [
                "10 minutes at 8 percent incline",
                "15 minutes at 10 percent incline",
                "15 minutes at 10 percent incline",
            ],
            cue: "Let go of the handrails and keep a tall posture.",
        },
        CatalogEntry {
            name: "Strides",
            description: "Smooth accelerations to about ninety percent of top speed over a short distance.",
            sport_types: &["RUNNING_INTERVALS"],
            primary_muscles: &["Legs"],
            secondary_muscles: &["Core"],
            equipment: &[NO_EQUIPMENT],
            ceiling: Difficulty::Advanced,
            prescriptions: [
                "4 x 15 seconds with full recovery",
                "6 x 20 seconds with full recovery",
                "8 x 20 seconds with full recovery",
            ],
            cue: "Stay relaxed as you build speed and keep your form smooth.",
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_strength_primaries() {
        let names: Vec<_> = STRENGTH.primary.iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Push-ups", "Squats", "Plank"]);
    }

    #[test]
    fn test_unknown_sport_uses_strength_catalog() {
        let catalog = catalog_for(&SportType::from("PILATES"));
        assert_eq!(catalog.primary[0].name, "Push-ups");
    }

    #[test]
    fn test_names_are_unique_and_not_nested() {
        let names: Vec<_> = all_names().collect();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());

        for a in &names {
            for b in &names {
                if a != b {
                    assert!(!b.contains(a), "'{}' is contained in '{}'", a, b);
                }
            }
        }
    }

    #[test]
    fn test_cues_do_not_mention_exercise_names() {
        for catalog in [&STRENGTH, &HIIT, &YOGA_MOBILITY, &RUNNING_INTERVALS] {
            for entry in catalog.entries() {
                for name in all_names() {
                    let lowered = name.to_lowercase();
                    assert!(!entry.cue.to_lowercase().contains(&lowered));
                    for prescription in entry.prescriptions {
                        assert!(!prescription.to_lowercase().contains(&lowered));
                    }
                }
            }
        }
    }

    #[test]
    fn test_equipment_filter() {
        let swings = HIIT.alternates.iter().find(|e| e.name == "Kettlebell Swings").unwrap();
        assert!(swings.fits_equipment(&[]));
        assert!(!swings.fits_equipment(&["NO_EQUIPMENT".to_string()]));
        assert!(swings.fits_equipment(&["kettlebell".to_string()]));
        assert!(STRENGTH.primary[0].fits_equipment(&["YOGA_MAT".to_string()]));
    }
}
