// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Fitness Knowledge Base
//!
//! Evidence-based training notes used to enrich backend prompts and served by
//! the knowledge search route. [`InMemoryKnowledgeBase`] ranks entries by how
//! many query terms they share, which is enough for a corpus of this size.

use crate::errors::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Sport-type marker for entries that apply everywhere
pub const ALL_SPORTS: &str = "ALL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeMetadata {
    pub category: String,
    pub sport_type: String,
    pub difficulty_level: String,
    pub muscle_groups: Vec<String>,
    pub evidence_level: String,
}

/// One search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeHit {
    pub content: String,
    pub metadata: KnowledgeMetadata,
    /// Similarity in 0.0..=1.0
    pub score: f64,
}

/// Source of evidence snippets
#[async_trait]
pub trait KnowledgeLookup: Send + Sync {
    /// Best matches for `query`. With a sport type, only entries for that
    /// sport or for all sports are considered.
    async fn search(
        &self,
        query: &str,
        sport_type: Option<&str>,
        limit: usize,
    ) -> Result<Vec<KnowledgeHit>, GenerationError>;

    fn name(&self) -> &str;
}

struct Entry {
    content: &'static str,
    category: &'static str,
    sport_type: &'static str,
    difficulty_level: &'static str,
    muscle_groups: &'static [&'static str],
    evidence_level: &'static str,
}

/// Knowledge base held in memory and seeded at construction
pub struct InMemoryKnowledgeBase {
    entries: Vec<(KnowledgeMetadata, &'static str, HashSet<String>)>,
}

impl InMemoryKnowledgeBase {
    pub fn seeded() -> Self {
        let entries = SEED
            .iter()
            .map(|entry| {
                let metadata = KnowledgeMetadata {
                    category: entry.category.to_string(),
                    sport_type: entry.sport_type.to_string(),
                    difficulty_level: entry.difficulty_level.to_string(),
                    muscle_groups: entry.muscle_groups.iter().map(|m| m.to_string()).collect(),
                    evidence_level: entry.evidence_level.to_string(),
                };
                let mut terms = tokenize(entry.content);
                terms.extend(tokenize(&entry.category.replace('_', " ")));
                (metadata, entry.content, terms)
            })
            .collect();

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn rank(&self, query: &str, sport_type: Option<&str>, limit: usize) -> Vec<KnowledgeHit> {
        let query_terms = tokenize(query);
        if query_terms.is_empty() || limit == 0 {
            return Vec::new();
        }

        let sport_filter = sport_type
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(ALL_SPORTS));

        let mut hits: Vec<KnowledgeHit> = self
            .entries
            .iter()
            .filter(|(metadata, _, _)| match sport_filter {
                Some(sport) => {
                    metadata.sport_type.eq_ignore_ascii_case(sport)
                        || metadata.sport_type == ALL_SPORTS
                }
                None => true,
            })
            .filter_map(|(metadata, content, terms)| {
                let shared = query_terms.intersection(terms).count();
                (shared > 0).then(|| KnowledgeHit {
                    content: content.to_string(),
                    metadata: metadata.clone(),
                    score: shared as f64 / query_terms.len() as f64,
                })
            })
            .collect();

        // Stable sort keeps seed order among equal scores
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);
        hits
    }
}

impl Default for InMemoryKnowledgeBase {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl KnowledgeLookup for InMemoryKnowledgeBase {
    async fn search(
        &self,
        query: &str,
        sport_type: Option<&str>,
        limit: usize,
    ) -> Result<Vec<KnowledgeHit>, GenerationError> {
        Ok(self.rank(query, sport_type, limit))
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

/// Lower-cased alphanumeric words longer than two characters
fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.len() > 2)
        .map(str::to_lowercase)
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "are", "per", "than", "like", "should", "can", "you", "your",
    "before", "after", "into", "from", "that", "this", "between",
];

static SEED: &[Entry] = &[
    Entry {
        content: "Compound exercises like squats, deadlifts, bench press, and pull-ups work multiple muscle groups simultaneously and are the foundation of effective strength training. They provide functional strength, improve intermuscular coordination, and maximize training efficiency.",
        category: "exercise_science",
        sport_type: "STRENGTH",
        difficulty_level: "Intermediate",
        muscle_groups: &["Full Body", "Core"],
        evidence_level: "High",
    },
    Entry {
        content: "Progressive overload is the cornerstone of strength development. Gradually increase weight by 2.5-5 lbs for upper body and 5-10 lbs for lower body exercises when you can complete all prescribed sets and reps with proper form.",
        category: "training_principles",
        sport_type: "STRENGTH",
        difficulty_level: "Beginner",
        muscle_groups: &["All"],
        evidence_level: "High",
    },
    Entry {
        content: "For muscle hypertrophy, train each muscle group 2-3 times per week with 10-20 sets per muscle group per week. Rep ranges of 6-12 with 65-85% 1RM are optimal for muscle growth.",
        category: "muscle_building",
        sport_type: "STRENGTH",
        difficulty_level: "Intermediate",
        muscle_groups: &["All"],
        evidence_level: "High",
    },
    Entry {
        content: "Tabata protocol (20 seconds work, 10 seconds rest x 8 rounds) performed at maximum intensity can improve VO2max by up to 14% in 6 weeks. Apply to exercises like burpees, mountain climbers, or cycling.",
        category: "hiit_protocols",
        sport_type: "HIIT",
        difficulty_level: "Advanced",
        muscle_groups: &["Cardiovascular", "Full Body"],
        evidence_level: "High",
    },
    Entry {
        content: "4x4 HIIT protocol (4 minutes at 85-90% HRmax, 3 minutes recovery x 4) is superior for cardiac adaptations and stroke volume improvements compared to traditional moderate intensity cardio.",
        category: "hiit_protocols",
        sport_type: "HIIT",
        difficulty_level: "Advanced",
        muscle_groups: &["Cardiovascular"],
        evidence_level: "High",
    },
    Entry {
        content: "HIIT should be limited to 2-3 sessions per week maximum. Allow 48-72 hours recovery between high-intensity sessions to prevent overtraining and allow for physiological adaptations.",
        category: "recovery_hiit",
        sport_type: "HIIT",
        difficulty_level: "Intermediate",
        muscle_groups: &["Cardiovascular"],
        evidence_level: "High",
    },
    Entry {
        content: "Active recovery involving light movement (20-30 minutes at 30-50% HRmax) increases blood flow, reduces muscle stiffness, and accelerates lactate clearance better than complete rest.",
        category: "active_recovery",
        sport_type: "REST",
        difficulty_level: "Beginner",
        muscle_groups: &["Recovery"],
        evidence_level: "High",
    },
    Entry {
        content: "Sleep is crucial for recovery. Growth hormone peaks during deep sleep phases. Athletes need 7-9 hours of quality sleep for optimal recovery, muscle protein synthesis, and performance.",
        category: "sleep_recovery",
        sport_type: "REST",
        difficulty_level: "Beginner",
        muscle_groups: &["Recovery"],
        evidence_level: "High",
    },
    Entry {
        content: "Muscle protein synthesis remains elevated for 24-48 hours post-exercise. Consume 20-40g high-quality protein within 2 hours post-workout to maximize recovery and adaptations.",
        category: "nutrition_recovery",
        sport_type: ALL_SPORTS,
        difficulty_level: "Beginner",
        muscle_groups: &["All"],
        evidence_level: "High",
    },
    Entry {
        content: "Dynamic stretching before workouts improves range of motion and reduces injury risk. Static stretching post-workout aids in muscle length restoration and stress reduction.",
        category: "flexibility_mobility",
        sport_type: "YOGA_MOBILITY",
        difficulty_level: "Beginner",
        muscle_groups: &["Full Body"],
        evidence_level: "Moderate",
    },
    Entry {
        content: "Yoga practice 2-3 times per week improves flexibility, balance, core strength, and reduces cortisol levels. Particularly beneficial for athletes in high-stress training phases.",
        category: "yoga_benefits",
        sport_type: "YOGA_MOBILITY",
        difficulty_level: "Beginner",
        muscle_groups: &["Core", "Flexibility"],
        evidence_level: "Moderate",
    },
    Entry {
        content: "Zone 2 training (conversational pace, 60-70% HRmax) improves mitochondrial density and fat oxidation. Should comprise 80% of endurance training volume for optimal aerobic development.",
        category: "aerobic_training",
        sport_type: "RUNNING_INTERVALS",
        difficulty_level: "Intermediate",
        muscle_groups: &["Cardiovascular", "Legs"],
        evidence_level: "High",
    },
    Entry {
        content: "Interval running workouts (400m-1600m repeats at 5K-10K pace) improve VO2max and lactate threshold. Include 1-2 interval sessions per week for competitive runners.",
        category: "running_intervals",
        sport_type: "RUNNING_INTERVALS",
        difficulty_level: "Advanced",
        muscle_groups: &["Cardiovascular", "Legs"],
        evidence_level: "High",
    },
    Entry {
        content: "Beginners should focus on movement quality over intensity. Start with bodyweight exercises: push-ups, squats, lunges, planks. Master form before adding external load.",
        category: "beginner_training",
        sport_type: "STRENGTH",
        difficulty_level: "Beginner",
        muscle_groups: &["Full Body"],
        evidence_level: "High",
    },
    Entry {
        content: "New exercisers should train 2-3 times per week, allowing 48 hours recovery between sessions. Focus on full-body workouts with 6-8 exercises per session.",
        category: "beginner_frequency",
        sport_type: ALL_SPORTS,
        difficulty_level: "Beginner",
        muscle_groups: &["All"],
        evidence_level: "High",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_ranks_by_shared_terms() {
        let kb = InMemoryKnowledgeBase::seeded();
        assert_eq!(kb.len(), 15);

        let hits = kb.search("sleep recovery hours", None, 3).await.unwrap();
        assert!(!hits.is_empty());
        assert_eq!(hits[0].metadata.category, "sleep_recovery");
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(hits.iter().all(|h| h.score > 0.0 && h.score <= 1.0));
    }

    #[tokio::test]
    async fn test_sport_filter_admits_all_entries() {
        let kb = InMemoryKnowledgeBase::seeded();
        let hits = kb.search("protein recovery sessions week", Some("HIIT"), 10).await.unwrap();

        assert!(!hits.is_empty());
        assert!(hits
            .iter()
            .all(|h| h.metadata.sport_type == "HIIT" || h.metadata.sport_type == ALL_SPORTS));
        assert!(hits.iter().any(|h| h.metadata.sport_type == ALL_SPORTS));
    }

    #[tokio::test]
    async fn test_limit_and_empty_queries() {
        let kb = InMemoryKnowledgeBase::seeded();
        assert_eq!(kb.search("training", None, 2).await.unwrap().len(), 2);
        assert!(kb.search("", None, 5).await.unwrap().is_empty());
        assert!(kb.search("zzz qqq", None, 5).await.unwrap().is_empty());
    }
}
