// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Workout Plan Generator
//!
//! Validates a request, then produces a plan either through the configured
//! generation backend or by deterministic mock synthesis.
//!
//! ```text
//! request -> validation -> mock mode? -- yes --> mock synthesis
//!                              | no
//!                              v
//!                 backend -> JSON extraction -> shape check
//!                              | unavailable + fallback_to_mock
//!                              v
//!                        mock synthesis
//! ```

pub mod catalog;
pub mod difficulty;
pub mod mock;
pub mod narrative;

use crate::backend::{self, prompts, GenerationBackend, GenerationRequest, PlanKind};
use crate::config::{BackendFailurePolicy, ServerConfig, SportTypePolicy};
use crate::constants::defaults;
use crate::errors::GenerationError;
use crate::knowledge::{InMemoryKnowledgeBase, KnowledgeHit, KnowledgeLookup};
use crate::logging::AppLogger;
use crate::models::{DailyWorkout, PromptContext, WeeklyPlan, WeeklyPromptContext};
use crate::validation::{self, ValidDaily, ValidWeekly};
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

const WEEKLY_KNOWLEDGE_QUERY: &str =
    "weekly workout programming training principles progressive overload recovery";

/// Generation behaviour, derived from configuration at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub mock_mode: bool,
    pub on_backend_failure: BackendFailurePolicy,
    pub sport_type_policy: SportTypePolicy,
    pub default_duration_minutes: i64,
    /// Knowledge snippets added to each backend prompt
    pub knowledge_limit: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            mock_mode: true,
            on_backend_failure: BackendFailurePolicy::Fail,
            sport_type_policy: SportTypePolicy::PassThrough,
            default_duration_minutes: defaults::DURATION_MINUTES,
            knowledge_limit: defaults::KNOWLEDGE_LIMIT,
        }
    }
}

/// Where a plan came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSource {
    Mock,
    Backend,
    /// Mock plan served because the backend was unavailable
    Fallback,
}

impl PlanSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Backend => "backend",
            Self::Fallback => "fallback",
        }
    }
}

/// A generated plan together with its origin
#[derive(Debug, Clone, PartialEq)]
pub struct Generated<T> {
    pub plan: T,
    pub source: PlanSource,
}

/// Produces daily and weekly plans. Cheap to share behind an `Arc`.
pub struct WorkoutPlanGenerator {
    settings: GeneratorSettings,
    backend: Option<Arc<dyn GenerationBackend>>,
    knowledge: Option<Arc<dyn KnowledgeLookup>>,
}

impl WorkoutPlanGenerator {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self {
            settings,
            backend: None,
            knowledge: None,
        }
    }

    /// Wire the generator from configuration: settings, backend and the
    /// built-in knowledge base
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let backend = backend::create_backend(&config.backend)?;
        if let Some(backend) = &backend {
            info!(backend = backend.name(), model = backend.model(), "Generation backend ready");
        }

        let knowledge: Option<Arc<dyn KnowledgeLookup>> = if config.knowledge.enabled {
            let base = InMemoryKnowledgeBase::seeded();
            info!(entries = base.len(), "Knowledge base loaded");
            Some(Arc::new(base))
        } else {
            None
        };

        Ok(Self::new(config.generator_settings())
            .with_backend(backend)
            .with_knowledge(knowledge))
    }

    pub fn with_backend(mut self, backend: Option<Arc<dyn GenerationBackend>>) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_knowledge(mut self, knowledge: Option<Arc<dyn KnowledgeLookup>>) -> Self {
        self.knowledge = knowledge;
        self
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn backend(&self) -> Option<&Arc<dyn GenerationBackend>> {
        self.backend.as_ref()
    }

    pub fn knowledge(&self) -> Option<&Arc<dyn KnowledgeLookup>> {
        self.knowledge.as_ref()
    }

    /// Plan a single day. `today` stands in for a missing `day_date`.
    pub async fn generate_daily(
        &self,
        context: &PromptContext,
        today: NaiveDate,
    ) -> Result<Generated<DailyWorkout>, GenerationError> {
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!("generate_daily", request.id = %request_id);

        async {
            let started = Instant::now();
            let request = validation::validate_daily(context, self.settings.sport_type_policy)
                .map_err(|e| {
                    AppLogger::log_validation_failure(&request_id, "daily", &e.to_string());
                    e
                })?;

            let (mut plan, source) = if self.settings.mock_mode {
                (self.mock_daily(&request, today), PlanSource::Mock)
            } else {
                match self.live_daily(&request_id, &request).await {
                    Ok(plan) => (plan, PlanSource::Backend),
                    Err(error) => (
                        self.fall_back(error, || self.mock_daily(&request, today))?,
                        PlanSource::Fallback,
                    ),
                }
            };

            // Backends may leave the duration out; keep the requested one
            if plan.target_total_duration_minutes.is_none()
                && !plan.focus_sport_type_for_the_day.is_rest()
            {
                plan.target_total_duration_minutes = request.focus.target_total_duration_minutes;
            }

            AppLogger::log_generation_event(
                &request_id,
                PlanKind::Daily.as_str(),
                source.as_str(),
                plan.focus_sport_type_for_the_day.as_str(),
                plan.scheduled_exercises.len(),
                started.elapsed().as_millis() as u64,
            );

            Ok::<_, GenerationError>(Generated { plan, source })
        }
        .instrument(span)
        .await
    }

    /// Plan seven consecutive days starting at `today`
    pub async fn generate_weekly(
        &self,
        context: &WeeklyPromptContext,
        today: NaiveDate,
    ) -> Result<Generated<WeeklyPlan>, GenerationError> {
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!("generate_weekly", request.id = %request_id);

        async {
            let started = Instant::now();
            let request = validation::validate_weekly(context, today).map_err(|e| {
                AppLogger::log_validation_failure(&request_id, "weekly", &e.to_string());
                e
            })?;

            let (plan, source) = if self.settings.mock_mode {
                (self.mock_weekly(&request, today), PlanSource::Mock)
            } else {
                match self.live_weekly(&request_id, &request, today).await {
                    Ok(plan) => (plan, PlanSource::Backend),
                    Err(error) => (
                        self.fall_back(error, || self.mock_weekly(&request, today))?,
                        PlanSource::Fallback,
                    ),
                }
            };

            let exercise_count = plan.workouts.iter().map(|w| w.scheduled_exercises.len()).sum();
            AppLogger::log_generation_event(
                &request_id,
                PlanKind::Weekly.as_str(),
                source.as_str(),
                "WEEK",
                exercise_count,
                started.elapsed().as_millis() as u64,
            );

            Ok::<_, GenerationError>(Generated { plan, source })
        }
        .instrument(span)
        .await
    }

    fn mock_daily(&self, request: &ValidDaily<'_>, today: NaiveDate) -> DailyWorkout {
        mock::daily_plan(request, today, self.settings.default_duration_minutes)
    }

    fn mock_weekly(&self, request: &ValidWeekly<'_>, today: NaiveDate) -> WeeklyPlan {
        mock::weekly_plan(request, today, self.settings.default_duration_minutes)
    }

    /// Apply the failure policy. Only an unavailable backend may fall back;
    /// malformed replies always surface.
    fn fall_back<T>(&self, error: GenerationError, mock: impl FnOnce() -> T) -> Result<T, GenerationError> {
        match (&error, self.settings.on_backend_failure) {
            (GenerationError::BackendUnavailable(detail), BackendFailurePolicy::FallbackToMock) => {
                warn!(reason = %detail, "Generation backend unavailable, serving mock plan");
                Ok(mock())
            }
            _ => {
                warn!(error = %error, "Plan generation failed");
                Err(error)
            }
        }
    }

    fn require_backend(&self) -> Result<&Arc<dyn GenerationBackend>, GenerationError> {
        self.backend.as_ref().ok_or_else(|| {
            GenerationError::BackendUnavailable("no generation backend configured".to_string())
        })
    }

    async fn live_daily(
        &self,
        request_id: &str,
        request: &ValidDaily<'_>,
    ) -> Result<DailyWorkout, GenerationError> {
        let backend = self.require_backend()?;

        let query = format!(
            "{} workout exercise programming training principles",
            request.sport_type
        );
        let knowledge = self
            .knowledge_snippets(&query, Some(request.sport_type.as_str()))
            .await;

        let generation = GenerationRequest {
            request_id: request_id.to_string(),
            kind: PlanKind::Daily,
            prompt: prompts::daily_prompt(request, &knowledge),
        };

        let value = backend.generate(&generation).await?;
        validation::parse_daily_plan(value)
    }

    async fn live_weekly(
        &self,
        request_id: &str,
        request: &ValidWeekly<'_>,
        today: NaiveDate,
    ) -> Result<WeeklyPlan, GenerationError> {
        let backend = self.require_backend()?;

        let dates: Vec<String> = (0..7)
            .map(|offset| (today + Duration::days(offset)).format("%Y-%m-%d").to_string())
            .collect();
        let knowledge = self.knowledge_snippets(WEEKLY_KNOWLEDGE_QUERY, None).await;

        let generation = GenerationRequest {
            request_id: request_id.to_string(),
            kind: PlanKind::Weekly,
            prompt: prompts::weekly_prompt(request, &dates, &knowledge),
        };

        let value = backend.generate(&generation).await?;
        validation::parse_weekly_plan(value, today)
    }

    /// Prompt augmentation is best effort; lookup failures only cost the snippets
    async fn knowledge_snippets(&self, query: &str, sport_type: Option<&str>) -> Vec<KnowledgeHit> {
        let Some(knowledge) = &self.knowledge else {
            return Vec::new();
        };

        match knowledge.search(query, sport_type, self.settings.knowledge_limit).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(error = %e, knowledge.source = knowledge.name(), "Knowledge lookup failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubBackend {
        reply: Result<Value, GenerationError>,
        calls: AtomicUsize,
    }

    impl StubBackend {
        fn new(reply: Result<Value, GenerationError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl GenerationBackend for StubBackend {
        async fn generate(&self, _request: &GenerationRequest) -> Result<Value, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }

        fn name(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub-model"
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 29).unwrap()
    }

    fn strength_context() -> PromptContext {
        serde_json::from_value(json!({
            "user_profile": {"age": 30, "gender": "MALE"},
            "user_preferences": {"experienceLevel": "BEGINNER"},
            "daily_focus": {
                "day_date": "2025-06-29",
                "focus_sport_type_for_the_day": "STRENGTH",
                "target_total_duration_minutes": 45
            }
        }))
        .unwrap()
    }

    fn live_settings(policy: BackendFailurePolicy) -> GeneratorSettings {
        GeneratorSettings {
            mock_mode: false,
            on_backend_failure: policy,
            ..GeneratorSettings::default()
        }
    }

    #[tokio::test]
    async fn test_mock_mode_never_calls_backend() {
        let backend = StubBackend::new(Err(GenerationError::BackendUnavailable("down".into())));
        let generator = WorkoutPlanGenerator::new(GeneratorSettings::default())
            .with_backend(Some(backend.clone()));

        let generated = generator.generate_daily(&strength_context(), today()).await.unwrap();
        assert_eq!(generated.source, PlanSource::Mock);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_backend_plan_is_passed_through() {
        let backend = StubBackend::new(Ok(json!({
            "daily_workout": {
                "day_date": "2025-06-29",
                "focus_sport_type_for_the_day": "STRENGTH",
                "scheduled_exercises": [{
                    "sequence_order": 1,
                    "exercise_name": "Goblet Squat",
                    "description": "Hold a weight at the chest and squat.",
                    "applicable_sport_types": ["STRENGTH"],
                    "muscle_groups_primary": ["Quadriceps"],
                    "muscle_groups_secondary": ["Glutes"],
                    "equipment_needed": ["KETTLEBELL"],
                    "difficulty": "Beginner",
                    "prescribed_sets_reps_duration": "3 sets of 10 reps",
                    "voice_script_cue_text": "Elbows inside the knees.",
                    "video_url": null
                }],
                "markdown_content": "# Strength"
            }
        })));
        let generator = WorkoutPlanGenerator::new(live_settings(BackendFailurePolicy::Fail))
            .with_backend(Some(backend.clone()));

        let generated = generator.generate_daily(&strength_context(), today()).await.unwrap();
        assert_eq!(generated.source, PlanSource::Backend);
        assert_eq!(generated.plan.scheduled_exercises[0].exercise_name, "Goblet Squat");
        assert_eq!(generated.plan.target_total_duration_minutes, Some(45));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unavailable_backend_follows_policy() {
        let down = || StubBackend::new(Err(GenerationError::BackendUnavailable("timeout".into())));

        let generator = WorkoutPlanGenerator::new(live_settings(BackendFailurePolicy::Fail))
            .with_backend(Some(down()));
        let err = generator.generate_daily(&strength_context(), today()).await.unwrap_err();
        assert!(matches!(err, GenerationError::BackendUnavailable(_)));

        let generator = WorkoutPlanGenerator::new(live_settings(BackendFailurePolicy::FallbackToMock))
            .with_backend(Some(down()));
        let generated = generator.generate_daily(&strength_context(), today()).await.unwrap();
        assert_eq!(generated.source, PlanSource::Fallback);
        assert_eq!(generated.plan.scheduled_exercises.len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_reply_never_falls_back() {
        let backend = StubBackend::new(Ok(json!({"daily_workout": {"day_date": "2025-06-29"}})));
        let generator = WorkoutPlanGenerator::new(live_settings(BackendFailurePolicy::FallbackToMock))
            .with_backend(Some(backend));

        let err = generator.generate_daily(&strength_context(), today()).await.unwrap_err();
        assert!(matches!(err, GenerationError::MalformedBackendResponse(_)));
    }

    #[tokio::test]
    async fn test_live_mode_without_backend() {
        let generator = WorkoutPlanGenerator::new(live_settings(BackendFailurePolicy::Fail));
        let err = generator.generate_daily(&strength_context(), today()).await.unwrap_err();
        assert!(matches!(err, GenerationError::BackendUnavailable(_)));

        let generator = WorkoutPlanGenerator::new(live_settings(BackendFailurePolicy::FallbackToMock));
        let weekly: WeeklyPromptContext =
            serde_json::from_value(json!({"user_profile": {"age": 52}})).unwrap();
        let generated = generator.generate_weekly(&weekly, today()).await.unwrap();
        assert_eq!(generated.source, PlanSource::Fallback);
        assert_eq!(generated.plan.workouts.len(), 7);
    }

    #[test]
    fn test_from_config() {
        let mut config = ServerConfig::default();
        config.knowledge.enabled = false;
        let generator = WorkoutPlanGenerator::from_config(&config).unwrap();
        assert!(generator.backend().is_none());
        assert!(generator.knowledge().is_none());
        assert!(generator.settings().mock_mode);

        config.knowledge.enabled = true;
        config.backend.kind = crate::config::BackendKind::Ollama;
        let generator = WorkoutPlanGenerator::from_config(&config).unwrap();
        assert_eq!(generator.backend().map(|b| b.name()), Some("ollama"));
        assert!(generator.knowledge().is_some());
    }

    #[tokio::test]
    async fn test_invalid_request_fails_before_backend() {
        let backend = StubBackend::new(Err(GenerationError::BackendUnavailable("down".into())));
        let generator = WorkoutPlanGenerator::new(live_settings(BackendFailurePolicy::Fail))
            .with_backend(Some(backend.clone()));

        let context: PromptContext =
            serde_json::from_value(json!({"user_profile": {"age": 30}})).unwrap();
        let err = generator.generate_daily(&context, today()).await.unwrap_err();
        assert_eq!(err, GenerationError::missing("daily_focus"));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }
}
