// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # FlexFit GenAI Workout Worker
//!
//! An HTTP service that turns a user's profile, preferences, recent training
//! history and daily focus into structured workout plans. Plans come either
//! from a language-model backend or from deterministic local synthesis.
//!
//! ## Features
//!
//! - **Daily and weekly plans**: one day, or seven consecutive days with a rest day
//! - **Mock synthesis**: reproducible plans from a curated exercise catalog
//! - **Live backends**: OpenAI-compatible chat completions or a local Ollama
//! - **Knowledge base**: evidence-based training snippets for prompts and search
//! - **Failure policy**: fail fast or fall back to mock plans when a backend is down
//!
//! ## Architecture
//!
//! - **Models**: request context and workout plan data structures
//! - **Validation**: request checks and backend reply shape checks
//! - **Planner**: generation flow, exercise catalog and mock synthesis
//! - **Backend**: generation backends and prompt construction
//! - **Routes**: warp HTTP surface with authorization and error mapping
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use flexfit_genai_worker::models::PromptContext;
//! use flexfit_genai_worker::planner::{GeneratorSettings, WorkoutPlanGenerator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let context: PromptContext = serde_json::from_value(serde_json::json!({
//!         "user_profile": {"age": 30},
//!         "user_preferences": {"experienceLevel": "BEGINNER"},
//!         "daily_focus": {"focus_sport_type_for_the_day": "STRENGTH"}
//!     }))?;
//!
//!     let generator = WorkoutPlanGenerator::new(GeneratorSettings::default());
//!     let today = chrono::Local::now().date_naive();
//!     let generated = generator.generate_daily(&context, today).await?;
//!     println!("{}", generated.plan.markdown_content);
//!
//!     Ok(())
//! }
//! ```

/// Generation backends and prompt construction
pub mod backend;

/// Configuration management and persistence
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Error kinds and their HTTP mapping
pub mod errors;

/// Health checks and monitoring
pub mod health;

/// Built-in fitness knowledge base
pub mod knowledge;

/// Production logging and structured output
pub mod logging;

/// Request and workout plan data models
pub mod models;

/// Plan generation and mock synthesis
pub mod planner;

/// HTTP routes for plan generation and knowledge search
pub mod routes;

/// Request validation and backend reply checks
pub mod validation;
