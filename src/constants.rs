// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Service identity, configuration defaults and the token vocabularies shared
//! with the rest of the FlexFit platform.

/// Service identity reported by health checks and logs
pub mod service {
    /// Service name
    pub const SERVICE_NAME: &str = "genai-workout-worker";

    /// Service version from Cargo.toml
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Service name reported by the knowledge search route
    pub const KNOWLEDGE_SERVICE_NAME: &str = "flexfit-knowledge-base";
}

/// Default configuration values
pub mod defaults {
    pub const HOST: &str = "0.0.0.0";

    pub const HTTP_PORT: u16 = 8000;

    /// Target duration when neither the request nor the preferences carry one
    pub const DURATION_MINUTES: i64 = 45;

    /// Upper bound for one backend call, matching the hosted endpoint's budget
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 90;

    pub const KNOWLEDGE_LIMIT: usize = 5;

    /// Hard cap on `limit` for knowledge searches
    pub const KNOWLEDGE_MAX_LIMIT: usize = 20;

    /// Hosted Open WebUI endpoint; `/chat/completions` is appended
    pub const OPENAI_BASE_URL: &str = "https://gpu.aet.cit.tum.de/api";

    pub const OPENAI_MODEL: &str = "llama3.3:latest";

    pub const OLLAMA_HOST: &str = "http://localhost:11434";

    pub const OLLAMA_MODEL: &str = "llama3";
}

/// Environment variable names
pub mod env_keys {
    pub const HOST: &str = "HOST";
    pub const PORT: &str = "PORT";
    pub const REQUIRE_AUTHORIZATION: &str = "REQUIRE_AUTHORIZATION";
    pub const CORS_ORIGINS: &str = "CORS_ORIGINS";
    pub const MOCK_MODE: &str = "MOCK_MODE";
    pub const ON_BACKEND_FAILURE: &str = "ON_BACKEND_FAILURE";
    pub const SPORT_TYPE_POLICY: &str = "SPORT_TYPE_POLICY";
    pub const DEFAULT_DURATION_MINUTES: &str = "DEFAULT_DURATION_MINUTES";
    pub const LLM_BACKEND: &str = "LLM_BACKEND";
    pub const LLM_BASE_URL: &str = "LLM_BASE_URL";
    pub const OLLAMA_HOST: &str = "OLLAMA_HOST";
    pub const CHAIR_API_KEY: &str = "CHAIR_API_KEY";
    pub const LLM_API_KEY: &str = "LLM_API_KEY";
    pub const MODEL_NAME: &str = "MODEL_NAME";
    pub const LLM_TIMEOUT_SECONDS: &str = "LLM_TIMEOUT_SECONDS";
    pub const KNOWLEDGE_BASE_ENABLED: &str = "KNOWLEDGE_BASE_ENABLED";
    pub const KNOWLEDGE_SEARCH_LIMIT: &str = "KNOWLEDGE_SEARCH_LIMIT";
}

/// Equipment tokens understood by the user service
pub mod equipment {
    pub const NO_EQUIPMENT: &str = "NO_EQUIPMENT";
    pub const YOGA_MAT: &str = "YOGA_MAT";
    pub const PULL_UP_BAR: &str = "PULL_UP_BAR";
    pub const JUMP_ROPE: &str = "JUMP_ROPE";
    pub const KETTLEBELL: &str = "KETTLEBELL";
    pub const FOAM_ROLLER: &str = "FOAM_ROLLER";
    pub const TREADMILL: &str = "TREADMILL";

    /// Every token, in the order presented to language models
    pub const ALL: &[&str] = &[
        NO_EQUIPMENT,
        "DUMBBELLS_PAIR_LIGHT",
        "DUMBBELLS_PAIR_MEDIUM",
        "DUMBBELLS_PAIR_HEAVY",
        "ADJUSTABLE_DUMBBELLS",
        KETTLEBELL,
        "BARBELL_WITH_PLATES",
        "RESISTANCE_BANDS_LIGHT",
        "RESISTANCE_BANDS_MEDIUM",
        "RESISTANCE_BANDS_HEAVY",
        PULL_UP_BAR,
        YOGA_MAT,
        FOAM_ROLLER,
        JUMP_ROPE,
        "BENCH_FLAT",
        "BENCH_ADJUSTABLE",
        "SQUAT_RACK",
        TREADMILL,
        "STATIONARY_BIKE",
        "ELLIPTICAL",
        "ROWING_MACHINE",
        "CABLE_MACHINE_FULL",
        "LEG_PRESS_MACHINE",
        "MEDICINE_BALL",
        "STABILITY_BALL",
    ];
}

/// Age thresholds of the difficulty step function
pub mod age_steps {
    /// From this age the target difficulty drops one rank
    pub const MATURE: i64 = 50;
    /// From this age the target difficulty drops two ranks
    pub const SENIOR: i64 = 65;
}
