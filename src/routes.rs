// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! HTTP routes of the workout worker

use crate::config::HttpConfig;
use crate::constants::{defaults, service};
use crate::errors::{ErrorResponse, GenerationError};
use crate::health::{middleware, HealthChecker};
use crate::knowledge::KnowledgeHit;
use crate::logging::AppLogger;
use crate::models::{DailyResponse, PromptContext, WeeklyPromptContext};
use crate::planner::WorkoutPlanGenerator;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::error;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// Largest accepted request body
const MAX_BODY_BYTES: u64 = 256 * 1024;

/// Shared state handed to every route
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<WorkoutPlanGenerator>,
    pub health: Arc<HealthChecker>,
    pub http: HttpConfig,
}

impl AppState {
    pub fn new(generator: WorkoutPlanGenerator, http: HttpConfig) -> Self {
        let health = Arc::new(HealthChecker::new(&generator));
        Self {
            generator: Arc::new(generator),
            health,
            http,
        }
    }
}

/// Query string of `GET /knowledge/search`
#[derive(Debug, Deserialize)]
pub struct KnowledgeQuery {
    pub query: String,
    #[serde(default)]
    pub sport_type: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct KnowledgeSearchResponse {
    pub query: String,
    pub sport_type: Option<String>,
    pub service: String,
    pub results: Vec<KnowledgeHit>,
}

/// All routes, with CORS, request logging and error mapping applied
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let cors = cors(&state.http.cors_origins);
    let authorized = authorization(state.http.require_authorization);

    let generate = warp::path("generate")
        .and(warp::path::end())
        .and(warp::post())
        .and(authorized.clone())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_generator(state.generator.clone()))
        .and_then(generate_handler);

    let generate_weekly = warp::path("generate-weekly")
        .and(warp::path::end())
        .and(warp::post())
        .and(authorized.clone())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_generator(state.generator.clone()))
        .and_then(generate_weekly_handler);

    let knowledge_search = warp::path!("knowledge" / "search")
        .and(warp::get())
        .and(authorized)
        .and(warp::query::<KnowledgeQuery>())
        .and(with_generator(state.generator.clone()))
        .and_then(knowledge_search_handler);

    let request_log = warp::log::custom(|info| {
        AppLogger::log_api_request(
            info.method().as_str(),
            info.path(),
            info.status().as_u16(),
            info.elapsed().as_millis() as u64,
        );
    });

    middleware::routes(state.health.clone())
        .or(generate)
        .or(generate_weekly)
        .or(knowledge_search)
        .with(cors)
        .recover(handle_rejection)
        .with(request_log)
}

fn cors(origins: &[String]) -> warp::cors::Builder {
    let builder = warp::cors()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST", "OPTIONS"]);

    if origins.iter().any(|origin| origin == "*") {
        builder.allow_any_origin()
    } else {
        builder.allow_origins(origins.iter().map(String::as_str))
    }
}

/// Requires a non-empty Authorization header when the policy asks for one.
/// The credential itself is checked upstream by the API gateway.
fn authorization(required: bool) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and_then(move |header: Option<String>| async move {
            let present = header.as_deref().is_some_and(|value| !value.trim().is_empty());
            if required && !present {
                AppLogger::log_security_event(
                    "missing_authorization",
                    "low",
                    "Request rejected without Authorization header",
                );
                return Err(warp::reject::custom(GenerationError::Unauthorized));
            }
            Ok(())
        })
        .untuple_one()
}

fn with_generator(
    generator: Arc<WorkoutPlanGenerator>,
) -> impl Filter<Extract = (Arc<WorkoutPlanGenerator>,), Error = Infallible> + Clone {
    warp::any().map(move || generator.clone())
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

async fn generate_handler(
    context: PromptContext,
    generator: Arc<WorkoutPlanGenerator>,
) -> Result<impl Reply, Rejection> {
    let generated = generator
        .generate_daily(&context, today())
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::json(&DailyResponse {
        daily_workout: generated.plan,
    }))
}

async fn generate_weekly_handler(
    context: WeeklyPromptContext,
    generator: Arc<WorkoutPlanGenerator>,
) -> Result<impl Reply, Rejection> {
    let generated = generator
        .generate_weekly(&context, today())
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::json(&generated.plan))
}

async fn knowledge_search_handler(
    params: KnowledgeQuery,
    generator: Arc<WorkoutPlanGenerator>,
) -> Result<impl Reply, Rejection> {
    let knowledge = generator
        .knowledge()
        .ok_or_else(|| warp::reject::custom(GenerationError::KnowledgeBaseUnavailable))?;

    let limit = params
        .limit
        .unwrap_or(generator.settings().knowledge_limit)
        .min(defaults::KNOWLEDGE_MAX_LIMIT);

    let results = knowledge
        .search(&params.query, params.sport_type.as_deref(), limit)
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::json(&KnowledgeSearchResponse {
        query: params.query,
        sport_type: params.sport_type,
        service: service::KNOWLEDGE_SERVICE_NAME.to_string(),
        results,
    }))
}

fn error_reply(
    status: StatusCode,
    error: &str,
    message: impl Into<String>,
) -> warp::reply::WithStatus<warp::reply::Json> {
    let body = ErrorResponse {
        error: error.to_string(),
        message: message.into(),
    };
    warp::reply::with_status(warp::reply::json(&body), status)
}

/// Map rejections to `{error, message}` bodies
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    if let Some(generation_error) = err.find::<GenerationError>() {
        let status = generation_error.status_code();
        if status.is_server_error() {
            error!(error = %generation_error, "Request failed");
        }
        let body = ErrorResponse::from(generation_error);
        return Ok(warp::reply::with_status(warp::reply::json(&body), status));
    }

    let reply = if err.is_not_found() {
        error_reply(
            StatusCode::NOT_FOUND,
            "not_found",
            "The requested endpoint was not found",
        )
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        error_reply(StatusCode::BAD_REQUEST, "invalid_body", e.to_string())
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        error_reply(
            StatusCode::BAD_REQUEST,
            "invalid_query",
            "The 'query' parameter is required",
        )
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        error_reply(
            StatusCode::PAYLOAD_TOO_LARGE,
            "payload_too_large",
            "Request body is too large",
        )
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        error_reply(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "unsupported_media_type",
            "Request body must be JSON",
        )
    } else if let Some(e) = err.find::<warp::cors::CorsForbidden>() {
        error_reply(StatusCode::FORBIDDEN, "cors_forbidden", e.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        error_reply(
            StatusCode::METHOD_NOT_ALLOWED,
            "method_not_allowed",
            "Method not allowed for this endpoint",
        )
    } else {
        error!(rejection = ?err, "Unhandled rejection");
        error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "Something went wrong",
        )
    };

    Ok(reply)
}
