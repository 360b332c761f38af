//! Axum route handlers for the recommendation form and API.

use axum::{extract::State, response::Html, Form, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{OrganizationProfile, ProfileForm};
use crate::recommendation::pipeline::recommend;
use crate::recommendation::render::{render_page, Outcome, PageView};
use crate::recommendation::segmenter::RecommendationBlock;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub submission_id: Uuid,
    pub model: String,
    pub generated_at: DateTime<Utc>,
    pub recommendations: Vec<RecommendationBlock>,
}

/// GET /
///
/// Empty form with default choices.
pub async fn handle_form(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&PageView {
        profile: &OrganizationProfile::default(),
        completion_configured: state.completion_configured(),
        outcome: Outcome::Idle,
    }))
}

/// POST /
///
/// Form submission. Every failure is rendered inline on the page; output from an
/// earlier submission is never carried over.
pub async fn handle_submit(
    State(state): State<AppState>,
    Form(form): Form<ProfileForm>,
) -> Html<String> {
    let completion_configured = state.completion_configured();

    let Some(profile) = form.clone().collect() else {
        return Html(render_page(&PageView {
            profile: &form.into_profile(),
            completion_configured,
            outcome: Outcome::Idle,
        }));
    };

    let Some(llm) = state.llm.as_deref() else {
        warn!("Submission ignored: GEMINI_API_KEY is not configured");
        return Html(render_page(&PageView {
            profile: &profile,
            completion_configured,
            outcome: Outcome::Idle,
        }));
    };

    let submission_id = Uuid::new_v4();
    let html = match recommend(submission_id, &profile, llm).await {
        Ok(blocks) => render_page(&PageView {
            profile: &profile,
            completion_configured,
            outcome: Outcome::Recommended {
                model: llm.model_name(),
                blocks: &blocks,
            },
        }),
        Err(e) => {
            let message = AppError::from(e).to_string();
            render_page(&PageView {
                profile: &profile,
                completion_configured,
                outcome: Outcome::Failed(&message),
            })
        }
    };

    Html(html)
}

/// POST /api/v1/recommendations
///
/// JSON variant of the form: profile in, segmented recommendations out.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(profile): Json<OrganizationProfile>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let llm = state.llm.as_deref().ok_or(AppError::ConfigurationMissing)?;

    let submission_id = Uuid::new_v4();
    let recommendations = recommend(submission_id, &profile, llm).await?;

    Ok(Json(RecommendationResponse {
        submission_id,
        model: llm.model_name().to_string(),
        generated_at: Utc::now(),
        recommendations,
    }))
}
