//! Recommendation pipeline — one submission end to end.
//!
//! Flow: build_prompt → completion call → trim → segment.
//!
//! Stateless: nothing is carried between submissions. A failed completion call
//! ends the run with no blocks; there is no retry.

use tracing::{info, warn};
use uuid::Uuid;

use crate::llm_client::{CompletionClient, LlmError};
use crate::models::profile::OrganizationProfile;
use crate::recommendation::prompts::build_prompt;
use crate::recommendation::segmenter::{segment, RecommendationBlock};

/// Runs the pipeline for one profile.
pub async fn recommend(
    submission_id: Uuid,
    profile: &OrganizationProfile,
    llm: &dyn CompletionClient,
) -> Result<Vec<RecommendationBlock>, LlmError> {
    let prompt = build_prompt(profile);

    info!(
        %submission_id,
        model = llm.model_name(),
        prompt_chars = prompt.len(),
        "Requesting control recommendations"
    );

    let raw = llm.complete(&prompt).await.map_err(|e| {
        warn!(%submission_id, "Completion call failed: {e}");
        e
    })?;

    let blocks = segment(raw.trim());

    info!(%submission_id, blocks = blocks.len(), "Segmented completion");

    Ok(blocks)
}
