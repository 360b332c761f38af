// Control recommendations.
// Implements: prompt construction, response segmentation, card rendering, handlers.
// All completion calls go through llm_client — no direct Gemini calls here.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod render;
pub mod segmenter;
