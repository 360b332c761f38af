// Shared prompt fragments.
// Each feature that calls the completion service defines its own prompts.rs alongside it;
// this file holds the cross-cutting output rules.

/// Output rule forbidding raw HTML in the response.
pub const NO_MARKUP_INSTRUCTION: &str = "Do NOT use HTML tags such as <div> or <hr>. \
    To separate one control from the next, write a line containing only ---";

/// Output rule forbidding text outside the per-control blocks.
pub const NO_PREAMBLE_INSTRUCTION: &str = "Do NOT include any introduction, summary, \
    or closing remarks. Start directly with the first control and stop after the last one.";
