// Prompt construction for control recommendations.
// Reuses cross-cutting output rules from llm_client::prompts.

use crate::llm_client::prompts::{NO_MARKUP_INSTRUCTION, NO_PREAMBLE_INSTRUCTION};
use crate::models::profile::OrganizationProfile;

/// Builds the recommendation prompt for a profile.
///
/// Free-text fields are interpolated as-is. The text only ever reaches the model,
/// so no escaping is applied here.
pub fn build_prompt(profile: &OrganizationProfile) -> String {
    format!(
        r#"You are an ISO 27001:2022 compliance assistant.

Given the following organization profile, recommend 3-5 relevant ISO 27001:2022 Annex A controls.

Context:
Industry: {industry}
Data Sensitivity: {sensitivity}
Key Risks: {risks}
Gaps: {gaps}
Maturity Level: {maturity}

Respond with one text block per control, using this EXACT structure for every control:
1. A.<control number> – <Control Title>
   • Section 1 - Why it's relevant: why this control matters for the organization above.
   • Section 2 - Suggested action: one concrete implementation step.
   • Section 3 - Available controls: the best-fit tools, vendors or products on the market, as bullet points, each with a short justification.
---

HARD RULES:
1. Number the controls 1, 2, 3 and so on. Start every control with its number, a period, a space, then the Annex A identifier (e.g. "2. A.8.7 – Protection against malware").
2. Every control MUST contain all three sections, in order.
3. {no_markup}
4. {no_preamble}"#,
        industry = profile.industry,
        sensitivity = profile.sensitivity,
        risks = profile.risks,
        gaps = profile.gaps,
        maturity = profile.maturity,
        no_markup = NO_MARKUP_INSTRUCTION,
        no_preamble = NO_PREAMBLE_INSTRUCTION,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{Maturity, Sensitivity};

    fn fintech() -> OrganizationProfile {
        OrganizationProfile {
            industry: "Fintech".to_string(),
            sensitivity: Sensitivity::High,
            risks: "phishing, insider threat".to_string(),
            gaps: "no vendor risk management".to_string(),
            maturity: Maturity::Basic,
        }
    }

    #[test]
    fn test_prompt_interpolates_all_fields() {
        let prompt = build_prompt(&fintech());
        assert!(prompt.contains("Industry: Fintech\n"));
        assert!(prompt.contains("Data Sensitivity: High\n"));
        assert!(prompt.contains("Key Risks: phishing, insider threat\n"));
        assert!(prompt.contains("Gaps: no vendor risk management\n"));
        assert!(prompt.contains("Maturity Level: Basic\n"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build_prompt(&fintech()), build_prompt(&fintech()));
    }

    #[test]
    fn test_prompt_carries_structure_and_output_rules() {
        let prompt = build_prompt(&fintech());
        assert!(prompt.contains("3-5"));
        assert!(prompt.contains("Section 1 - Why it's relevant"));
        assert!(prompt.contains("Section 2 - Suggested action"));
        assert!(prompt.contains("Section 3 - Available controls"));
        assert!(prompt.contains(NO_MARKUP_INSTRUCTION));
        assert!(prompt.contains(NO_PREAMBLE_INSTRUCTION));
    }

    #[test]
    fn test_empty_free_text_still_builds() {
        let profile = OrganizationProfile {
            risks: String::new(),
            gaps: String::new(),
            ..fintech()
        };
        let prompt = build_prompt(&profile);
        assert!(prompt.contains("Key Risks: \n"));
        assert!(prompt.contains("Gaps: \n"));
    }

    #[test]
    fn test_free_text_is_not_escaped_or_reinterpolated() {
        let profile = OrganizationProfile {
            industry: "<b>{risks}</b>".to_string(),
            ..fintech()
        };
        let prompt = build_prompt(&profile);
        assert!(prompt.contains("Industry: <b>{risks}</b>\n"));
    }
}
