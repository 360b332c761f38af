use std::fmt;

use serde::{Deserialize, Serialize};

/// How sensitive the data the organization handles is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sensitivity {
    #[default]
    Low,
    Medium,
    High,
}

impl Sensitivity {
    pub const ALL: [Sensitivity; 3] = [Sensitivity::Low, Sensitivity::Medium, Sensitivity::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sensitivity::Low => "Low",
            Sensitivity::Medium => "Medium",
            Sensitivity::High => "High",
        }
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-assessed security maturity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Maturity {
    #[default]
    Basic,
    Intermediate,
    Advanced,
}

impl Maturity {
    pub const ALL: [Maturity; 3] = [Maturity::Basic, Maturity::Intermediate, Maturity::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Maturity::Basic => "Basic",
            Maturity::Intermediate => "Intermediate",
            Maturity::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Maturity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The organization context for one submission.
///
/// Free-text fields are kept verbatim: no trimming, no case folding, empty is allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationProfile {
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub sensitivity: Sensitivity,
    /// Comma-separated by convention only; never split.
    #[serde(default)]
    pub risks: String,
    #[serde(default)]
    pub gaps: String,
    #[serde(default)]
    pub maturity: Maturity,
}

/// Raw form post. `submit` is only present when the submit button was pressed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub sensitivity: Sensitivity,
    #[serde(default)]
    pub risks: String,
    #[serde(default)]
    pub gaps: String,
    #[serde(default)]
    pub maturity: Maturity,
    pub submit: Option<String>,
}

impl ProfileForm {
    /// Returns the profile once the submit action has been triggered, `None` before.
    pub fn collect(self) -> Option<OrganizationProfile> {
        self.submit.is_some().then(|| self.into_profile())
    }

    /// The field values as posted, whether or not the form was submitted.
    pub fn into_profile(self) -> OrganizationProfile {
        OrganizationProfile {
            industry: self.industry,
            sensitivity: self.sensitivity,
            risks: self.risks,
            gaps: self.gaps,
            maturity: self.maturity,
        }
    }
}
