//! OAuth token pairs for the wellness providers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Third-party wellness API a user can authorise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WellnessProvider {
    Oura,
    Fitbit,
}

impl WellnessProvider {
    pub fn name(self) -> &'static str {
        match self {
            WellnessProvider::Oura => "oura",
            WellnessProvider::Fitbit => "fitbit",
        }
    }

    /// Human-readable name used in responses.
    pub fn display_name(self) -> &'static str {
        match self {
            WellnessProvider::Oura => "Oura",
            WellnessProvider::Fitbit => "Fitbit",
        }
    }
}

impl fmt::Display for WellnessProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Access/refresh token pair returned by a provider's token endpoint.
///
/// Held in memory only. There is no expiry tracking; a stale token simply
/// makes the next upstream call fail.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for ProviderTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderTokens")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
