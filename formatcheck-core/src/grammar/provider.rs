//! Spell/grammar provider boundary
//!
//! Wire shape follows the LanguageTool `/v2/check` response. Only the fields
//! the filter reads are modelled; everything else is ignored on decode.

use crate::error::ProviderError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MatchContext {
    pub text: String,
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MatchRule {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Replacement {
    pub value: String,
}

/// One issue reported by the provider. Offsets count UTF-16 code units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProviderMatch {
    pub message: String,
    pub offset: usize,
    pub length: usize,
    #[serde(default)]
    pub context: MatchContext,
    #[serde(default)]
    pub rule: MatchRule,
    #[serde(default)]
    pub replacements: Vec<Replacement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CheckResponse {
    #[serde(default)]
    pub matches: Vec<ProviderMatch>,
}

pub trait GrammarProvider {
    /// One blocking request for one paragraph of text
    fn check(&self, text: &str, language: &str) -> Result<Vec<ProviderMatch>, ProviderError>;

    fn name(&self) -> &str;
}

#[cfg(feature = "languagetool")]
pub use languagetool::LanguageToolProvider;

#[cfg(feature = "languagetool")]
mod languagetool {
    use super::{CheckResponse, GrammarProvider, ProviderMatch};
    use crate::error::ProviderError;
    use std::time::Duration;

    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// LanguageTool HTTP API client (public endpoint or a self-hosted server)
    pub struct LanguageToolProvider {
        endpoint: String,
        agent: ureq::Agent,
    }

    impl LanguageToolProvider {
        pub fn new(endpoint: &str) -> Self {
            let agent = ureq::AgentBuilder::new()
                .timeout_connect(REQUEST_TIMEOUT)
                .timeout_read(REQUEST_TIMEOUT)
                .build();
            Self {
                endpoint: endpoint.to_string(),
                agent,
            }
        }

        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }
    }

    impl GrammarProvider for LanguageToolProvider {
        fn check(&self, text: &str, language: &str) -> Result<Vec<ProviderMatch>, ProviderError> {
            let response = self
                .agent
                .post(&self.endpoint)
                .send_form(&[("text", text), ("language", language)]);

            match response {
                Ok(resp) => {
                    let body: CheckResponse = resp
                        .into_json()
                        .map_err(|e| ProviderError::Decode(e.to_string()))?;
                    Ok(body.matches)
                }
                Err(ureq::Error::Status(code, _)) => Err(ProviderError::Status(code)),
                Err(e) => Err(ProviderError::Transport(e.to_string())),
            }
        }

        fn name(&self) -> &str {
            "LanguageTool"
        }
    }
}
