//! # Arbitration Router
//!
//! Tries each configured provider strictly in order until one returns a
//! valid analysis. Ordering is data (the configured list), not types:
//! adding a provider is a configuration change, not a code change.
//!
//! Every failure mode advances the chain identically. A transport error, a
//! timeout, a non-2xx status, and a schema-invalid response all mean "this
//! provider did not produce a usable analysis"; there is no same-provider
//! retry. Only when the whole chain is exhausted does the router fail, with
//! per-provider reasons attached.

use tracing::{info, warn};

use fairwork_core::AiAnalysis;

use crate::error::{ArbiterError, ProviderFailure};
use crate::prompt::{build_prompt, CaseEvidence};
use crate::provider::{Provider, ProviderConfig};
use crate::validate::parse_analysis;

/// Ordered multi-provider arbitration.
#[derive(Debug)]
pub struct ArbitrationRouter {
    providers: Vec<Provider>,
}

impl ArbitrationRouter {
    /// Build a router over an ordered provider list.
    ///
    /// # Errors
    ///
    /// Returns [`ArbiterError::NotConfigured`] for an empty list or an
    /// unusable provider configuration.
    pub fn new(configs: Vec<ProviderConfig>) -> Result<Self, ArbiterError> {
        if configs.is_empty() {
            return Err(ArbiterError::NotConfigured {
                reason: "at least one provider is required".into(),
            });
        }
        let providers = configs
            .into_iter()
            .map(Provider::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { providers })
    }

    /// Provider names in attempt order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(Provider::name).collect()
    }

    /// Analyze a case, falling through the provider chain on failure.
    ///
    /// # Errors
    ///
    /// Returns [`ArbiterError::Unavailable`] when every provider has
    /// failed, with one reason per attempt.
    pub async fn analyze(&self, case: &CaseEvidence) -> Result<AiAnalysis, ArbiterError> {
        let prompt = build_prompt(case);
        let mut attempts = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let outcome = provider
                .complete(&prompt)
                .await
                .and_then(|content| parse_analysis(&content));
            match outcome {
                Ok(analysis) => {
                    info!(
                        provider = provider.name(),
                        recommendation = analysis.recommendation().as_str(),
                        confidence = analysis.confidence(),
                        "arbitration analysis produced"
                    );
                    return Ok(analysis);
                }
                Err(reason) => {
                    warn!(
                        provider = provider.name(),
                        %reason,
                        "arbitration provider failed, advancing"
                    );
                    attempts.push(ProviderFailure {
                        provider: provider.name().to_string(),
                        reason,
                    });
                }
            }
        }
        Err(ArbiterError::Unavailable { attempts })
    }
}
