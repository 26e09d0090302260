//! The fallback adapter every advisory call goes through.


use std::sync::Arc;

use annadata_core::{config::AdvisoryConfig, error::AnnadataError, traits::Provider};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::AdvisoryCache;
use crate::schema::Validate;
use crate::variants::Advisory;

/// Where an advisory output came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdviceSource {
    /// Fresh model output.
    Model {
        provider: String,
        model: Option<String>,
    },
    /// Earlier model output for an identical input.
    Cache,
    /// Static payload substituted after an upstream failure.
    Fallback { reason: String },
}

/// A shape-correct advisory output plus its provenance.
#[derive(Debug, Clone, Serialize)]
pub struct Advice<T> {
    pub output: T,
    pub source: AdviceSource,
}

impl<T> Advice<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, AdviceSource::Fallback { .. })
    }
}

/// Runs advisory variants against a provider.
#[derive(Clone)]
pub struct Advisor {
    provider: Arc<dyn Provider>,
    cache: Option<AdvisoryCache>,
}

impl Advisor {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            cache: None,
        }
    }

    pub fn from_config(provider: Arc<dyn Provider>, config: &AdvisoryConfig) -> Self {
        Self {
            provider,
            cache: AdvisoryCache::from_config(config),
        }
    }

    pub fn with_cache(mut self, cache: AdvisoryCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run an advisory, substituting the variant's fallback on any upstream
    /// failure. Only input validation errors are returned.
    pub async fn advise<A: Advisory>(
        &self,
        input: &A::Input,
    ) -> Result<Advice<A::Output>, AnnadataError> {
        input.validate()?;

        let key = self
            .cache
            .as_ref()
            .and_then(|_| AdvisoryCache::key(A::NAME, input));
        if let (Some(cache), Some(key)) = (self.cache.as_ref(), key.as_deref()) {
            if let Some(output) = cache.get::<A::Output>(key) {
                debug!("{}: served from cache", A::NAME);
                return Ok(Advice {
                    output,
                    source: AdviceSource::Cache,
                });
            }
        }

        match self.generate::<A>(input).await {
            Ok((output, source)) => {
                if let (Some(cache), Some(key)) = (self.cache.as_ref(), key) {
                    cache.insert(key, &output);
                }
                Ok(Advice { output, source })
            }
            Err(e) => {
                warn!("{}: upstream failed, using fallback: {e}", A::NAME);
                Ok(Advice {
                    output: A::fallback(),
                    source: AdviceSource::Fallback {
                        reason: e.to_string(),
                    },
                })
            }
        }
    }

    /// Run an advisory without the fallback: upstream failures are returned
    /// to the caller. Bypasses the cache.
    pub async fn try_advise<A: Advisory>(
        &self,
        input: &A::Input,
    ) -> Result<A::Output, AnnadataError> {
        input.validate()?;
        self.generate::<A>(input).await.map(|(output, _)| output)
    }

    /// One provider round trip: prompt, decode, check the output shape.
    async fn generate<A: Advisory>(
        &self,
        input: &A::Input,
    ) -> Result<(A::Output, AdviceSource), AnnadataError> {
        let prompt = A::prompt(input)?;
        let generation = self.provider.generate(&prompt).await?;

        let output: A::Output = generation.json().map_err(|e| {
            AnnadataError::Provider(format!("{}: malformed model output: {e}", A::NAME))
        })?;
        output.validate().map_err(|e| {
            AnnadataError::Provider(format!("{}: model output failed schema: {e}", A::NAME))
        })?;

        info!(
            "{}: answered by {} in {}ms",
            A::NAME,
            generation.metadata.provider_used,
            generation.metadata.processing_time_ms
        );
        Ok((
            output,
            AdviceSource::Model {
                provider: generation.metadata.provider_used,
                model: generation.metadata.model,
            },
        ))
    }
}
