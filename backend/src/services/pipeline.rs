//! Generic advisory pipeline
//!
//! Every advisory feature runs the same sequence:
//! gather input (farm ownership, readings) → build prompt → call the model →
//! extract the expected shape → persist → return.
//!
//! Ownership failures are returned as errors. Everything after gathering is
//! total: upstream failures and unparseable replies turn into the shape's
//! fallback value, and persistence failures are logged and swallowed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use shared::{
    build_prompt, extract, AdvisoryParams, AdvisoryResult, ExpectedShape, FallbackReason,
    GpsCoordinates, PromptText, ReadingBundle, ResultSource,
};

use crate::error::{AppError, AppResult};
use crate::external::{AiGateway, ImageInput};
use crate::services::farm::FarmDirectory;
use crate::services::readings::ReadingProvider;
use crate::services::store::{AdvisoryRecord, AdvisoryStore};

/// Who is asking, for which farm, and where
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub farm_id: Option<Uuid>,
    /// `None` when the request carries no coordinates (soil image uploads)
    pub location: Option<GpsCoordinates>,
}

/// Outcome of one advisory run
#[derive(Debug, Clone)]
pub struct AdvisoryRun<T> {
    pub result: T,
    pub readings: ReadingBundle,
    pub source: ResultSource,
    pub generated_at: DateTime<Utc>,
}

impl<T> AdvisoryRun<T> {
    pub fn is_fallback(&self) -> bool {
        self.source.is_fallback()
    }
}

/// Hex SHA-256 digest of a prompt
pub fn prompt_digest(prompt: &PromptText) -> String {
    format!("{:x}", Sha256::digest(prompt.as_str().as_bytes()))
}

/// Short failure summary shown in fallback messages.
///
/// Upstream errors read `<summary>: <detail>`; the detail (response bodies,
/// transport errors) stays in the logs.
fn upstream_detail(error: &AppError) -> String {
    let text = match error {
        AppError::UpstreamUnavailable(detail) | AppError::UpstreamConfig(detail) => detail.as_str(),
        _ => "unexpected error",
    };
    text.split(": ").next().unwrap_or(text).trim().to_string()
}

/// Shared state machine behind all advisory features
#[derive(Clone)]
pub struct AdvisoryPipeline {
    gateway: Arc<dyn AiGateway>,
    readings: Arc<dyn ReadingProvider>,
    farms: Arc<dyn FarmDirectory>,
    store: Arc<dyn AdvisoryStore>,
}

impl AdvisoryPipeline {
    pub fn new(
        gateway: Arc<dyn AiGateway>,
        readings: Arc<dyn ReadingProvider>,
        farms: Arc<dyn FarmDirectory>,
        store: Arc<dyn AdvisoryStore>,
    ) -> Self {
        Self {
            gateway,
            readings,
            farms,
            store,
        }
    }

    /// Verify farm ownership, then fetch the reading bundle
    pub async fn gather(&self, ctx: &RequestContext) -> AppResult<ReadingBundle> {
        if let Some(farm_id) = ctx.farm_id {
            if !self.farms.is_owned_by(farm_id, ctx.user_id).await? {
                tracing::warn!(%farm_id, user_id = %ctx.user_id, "Farm access denied");
                return Err(AppError::Forbidden(
                    "Farm not found or not owned by the caller".to_string(),
                ));
            }
        }

        Ok(match ctx.location {
            Some(location) => self.readings.readings(location).await,
            None => ReadingBundle::empty(GpsCoordinates::new(0.0, 0.0)),
        })
    }

    /// Gather input and run the model stages
    pub async fn run<S>(
        &self,
        shape: &S,
        ctx: &RequestContext,
        params: AdvisoryParams,
        image: Option<&ImageInput>,
    ) -> AppResult<AdvisoryRun<S::Output>>
    where
        S: ExpectedShape + Sync,
        S::Output: Clone + Into<AdvisoryResult> + Send,
    {
        let readings = self.gather(ctx).await?;
        Ok(self.complete(shape, ctx, params, readings, image).await)
    }

    /// Prompt, model call, extraction and persistence for gathered input
    pub async fn complete<S>(
        &self,
        shape: &S,
        ctx: &RequestContext,
        params: AdvisoryParams,
        readings: ReadingBundle,
        image: Option<&ImageInput>,
    ) -> AdvisoryRun<S::Output>
    where
        S: ExpectedShape + Sync,
        S::Output: Clone + Into<AdvisoryResult> + Send,
    {
        let feature = shape.feature();
        let prompt = build_prompt(&params, &readings);

        let (result, source) = match self.gateway.complete(&prompt, image).await {
            Ok(raw) => {
                tracing::debug!(%feature, reply = %raw, "Model reply received");
                match extract(&raw, shape) {
                    Ok(value) => (value, ResultSource::Model),
                    Err(e) => {
                        tracing::warn!(%feature, error = %e, "Model reply could not be extracted");
                        let reason = FallbackReason::Unparseable;
                        (shape.fallback(&reason), reason.source())
                    }
                }
            }
            Err(e) => {
                tracing::warn!(%feature, error = %e, "Model call failed, using fallback");
                let reason = FallbackReason::ServiceError(upstream_detail(&e));
                (shape.fallback(&reason), reason.source())
            }
        };

        let generated_at = Utc::now();

        if let Some(farm_id) = ctx.farm_id {
            if source.is_persistable() {
                let record = AdvisoryRecord {
                    farm_id,
                    user_id: ctx.user_id,
                    params,
                    // Requests without coordinates have no measured readings
                    readings: ctx.location.map(|_| readings),
                    result: result.clone().into(),
                    source,
                    prompt_sha256: prompt_digest(&prompt),
                    created_at: generated_at,
                };
                self.persist(&record).await;
            }
        }

        AdvisoryRun {
            result,
            readings,
            source,
            generated_at,
        }
    }

    /// Fallback run for input that could not be gathered; nothing is stored
    pub fn degraded<S: ExpectedShape>(
        &self,
        shape: &S,
        reason: FallbackReason,
        readings: ReadingBundle,
    ) -> AdvisoryRun<S::Output> {
        tracing::warn!(
            feature = %shape.feature(),
            reason = %reason.message(shape.feature()),
            "Advisory degraded before the model call"
        );
        AdvisoryRun {
            result: shape.fallback(&reason),
            readings,
            source: reason.source(),
            generated_at: Utc::now(),
        }
    }

    async fn persist(&self, record: &AdvisoryRecord) {
        if let Err(e) = self.store.save(record).await {
            tracing::warn!(
                farm_id = %record.farm_id,
                feature = %record.result.feature(),
                error = %e,
                "Failed to store advisory result"
            );
        }
    }
}
