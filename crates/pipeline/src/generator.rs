//! Story-series generation.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;

use colorbook_ai::{ImageModel, TextModel};
use colorbook_core::data_uri::decode_image_data_uri;
use colorbook_core::naming::series_image_key;
use colorbook_core::outline::{build_outline_prompt, extract_outline, OUTLINE_SYSTEM_PROMPT};
use colorbook_core::series::{build_scene_prompt, series_title};
use colorbook_core::types::DbId;
use colorbook_db::models::ai_generation::CreateAiGeneration;
use colorbook_db::repositories::AiGenerationRepo;
use colorbook_storage::ObjectStore;

use crate::billing::{self, Reservation};
use crate::caller::Caller;
use crate::error::PipelineError;
use crate::request::{SceneOutcome, SceneReport, SeriesImage, SeriesRequest, SeriesResult, ValidSeries};

/// Runs generation requests against the configured models and bucket.
#[derive(Clone)]
pub struct Generator {
    pub(crate) pool: PgPool,
    pub(crate) text: Arc<dyn TextModel>,
    pub(crate) image: Arc<dyn ImageModel>,
    pub(crate) store: Arc<dyn ObjectStore>,
}

impl Generator {
    pub fn new(
        pool: PgPool,
        text: Arc<dyn TextModel>,
        image: Arc<dyn ImageModel>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            pool,
            text,
            image,
            store,
        }
    }

    /// Generate a story series for `caller`.
    ///
    /// Metered callers reserve the full requested length up front and are
    /// billed only for the images actually produced. A fatal error returns
    /// the whole reservation. The work runs on its own task, so a caller that
    /// stops waiting (timeout, disconnect) still gets a settled reservation.
    pub async fn generate_series(
        &self,
        caller: Caller,
        request: &SeriesRequest,
    ) -> Result<SeriesResult, PipelineError> {
        let series = request.validate()?;
        let generator = self.clone();
        run_detached(async move { generator.billed_series(caller, series).await }).await
    }

    async fn billed_series(
        &self,
        caller: Caller,
        series: ValidSeries,
    ) -> Result<SeriesResult, PipelineError> {
        let reservation = match caller.metered_user() {
            Some(user_id) => Some(billing::reserve(&self.pool, user_id, series.length as i32).await?),
            None => None,
        };

        let result = match self.run_series(&series, reservation.as_ref()).await {
            Ok(result) => result,
            Err(e) => {
                if let Some(reservation) = &reservation {
                    billing::release(&self.pool, reservation).await;
                }
                return Err(e);
            }
        };

        if let Some(reservation) = &reservation {
            let description = format!("Story series: {}", result.series_title);
            billing::settle(&self.pool, reservation, result.images.len() as i32, &description)
                .await?;
        }

        tracing::info!(
            user_id = ?caller.metered_user(),
            requested = series.length,
            produced = result.images.len(),
            "Story series generated",
        );
        Ok(result)
    }

    async fn run_series(
        &self,
        series: &ValidSeries,
        reservation: Option<&Reservation>,
    ) -> Result<SeriesResult, PipelineError> {
        let outline = self.outline(series).await?;
        let total = series.length as usize;
        let started_ms = Utc::now().timestamp_millis();

        let mut images = Vec::with_capacity(total);
        let mut scenes = Vec::with_capacity(total);

        for index in 0..total {
            let scene_number = index as u32 + 1;
            let Some(scene) = outline.get(index) else {
                tracing::warn!(scene = scene_number, "Outline has fewer scenes than requested");
                scenes.push(SceneReport {
                    scene_number,
                    outcome: SceneOutcome::Failed {
                        reason: "Outline has no description for this scene".into(),
                    },
                });
                continue;
            };

            let generation_id = self.open_generation(reservation, scene).await;
            let prompt = build_scene_prompt(scene, index, total, series.difficulty);
            let key_for = |ext: &str| series_image_key(&series.category, started_ms, index, ext);

            let outcome = match self.render_and_store(&prompt, key_for).await {
                Ok(image_url) => {
                    if let Some(id) = generation_id {
                        self.complete_generation(id, &image_url).await;
                    }
                    images.push(SeriesImage {
                        image_url,
                        scene_description: scene.clone(),
                        order: images.len() as u32 + 1,
                        generation_id,
                    });
                    SceneOutcome::Completed
                }
                Err(outcome) => {
                    if let (Some(id), Some(reason)) = (generation_id, outcome.reason()) {
                        self.fail_generation(id, reason).await;
                    }
                    outcome
                }
            };

            match &outcome {
                SceneOutcome::Completed => {
                    tracing::debug!(scene = scene_number, ?generation_id, "Scene completed")
                }
                SceneOutcome::Skipped { reason } => {
                    tracing::warn!(scene = scene_number, reason = %reason, "Scene skipped")
                }
                SceneOutcome::Failed { reason } => {
                    tracing::warn!(scene = scene_number, reason = %reason, "Scene failed")
                }
            }
            scenes.push(SceneReport {
                scene_number,
                outcome,
            });
        }

        if images.is_empty() {
            return Err(PipelineError::NoImages {
                requested: series.length,
            });
        }

        Ok(SeriesResult {
            series_title: series_title(&series.theme),
            images,
            scenes,
            category: series.category.clone(),
            difficulty: series.difficulty,
            requested_length: series.length,
        })
    }

    /// Ask the text model for the scene list.
    async fn outline(&self, series: &ValidSeries) -> Result<Vec<String>, PipelineError> {
        let prompt = build_outline_prompt(&series.theme, &series.category, series.difficulty, series.length);
        let reply = self
            .text
            .complete(Some(OUTLINE_SYSTEM_PROMPT), &prompt)
            .await
            .map_err(|e| PipelineError::Outline(e.to_string()))?;
        extract_outline(&reply).map_err(|e| PipelineError::Outline(e.to_string()))
    }

    /// Call the image model, decode the payload and upload it. Returns the
    /// public URL; the error side carries the scene outcome to report.
    async fn render_and_store(
        &self,
        prompt: &str,
        key_for: impl Fn(&str) -> String,
    ) -> Result<String, SceneOutcome> {
        let data_uri = match self.image.generate_image(prompt).await {
            Ok(Some(uri)) => uri,
            Ok(None) => {
                return Err(SceneOutcome::Skipped {
                    reason: "Image model returned no image".into(),
                })
            }
            Err(e) => {
                return Err(SceneOutcome::Failed {
                    reason: e.to_string(),
                })
            }
        };

        let decoded = decode_image_data_uri(&data_uri).map_err(|e| SceneOutcome::Failed {
            reason: e.to_string(),
        })?;

        let key = key_for(decoded.extension);
        self.store
            .put_object(&key, decoded.bytes, decoded.content_type)
            .await
            .map_err(|e| SceneOutcome::Failed {
                reason: e.to_string(),
            })?;

        Ok(self.store.public_url(&key))
    }

    // -----------------------------------------------------------------------
    // Generation row bookkeeping. Failures degrade tracking, never the request.
    // -----------------------------------------------------------------------

    pub(crate) async fn open_generation(
        &self,
        reservation: Option<&Reservation>,
        prompt: &str,
    ) -> Option<DbId> {
        let reservation = reservation?;
        let input = CreateAiGeneration {
            user_id: Some(reservation.user_id),
            prompt: prompt.to_string(),
            cost_type: reservation.source.as_str().to_string(),
        };
        match AiGenerationRepo::create(&self.pool, &input).await {
            Ok(row) => Some(row.id),
            Err(e) => {
                tracing::warn!(user_id = reservation.user_id, error = %e, "Failed to record generation");
                None
            }
        }
    }

    pub(crate) async fn complete_generation(&self, id: DbId, image_url: &str) {
        if let Err(e) = AiGenerationRepo::complete(&self.pool, id, image_url).await {
            tracing::warn!(generation_id = id, error = %e, "Failed to mark generation completed");
        }
    }

    pub(crate) async fn fail_generation(&self, id: DbId, reason: &str) {
        if let Err(e) = AiGenerationRepo::fail(&self.pool, id, reason).await {
            tracing::warn!(generation_id = id, error = %e, "Failed to mark generation failed");
        }
    }
}

/// Run a reserve-generate-settle sequence on its own task and wait for it.
///
/// Dropping the returned future does not cancel `work`.
pub(crate) async fn run_detached<T, F>(work: F) -> Result<T, PipelineError>
where
    F: Future<Output = Result<T, PipelineError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(work)
        .await
        .map_err(|e| PipelineError::Aborted(e.to_string()))?
}
