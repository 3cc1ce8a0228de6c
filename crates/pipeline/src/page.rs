//! Single-page generation.

use chrono::Utc;
use serde::Serialize;

use colorbook_core::data_uri::decode_image_data_uri;
use colorbook_core::difficulty::Difficulty;
use colorbook_core::naming::page_image_key;
use colorbook_core::series::build_page_prompt;
use colorbook_core::types::DbId;

use crate::billing;
use crate::caller::Caller;
use crate::error::PipelineError;
use crate::generator::{run_detached, Generator};
use crate::request::{PageRequest, ValidPage};

/// Result of a single-page generation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub image_url: String,
    pub generation_id: Option<DbId>,
    pub category: String,
    pub difficulty: Difficulty,
}

impl Generator {
    /// Generate one standalone coloring page. Costs one unit for metered
    /// callers; any failure is fatal and returns the unit. Like a series,
    /// the work outlives a caller that stops waiting.
    pub async fn generate_page(
        &self,
        caller: Caller,
        request: &PageRequest,
    ) -> Result<PageResult, PipelineError> {
        let page = request.validate()?;
        let generator = self.clone();
        run_detached(async move { generator.billed_page(caller, page).await }).await
    }

    async fn billed_page(&self, caller: Caller, page: ValidPage) -> Result<PageResult, PipelineError> {
        let reservation = match caller.metered_user() {
            Some(user_id) => Some(billing::reserve(&self.pool, user_id, 1).await?),
            None => None,
        };
        let generation_id = self.open_generation(reservation.as_ref(), &page.prompt).await;

        let image_url = match self.render_page(&page).await {
            Ok(url) => url,
            Err(e) => {
                if let Some(id) = generation_id {
                    self.fail_generation(id, &e.to_string()).await;
                }
                if let Some(reservation) = &reservation {
                    billing::release(&self.pool, reservation).await;
                }
                return Err(e);
            }
        };

        if let Some(id) = generation_id {
            self.complete_generation(id, &image_url).await;
        }
        if let Some(reservation) = &reservation {
            let description = format!("Coloring page: {}", page.prompt);
            billing::settle(&self.pool, reservation, 1, &description).await?;
        }

        tracing::info!(user_id = ?caller.metered_user(), ?generation_id, "Coloring page generated");
        Ok(PageResult {
            image_url,
            generation_id,
            category: page.category,
            difficulty: page.difficulty,
        })
    }

    async fn render_page(&self, page: &ValidPage) -> Result<String, PipelineError> {
        let prompt = build_page_prompt(&page.prompt, &page.category, page.difficulty);
        let data_uri = self
            .image
            .generate_image(&prompt)
            .await
            .map_err(|e| PipelineError::Image(e.to_string()))?
            .ok_or(PipelineError::NoImages { requested: 1 })?;

        let decoded =
            decode_image_data_uri(&data_uri).map_err(|e| PipelineError::Image(e.to_string()))?;
        let key = page_image_key(&page.category, Utc::now().timestamp_millis(), decoded.extension);
        self.store
            .put_object(&key, decoded.bytes, decoded.content_type)
            .await
            .map_err(|e| PipelineError::Storage(e.to_string()))?;

        Ok(self.store.public_url(&key))
    }
}
