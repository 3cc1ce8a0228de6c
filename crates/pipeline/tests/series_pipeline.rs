//! Integration tests for series and page generation against a real
//! database, with fake models and storage.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sqlx::PgPool;
use tokio::sync::Semaphore;

use colorbook_ai::{AiError, ImageModel, TextModel};
use colorbook_core::error::CoreError;
use colorbook_db::models::status::GenerationStatus;
use colorbook_db::repositories::LedgerRepo;
use colorbook_pipeline::{
    billing, Caller, Generator, PageRequest, PipelineError, SceneOutcome, SeriesRequest,
};
use colorbook_storage::{ObjectStore, StorageError};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

struct FakeText {
    reply: String,
    calls: AtomicUsize,
}

impl FakeText {
    fn outline(scenes: usize) -> Arc<Self> {
        let items: Vec<String> = (1..=scenes).map(|i| format!("\"Fox scene {i}\"")).collect();
        Self::replying(&format!("Sure! Here is the story:\n[{}]", items.join(", ")))
    }

    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TextModel for FakeText {
    async fn complete(&self, _system: Option<&str>, _prompt: &str) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

#[derive(Clone, Copy)]
enum Step {
    Image,
    Empty,
    Error,
}

struct FakeImage {
    script: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl FakeImage {
    fn always() -> Arc<Self> {
        Self::scripted(&[])
    }

    /// Plays `steps` in order, then keeps returning images.
    fn scripted(steps: &[Step]) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.iter().copied().collect()),
            calls: AtomicUsize::new(0),
        })
    }
}

fn png_data_uri() -> String {
    let bytes = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

#[async_trait]
impl ImageModel for FakeImage {
    async fn generate_image(&self, _prompt: &str) -> Result<Option<String>, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.script.lock().unwrap().pop_front().unwrap_or(Step::Image);
        match step {
            Step::Image => Ok(Some(png_data_uri())),
            Step::Empty => Ok(None),
            Step::Error => Err(AiError::RateLimited),
        }
    }
}

/// Holds every call until permits are added, then fails it.
struct GatedImage {
    gate: Semaphore,
}

#[async_trait]
impl ImageModel for GatedImage {
    async fn generate_image(&self, _prompt: &str) -> Result<Option<String>, AiError> {
        self.gate.acquire().await.unwrap().forget();
        Err(AiError::RateLimited)
    }
}

#[derive(Default)]
struct FakeStore {
    keys: Mutex<Vec<String>>,
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn put_object(&self, key: &str, _bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        assert_eq!(content_type, "image/png");
        self.keys.lock().unwrap().push(key.to_string());
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://cdn.test/{key}")
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn generator(pool: &PgPool, text: &Arc<FakeText>, image: &Arc<FakeImage>, store: &Arc<FakeStore>) -> Generator {
    Generator::new(pool.clone(), text.clone(), image.clone(), store.clone())
}

fn series_request(length: i64) -> SeriesRequest {
    SeriesRequest {
        category: "Animals".into(),
        theme: "A fox finds a lost hat".into(),
        difficulty: Some("easy".into()),
        series_length: Some(length),
    }
}

async fn seed_subscription(pool: &PgPool, user_id: i64, quota: i32, used: i32) {
    sqlx::query(
        "INSERT INTO user_subscriptions (user_id, monthly_quota, used_quota) VALUES ($1, $2, $3)",
    )
    .bind(user_id)
    .bind(quota)
    .bind(used)
    .execute(pool)
    .await
    .unwrap();
}

async fn seed_credits(pool: &PgPool, user_id: i64, balance: i32) {
    sqlx::query("INSERT INTO user_credits (user_id, balance) VALUES ($1, $2)")
        .bind(user_id)
        .bind(balance)
        .execute(pool)
        .await
        .unwrap();
}

async fn generation_count(pool: &PgPool, status: Option<GenerationStatus>) -> i64 {
    let row: (i64,) = match status {
        Some(status) => sqlx::query_as("SELECT COUNT(*) FROM ai_generations WHERE status_id = $1")
            .bind(status.id())
            .fetch_one(pool)
            .await
            .unwrap(),
        None => sqlx::query_as("SELECT COUNT(*) FROM ai_generations")
            .fetch_one(pool)
            .await
            .unwrap(),
    };
    row.0
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn system_caller_is_unmetered_and_untracked(pool: PgPool) {
    let (text, image, store) = (FakeText::outline(3), FakeImage::always(), Arc::new(FakeStore::default()));
    let result = generator(&pool, &text, &image, &store)
        .generate_series(Caller::System, &series_request(3))
        .await
        .unwrap();

    assert_eq!(result.series_title, "A fox finds a lost hat Story Series");
    assert_eq!(result.images.len(), 3);
    assert!(result.is_complete());
    assert!(result.images.iter().all(|img| img.generation_id.is_none()));
    assert_eq!(result.images[0].scene_description, "Fox scene 1");

    let keys = store.keys.lock().unwrap().clone();
    assert_eq!(keys.len(), 3);
    assert!(keys[0].starts_with("animals/series-") && keys[0].ends_with("-0.png"));
    assert_eq!(result.images[2].image_url, format!("https://cdn.test/{}", keys[2]));

    assert_eq!(generation_count(&pool, None).await, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn insufficient_balance_is_rejected_before_any_model_call(pool: PgPool) {
    seed_subscription(&pool, 1, 10, 8).await;
    let (text, image, store) = (FakeText::outline(5), FakeImage::always(), Arc::new(FakeStore::default()));

    let err = generator(&pool, &text, &image, &store)
        .generate_series(Caller::User { user_id: 1 }, &series_request(5))
        .await
        .unwrap_err();

    assert_matches!(
        err,
        PipelineError::Core(CoreError::PaymentRequired {
            required: 5,
            available_quota: 2,
            available_credits: 0,
        })
    );
    assert_eq!(text.calls.load(Ordering::SeqCst), 0);
    assert_eq!(image.calls.load(Ordering::SeqCst), 0);
    assert_eq!(generation_count(&pool, None).await, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn quota_funded_series_consumes_quota_without_ledger_rows(pool: PgPool) {
    seed_subscription(&pool, 2, 10, 3).await;
    seed_credits(&pool, 2, 50).await;
    let (text, image, store) = (FakeText::outline(5), FakeImage::always(), Arc::new(FakeStore::default()));

    let result = generator(&pool, &text, &image, &store)
        .generate_series(Caller::User { user_id: 2 }, &series_request(5))
        .await
        .unwrap();
    assert_eq!(result.images.len(), 5);
    assert!(result.images.iter().all(|img| img.generation_id.is_some()));

    let counters = LedgerRepo::read_counters(&pool, 2).await.unwrap();
    assert_eq!(counters.used_quota, 8);
    assert_eq!(counters.credit_balance, 50);
    assert!(LedgerRepo::list_transactions(&pool, 2).await.unwrap().is_empty());
    assert_eq!(generation_count(&pool, Some(GenerationStatus::Completed)).await, 5);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn credit_funded_series_writes_one_ledger_row_per_image(pool: PgPool) {
    seed_credits(&pool, 3, 10).await;
    let (text, image, store) = (FakeText::outline(3), FakeImage::always(), Arc::new(FakeStore::default()));

    generator(&pool, &text, &image, &store)
        .generate_series(Caller::User { user_id: 3 }, &series_request(3))
        .await
        .unwrap();

    let counters = LedgerRepo::read_counters(&pool, 3).await.unwrap();
    assert_eq!(counters.credit_balance, 7);
    assert_eq!(counters.total_credits_used, 3);

    let txs = LedgerRepo::list_transactions(&pool, 3).await.unwrap();
    let balances: Vec<i32> = txs.iter().map(|t| t.balance_after).collect();
    assert_eq!(balances, vec![9, 8, 7]);
    assert!(txs.iter().all(|t| t.amount == -1 && t.transaction_type == "usage"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn partial_series_bills_only_produced_images(pool: PgPool) {
    seed_credits(&pool, 4, 10).await;
    let (text, store) = (FakeText::outline(5), Arc::new(FakeStore::default()));
    let image = FakeImage::scripted(&[Step::Image, Step::Empty, Step::Image, Step::Error, Step::Image]);

    let result = generator(&pool, &text, &image, &store)
        .generate_series(Caller::User { user_id: 4 }, &series_request(5))
        .await
        .unwrap();

    let orders: Vec<u32> = result.images.iter().map(|img| img.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
    assert_eq!(result.images[1].scene_description, "Fox scene 3");
    assert!(!result.is_complete());

    assert_matches!(result.scenes[0].outcome, SceneOutcome::Completed);
    assert_matches!(result.scenes[1].outcome, SceneOutcome::Skipped { .. });
    assert_matches!(result.scenes[3].outcome, SceneOutcome::Failed { .. });
    assert_eq!(result.scenes[4].scene_number, 5);

    let counters = LedgerRepo::read_counters(&pool, 4).await.unwrap();
    assert_eq!(counters.credit_balance, 7);
    assert_eq!(counters.total_credits_used, 3);
    assert_eq!(generation_count(&pool, Some(GenerationStatus::Completed)).await, 3);
    assert_eq!(generation_count(&pool, Some(GenerationStatus::Failed)).await, 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn short_outline_reports_missing_scenes(pool: PgPool) {
    let (text, image, store) = (FakeText::outline(2), FakeImage::always(), Arc::new(FakeStore::default()));

    let result = generator(&pool, &text, &image, &store)
        .generate_series(Caller::System, &series_request(4))
        .await
        .unwrap();

    assert_eq!(result.images.len(), 2);
    assert_eq!(result.requested_length, 4);
    assert_matches!(result.scenes[3].outcome, SceneOutcome::Failed { .. });
    assert_eq!(image.calls.load(Ordering::SeqCst), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_outline_aborts_and_releases_reservation(pool: PgPool) {
    seed_subscription(&pool, 5, 10, 0).await;
    let text = FakeText::replying("I'd love to help with that story!");
    let (image, store) = (FakeImage::always(), Arc::new(FakeStore::default()));

    let err = generator(&pool, &text, &image, &store)
        .generate_series(Caller::User { user_id: 5 }, &series_request(5))
        .await
        .unwrap_err();

    assert_matches!(err, PipelineError::Outline(_));
    assert_eq!(image.calls.load(Ordering::SeqCst), 0);
    assert_eq!(generation_count(&pool, None).await, 0);
    assert_eq!(LedgerRepo::read_counters(&pool, 5).await.unwrap().used_quota, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn zero_images_is_fatal_and_returns_everything(pool: PgPool) {
    seed_credits(&pool, 6, 5).await;
    let text = FakeText::outline(3);
    let image = FakeImage::scripted(&[Step::Empty, Step::Error, Step::Empty]);
    let store = Arc::new(FakeStore::default());

    let err = generator(&pool, &text, &image, &store)
        .generate_series(Caller::User { user_id: 6 }, &series_request(3))
        .await
        .unwrap_err();

    assert_matches!(err, PipelineError::NoImages { requested: 3 });
    let counters = LedgerRepo::read_counters(&pool, 6).await.unwrap();
    assert_eq!(counters.credit_balance, 5);
    assert_eq!(counters.total_credits_used, 0);
    assert!(LedgerRepo::list_transactions(&pool, 6).await.unwrap().is_empty());
    assert_eq!(generation_count(&pool, Some(GenerationStatus::Failed)).await, 3);
}

// ---------------------------------------------------------------------------
// Single page
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn page_generation_costs_one_credit(pool: PgPool) {
    seed_credits(&pool, 7, 2).await;
    let (text, image, store) = (FakeText::outline(1), FakeImage::always(), Arc::new(FakeStore::default()));

    let result = generator(&pool, &text, &image, &store)
        .generate_page(
            Caller::User { user_id: 7 },
            &PageRequest {
                category: "Space Rockets".into(),
                prompt: "a rocket over the moon".into(),
                difficulty: None,
            },
        )
        .await
        .unwrap();

    assert!(result.image_url.starts_with("https://cdn.test/space-rockets/page-"));
    assert!(result.generation_id.is_some());

    let txs = LedgerRepo::list_transactions(&pool, 7).await.unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].balance_after, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn failed_page_returns_the_unit(pool: PgPool) {
    seed_subscription(&pool, 8, 1, 0).await;
    let (text, store) = (FakeText::outline(1), Arc::new(FakeStore::default()));
    let image = FakeImage::scripted(&[Step::Error]);

    let err = generator(&pool, &text, &image, &store)
        .generate_page(
            Caller::User { user_id: 8 },
            &PageRequest {
                category: "Cars".into(),
                prompt: "a tractor".into(),
                difficulty: Some("hard".into()),
            },
        )
        .await
        .unwrap_err();

    assert_matches!(err, PipelineError::Image(_));
    assert_eq!(LedgerRepo::read_counters(&pool, 8).await.unwrap().used_quota, 0);
    assert_eq!(generation_count(&pool, Some(GenerationStatus::Failed)).await, 1);
}

// ---------------------------------------------------------------------------
// Reservations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_reservations_cannot_share_a_balance(pool: PgPool) {
    seed_credits(&pool, 9, 8).await;

    let (first, second) = tokio::join!(
        billing::reserve(&pool, 9, 5),
        billing::reserve(&pool, 9, 5),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    let rejected = outcomes.iter().find_map(|r| r.as_ref().err()).unwrap();
    assert_matches!(
        rejected,
        PipelineError::Core(CoreError::PaymentRequired {
            required: 5,
            available_credits: 3,
            ..
        })
    );

    let counters = LedgerRepo::read_counters(&pool, 9).await.unwrap();
    assert_eq!(counters.credit_balance, 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn abandoned_request_still_settles_its_reservation(pool: PgPool) {
    seed_credits(&pool, 77, 10).await;
    let image = Arc::new(GatedImage {
        gate: Semaphore::new(0),
    });
    let generator = Generator::new(
        pool.clone(),
        FakeText::outline(5),
        image.clone(),
        Arc::new(FakeStore::default()),
    );

    // The caller gives up while every scene is still waiting on the model.
    let waited = tokio::time::timeout(
        Duration::from_millis(500),
        generator.generate_series(Caller::User { user_id: 77 }, &series_request(5)),
    )
    .await;
    assert!(waited.is_err());
    assert_eq!(LedgerRepo::read_counters(&pool, 77).await.unwrap().credit_balance, 5);

    image.gate.add_permits(5);

    let mut balance = 0;
    for _ in 0..100 {
        balance = LedgerRepo::read_counters(&pool, 77).await.unwrap().credit_balance;
        if balance == 10 && generation_count(&pool, Some(GenerationStatus::Failed)).await == 5 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(balance, 10);
    assert_eq!(generation_count(&pool, Some(GenerationStatus::Failed)).await, 5);
    assert!(LedgerRepo::list_transactions(&pool, 77).await.unwrap().is_empty());
}
