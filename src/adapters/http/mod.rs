//! axum router and handlers.

pub mod analytics;
pub mod content;
pub mod error;
pub mod media;
pub mod sales;
pub mod speech;
pub mod video;

use crate::adapters::local::fs::UploadLayout;
use crate::application::analytics::AnalyticsService;
use crate::application::content::ContentOrchestrator;
use crate::application::narration::NarrationService;
use crate::application::sales::SalesService;
use crate::application::video::VideoPipeline;
use crate::ports::stock::StockMediaSource;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentOrchestrator>,
    pub narration: Arc<NarrationService>,
    pub videos: VideoPipeline,
    pub stock: Arc<dyn StockMediaSource>,
    pub sales: Arc<SalesService>,
    pub analytics: Arc<AnalyticsService>,
    pub layout: UploadLayout,
    pub default_voice: String,
}

pub fn router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.layout.root);

    Router::new()
        .route("/health", get(health))
        .route("/api/content/generate", post(content::generate))
        .route("/api/content/local", post(content::generate_local))
        .route("/api/content/status", get(content::status))
        .route("/api/tts/generate", post(speech::generate))
        .route("/api/tts/status", get(speech::status))
        .route("/api/media/search", get(media::search))
        .route("/api/video", get(video::list))
        .route("/api/video/generate", post(video::generate))
        .route("/api/video/create-with-images", post(video::create_with_images))
        .route("/api/video/status", get(video::queue_status))
        .route("/api/video/test-ffmpeg", get(video::test_ffmpeg))
        .route("/api/video/:id/status", get(video::job_status))
        .route("/api/sales/leads", get(sales::list_leads).post(sales::create_lead))
        .route(
            "/api/sales/leads/:id",
            get(sales::get_lead)
                .put(sales::update_lead)
                .delete(sales::delete_lead),
        )
        .route(
            "/api/sales/segments",
            get(sales::list_segments).post(sales::create_segment),
        )
        .route("/api/sales/segments/:id/leads", get(sales::segment_leads))
        .route(
            "/api/sales/funnels",
            get(sales::list_funnels).post(sales::create_funnel),
        )
        .route(
            "/api/sales/campaigns",
            get(sales::list_campaigns).post(sales::create_campaign),
        )
        .route("/api/analytics/summary", get(analytics::summary))
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::disable())
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
