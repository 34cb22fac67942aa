//! ReelForge server - wires adapters, services and the HTTP router.

use reelforge::adapters::http::{router, AppState};
use reelforge::adapters::local::memory::{MemoryCrm, MemoryJobs};
use reelforge::adapters::local::{CliFfmpeg, TtsCache, UploadLayout};
use reelforge::adapters::pexels::Pexels;
use reelforge::adapters::speech::{ElevenLabs, Espeak, GoogleTranslateTts};
use reelforge::application::analytics::AnalyticsService;
use reelforge::application::content::ContentOrchestrator;
use reelforge::application::narration::NarrationService;
use reelforge::application::sales::SalesService;
use reelforge::application::video::VideoPipeline;
use reelforge::config::AppConfig;
use reelforge::ports::content::ContentProvider;
use reelforge::ports::media::FfmpegRunner;
use reelforge::ports::speech::SpeechSynthesizer;
use reelforge::ports::stock::StockMediaSource;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reelforge=info,tower_http=info")),
        )
        .init();

    let layout = UploadLayout::new(&config.upload_dir);
    if let Err(e) = layout.ensure().await {
        error!(dir = %config.upload_dir.display(), error = %e, "cannot create upload directories");
        std::process::exit(1);
    }

    let client = match reqwest::Client::builder().timeout(config.http_timeout).build() {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to build HTTP client");
            std::process::exit(1);
        }
    };

    // 1. Adapters
    let ffmpeg: Arc<dyn FfmpegRunner> = Arc::new(CliFfmpeg::new(&config.ffmpeg_path));
    let jobs = Arc::new(MemoryJobs::new());
    let crm = Arc::new(MemoryCrm::new());
    let stock: Arc<dyn StockMediaSource> = Arc::new(Pexels::new(
        config.pexels_api_key.clone(),
        &config.pexels_base_url,
        client.clone(),
    ));
    let synthesizers: Vec<Arc<dyn SpeechSynthesizer>> = vec![
        Arc::new(ElevenLabs::new(
            config.elevenlabs_api_key.clone(),
            &config.elevenlabs_voice_id,
            &config.elevenlabs_base_url,
            client.clone(),
        )),
        Arc::new(GoogleTranslateTts::new(&config.google_tts_url, client.clone())),
        Arc::new(Espeak::new(&config.espeak_path, ffmpeg.clone())),
    ];
    let providers = config.providers.build(&config.provider_order, &client);
    for provider in providers.iter().filter(|p| !p.is_configured()) {
        warn!(provider = %provider.kind(), "content provider has no API key");
    }

    // 2. Application services
    let narration = Arc::new(NarrationService::new(
        TtsCache::new(layout.tts_cache()),
        synthesizers,
        layout.tmp(),
    ));
    let videos = VideoPipeline::new(
        jobs.clone(),
        ffmpeg,
        layout.clone(),
        config.max_concurrent_videos,
    )
    .with_narration(narration.clone())
    .with_stock(stock.clone());

    let state = AppState {
        content: Arc::new(ContentOrchestrator::new(providers)),
        narration,
        videos,
        stock,
        sales: Arc::new(SalesService::new(crm.clone())),
        analytics: Arc::new(AnalyticsService::new(jobs, crm)),
        layout,
        default_voice: config.default_voice.clone(),
    };

    // 3. HTTP
    let app = router(state);
    let listener = match tokio::net::TcpListener::bind(config.bind_address()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(address = %config.bind_address(), error = %e, "failed to bind TCP listener");
            std::process::exit(1);
        }
    };
    info!(
        address = %config.bind_address(),
        max_concurrent_videos = config.max_concurrent_videos,
        "listening"
    );
    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
    }
}
