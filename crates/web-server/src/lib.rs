use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};
use configuration::{ImageBackend, LocalSettings, Settings};
use database::SchoolRepository;
use image_store::ImageStore;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;
pub mod submission;

/// The shared application state that all handlers can access.
///
/// Both collaborators are injected: the process opens them at start-up and
/// closes the repository at shutdown.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn SchoolRepository>,
    pub images: Arc<dyn ImageStore>,
    /// The server-side image ceiling, from `images.max_bytes`.
    pub max_image_bytes: u64,
}

/// Assembles the routes and middleware.
///
/// When `local_uploads` is given, the files the local image store writes are
/// served under its public prefix so the stored locations resolve.
pub fn build_router(
    state: Arc<AppState>,
    body_limit_bytes: usize,
    local_uploads: Option<&LocalSettings>,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    let mut app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/schools",
            get(handlers::list_schools).post(handlers::create_school),
        )
        .with_state(state);

    if let Some(local) = local_uploads {
        app = app.nest_service(&local.public_prefix, ServeDir::new(&local.directory));
    }

    app.layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit_bytes))
}

/// The main function to configure and run the web server.
///
/// Runs until Ctrl-C, then drains in-flight requests and closes the store.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let repo = database::open_repository(&settings.database).await?;
    let images = image_store::build_image_store(&settings.images)?;

    let app_state = Arc::new(AppState {
        repo: repo.clone(),
        images,
        max_image_bytes: settings.images.max_bytes,
    });

    let local_uploads = match settings.images.backend {
        ImageBackend::Local => Some(&settings.images.local),
        ImageBackend::Cloudinary => None,
    };
    let app = build_router(app_state, settings.server.body_limit_bytes, local_uploads);

    let addr = settings.server.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server started and listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    repo.close().await;
    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}
