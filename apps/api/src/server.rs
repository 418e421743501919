use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::cli::ServeArgs;
use crate::config::Config;
use crate::render::preview::PreviewRenderer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryResumeStore, PgResumeStore, ResumeStore};

pub(crate) async fn run(mut config: Config, args: ServeArgs) -> Result<()> {
    if let Some(port) = args.port {
        config.port = port;
    }

    // Initialize résumé storage
    let store: Arc<dyn ResumeStore> = match &config.database_url {
        Some(url) => Arc::new(PgResumeStore::connect(url).await?),
        None => {
            warn!("DATABASE_URL not set; résumés are kept in memory and lost on restart");
            Arc::new(MemoryResumeStore::new())
        }
    };

    // Compile preview templates once
    let preview = Arc::new(PreviewRenderer::new()?);

    let state = AppState { store, preview };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the editor has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
