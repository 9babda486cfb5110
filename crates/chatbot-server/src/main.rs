use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use chatbot_api::config::AppConfig;
use chatbot_api::store::ChatStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatbot_server=debug,chatbot_api=debug,chatbot_db=debug,tower_http=debug".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    info!("Loaded {:?}", config);

    let db = chatbot_db::Database::open(&config.db_path)?;
    let store = Arc::new(ChatStore::new(db, config.master_key.clone()));

    let app = chatbot_api::router(store)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Chatbot server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
