use axum::routing::get;
use crudapi::api::router::CrudApi;
use crudapi::config::{ServerConfig, USAGE};
use crudapi::guard::policy::MapGuard;
use crudapi::guard::types::Action;
use crudapi::storage::memory::MapStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        // .with_max_level(tracing::Level::DEBUG)
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        let program = args.first().map(String::as_str).unwrap_or("crudapi");
        eprintln!("Usage: {} {}", program, USAGE);
        eprintln!("Example: {} --bind 127.0.0.1:8080 --prefix /v1", program);
        return Ok(());
    }

    let config = ServerConfig::from_args(args)?;

    // 1. Storage:
    let storage = MapStorage::with_collections(config.collections.iter().cloned());
    tracing::info!("Collections: {:?}", storage.collections());

    // 2. API, optionally behind the example guard:
    let mut api = CrudApi::new(storage).with_prefix(&config.prefix);
    if config.restricted {
        let guard = MapGuard::new()
            .allow("artists", [Action::Create, Action::Get, Action::Update])
            .allow(
                "albums",
                [Action::Create, Action::Get, Action::GetAll, Action::Update],
            );
        api = api.with_guard(guard);
        tracing::info!("Restricted mode: allow-list guard installed");
    }

    let app = api.router().route("/", get(handle_hello));

    // 3. Start HTTP server:
    tracing::info!("HTTP server listening on {}", config.bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn handle_hello() -> &'static str {
    "Hello there!"
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
