use coach_api::config;
use coach_api::routes::app;
use coach_api::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, IDENTITY_* etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Coach API in {:?} mode", config.environment);

    let state = AppState::from_config(config)
        .unwrap_or_else(|e| panic!("failed to initialize application state: {}", e));

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("COACH_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Coach API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
