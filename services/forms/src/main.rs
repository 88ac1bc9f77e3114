use tracing::info;

use tfm_forms::config::FormsConfig;
use tfm_forms::router::build_router;
use tfm_forms::state::AppState;
use tfm_forms::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = FormsConfig::from_env();
    let addr = format!("0.0.0.0:{}", config.forms_port);

    let state = AppState::new(config);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("forms service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
