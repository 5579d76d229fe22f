// File: services/upipay_backend/src/main.rs
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use upipay_common::{log_result, Context, UpiPayError};
use upipay_config::{load_config, AppConfig};
use upipay_razorpay::{routes as razorpay_routes, RazorpayState};

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Assembles the full application: feature routes nested under `/api`.
fn build_app(state: RazorpayState) -> Router {
    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the UPI payment proxy API!" }))
        .route("/health", get(health))
        .merge(razorpay_routes(state));

    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = Router::new().nest("/api", api_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use upipay_razorpay::doc::RazorpayApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "UPI Payment Proxy API",
                version = "0.1.0",
                description = "UPI collect and payout endpoints backed by Razorpay",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(RazorpayApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    app.layer(TraceLayer::new_for_http())
}

fn razorpay_state(config: Arc<AppConfig>) -> Result<RazorpayState, UpiPayError> {
    if !config.use_razorpay {
        warn!("Razorpay is disabled; payment routes will answer 503");
    }
    RazorpayState::from_config(config).context("building Razorpay client")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), UpiPayError> {
    upipay_common::logging::init();

    let config = log_result(
        load_config(),
        "Configuration ready",
        "Failed to load configuration",
    )
    .context("loading configuration")?;
    let config = Arc::new(config);
    let app = build_app(razorpay_state(config.clone())?);

    // Bind and serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("Server stopped");
    Ok(())
}
