use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::Result as ZimuResult;
use crate::pipeline::Pipeline;
use crate::subtitle::ExtractionResult;

/// Uploads are capped well above typical short-video sizes.
const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }
}

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "detail": self.message });
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Build the application router.
///
/// `/api/extract` is an alias of `/api/extract-url`, kept for clients of
/// the earlier single-endpoint bridge server.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/extract-url", post(extract_url))
        .route("/api/extract", post(extract_url))
        .route("/api/extract-file", post(extract_file))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

/// Run the HTTP service until Ctrl+C.
pub async fn serve(config: &Config, pipeline: Arc<Pipeline>) -> anyhow::Result<()> {
    let app = router(AppState::new(pipeline));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", err);
    }
}

/// Open-CORS middleware.
///
/// Every response, including error envelopes, carries
/// `Access-Control-Allow-Origin: *`; preflight requests are answered
/// directly with an empty 200 regardless of path.
async fn cors(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );
        return response;
    }

    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Video Subtitle Extractor API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/api/extract-url": "POST - extract subtitles from a video URL",
            "/api/extract-file": "POST - extract subtitles from an uploaded file"
        }
    }))
}

async fn extract_url(
    State(state): State<AppState>,
    Json(request): Json<UrlRequest>,
) -> ApiResult<Json<ExtractionResult>> {
    let url = request.url.trim();
    if url.is_empty() {
        return Err(ApiError::bad_request("Missing video URL"));
    }

    respond(state.pipeline.extract_from_url(url).await)
}

async fn extract_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ExtractionResult>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed upload: {}", e)))?
    {
        let Some(filename) = field.file_name().map(|name| name.to_string()) else {
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;

        return respond(state.pipeline.extract_from_upload(&filename, &data).await);
    }

    warn!("Upload request without a file part");
    Err(ApiError::bad_request("Missing file upload"))
}

/// Translate a pipeline outcome into the response envelope. This is the
/// single boundary where internal errors surface to clients; the process
/// itself stays up.
fn respond(result: ZimuResult<ExtractionResult>) -> ApiResult<Json<ExtractionResult>> {
    match result {
        Ok(extraction) => Ok(Json(extraction)),
        Err(e) => {
            error!("Extraction failed: {}", e);
            Err(ApiError::internal(format!("Extraction failed: {}", e)))
        }
    }
}
