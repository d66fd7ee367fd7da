//! HTTP endpoints
//!
//! Endpoints:
//!   POST /upload     multipart upload (`file`, `encrypt`, `permanent`, `shorten`)
//!   GET  /u/{name}   serve by storage name, `?key=` for encrypted files
//!   GET  /s/{short}  serve by short name
//!   GET  /healthz    liveness probe (always 200 if the process is running)
//!   GET  /readyz     readiness probe (200 if both upload locations are reachable)

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE, HOST, X_CONTENT_TYPE_OPTIONS},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sealdrop_core::StorageLocation;
use sealdrop_crypto::AccessKey;
use sealdrop_format::{PlainFile, StoredFile};
use sealdrop_storage::{ShortNameTable, StorageGateway};

use crate::disposition::content_disposition;
use crate::error::ApiError;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<StorageGateway>,
    pub shortener: Arc<ShortNameTable>,
    /// Base for generated links; falls back to the request's Host header.
    pub public_url: Option<String>,
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/upload", post(upload))
        .route("/u/{name}", get(serve_by_name))
        .route("/s/{short}", get(serve_by_short))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// Serve the relay on `addr` until ctrl-c.
pub async fn serve(addr: &str, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("bind {addr}: {e}"))?;

    info!(addr = %addr, "listening on /upload, /u/{{name}}, /s/{{short}}, /healthz, /readyz");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await
        .map_err(|e| anyhow::anyhow!("http server: {e}"))
}

// ── Upload ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    pub short_url: Option<String>,
}

#[derive(Default)]
struct UploadForm {
    file: Option<(String, Vec<u8>)>,
    encrypt: bool,
    permanent: bool,
    shorten: bool,
}

fn form_flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "on")
}

async fn read_form(multipart: &mut Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                // The part's Content-Type is client-controlled; the payload is sniffed instead
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
                form.file = Some((filename, data.to_vec()));
            }
            "encrypt" | "permanent" | "shorten" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
                let flag = form_flag(&value);
                match name.as_str() {
                    "encrypt" => form.encrypt = flag,
                    "permanent" => form.permanent = flag,
                    _ => form.shorten = flag,
                }
            }
            other => debug!(field = other, "ignoring unknown upload field"),
        }
    }
    Ok(form)
}

fn base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(url) = &state.public_url {
        return url.trim_end_matches('/').to_string();
    }
    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}")
}

fn link(base: &str, prefix: &str, name: &str, key: Option<&AccessKey>) -> String {
    match key {
        Some(key) => format!("{base}/{prefix}/{name}?key={}", key.expose()),
        None => format!("{base}/{prefix}/{name}"),
    }
}

async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let form = read_form(&mut multipart).await?;
    let (filename, data) = form
        .file
        .ok_or_else(|| ApiError::bad_request("no file part"))?;
    if filename.is_empty() {
        return Err(ApiError::bad_request("no file selected"));
    }

    let file = PlainFile::new(state.gateway.writer(), data, filename);
    let name = file.fs_filename().to_string();
    let len = file.payload().len();

    let (stored, key) = if form.encrypt {
        let key = AccessKey::generate();
        let sealed = tokio::task::spawn_blocking(move || {
            file.encrypt(key.as_bytes()).map(|sealed| (sealed, key))
        })
        .await
        .map_err(|e| ApiError::internal(format!("encrypt task: {e}")))?;
        let (sealed, key) = sealed?;
        (StoredFile::Sealed(sealed), Some(key))
    } else {
        (StoredFile::Plain(file), None)
    };

    let location = if form.permanent {
        StorageLocation::Permanent
    } else {
        StorageLocation::Temporary
    };
    state.gateway.write(location, &stored).await?;

    let base = base_url(&state, &headers);
    let url = link(&base, "u", &name, key.as_ref());
    let short_url = if form.shorten {
        let shortener = Arc::clone(&state.shortener);
        let target = name.clone();
        let short = tokio::task::spawn_blocking(move || shortener.shorten(&target))
            .await
            .map_err(|e| ApiError::internal(format!("shorten task: {e}")))??;
        Some(link(&base, "s", &short, key.as_ref()))
    } else {
        None
    };

    info!(
        name = %name,
        %location,
        encrypted = form.encrypt,
        shortened = form.shorten,
        len,
        "upload stored"
    );
    Ok(Json(UploadResponse { url, short_url }))
}

// ── Retrieval ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct KeyQuery {
    key: Option<String>,
}

async fn serve_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<KeyQuery>,
) -> Result<Response, ApiError> {
    serve_file(&state, &name, query.key).await
}

async fn serve_by_short(
    State(state): State<AppState>,
    Path(short): Path<String>,
    Query(query): Query<KeyQuery>,
) -> Result<Response, ApiError> {
    let name = state.shortener.resolve(&short).ok_or_else(ApiError::not_found)?;
    serve_file(&state, &name, query.key).await
}

async fn serve_file(
    state: &AppState,
    name: &str,
    key: Option<String>,
) -> Result<Response, ApiError> {
    let (location, stored) = state.gateway.locate(name).await?;
    let encrypted = stored.is_encrypted();

    let file = match stored {
        StoredFile::Plain(file) => file,
        StoredFile::Sealed(sealed) => {
            // No key means the empty key, which fails authentication
            let key = AccessKey::from_encoded(key.unwrap_or_default());
            let opened = tokio::task::spawn_blocking(move || sealed.decrypt(key.as_bytes()))
                .await
                .map_err(|e| ApiError::internal(format!("decrypt task: {e}")))?;
            opened?
        }
    };

    info!(
        name,
        %location,
        encrypted,
        len = file.payload().len(),
        "serving file"
    );
    file_response(file)
}

fn file_response(file: PlainFile) -> Result<Response, ApiError> {
    let display_name = if file.filename().is_empty() {
        file.fs_filename()
    } else {
        file.filename()
    };
    let disposition = HeaderValue::from_str(&content_disposition(display_name, file.mime_type()))
        .map_err(|e| ApiError::internal(format!("content-disposition header: {e}")))?;
    let content_type = HeaderValue::from_str(file.mime_type())
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    let headers = [
        (CONTENT_TYPE, content_type),
        (CONTENT_DISPOSITION, disposition),
        (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
    ];
    Ok((headers, file.into_payload()).into_response())
}

// ── Probes ───────────────────────────────────────────────────────────────

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    match sealdrop_storage::check_health(&state.gateway).await {
        Ok(()) => (StatusCode::OK, "ready"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "storage unreachable"),
    }
}
