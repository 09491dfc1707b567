//! Axum route handlers for the page.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use tracing::{info, warn};

use crate::analysis::Criterion;
use crate::errors::AppError;
use crate::page::controller::spawn_analysis;
use crate::page::upload::DEFAULT_FILE_NAME;
use crate::render::render_page;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

/// GET /
pub async fn handle_page(State(state): State<AppState>) -> Html<String> {
    let page = state.page.lock().await;
    Html(render_page(&page))
}

/// POST /upload
///
/// Takes the first `file` part. Non-PDF parts are ignored by the upload
/// controller; the response is the same redirect either way. A body over the
/// upload limit is shown as the page error.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return upload_failed(&state, e).await,
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or(DEFAULT_FILE_NAME).to_string();
        let media_type = field.content_type().map(str::to_string);
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return upload_failed(&state, e).await,
        };

        let size = bytes.len();
        let accepted = state
            .page
            .lock()
            .await
            .select_file(&file_name, media_type.as_deref(), bytes);
        if accepted {
            info!(file_name = %file_name, size, "PDF selected");
        }
        break;
    }
    Ok(Redirect::to("/"))
}

async fn upload_failed(state: &AppState, err: MultipartError) -> Result<Redirect, AppError> {
    if err.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return Err(AppError::Validation(err.body_text()));
    }
    let limit = state.config.max_upload_bytes;
    warn!(limit, "Upload rejected: body exceeds the upload limit");
    state.page.lock().await.reject_upload(format!(
        "The file is too large. The upload limit is {limit} bytes."
    ));
    Ok(Redirect::to("/"))
}

/// POST /analyze
///
/// Starts the analysis in the background and redirects to the page, which
/// shows the loading state until the outcome arrives.
pub async fn handle_analyze(State(state): State<AppState>) -> Redirect {
    let ticket = state.page.lock().await.begin_analysis();
    let Some(ticket) = ticket else {
        warn!("Analyze ignored: no PDF selected or an analysis is already in flight");
        return Redirect::to("/");
    };

    info!(
        request_id = %ticket.request_id,
        file_name = ticket.upload.file_name(),
        media_type = ticket.upload.media_type(),
        size = ticket.upload.size_bytes(),
        "Starting analysis"
    );
    spawn_analysis(state.page.clone(), state.analyzer.clone(), ticket);
    Redirect::to("/")
}

/// POST /evaluations/:criterion/toggle
pub async fn handle_toggle(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Redirect, AppError> {
    let criterion = Criterion::from_key(&key)
        .ok_or_else(|| AppError::NotFound(format!("Unknown evaluation criterion '{key}'")))?;
    state.page.lock().await.toggle(criterion);
    Ok(Redirect::to(&format!("/#{}", criterion.key())))
}
