use super::types::{DisplaySnapshot, DisplayState};
use crate::{AppState, styling::PageStyle, templating::PAGE_TEMPLATE};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use tracing::{error, info};

pub async fn display_page_handler(State(app_state): State<AppState>) -> Response {
    let DisplaySnapshot { state, style } = app_state.wallpaper.snapshot();

    let status = match &state {
        DisplayState::Loading => "loading",
        DisplayState::Photo(_) => "photo",
        DisplayState::Error(_) => "error",
    };

    let globals = liquid::object!({
        "app_name": app_state.config.app.name.clone(),
        "status": status,
        "photo": state.photo().cloned(),
        "error": state.error().map(|e| e.message.clone()),
        "style": style,
        "poll_seconds": app_state.config.display.poll_seconds,
    });

    match app_state
        .template_engine
        .render_template(PAGE_TEMPLATE, globals)
        .await
    {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Template rendering error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn photo_handler(State(app_state): State<AppState>) -> Json<DisplayState> {
    Json(app_state.wallpaper.current())
}

pub async fn style_handler(State(app_state): State<AppState>) -> Json<PageStyle> {
    Json(app_state.wallpaper.style())
}

pub async fn suspend_handler(State(app_state): State<AppState>) -> StatusCode {
    info!("Suspend requested");
    match app_state.wallpaper.suspend().await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(e) => {
            error!("Failed to suspend: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn resume_handler(State(app_state): State<AppState>) -> StatusCode {
    info!("Resume requested");
    match app_state.wallpaper.resume().await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(e) => {
            error!("Failed to resume: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
