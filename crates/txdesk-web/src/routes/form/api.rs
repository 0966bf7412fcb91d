//! Form HTMX endpoints

use crate::routes::transactions::render_workspace;
use crate::{ApiError, AppState};
use axum::extract::{Form, Path, State};
use axum::response::Html;
use std::collections::HashMap;
use txdesk_core::{AuxiliaryKind, CoreError, SubmitOutcome};

/// Raw form fields as posted by the browser
type Inputs = HashMap<String, String>;

fn parse_kind(kind: &str) -> Result<AuxiliaryKind, ApiError> {
    kind.parse()
        .map_err(|message| ApiError::BadRequest { message })
}

pub async fn htmx_form_next(
    State(state): State<AppState>,
    Form(inputs): Form<Inputs>,
) -> Result<Html<String>, ApiError> {
    let mut page = state.page.write().await;
    page.apply_inputs(&inputs)?;
    page.next_group()?;
    Ok(Html(render_workspace(&page)))
}

pub async fn htmx_form_back(
    State(state): State<AppState>,
    Form(inputs): Form<Inputs>,
) -> Result<Html<String>, ApiError> {
    let mut page = state.page.write().await;
    page.apply_inputs(&inputs)?;
    page.previous_group()?;
    Ok(Html(render_workspace(&page)))
}

pub async fn htmx_form_tab(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Form(inputs): Form<Inputs>,
) -> Result<Html<String>, ApiError> {
    let mut page = state.page.write().await;
    page.apply_inputs(&inputs)?;
    page.jump_to_group(index)?;
    Ok(Html(render_workspace(&page)))
}

/// Validate and save; the response shows the list on success and the
/// form with its errors or notice otherwise
pub async fn htmx_form_submit(
    State(state): State<AppState>,
    Form(inputs): Form<Inputs>,
) -> Result<Html<String>, ApiError> {
    let mut page = state.page.write().await;
    page.apply_inputs(&inputs)?;
    match page.submit().await {
        SubmitOutcome::NotEditing => return Err(CoreError::NotEditing.into()),
        outcome => log::debug!("Submit finished: {:?}", outcome),
    }
    Ok(Html(render_workspace(&page)))
}

pub async fn htmx_form_cancel(State(state): State<AppState>) -> Html<String> {
    let mut page = state.page.write().await;
    page.cancel();
    Html(render_workspace(&page))
}

/// Open a sub-editor, keeping what was typed into the main form
pub async fn htmx_editor_open(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Form(inputs): Form<Inputs>,
) -> Result<Html<String>, ApiError> {
    let kind = parse_kind(&kind)?;
    let mut page = state.page.write().await;
    page.apply_inputs(&inputs)?;
    page.open_editor(kind)?;
    Ok(Html(render_workspace(&page)))
}

/// Save a sub-editor; on validation errors it stays open showing them
pub async fn htmx_editor_save(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Form(inputs): Form<Inputs>,
) -> Result<Html<String>, ApiError> {
    let kind = parse_kind(&kind)?;
    let mut page = state.page.write().await;
    match page.save_editor(kind, &inputs) {
        Ok(()) => log::debug!("Saved {} editor", kind),
        Err(CoreError::ValidationFailed { fields }) => {
            log::debug!("{} editor rejected: {:?}", kind, fields)
        }
        Err(error) => return Err(error.into()),
    }
    Ok(Html(render_workspace(&page)))
}

pub async fn htmx_editor_close(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Html<String>, ApiError> {
    let kind = parse_kind(&kind)?;
    let mut page = state.page.write().await;
    page.close_editor(kind)?;
    Ok(Html(render_workspace(&page)))
}

pub async fn htmx_notice_dismiss(State(state): State<AppState>) -> Html<String> {
    let mut page = state.page.write().await;
    page.dismiss_notice();
    Html(render_workspace(&page))
}
