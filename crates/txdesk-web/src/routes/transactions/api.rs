//! Transaction API and HTMX endpoints

use super::page::{render_table, render_workspace};
use crate::{ApiError, AppState};
use axum::extract::{Form, Path, Query, State};
use axum::response::Html;
use serde::{Deserialize, Serialize};
use txdesk_core::{SortDirection, Transaction};

/// Current table page as JSON
#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub sort_field: String,
    pub sort_direction: SortDirection,
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct SortForm {
    pub field: String,
}

#[derive(Debug, Deserialize)]
pub struct PageForm {
    pub page: usize,
}

#[derive(Debug, Deserialize)]
pub struct PageSizeForm {
    pub size: usize,
}

/// Get the current page of transactions (JSON API)
pub async fn api_transactions(State(state): State<AppState>) -> String {
    let mut page = state.page.write().await;
    if let Err(error) = page.refresh().await {
        log::debug!("Serving cached transactions: {}", error);
    }
    let table = page.table();
    let response = TransactionsResponse {
        transactions: table.page_rows().into_iter().cloned().collect(),
        total_count: table.total(),
        page: table.page(),
        page_size: table.page_size(),
        sort_field: table.sort_field().to_string(),
        sort_direction: table.sort_direction(),
        query: table.query().to_string(),
    };
    serde_json::to_string(&response).unwrap_or_default()
}

/// Table fragment; re-fetches when stale or when `q` changes the query
pub async fn htmx_transactions_list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Html<String> {
    let mut page = state.page.write().await;
    let result = match params.q {
        Some(q) if q.trim() != page.table().query() => page.search(&q).await,
        _ => page.refresh().await.map(|_| ()),
    };
    if let Err(error) = result {
        log::debug!("Rendering table after failed fetch: {}", error);
    }
    Html(render_table(page.table()))
}

pub async fn htmx_transactions_search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Html<String> {
    let mut page = state.page.write().await;
    if let Err(error) = page.search(&form.q).await {
        log::debug!("Search for {:?} failed: {}", form.q, error);
    }
    Html(render_table(page.table()))
}

pub async fn htmx_transactions_sort(
    State(state): State<AppState>,
    Form(form): Form<SortForm>,
) -> Result<Html<String>, ApiError> {
    let mut page = state.page.write().await;
    page.sort_by(&form.field)?;
    Ok(Html(render_table(page.table())))
}

pub async fn htmx_transactions_page(
    State(state): State<AppState>,
    Form(form): Form<PageForm>,
) -> Html<String> {
    let mut page = state.page.write().await;
    page.set_page(form.page);
    Html(render_table(page.table()))
}

pub async fn htmx_transactions_page_size(
    State(state): State<AppState>,
    Form(form): Form<PageSizeForm>,
) -> Result<Html<String>, ApiError> {
    let mut page = state.page.write().await;
    page.set_page_size(form.size)?;
    Ok(Html(render_table(page.table())))
}

/// Open the form on a blank transaction
pub async fn htmx_transaction_new(State(state): State<AppState>) -> Html<String> {
    let mut page = state.page.write().await;
    page.add();
    page.load_status_options().await;
    Html(render_workspace(&page))
}

/// Open the form on a listed transaction
pub async fn htmx_transaction_edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, ApiError> {
    let mut page = state.page.write().await;
    page.edit_by_id(id)?;
    page.load_status_options().await;
    Ok(Html(render_workspace(&page)))
}
