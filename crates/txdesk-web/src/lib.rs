//! HTTP server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::transactions: list, search, sort, pagination, add/edit entry
//! - routes::form: tab/step navigation, submit, sub-editors, notices
//! - routes::settings: configuration display

pub mod error;
pub mod routes;

use axum::{
    http::HeaderMap,
    response::Html,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use txdesk_config::Config;
use txdesk_core::PageController;

pub use error::ApiError;

/// Application state
///
/// One page controller per server; handlers take the write lock for the
/// whole action, so actions run one at a time.
#[derive(Clone)]
pub struct AppState {
    pub page: Arc<RwLock<PageController>>,
    pub config: Config,
}

impl AppState {
    pub fn new(page: PageController, config: Config) -> Self {
        Self {
            page: Arc::new(RwLock::new(page)),
            config,
        }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::form::{
        htmx_editor_close, htmx_editor_open, htmx_editor_save, htmx_form_back,
        htmx_form_cancel, htmx_form_next, htmx_form_submit, htmx_form_tab, htmx_notice_dismiss,
    };
    use routes::settings::{api_settings, page_settings};
    use routes::transactions::{
        api_transactions, htmx_transaction_edit, htmx_transaction_new, htmx_transactions_list,
        htmx_transactions_page, htmx_transactions_page_size, htmx_transactions_search,
        htmx_transactions_sort, page_transactions,
    };

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/transactions", get(api_transactions))
        .route("/api/settings", get(api_settings))
        // HTMX page routes
        .route("/", get(page_transactions))
        .route("/transactions", get(page_transactions))
        .route("/settings", get(page_settings))
        // Table partials
        .route("/transactions/list", get(htmx_transactions_list))
        .route("/transactions/search", post(htmx_transactions_search))
        .route("/transactions/sort", post(htmx_transactions_sort))
        .route("/transactions/page", post(htmx_transactions_page))
        .route("/transactions/page-size", post(htmx_transactions_page_size))
        .route("/transactions/new", post(htmx_transaction_new))
        .route("/transactions/:id/edit", post(htmx_transaction_edit))
        // Form transitions
        .route("/form/next", post(htmx_form_next))
        .route("/form/back", post(htmx_form_back))
        .route("/form/tab/:index", post(htmx_form_tab))
        .route("/form/submit", post(htmx_form_submit))
        .route("/form/cancel", post(htmx_form_cancel))
        .route("/form/editors/:kind/open", post(htmx_editor_open))
        .route("/form/editors/:kind/save", post(htmx_editor_save))
        .route("/form/editors/:kind/close", post(htmx_editor_close))
        .route("/notice/dismiss", post(htmx_notice_dismiss))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - txdesk</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        txdesk_utils::escape_html(title),
        content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [
        ("/transactions", "Transactions"),
        ("/settings", "Settings"),
    ];

    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>txdesk</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    for (path, label) in &links {
        let is_active = current_path.starts_with(path)
            || (*path == "/transactions" && current_path == "/");
        let active_class = if is_active {
            "bg-indigo-50 text-indigo-600"
        } else {
            "text-gray-600 hover:bg-gray-50"
        };
        nav.push_str(&format!(
            "<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'><span>{}</span></a></li>",
            path, active_class, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

/// HTMX requests carry an `HX-Request` header
pub fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// The bare content for HTMX swaps, the full layout otherwise
pub fn page_response(
    headers: &HeaderMap,
    title: &str,
    current_path: &str,
    inner: &str,
) -> Html<String> {
    if is_htmx_request(headers) {
        return Html(inner.to_string());
    }
    let content = format!(
        "<div class='flex'><div class='w-56 flex-shrink-0'>{}</div><main id='main-content' class='flex-1 p-6'>{}</main></div>",
        nav_sidebar(current_path),
        inner
    );
    Html(base_html(title, &content))
}

/// Start the HTTP server
pub async fn start_server(config: Config, page: PageController) -> std::io::Result<()> {
    let addr = config.bind_address();
    let state = AppState::new(page, config);
    let app = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await
}
