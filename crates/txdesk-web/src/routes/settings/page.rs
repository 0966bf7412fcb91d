//! Settings page rendering - Full page endpoints

use crate::AppState;
use txdesk_utils::escape_html;

pub async fn page_settings(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let config = &state.config;

    let page_sizes = config
        .pagination
        .rows_per_page_options
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let field_table = match &config.form.fields {
        Some(fields) => format!("{} configured fields", fields.len()),
        None => "built-in".to_string(),
    };

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Settings</h2></div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Server</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>Host</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Port</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Transaction store</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>Base URL</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Certificate checks</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Form</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>Layout</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Fields per tab</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Status options</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Fields</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4'>Pagination</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>Rows per page</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Options</p><p class='font-medium'>{}</p></div>
            </div>
        </div>"#,
        escape_html(&config.server.host),
        config.server.port,
        escape_html(&config.api.base_url),
        if config.api.accept_invalid_certs { "Disabled" } else { "Enabled" },
        config.form.layout,
        config.form.fields_per_group,
        escape_html(&config.form.status_options.join(", ")),
        field_table,
        config.pagination.rows_per_page,
        page_sizes
    );

    crate::page_response(&headers, "Settings", "/settings", &inner_content)
}
