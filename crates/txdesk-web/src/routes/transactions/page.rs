//! Transaction page rendering

use crate::routes::form::render_form;
use crate::{page_response, AppState};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use txdesk_core::{
    FieldKind, FieldValue, Notice, NoticeSeverity, PageController, Record, SortDirection,
    TableViewModel, Transaction,
};
use txdesk_utils::{escape_html, format_number};

/// Full transactions page
pub async fn page_transactions(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let mut page = state.page.write().await;
    if let Err(error) = page.refresh().await {
        log::debug!("Rendering transactions page after failed fetch: {}", error);
    }
    page_response(&headers, "Transactions", "/transactions", &render_workspace(&page))
}

/// Notice, then the open form or the table
pub fn render_workspace(page: &PageController) -> String {
    let notice = page.notice().map(render_notice).unwrap_or_default();
    let body = match page.session() {
        Some(session) => render_form(session, page.is_editing()),
        None => format!("{}{}", render_toolbar(page.table()), render_table(page.table())),
    };
    format!("<div id='workspace' class='space-y-4'>{}{}</div>", notice, body)
}

pub fn render_notice(notice: &Notice) -> String {
    let class = match notice.severity {
        NoticeSeverity::Success => "bg-green-50 border-green-200 text-green-700",
        NoticeSeverity::Error => "bg-red-50 border-red-200 text-red-700",
    };
    format!(
        r#"<div id='notice' role='alert' data-severity='{}' class='flex items-center justify-between border rounded-lg p-3 text-sm {}'>
            <span>{}</span>
            <button class='text-xs underline' hx-post='/notice/dismiss' hx-target='#workspace' hx-swap='outerHTML'>Dismiss</button>
        </div>"#,
        notice.severity,
        class,
        escape_html(&notice.message)
    )
}

fn render_toolbar(table: &TableViewModel) -> String {
    format!(
        r#"<div class='flex items-center justify-between gap-3'>
            <form class='flex gap-2' hx-post='/transactions/search' hx-target='#transactions-table' hx-swap='outerHTML'>
                <input type='search' name='q' value='{}' placeholder='Search transactions' class='px-3 py-2 border rounded-lg text-sm w-72'>
                <button type='submit' class='px-3 py-2 bg-white border rounded-lg text-sm'>Search</button>
            </form>
            <button class='px-4 py-2 bg-indigo-600 text-white rounded-lg text-sm' hx-post='/transactions/new' hx-target='#workspace' hx-swap='outerHTML'>Add Transaction</button>
        </div>"#,
        escape_html(table.query())
    )
}

fn cell_text(kind: FieldKind, value: &FieldValue) -> String {
    match (kind, value) {
        (_, FieldValue::Empty) => String::new(),
        (FieldKind::Number, FieldValue::Number(n)) => format_number(n.normalize()),
        (_, other) => other.to_string(),
    }
}

fn sort_indicator(table: &TableViewModel, key: &str) -> &'static str {
    if table.sort_field() != key {
        return "";
    }
    match table.sort_direction() {
        SortDirection::Asc => " ▲",
        SortDirection::Desc => " ▼",
    }
}

fn render_row(table: &TableViewModel, record: &Transaction) -> String {
    let mut row = String::from("<tr class='border-t hover:bg-gray-50'>");
    for column in table.columns() {
        let value = record.field(&column.key).unwrap_or(FieldValue::Empty);
        let align = if column.kind == FieldKind::Number {
            "text-right"
        } else {
            "text-left"
        };
        row.push_str(&format!(
            "<td class='px-4 py-2 text-sm {}'>{}</td>",
            align,
            escape_html(&cell_text(column.kind, &value))
        ));
    }
    row.push_str(&format!(
        "<td class='px-4 py-2 text-right'><button class='text-indigo-600 text-sm' hx-post='/transactions/{}/edit' hx-target='#workspace' hx-swap='outerHTML'>Edit</button></td></tr>",
        record.id()
    ));
    row
}

fn render_footer(table: &TableViewModel) -> String {
    let total = table.total();
    let offset = table.page().saturating_mul(table.page_size());
    let start = if total == 0 {
        0
    } else {
        offset.saturating_add(1)
    };
    let end = offset.saturating_add(table.page_size()).min(total);

    let mut sizes = String::new();
    for size in table.page_size_options() {
        let selected = if *size == table.page_size() { " selected" } else { "" };
        sizes.push_str(&format!("<option value='{}'{}>{}</option>", size, selected, size));
    }

    let previous = table.page().saturating_sub(1);
    let next = table.page() + 1;
    let prev_disabled = if table.page() == 0 { " disabled" } else { "" };
    let next_disabled = if next >= table.page_count() { " disabled" } else { "" };

    format!(
        r#"<div class='flex items-center justify-end gap-4 px-4 py-3 border-t text-sm text-gray-600'>
            <label class='flex items-center gap-2'>Rows per page
                <select name='size' class='border rounded px-2 py-1' hx-post='/transactions/page-size' hx-trigger='change' hx-target='#transactions-table' hx-swap='outerHTML'>{}</select>
            </label>
            <span>{}-{} of {}</span>
            <button class='px-2 py-1 border rounded' hx-post='/transactions/page' hx-vals='{{"page": "{}"}}' hx-target='#transactions-table' hx-swap='outerHTML'{}>Previous</button>
            <button class='px-2 py-1 border rounded' hx-post='/transactions/page' hx-vals='{{"page": "{}"}}' hx-target='#transactions-table' hx-swap='outerHTML'{}>Next</button>
            <button class='px-2 py-1 border rounded' hx-get='/transactions/list?q={}' hx-target='#transactions-table' hx-swap='outerHTML'>Reload</button>
        </div>"#,
        sizes,
        start,
        end,
        total,
        previous,
        prev_disabled,
        next,
        next_disabled,
        urlencoding::encode(table.query())
    )
}

/// Sortable, paginated table fragment
pub fn render_table(table: &TableViewModel) -> String {
    let mut html = String::from(
        "<div id='transactions-table' class='bg-white rounded-lg border overflow-hidden'>",
    );

    if let Some(error) = table.last_error() {
        html.push_str(&format!(
            "<div class='bg-red-50 text-red-700 text-sm px-4 py-2'>Error fetching transactions: {}</div>",
            escape_html(error)
        ));
    }

    html.push_str("<table class='min-w-full'><thead class='bg-gray-50'><tr>");
    for column in table.columns() {
        html.push_str(&format!(
            r#"<th class='px-4 py-2 text-left text-xs font-medium text-gray-500 uppercase'><button hx-post='/transactions/sort' hx-vals='{{"field": "{}"}}' hx-target='#transactions-table' hx-swap='outerHTML'>{}{}</button></th>"#,
            escape_html(&column.key),
            escape_html(&column.label),
            sort_indicator(table, &column.key)
        ));
    }
    html.push_str("<th></th></tr></thead><tbody>");

    let rows = table.page_rows();
    if rows.is_empty() {
        html.push_str(&format!(
            "<tr><td colspan='{}' class='px-4 py-8 text-center text-gray-500 text-sm'>No transactions</td></tr>",
            table.columns().len() + 1
        ));
    }
    for record in rows {
        html.push_str(&render_row(table, record));
    }
    html.push_str("</tbody></table>");
    html.push_str(&render_footer(table));
    html.push_str("</div>");
    html
}
