//! Transaction routes - table, search, sort, pagination
//!
//! Structure:
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: Full page and table rendering

pub mod api;
pub mod page;

pub use api::{
    api_transactions, htmx_transaction_edit, htmx_transaction_new, htmx_transactions_list,
    htmx_transactions_page, htmx_transactions_page_size, htmx_transactions_search,
    htmx_transactions_sort, TransactionsResponse,
};

pub use page::{page_transactions, render_notice, render_table, render_workspace};
