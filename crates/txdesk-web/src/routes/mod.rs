//! Route modules for the HTTP server
//!
//! - transactions: table, search, sort, pagination, add/edit entry points
//! - form: form navigation, submit, sub-editors, notices
//! - settings: settings page
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: HTML rendering

pub mod form;
pub mod settings;
pub mod transactions;
