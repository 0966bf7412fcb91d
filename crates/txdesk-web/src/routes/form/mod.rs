//! Form routes - tab/step navigation, submit, sub-editors, notices
//!
//! Every transition applies the posted inputs of the active group before
//! moving, so nothing typed on a tab is lost when switching tabs.
//!
//! Structure:
//! - api.rs: HTMX endpoints
//! - page.rs: Form, field and sub-editor rendering

pub mod api;
pub mod page;

pub use api::{
    htmx_editor_close, htmx_editor_open, htmx_editor_save, htmx_form_back, htmx_form_cancel,
    htmx_form_next, htmx_form_submit, htmx_form_tab, htmx_notice_dismiss,
};

pub use page::{render_field, render_form};
