//! Core of the txdesk transaction front-end
//!
//! - [`table::TableViewModel`]: sorts and paginates the fetched list
//! - [`form::FormController`]: draft record, tab/step navigation, validation
//! - [`page::PageController`]: list/add/edit modes, submit and notices
//!
//! Records are read and written through the [`store::TransactionStore`]
//! trait; this crate performs no I/O of its own.

pub mod editors;
pub mod error;
pub mod form;
pub mod models;
pub mod page;
pub mod schema;
pub mod store;
pub mod table;
pub mod types;

pub use editors::{AuxiliaryKind, EditSession, SubEditor};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use form::{FieldGroup, FormController, FormLayout, FormStep};
pub use models::{Channel, Compensation, Record, StatusOption, Territory, Transaction};
pub use page::{Notice, PageController, PageMode, SubmitOutcome};
pub use schema::{FieldDescriptor, FieldError, FieldSchema};
pub use store::{MemoryTransactionStore, StoreRef, TransactionStore};
pub use table::{Column, TableViewModel};
pub use types::{FieldKind, FieldValue, NoticeSeverity, SortDirection};
