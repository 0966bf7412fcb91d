//! Page controller
//!
//! Owns the table and, while a form is open, the edit session. The page
//! is in exactly one of three modes: listing, adding a new transaction, or
//! editing an existing one.

use crate::editors::{AuxiliaryKind, EditSession};
use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::form::FormLayout;
use crate::models::{Record, Transaction};
use crate::schema::{FieldError, FieldSchema};
use crate::store::StoreRef;
use crate::table::TableViewModel;
use crate::types::NoticeSeverity;
use serde::Serialize;
use std::collections::HashMap;
use txdesk_config::Config;

pub const CREATED_MESSAGE: &str = "Transaction created successfully";
pub const UPDATED_MESSAGE: &str = "Transaction updated successfully";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save transaction";

/// Transient message shown above the table or form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    pub severity: NoticeSeverity,
}

impl Notice {
    pub fn success(message: &str) -> Self {
        Self {
            message: message.to_string(),
            severity: NoticeSeverity::Success,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            severity: NoticeSeverity::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PageMode {
    List,
    Adding(Box<EditSession>),
    Editing {
        target: Transaction,
        session: Box<EditSession>,
    },
}

/// Result of submitting the open form
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created,
    Updated,
    /// Validation failed; the form moved to `group`
    Invalid { fields: Vec<String>, group: usize },
    /// The store rejected the write
    Failed(CoreError),
    /// No form was open
    NotEditing,
}

pub struct PageController {
    store: StoreRef,
    table: TableViewModel,
    mode: PageMode,
    notice: Option<Notice>,
    schema: FieldSchema,
    layout: FormLayout,
    logger: Box<dyn ErrorLogger>,
}

impl PageController {
    pub fn new(
        store: StoreRef,
        table: TableViewModel,
        schema: FieldSchema,
        layout: FormLayout,
    ) -> Self {
        Self {
            store,
            table,
            mode: PageMode::List,
            notice: None,
            schema,
            layout,
            logger: Box::new(DefaultErrorLogger),
        }
    }

    /// Build table, schema and layout from the configuration
    pub fn from_config(store: StoreRef, config: &Config) -> CoreResult<Self> {
        let schema = FieldSchema::for_transactions(&config.form)?;
        Ok(Self::new(
            store,
            TableViewModel::from_config(&config.pagination),
            schema,
            FormLayout::from_config(&config.form),
        ))
    }

    pub fn with_logger(mut self, logger: Box<dyn ErrorLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn table(&self) -> &TableViewModel {
        &self.table
    }

    pub fn mode(&self) -> &PageMode {
        &self.mode
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn is_adding(&self) -> bool {
        matches!(self.mode, PageMode::Adding(_))
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, PageMode::Editing { .. })
    }

    pub fn edit_target(&self) -> Option<&Transaction> {
        match &self.mode {
            PageMode::Editing { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.mode {
            PageMode::List => None,
            PageMode::Adding(session) => Some(&**session),
            PageMode::Editing { session, .. } => Some(&**session),
        }
    }

    pub fn session_mut(&mut self) -> CoreResult<&mut EditSession> {
        match &mut self.mode {
            PageMode::List => Err(CoreError::NotEditing),
            PageMode::Adding(session) => Ok(&mut **session),
            PageMode::Editing { session, .. } => Ok(&mut **session),
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn new_session(&self, draft: Transaction) -> Box<EditSession> {
        Box::new(EditSession::new(
            self.schema.clone(),
            self.layout.clone(),
            draft,
        ))
    }

    /// Open the form on a blank draft
    pub fn add(&mut self) {
        let session = self.new_session(Transaction::blank());
        self.mode = PageMode::Adding(session);
    }

    /// Open the form on a copy of a record
    pub fn edit(&mut self, record: Transaction) {
        let session = self.new_session(record.clone());
        self.mode = PageMode::Editing {
            target: record,
            session,
        };
    }

    /// Edit a record currently in the table
    pub fn edit_by_id(&mut self, id: i64) -> CoreResult<()> {
        let record = self
            .table
            .find(id)
            .cloned()
            .ok_or(CoreError::TransactionNotFound { id })?;
        self.edit(record);
        Ok(())
    }

    /// Back to the list, dropping the draft
    pub fn cancel(&mut self) {
        self.mode = PageMode::List;
    }

    /// Validate the open form and write it to the store
    ///
    /// Creates when adding, updates when editing. On success the page
    /// returns to the list and re-fetches; on a store failure the form and
    /// draft stay as they were.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let (record, is_update) = match &mut self.mode {
            PageMode::List => return SubmitOutcome::NotEditing,
            PageMode::Adding(session) => match session.finish() {
                Ok(record) => (record, false),
                Err(error) => return invalid_outcome(error, session),
            },
            PageMode::Editing { session, .. } => match session.finish() {
                Ok(record) => (record, true),
                Err(error) => return invalid_outcome(error, session),
            },
        };

        let (operation, result) = if is_update {
            ("update_transaction", self.store.update_transaction(&record).await)
        } else {
            ("create_transaction", self.store.create_transaction(&record).await)
        };

        match result {
            Ok(()) => {
                let message = if is_update {
                    UPDATED_MESSAGE
                } else {
                    CREATED_MESSAGE
                };
                log::info!("{} (id {})", message, record.id);
                self.notice = Some(Notice::success(message));
                self.mode = PageMode::List;
                self.table.request_refresh();
                // A failed re-fetch is recorded on the table; the save stands.
                let _ = self.refresh().await;
                if is_update {
                    SubmitOutcome::Updated
                } else {
                    SubmitOutcome::Created
                }
            }
            Err(error) => {
                let context = ErrorContext::new(operation)
                    .with_data("transaction_id", serde_json::json!(record.id));
                self.logger.log_error(&error, &context);
                self.notice = Some(Notice::error(SAVE_FAILED_MESSAGE));
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// Fetch if the table asked for it
    pub async fn refresh(&mut self) -> CoreResult<bool> {
        let store = self.store.clone();
        self.table.sync(store.as_ref()).await
    }

    /// Search server-side; always re-fetches, even for the same query
    pub async fn search(&mut self, query: &str) -> CoreResult<()> {
        self.table.set_query(query);
        self.refresh().await.map(|_| ())
    }

    pub fn sort_by(&mut self, field: &str) -> CoreResult<()> {
        self.table.sort_by(field)
    }

    pub fn set_page(&mut self, page: usize) -> usize {
        self.table.set_page(page)
    }

    pub fn set_page_size(&mut self, size: usize) -> CoreResult<()> {
        self.table.set_page_size(size)
    }

    /// Load status choices from the store, keeping the configured ones
    /// when the store has none or cannot be reached
    pub async fn load_status_options(&mut self) {
        match self.store.fetch_statuses().await {
            Ok(statuses) if !statuses.is_empty() => {
                let names: Vec<String> = statuses.into_iter().map(|s| s.name).collect();
                log::debug!("Loaded {} status options", names.len());
                self.schema.set_options("status", names.clone());
                if let Ok(session) = self.session_mut() {
                    session.form.set_options("status", names);
                }
            }
            Ok(_) => log::debug!("Store returned no statuses, keeping configured options"),
            Err(error) => {
                let context = ErrorContext::new("fetch_statuses");
                self.logger.log_warning(
                    &format!("Error fetching statuses, keeping configured options: {}", error),
                    &context,
                );
            }
        }
    }

    // ==================== Form passthroughs ====================

    /// Apply posted inputs to the active group of the main form
    pub fn apply_inputs(
        &mut self,
        inputs: &HashMap<String, String>,
    ) -> CoreResult<Vec<FieldError>> {
        Ok(self.session_mut()?.form.apply_inputs(inputs))
    }

    pub fn next_group(&mut self) -> CoreResult<usize> {
        Ok(self.session_mut()?.form.next())
    }

    pub fn previous_group(&mut self) -> CoreResult<usize> {
        Ok(self.session_mut()?.form.back())
    }

    pub fn jump_to_group(&mut self, index: usize) -> CoreResult<usize> {
        self.session_mut()?.form.jump(index)
    }

    pub fn open_editor(&mut self, kind: AuxiliaryKind) -> CoreResult<()> {
        self.session_mut()?.open_editor(kind);
        Ok(())
    }

    pub fn close_editor(&mut self, kind: AuxiliaryKind) -> CoreResult<()> {
        self.session_mut()?.close_editor(kind);
        Ok(())
    }

    /// Apply inputs to a sub-editor and save it
    pub fn save_editor(
        &mut self,
        kind: AuxiliaryKind,
        inputs: &HashMap<String, String>,
    ) -> CoreResult<()> {
        let session = self.session_mut()?;
        session.apply_editor_inputs(kind, inputs)?;
        session.save_editor(kind)
    }
}

fn invalid_outcome(error: CoreError, session: &EditSession) -> SubmitOutcome {
    match error {
        CoreError::ValidationFailed { fields } => SubmitOutcome::Invalid {
            fields,
            group: session.form.active_group(),
        },
        other => SubmitOutcome::Failed(other),
    }
}

impl std::fmt::Debug for PageController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageController")
            .field("mode", &self.mode)
            .field("notice", &self.notice)
            .field("table_total", &self.table.total())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusOption;
    use crate::store::{MemoryTransactionStore, TransactionStore};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn tx(id: i64, code: &str) -> Transaction {
        let mut t = Transaction::blank();
        t.id = id;
        t.transaction_id = Some(code.to_string());
        t.amount = Some(Decimal::new(1000, 2));
        t.status = Some("Pending".to_string());
        t.created_date = Some("2024-01-01".to_string());
        t.origin_account = Some("ACC-1".to_string());
        t.transaction_type = Some("Online".to_string());
        t
    }

    fn inputs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Counts writes and can be told to fail them
    #[derive(Default)]
    struct RecordingStore {
        inner: MemoryTransactionStore,
        writes: AtomicUsize,
        fail_writes: bool,
        fail_statuses: bool,
    }

    #[async_trait]
    impl TransactionStore for RecordingStore {
        async fn fetch_transactions(&self, q: &str) -> CoreResult<Vec<Transaction>> {
            self.inner.fetch_transactions(q).await
        }
        async fn create_transaction(&self, t: &Transaction) -> CoreResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes {
                return Err(CoreError::remote("create_transaction", "HTTP 500"));
            }
            self.inner.create_transaction(t).await
        }
        async fn update_transaction(&self, t: &Transaction) -> CoreResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes {
                return Err(CoreError::remote("update_transaction", "HTTP 500"));
            }
            self.inner.update_transaction(t).await
        }
        async fn fetch_statuses(&self) -> CoreResult<Vec<StatusOption>> {
            if self.fail_statuses {
                return Err(CoreError::remote("fetch_statuses", "HTTP 404"));
            }
            Ok(vec![
                StatusOption { id: 1, name: "Open".to_string() },
                StatusOption { id: 2, name: "Closed".to_string() },
            ])
        }
    }

    fn controller(store: Arc<RecordingStore>) -> PageController {
        PageController::from_config(store, &Config::default()).unwrap()
    }

    fn fill_new_form(page: &mut PageController) {
        page.apply_inputs(&inputs(&[
            ("amount", "15"),
            ("status", "Pending"),
            ("createdDate", "2024-05-01"),
            ("originAccount", "ACC-2"),
        ]))
        .unwrap();
        page.next_group().unwrap();
        page.apply_inputs(&inputs(&[("transactionType", "Online"), ("isActive", "on")]))
            .unwrap();
    }

    #[test]
    fn test_add_after_edit_is_blank() {
        let mut page = controller(Arc::new(RecordingStore::default()));
        page.edit(tx(3, "TX-3"));
        assert!(page.is_editing());
        page.add();
        assert!(page.is_adding());
        assert!(page.edit_target().is_none());
        assert_eq!(page.session().unwrap().form.draft(), &Transaction::blank());
    }

    #[test]
    fn test_edit_after_add() {
        let mut page = controller(Arc::new(RecordingStore::default()));
        page.add();
        page.edit(tx(3, "TX-3"));
        assert!(!page.is_adding());
        assert_eq!(page.edit_target().unwrap().id, 3);
        page.cancel();
        assert!(matches!(page.mode(), PageMode::List));
        assert!(page.session().is_none());
    }

    #[tokio::test]
    async fn test_successful_create() {
        let store = Arc::new(RecordingStore::default());
        let mut page = controller(store.clone());
        page.refresh().await.unwrap();
        let flag = page.table().refresh_flag();

        page.add();
        fill_new_form(&mut page);
        assert_eq!(page.submit().await, SubmitOutcome::Created);

        assert_eq!(page.notice(), Some(&Notice::success(CREATED_MESSAGE)));
        assert!(matches!(page.mode(), PageMode::List));
        assert_ne!(page.table().refresh_flag(), flag);
        assert!(!page.table().needs_fetch());
        assert_eq!(page.table().total(), 1);
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }

    fn stepper_controller(store: Arc<RecordingStore>) -> PageController {
        let mut config = Config::default();
        config.form.layout = txdesk_config::FormLayoutKind::Stepper;
        PageController::from_config(store, &config).unwrap()
    }

    fn all_fields() -> HashMap<String, String> {
        inputs(&[
            ("transactionType", "Online"),
            ("date", "2024-05-01"),
            ("amount", "42"),
            ("status", "Pending"),
            ("currency", "EUR"),
            ("isActive", "on"),
            ("createdDate", "2024-05-01"),
            ("originAccount", "ACC-9"),
        ])
    }

    #[tokio::test]
    async fn test_stepper_create_walks_every_step() {
        let store = Arc::new(RecordingStore::default());
        let mut page = stepper_controller(store.clone());
        page.add();
        let steps = page.session().unwrap().form.groups().len();
        assert_eq!(steps, 3);

        for _ in 0..steps {
            assert!(page.apply_inputs(&all_fields()).unwrap().is_empty());
            page.next_group().unwrap();
        }
        assert_eq!(page.submit().await, SubmitOutcome::Created);
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);

        let saved = store.inner.snapshot().await;
        assert_eq!(saved[0].origin_account.as_deref(), Some("ACC-9"));
        assert_eq!(saved[0].created_date.as_deref(), Some("2024-05-01"));
    }

    #[tokio::test]
    async fn test_stepper_missing_field_jumps_to_its_step() {
        let store = Arc::new(RecordingStore::default());
        let mut page = stepper_controller(store.clone());
        page.add();
        let mut partial = all_fields();
        partial.remove("originAccount");
        for _ in 0..3 {
            page.apply_inputs(&partial).unwrap();
            page.next_group().unwrap();
        }
        page.previous_group().unwrap();
        page.previous_group().unwrap();

        assert_eq!(
            page.submit().await,
            SubmitOutcome::Invalid {
                fields: vec!["originAccount".to_string()],
                group: 2,
            }
        );
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    /// Searches are applied in the order they reach the controller. A
    /// response to an older query that arrives late replaces the newer
    /// one; nothing ties a result to the query the user typed last.
    #[tokio::test]
    async fn test_late_search_result_replaces_newer_one() {
        let store = Arc::new(RecordingStore::default());
        store.inner.create_transaction(&tx(0, "RENT-1")).await.unwrap();
        store.inner.create_transaction(&tx(0, "COFFEE-1")).await.unwrap();
        let mut page = controller(store);

        page.search("coffee").await.unwrap();
        assert_eq!(page.table().total(), 1);
        page.search("rent").await.unwrap();

        assert_eq!(page.table().query(), "rent");
        let codes: Vec<_> = page
            .table()
            .records()
            .iter()
            .map(|t| t.transaction_id.clone())
            .collect();
        assert_eq!(codes, vec![Some("RENT-1".to_string())]);
    }

    #[tokio::test]
    async fn test_missing_amount_never_reaches_store() {
        let store = Arc::new(RecordingStore::default());
        let mut page = controller(store.clone());
        let mut draft = tx(0, "");
        draft.amount = None;
        page.add();
        page.session_mut().unwrap().form.reset(draft);
        page.next_group().unwrap();

        let outcome = page.submit().await;
        assert_eq!(
            outcome,
            SubmitOutcome::Invalid {
                fields: vec!["amount".to_string()],
                group: 0,
            }
        );
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
        assert!(page.is_adding());
        assert!(page.notice().is_none());
    }

    #[tokio::test]
    async fn test_update_existing() {
        let store = Arc::new(RecordingStore {
            inner: MemoryTransactionStore::with_transactions(vec![tx(1, "TX-1")]),
            ..Default::default()
        });
        let mut page = controller(store.clone());
        page.refresh().await.unwrap();
        page.edit_by_id(1).unwrap();
        page.apply_inputs(&inputs(&[("amount", "99"), ("status", "Completed")]))
            .unwrap();

        assert_eq!(page.submit().await, SubmitOutcome::Updated);
        assert_eq!(page.notice().unwrap().message, UPDATED_MESSAGE);
        let stored = store.inner.snapshot().await;
        assert_eq!(stored[0].amount, Some(Decimal::from(99)));
        assert_eq!(page.table().records()[0].status.as_deref(), Some("Completed"));
    }

    #[tokio::test]
    async fn test_store_failure_keeps_form() {
        let store = Arc::new(RecordingStore {
            fail_writes: true,
            ..Default::default()
        });
        let mut page = controller(store.clone());
        page.add();
        fill_new_form(&mut page);

        let outcome = page.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Failed(CoreError::Remote { .. })));
        assert_eq!(page.notice(), Some(&Notice::error(SAVE_FAILED_MESSAGE)));
        assert!(page.is_adding());
        let draft = page.session().unwrap().form.draft();
        assert_eq!(draft.origin_account.as_deref(), Some("ACC-2"));
        page.dismiss_notice();
        assert!(page.notice().is_none());
    }

    #[tokio::test]
    async fn test_submit_without_form() {
        let mut page = controller(Arc::new(RecordingStore::default()));
        assert_eq!(page.submit().await, SubmitOutcome::NotEditing);
        assert!(matches!(page.next_group(), Err(CoreError::NotEditing)));
    }

    #[tokio::test]
    async fn test_search_always_refetches() {
        let store = Arc::new(RecordingStore {
            inner: MemoryTransactionStore::with_transactions(vec![tx(1, "TX-1"), tx(2, "TX-2")]),
            ..Default::default()
        });
        let mut page = controller(store.clone());
        page.search("tx-2").await.unwrap();
        assert_eq!(page.table().total(), 1);

        store.inner.create_transaction(&tx(0, "TX-22")).await.unwrap();
        page.search("tx-2").await.unwrap();
        assert_eq!(page.table().total(), 2);
    }

    #[tokio::test]
    async fn test_status_options_from_store() {
        let mut page = controller(Arc::new(RecordingStore::default()));
        page.add();
        page.load_status_options().await;
        assert_eq!(
            page.schema().descriptor("status").unwrap().options,
            vec!["Open", "Closed"]
        );
        let form_options = &page
            .session()
            .unwrap()
            .form
            .schema()
            .descriptor("status")
            .unwrap()
            .options;
        assert_eq!(form_options, &vec!["Open".to_string(), "Closed".to_string()]);
    }

    #[tokio::test]
    async fn test_status_options_fallback() {
        let store = Arc::new(RecordingStore {
            fail_statuses: true,
            ..Default::default()
        });
        let mut page = controller(store);
        page.load_status_options().await;
        assert_eq!(
            page.schema().descriptor("status").unwrap().options,
            vec!["Pending", "Completed", "Failed"]
        );
    }

    #[tokio::test]
    async fn test_sub_editor_attachment_is_sent() {
        let store = Arc::new(RecordingStore::default());
        let mut page = controller(store.clone());
        page.add();
        fill_new_form(&mut page);
        page.open_editor(AuxiliaryKind::Channel).unwrap();
        page.save_editor(
            AuxiliaryKind::Channel,
            &inputs(&[("channelName", "Mobile"), ("isActive", "on")]),
        )
        .unwrap();

        assert_eq!(page.submit().await, SubmitOutcome::Created);
        let stored = store.inner.snapshot().await;
        let channel = stored[0].channel.as_ref().unwrap();
        assert_eq!(channel.channel_name.as_deref(), Some("Mobile"));
    }

    #[test]
    fn test_editor_requires_form() {
        let mut page = controller(Arc::new(RecordingStore::default()));
        assert!(matches!(
            page.open_editor(AuxiliaryKind::Territory),
            Err(CoreError::NotEditing)
        ));
    }
}
