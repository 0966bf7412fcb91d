//! Table view-model
//!
//! Holds the last fetched transaction list and derives the sorted,
//! paginated slice the table renders. Fetching is server-side filtered by
//! the search query; sorting and paging happen here.

use crate::error::{CoreError, CoreResult};
use crate::models::{Record, Transaction};
use crate::store::TransactionStore;
use crate::types::{FieldKind, FieldValue, SortDirection};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use txdesk_config::PaginationConfig;

/// A sortable table column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub key: String,
    pub label: String,
    /// Decides how values compare when sorting
    pub kind: FieldKind,
}

impl Column {
    pub fn new(key: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
        }
    }
}

pub fn default_columns() -> Vec<Column> {
    vec![
        Column::new("transactionId", "Transaction ID", FieldKind::Text),
        Column::new("date", "Date", FieldKind::Date),
        Column::new("amount", "Amount", FieldKind::Number),
        Column::new("status", "Status", FieldKind::Choice),
        Column::new("createdDate", "Created Date", FieldKind::Date),
    ]
}

pub const DEFAULT_SORT_FIELD: &str = "transactionId";

#[derive(Debug, Clone)]
pub struct TableViewModel {
    columns: Vec<Column>,
    records: Vec<Transaction>,
    /// Indices into `records` in display order
    order: Vec<usize>,
    sort_field: String,
    sort_direction: SortDirection,
    page: usize,
    page_size: usize,
    page_size_options: Vec<usize>,
    query: String,
    refresh_flag: bool,
    stale: bool,
    last_error: Option<String>,
}

impl Default for TableViewModel {
    fn default() -> Self {
        Self::new(default_columns(), 5, vec![5, 10, 25])
    }
}

impl TableViewModel {
    /// Empty table that needs a first fetch
    pub fn new(columns: Vec<Column>, page_size: usize, page_size_options: Vec<usize>) -> Self {
        Self {
            columns,
            records: Vec::new(),
            order: Vec::new(),
            sort_field: DEFAULT_SORT_FIELD.to_string(),
            sort_direction: SortDirection::Asc,
            page: 0,
            page_size: page_size.max(1),
            page_size_options,
            query: String::new(),
            refresh_flag: false,
            stale: true,
            last_error: None,
        }
    }

    pub fn from_config(pagination: &PaginationConfig) -> Self {
        Self::new(
            default_columns(),
            pagination.rows_per_page,
            pagination.rows_per_page_options.clone(),
        )
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn sort_field(&self) -> &str {
        &self.sort_field
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Flips on every refresh request
    pub fn refresh_flag(&self) -> bool {
        self.refresh_flag
    }

    pub fn needs_fetch(&self) -> bool {
        self.stale
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn page_count(&self) -> usize {
        self.records.len().div_ceil(self.page_size)
    }

    fn last_page(&self) -> usize {
        self.page_count().saturating_sub(1)
    }

    /// Records in fetch order
    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn find(&self, id: i64) -> Option<&Transaction> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Replace the whole collection, keeping the current sort
    pub fn set_records(&mut self, records: Vec<Transaction>) {
        self.records = records;
        self.resort();
        self.page = self.page.min(self.last_page());
    }

    /// Sort by a column: the same column flips direction, a new one
    /// starts ascending
    pub fn sort_by(&mut self, field: &str) -> CoreResult<()> {
        if self.column(field).is_none() {
            return Err(CoreError::UnknownColumn {
                column: field.to_string(),
            });
        }
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_field = field.to_string();
            self.sort_direction = SortDirection::Asc;
        }
        self.resort();
        Ok(())
    }

    /// Sort by a column in an explicit direction
    pub fn sort(&mut self, field: &str, direction: SortDirection) -> CoreResult<()> {
        if self.column(field).is_none() {
            return Err(CoreError::UnknownColumn {
                column: field.to_string(),
            });
        }
        self.sort_field = field.to_string();
        self.sort_direction = direction;
        self.resort();
        Ok(())
    }

    fn resort(&mut self) {
        let kind = self
            .column(&self.sort_field)
            .map(|c| c.kind)
            .unwrap_or(FieldKind::Text);
        let field = self.sort_field.as_str();
        let direction = self.sort_direction;
        let records = &self.records;

        let mut order: Vec<usize> = (0..records.len()).collect();
        order.sort_by(|&a, &b| {
            let left = records[a].field(field).unwrap_or(FieldValue::Empty);
            let right = records[b].field(field).unwrap_or(FieldValue::Empty);
            let ordering = compare_values(kind, &left, &right);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        self.order = order;
    }

    /// Records in display order
    pub fn sorted(&self) -> Vec<&Transaction> {
        self.order.iter().map(|&i| &self.records[i]).collect()
    }

    /// The slice of sorted records on the current page
    pub fn page_rows(&self) -> Vec<&Transaction> {
        self.order
            .iter()
            .skip(self.page.saturating_mul(self.page_size))
            .take(self.page_size)
            .map(|&i| &self.records[i])
            .collect()
    }

    /// Select a page; past-the-end requests land on the last page
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page = page.min(self.last_page());
        self.page
    }

    /// Change the page size and go back to the first page
    pub fn set_page_size(&mut self, size: usize) -> CoreResult<()> {
        if size == 0 {
            return Err(CoreError::InvalidPageSize { size });
        }
        self.page_size = size;
        self.page = 0;
        Ok(())
    }

    /// Store the query and mark the list for a re-fetch
    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_string();
        self.request_refresh();
    }

    pub fn request_refresh(&mut self) {
        self.refresh_flag = !self.refresh_flag;
        self.stale = true;
    }

    /// Fetch when a refresh was requested; returns whether it fetched
    pub async fn sync(&mut self, store: &dyn TransactionStore) -> CoreResult<bool> {
        if !self.stale {
            return Ok(false);
        }
        self.fetch(store).await.map(|_| true)
    }

    /// Fetch unconditionally, replacing the collection on success
    ///
    /// On failure the previous records stay and the error is kept for
    /// display.
    pub async fn fetch(&mut self, store: &dyn TransactionStore) -> CoreResult<()> {
        self.stale = false;
        match store.fetch_transactions(&self.query).await {
            Ok(records) => {
                log::debug!(
                    "Fetched {} transactions for query {:?}",
                    records.len(),
                    self.query
                );
                self.set_records(records);
                self.last_error = None;
                Ok(())
            }
            Err(error) => {
                log::error!("Error fetching transactions: {}", error);
                self.last_error = Some(error.to_string());
                Err(error)
            }
        }
    }
}

/// Ascending comparison with empty values first
pub fn compare_values(kind: FieldKind, left: &FieldValue, right: &FieldValue) -> Ordering {
    match (left.is_empty(), right.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }

    if kind == FieldKind::Date {
        return date_key(left).cmp(&date_key(right));
    }

    match (left, right) {
        (FieldValue::Number(a), FieldValue::Number(b)) => a.cmp(b),
        (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
        (FieldValue::Number(a), FieldValue::Integer(b)) => a.cmp(&Decimal::from(*b)),
        (FieldValue::Integer(a), FieldValue::Number(b)) => Decimal::from(*a).cmp(b),
        (FieldValue::Text(a), FieldValue::Text(b)) => compare_text(a, b),
        _ => Ordering::Equal,
    }
}

/// Unparseable dates sort after empty values and before real dates
fn date_key(value: &FieldValue) -> Option<NaiveDateTime> {
    match value {
        FieldValue::Text(text) => parse_date(text),
        _ => None,
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Parse the date shapes the store sends
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}
