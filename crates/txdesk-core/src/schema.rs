//! Field descriptor tables
//!
//! A schema is the ordered list of fields a form shows for one record
//! type, with each field's widget kind, choices and validation flags.

use crate::error::{CoreError, CoreResult};
use crate::models::Record;
use crate::types::{FieldKind, FieldValue};
use serde::Serialize;
use std::collections::HashSet;
use txdesk_config::FieldConfig;
use txdesk_utils::humanize_key;

pub const TRANSACTION_TYPE_OPTIONS: [&str; 4] =
    ["Online", "Offline", "Bank Transfer", "Credit Card"];
pub const CURRENCY_OPTIONS: [&str; 3] = ["USD", "EUR", "GBP"];
pub const TYPE_OPTIONS: [&str; 2] = ["Credit", "Debit"];
pub const CATEGORY_OPTIONS: [&str; 3] = ["Invoice", "Payment", "Subscription"];
pub const COMPENSATION_TYPE_OPTIONS: [&str; 3] = ["Bonus", "Commission", "Salary"];

/// One form field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    pub options: Vec<String>,
    pub required: bool,
    /// Hidden on new records, disabled on saved ones
    pub read_only: bool,
}

impl FieldDescriptor {
    pub fn new(key: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            options: Vec::new(),
            required: false,
            read_only: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Validation message for a value, if it fails
    pub fn check(&self, value: &FieldValue) -> Option<String> {
        if self.required && value.is_blank() {
            return Some(format!("{} is required", self.label));
        }
        None
    }
}

impl From<&FieldConfig> for FieldDescriptor {
    fn from(config: &FieldConfig) -> Self {
        let label = config
            .label
            .clone()
            .unwrap_or_else(|| humanize_key(&config.key));
        Self {
            key: config.key.clone(),
            label,
            kind: config.kind,
            options: config.options.clone(),
            required: config.required,
            read_only: config.read_only,
        }
    }
}

/// A field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Ordered descriptor table for one record type
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FieldSchema {
    fields: Vec<FieldDescriptor>,
}

impl FieldSchema {
    /// Build a schema, rejecting empty and duplicate keys
    pub fn new(fields: Vec<FieldDescriptor>) -> CoreResult<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if field.key.trim().is_empty() {
                return Err(CoreError::SchemaError {
                    message: "field key cannot be empty".to_string(),
                });
            }
            if !seen.insert(field.key.as_str()) {
                return Err(CoreError::SchemaError {
                    message: format!("duplicate field key '{}'", field.key),
                });
            }
        }
        Ok(Self { fields })
    }

    /// Built-in transaction table, in blank-record key order
    pub fn transaction() -> Self {
        Self {
            fields: vec![
                FieldDescriptor::new("id", "ID", FieldKind::Number).read_only(),
                FieldDescriptor::new("transactionId", "Transaction ID", FieldKind::Text)
                    .read_only(),
                FieldDescriptor::new("date", "Date", FieldKind::Date),
                FieldDescriptor::new("amount", "Amount", FieldKind::Number).required(),
                FieldDescriptor::new("status", "Status", FieldKind::Choice).required(),
                FieldDescriptor::new("createdDate", "Created Date", FieldKind::Date).required(),
                FieldDescriptor::new("description", "Description", FieldKind::Text),
                FieldDescriptor::new("originAccount", "Origin Account", FieldKind::Text)
                    .required(),
                FieldDescriptor::new("destinationAccount", "Destination Account", FieldKind::Text),
                FieldDescriptor::new("category", "Category", FieldKind::Choice)
                    .with_options(&CATEGORY_OPTIONS),
                FieldDescriptor::new("type", "Type", FieldKind::Choice).with_options(&TYPE_OPTIONS),
                FieldDescriptor::new("currency", "Currency", FieldKind::Choice)
                    .with_options(&CURRENCY_OPTIONS),
                FieldDescriptor::new("isActive", "Is Active", FieldKind::Toggle).required(),
                FieldDescriptor::new("transactionType", "Transaction Type", FieldKind::Choice)
                    .with_options(&TRANSACTION_TYPE_OPTIONS)
                    .required(),
                FieldDescriptor::new("isRecurring", "Is Recurring", FieldKind::Toggle),
            ],
        }
    }

    pub fn channel() -> Self {
        Self {
            fields: vec![
                FieldDescriptor::new("channelName", "Channel Name", FieldKind::Text).required(),
                FieldDescriptor::new("description", "Description", FieldKind::Text),
                FieldDescriptor::new("isActive", "Is Active", FieldKind::Toggle).required(),
            ],
        }
    }

    pub fn territory() -> Self {
        Self {
            fields: vec![
                FieldDescriptor::new("territoryName", "Territory Name", FieldKind::Text).required(),
                FieldDescriptor::new("region", "Region", FieldKind::Text),
                FieldDescriptor::new("isActive", "Is Active", FieldKind::Toggle).required(),
            ],
        }
    }

    pub fn compensation() -> Self {
        Self {
            fields: vec![
                FieldDescriptor::new("compensationAmount", "Compensation Amount", FieldKind::Number)
                    .required(),
                FieldDescriptor::new("compensationType", "Compensation Type", FieldKind::Choice)
                    .with_options(&COMPENSATION_TYPE_OPTIONS)
                    .required(),
                FieldDescriptor::new("isActive", "Is Active", FieldKind::Toggle).required(),
            ],
        }
    }

    /// Schema from a configured field table
    pub fn from_config(fields: &[FieldConfig]) -> CoreResult<Self> {
        Self::new(fields.iter().map(FieldDescriptor::from).collect())
    }

    /// Transaction schema for a form config: the configured table or the
    /// built-in one, with status choices filled from the config
    pub fn for_transactions(form: &txdesk_config::FormConfig) -> CoreResult<Self> {
        let mut schema = match &form.fields {
            Some(fields) => Self::from_config(fields)?,
            None => Self::transaction(),
        };
        let status_unset = schema
            .descriptor("status")
            .map(|d| d.options.is_empty())
            .unwrap_or(false);
        if status_unset {
            schema.set_options("status", form.status_options.clone());
        }
        Ok(schema)
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn descriptor(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Fields a form shows; read-only fields are left out for new records
    pub fn visible_fields(&self, is_new: bool) -> Vec<&FieldDescriptor> {
        self.fields
            .iter()
            .filter(|f| !(is_new && f.read_only))
            .collect()
    }

    /// Replace a choice field's options; false if the key is unknown
    pub fn set_options(&mut self, key: &str, options: Vec<String>) -> bool {
        match self.fields.iter_mut().find(|f| f.key == key) {
            Some(field) => {
                field.options = options;
                true
            }
            None => false,
        }
    }

    /// Check every field of the record, in schema order
    pub fn validate<R: Record>(&self, record: &R) -> Vec<FieldError> {
        self.fields
            .iter()
            .filter_map(|descriptor| {
                let value = record.field(&descriptor.key).unwrap_or(FieldValue::Empty);
                descriptor.check(&value).map(|message| FieldError {
                    field: descriptor.key.clone(),
                    message,
                })
            })
            .collect()
    }
}
