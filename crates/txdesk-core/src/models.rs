//! Record types exchanged with the transaction store
//!
//! Field names follow the store's camelCase JSON. Every record type
//! implements [`Record`] so forms, validation and sorting can address
//! fields by key without reflection.

use crate::error::{CoreError, CoreResult};
use crate::types::FieldValue;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Keyed field access shared by all editable records
pub trait Record: Clone + Send + Sync + 'static {
    /// Store identifier; 0 for a record not yet saved
    fn id(&self) -> i64;

    /// Value of a field, `None` for a key the record does not have
    fn field(&self, key: &str) -> Option<FieldValue>;

    /// Overwrite one field
    fn set_field(&mut self, key: &str, value: FieldValue) -> CoreResult<()>;

    /// Record used when starting from scratch
    fn blank() -> Self;

    fn is_new(&self) -> bool {
        self.id() == 0
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub origin_account: Option<String>,
    #[serde(default)]
    pub destination_account: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub is_recurring: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub territory: Option<Territory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compensation: Option<Compensation>,
}

impl Record for Transaction {
    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        let value = match key {
            "id" => FieldValue::Integer(self.id),
            "transactionId" => text_value(&self.transaction_id),
            "date" => text_value(&self.date),
            "amount" => decimal_value(self.amount),
            "status" => text_value(&self.status),
            "createdDate" => text_value(&self.created_date),
            "description" => text_value(&self.description),
            "originAccount" => text_value(&self.origin_account),
            "destinationAccount" => text_value(&self.destination_account),
            "category" => text_value(&self.category),
            "type" => text_value(&self.kind),
            "currency" => text_value(&self.currency),
            "isActive" => flag_value(self.is_active),
            "transactionType" => text_value(&self.transaction_type),
            "isRecurring" => flag_value(self.is_recurring),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, key: &str, value: FieldValue) -> CoreResult<()> {
        match key {
            "id" => self.id = into_integer(key, value)?,
            "transactionId" => self.transaction_id = into_text(key, value)?,
            "date" => self.date = into_text(key, value)?,
            "amount" => self.amount = into_decimal(key, value)?,
            "status" => self.status = into_text(key, value)?,
            "createdDate" => self.created_date = into_text(key, value)?,
            "description" => self.description = into_text(key, value)?,
            "originAccount" => self.origin_account = into_text(key, value)?,
            "destinationAccount" => self.destination_account = into_text(key, value)?,
            "category" => self.category = into_text(key, value)?,
            "type" => self.kind = into_text(key, value)?,
            "currency" => self.currency = into_text(key, value)?,
            "isActive" => self.is_active = into_flag(key, value)?,
            "transactionType" => self.transaction_type = into_text(key, value)?,
            "isRecurring" => self.is_recurring = into_flag(key, value)?,
            _ => {
                return Err(CoreError::UnknownField {
                    field: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Empty strings, zero amount, active and not recurring
    fn blank() -> Self {
        let empty = || Some(String::new());
        Self {
            id: 0,
            transaction_id: empty(),
            date: empty(),
            amount: Some(Decimal::ZERO),
            status: empty(),
            created_date: empty(),
            description: empty(),
            origin_account: empty(),
            destination_account: empty(),
            category: empty(),
            kind: empty(),
            currency: empty(),
            is_active: Some(true),
            transaction_type: empty(),
            is_recurring: Some(false),
            channel: None,
            territory: None,
            compensation: None,
        }
    }
}

/// Channel a transaction came through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl Record for Channel {
    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "id" => Some(FieldValue::Integer(self.id)),
            "channelName" => Some(text_value(&self.channel_name)),
            "description" => Some(text_value(&self.description)),
            "isActive" => Some(flag_value(self.is_active)),
            _ => None,
        }
    }

    fn set_field(&mut self, key: &str, value: FieldValue) -> CoreResult<()> {
        match key {
            "id" => self.id = into_integer(key, value)?,
            "channelName" => self.channel_name = into_text(key, value)?,
            "description" => self.description = into_text(key, value)?,
            "isActive" => self.is_active = into_flag(key, value)?,
            _ => {
                return Err(CoreError::UnknownField {
                    field: key.to_string(),
                })
            }
        }
        Ok(())
    }

    fn blank() -> Self {
        Self {
            id: 0,
            channel_name: Some(String::new()),
            description: Some(String::new()),
            is_active: Some(true),
        }
    }
}

/// Sales territory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Territory {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub territory_name: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl Record for Territory {
    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "id" => Some(FieldValue::Integer(self.id)),
            "territoryName" => Some(text_value(&self.territory_name)),
            "region" => Some(text_value(&self.region)),
            "isActive" => Some(flag_value(self.is_active)),
            _ => None,
        }
    }

    fn set_field(&mut self, key: &str, value: FieldValue) -> CoreResult<()> {
        match key {
            "id" => self.id = into_integer(key, value)?,
            "territoryName" => self.territory_name = into_text(key, value)?,
            "region" => self.region = into_text(key, value)?,
            "isActive" => self.is_active = into_flag(key, value)?,
            _ => {
                return Err(CoreError::UnknownField {
                    field: key.to_string(),
                })
            }
        }
        Ok(())
    }

    fn blank() -> Self {
        Self {
            id: 0,
            territory_name: Some(String::new()),
            region: Some(String::new()),
            is_active: Some(true),
        }
    }
}

/// Compensation paid on a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Compensation {
    #[serde(default)]
    pub id: i64,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub compensation_amount: Option<Decimal>,
    #[serde(default)]
    pub compensation_type: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl Record for Compensation {
    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "id" => Some(FieldValue::Integer(self.id)),
            "compensationAmount" => Some(decimal_value(self.compensation_amount)),
            "compensationType" => Some(text_value(&self.compensation_type)),
            "isActive" => Some(flag_value(self.is_active)),
            _ => None,
        }
    }

    fn set_field(&mut self, key: &str, value: FieldValue) -> CoreResult<()> {
        match key {
            "id" => self.id = into_integer(key, value)?,
            "compensationAmount" => self.compensation_amount = into_decimal(key, value)?,
            "compensationType" => self.compensation_type = into_text(key, value)?,
            "isActive" => self.is_active = into_flag(key, value)?,
            _ => {
                return Err(CoreError::UnknownField {
                    field: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Amount starts empty so the required check catches it
    fn blank() -> Self {
        Self {
            id: 0,
            compensation_amount: None,
            compensation_type: Some(String::new()),
            is_active: Some(true),
        }
    }
}

/// A selectable transaction status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOption {
    pub id: i64,
    pub name: String,
}

// ==================== Field conversion helpers ====================

fn text_value(value: &Option<String>) -> FieldValue {
    match value {
        Some(s) => FieldValue::Text(s.clone()),
        None => FieldValue::Empty,
    }
}

fn decimal_value(value: Option<Decimal>) -> FieldValue {
    value.map(FieldValue::Number).unwrap_or(FieldValue::Empty)
}

fn flag_value(value: Option<bool>) -> FieldValue {
    value.map(FieldValue::Flag).unwrap_or(FieldValue::Empty)
}

fn mismatch(key: &str, expected: &str, got: &FieldValue) -> CoreError {
    CoreError::InvalidField {
        field: key.to_string(),
        message: format!("expected {}, got {:?}", expected, got),
    }
}

fn into_text(key: &str, value: FieldValue) -> CoreResult<Option<String>> {
    match value {
        FieldValue::Empty => Ok(None),
        FieldValue::Text(s) => Ok(Some(s)),
        other => Err(mismatch(key, "text", &other)),
    }
}

fn into_decimal(key: &str, value: FieldValue) -> CoreResult<Option<Decimal>> {
    match value {
        FieldValue::Empty => Ok(None),
        FieldValue::Number(n) => Ok(Some(n)),
        FieldValue::Integer(i) => Ok(Some(Decimal::from(i))),
        other => Err(mismatch(key, "a number", &other)),
    }
}

fn into_flag(key: &str, value: FieldValue) -> CoreResult<Option<bool>> {
    match value {
        FieldValue::Empty => Ok(None),
        FieldValue::Flag(b) => Ok(Some(b)),
        other => Err(mismatch(key, "a flag", &other)),
    }
}

fn into_integer(key: &str, value: FieldValue) -> CoreResult<i64> {
    match value {
        FieldValue::Empty => Ok(0),
        FieldValue::Integer(i) => Ok(i),
        other => Err(mismatch(key, "an integer", &other)),
    }
}
