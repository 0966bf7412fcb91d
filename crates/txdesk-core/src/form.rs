//! Form step/tab controller
//!
//! Splits a record's visible fields into groups (tabs or named steps),
//! tracks the active group, applies raw inputs to the draft and maps
//! validation errors back to the groups that contain them.

use crate::error::{CoreError, CoreResult};
use crate::models::Record;
use crate::schema::{FieldDescriptor, FieldError, FieldSchema};
use crate::types::{FieldKind, FieldValue, FormLayoutKind};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use txdesk_config::FormConfig;

/// A named step with a fixed field list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormStep {
    pub title: String,
    pub fields: Vec<String>,
}

impl FormStep {
    pub fn new(title: &str, fields: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            fields: fields.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// How fields are split across screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormLayout {
    /// Everything on one screen
    Single,
    /// Consecutive fixed-size groups, titled "Group N"
    Tabbed { group_size: usize },
    /// Named steps
    Stepper { steps: Vec<FormStep> },
}

impl Default for FormLayout {
    fn default() -> Self {
        FormLayout::Tabbed { group_size: 8 }
    }
}

impl FormLayout {
    /// The three-step transaction wizard
    pub fn transaction_steps() -> Self {
        FormLayout::Stepper {
            steps: vec![
                FormStep::new(
                    "Basic Details",
                    &["transactionId", "transactionType", "date", "amount", "isRecurring"],
                ),
                FormStep::new("Transaction Information", &["status", "currency"]),
                FormStep::new("Additional Information", &["description", "isActive"]),
            ],
        }
    }

    pub fn from_config(form: &FormConfig) -> Self {
        match form.layout {
            FormLayoutKind::Tabbed => FormLayout::Tabbed {
                group_size: form.fields_per_group.max(1),
            },
            FormLayoutKind::Stepper => FormLayout::transaction_steps(),
            FormLayoutKind::Single => FormLayout::Single,
        }
    }

    /// Partition the visible fields; always yields at least one group
    pub fn build_groups(&self, visible: &[&FieldDescriptor]) -> Vec<FieldGroup> {
        let keys: Vec<String> = visible.iter().map(|f| f.key.clone()).collect();
        let groups: Vec<FieldGroup> = match self {
            FormLayout::Single => vec![FieldGroup {
                title: "Details".to_string(),
                fields: keys,
            }],
            FormLayout::Tabbed { group_size } => keys
                .chunks((*group_size).max(1))
                .enumerate()
                .map(|(i, chunk)| FieldGroup {
                    title: format!("Group {}", i + 1),
                    fields: chunk.to_vec(),
                })
                .collect(),
            FormLayout::Stepper { steps } => {
                let mut groups: Vec<FieldGroup> = steps
                    .iter()
                    .map(|step| FieldGroup {
                        title: step.title.clone(),
                        fields: step
                            .fields
                            .iter()
                            .filter(|key| keys.contains(key))
                            .cloned()
                            .collect(),
                    })
                    .collect();
                // Visible fields no step names go on the last step
                let unclaimed: Vec<String> = keys
                    .iter()
                    .filter(|key| !steps.iter().any(|step| step.fields.contains(key)))
                    .cloned()
                    .collect();
                if groups.is_empty() {
                    groups.push(FieldGroup {
                        title: "Details".to_string(),
                        fields: unclaimed,
                    });
                } else if let Some(last) = groups.last_mut() {
                    last.fields.extend(unclaimed);
                }
                groups
            }
        };
        if groups.is_empty() {
            vec![FieldGroup {
                title: "Group 1".to_string(),
                fields: Vec::new(),
            }]
        } else {
            groups
        }
    }
}

/// Fields shown together on one tab or step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldGroup {
    pub title: String,
    pub fields: Vec<String>,
}

/// Draft record plus navigation and validation state
#[derive(Debug, Clone)]
pub struct FormController<R: Record> {
    schema: FieldSchema,
    layout: FormLayout,
    draft: R,
    groups: Vec<FieldGroup>,
    active: usize,
    errors: BTreeMap<String, String>,
    input_errors: BTreeMap<String, String>,
}

impl<R: Record> FormController<R> {
    pub fn new(schema: FieldSchema, layout: FormLayout, draft: R) -> Self {
        let groups = layout.build_groups(&schema.visible_fields(draft.is_new()));
        Self {
            schema,
            layout,
            draft,
            groups,
            active: 0,
            errors: BTreeMap::new(),
            input_errors: BTreeMap::new(),
        }
    }

    pub fn draft(&self) -> &R {
        &self.draft
    }

    pub fn into_draft(self) -> R {
        self.draft
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn layout(&self) -> &FormLayout {
        &self.layout
    }

    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    pub fn active_group(&self) -> usize {
        self.active
    }

    pub fn is_first_group(&self) -> bool {
        self.active == 0
    }

    pub fn is_last_group(&self) -> bool {
        self.active + 1 >= self.groups.len()
    }

    /// Descriptors of one group, in display order
    pub fn group_fields(&self, index: usize) -> Vec<&FieldDescriptor> {
        self.groups
            .get(index)
            .map(|group| {
                group
                    .fields
                    .iter()
                    .filter_map(|key| self.schema.descriptor(key))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn active_fields(&self) -> Vec<&FieldDescriptor> {
        self.group_fields(self.active)
    }

    /// Index of the group that shows a field
    pub fn group_of(&self, key: &str) -> Option<usize> {
        self.groups
            .iter()
            .position(|group| group.fields.iter().any(|f| f == key))
    }

    /// Advance one group, staying on the last
    pub fn next(&mut self) -> usize {
        if !self.is_last_group() {
            self.active += 1;
        }
        self.active
    }

    /// Go back one group, staying on the first
    pub fn back(&mut self) -> usize {
        self.active = self.active.saturating_sub(1);
        self.active
    }

    pub fn jump(&mut self, index: usize) -> CoreResult<usize> {
        if index >= self.groups.len() {
            return Err(CoreError::InvalidGroup {
                index,
                count: self.groups.len(),
            });
        }
        self.active = index;
        Ok(self.active)
    }

    /// Write a typed value into the draft
    pub fn set_value(&mut self, key: &str, value: FieldValue) -> CoreResult<()> {
        let descriptor = self
            .schema
            .descriptor(key)
            .ok_or_else(|| CoreError::UnknownField {
                field: key.to_string(),
            })?;
        if descriptor.read_only {
            return Err(CoreError::ReadOnlyField {
                field: key.to_string(),
            });
        }
        self.draft.set_field(key, value)?;
        self.input_errors.remove(key);
        self.errors.remove(key);
        Ok(())
    }

    /// Parse a raw input for a field and write it into the draft
    ///
    /// An unparseable value empties the field and is reported by the next
    /// validation pass.
    pub fn set_input(&mut self, key: &str, raw: &str) -> CoreResult<()> {
        let descriptor = self
            .schema
            .descriptor(key)
            .ok_or_else(|| CoreError::UnknownField {
                field: key.to_string(),
            })?;
        if descriptor.read_only {
            return Err(CoreError::ReadOnlyField {
                field: key.to_string(),
            });
        }
        match FieldValue::parse(descriptor.kind, raw) {
            Ok(value) => self.set_value(key, value),
            Err(reason) => {
                let message = format!("{} {}", descriptor.label, reason);
                self.draft.set_field(key, FieldValue::Empty)?;
                self.input_errors.insert(key.to_string(), message.clone());
                self.errors.insert(key.to_string(), message.clone());
                Err(CoreError::InvalidField {
                    field: key.to_string(),
                    message,
                })
            }
        }
    }

    /// Apply posted inputs for the active group's editable fields
    ///
    /// Toggle fields missing from the inputs are switched off, matching how
    /// browsers omit unchecked checkboxes.
    pub fn apply_inputs(&mut self, inputs: &HashMap<String, String>) -> Vec<FieldError> {
        let fields: Vec<(String, FieldKind)> = self
            .active_fields()
            .into_iter()
            .filter(|d| !d.read_only)
            .map(|d| (d.key.clone(), d.kind))
            .collect();

        let mut problems = Vec::new();
        for (key, kind) in fields {
            let raw = match (inputs.get(&key), kind) {
                (Some(raw), _) => raw.as_str(),
                (None, FieldKind::Toggle) => "",
                (None, _) => continue,
            };
            if let Err(error) = self.set_input(&key, raw) {
                let message = match error {
                    CoreError::InvalidField { message, .. } => message,
                    other => other.to_string(),
                };
                problems.push(FieldError {
                    field: key,
                    message,
                });
            }
        }
        problems
    }

    /// Current error message per field
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn error_for(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(|s| s.as_str())
    }

    /// Indices of groups holding at least one invalid field
    pub fn groups_with_errors(&self) -> BTreeSet<usize> {
        self.errors.keys().filter_map(|key| self.group_of(key)).collect()
    }

    /// Re-run validation over the whole draft; true when clean
    pub fn validate(&mut self) -> bool {
        let mut errors = self.input_errors.clone();
        for error in self.schema.validate(&self.draft) {
            errors.entry(error.field).or_insert(error.message);
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    /// Validate and hand back the draft
    ///
    /// On failure the lowest group containing an invalid field becomes
    /// active and the draft stays in the controller.
    pub fn submit(&mut self) -> CoreResult<R> {
        if self.validate() {
            return Ok(self.draft.clone());
        }

        if let Some(first) = self.groups_with_errors().into_iter().next() {
            self.active = first;
        }
        let fields = self
            .schema
            .fields()
            .iter()
            .filter(|d| self.errors.contains_key(&d.key))
            .map(|d| d.key.clone())
            .collect();
        log::debug!("Form submit rejected, errors: {:?}", self.errors);
        Err(CoreError::ValidationFailed { fields })
    }

    /// Start over with another draft
    pub fn reset(&mut self, draft: R) {
        self.groups = self
            .layout
            .build_groups(&self.schema.visible_fields(draft.is_new()));
        self.draft = draft;
        self.active = 0;
        self.errors.clear();
        self.input_errors.clear();
    }

    /// Replace a choice field's options
    pub fn set_options(&mut self, key: &str, options: Vec<String>) -> bool {
        self.schema.set_options(key, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Channel, Transaction};
    use rust_decimal::Decimal;

    fn tabbed(draft: Transaction) -> FormController<Transaction> {
        FormController::new(
            FieldSchema::transaction(),
            FormLayout::Tabbed { group_size: 8 },
            draft,
        )
    }

    fn complete_draft() -> Transaction {
        let mut tx = Transaction::blank();
        tx.amount = Some(Decimal::new(250, 0));
        tx.status = Some("Pending".to_string());
        tx.created_date = Some("2024-02-01".to_string());
        tx.origin_account = Some("ACC-1".to_string());
        tx.transaction_type = Some("Online".to_string());
        tx
    }

    #[test]
    fn test_tabbed_groups_for_new_record() {
        let form = tabbed(Transaction::blank());
        assert_eq!(form.groups().len(), 2);
        assert_eq!(form.groups()[0].title, "Group 1");
        assert_eq!(form.groups()[0].fields.len(), 8);
        assert_eq!(form.groups()[1].fields.len(), 5);
        assert_eq!(form.groups()[0].fields[0], "date");
        assert_eq!(form.group_of("transactionType"), Some(1));
        assert_eq!(form.group_of("transactionId"), None);
    }

    #[test]
    fn test_saved_record_shows_identifiers() {
        let mut tx = complete_draft();
        tx.id = 4;
        let form = tabbed(tx);
        assert_eq!(form.groups()[0].fields[0], "id");
        assert_eq!(form.group_of("transactionId"), Some(0));
    }

    #[test]
    fn test_next_and_back_clamp() {
        let mut form = tabbed(Transaction::blank());
        assert_eq!(form.back(), 0);
        assert_eq!(form.next(), 1);
        assert!(form.is_last_group());
        assert_eq!(form.next(), 1);
        assert_eq!(form.back(), 0);
        assert!(form.is_first_group());
    }

    #[test]
    fn test_stepper_back_at_first_step_stays() {
        let mut form = FormController::new(
            FieldSchema::transaction(),
            FormLayout::transaction_steps(),
            Transaction::blank(),
        );
        assert_eq!(form.groups().len(), 3);
        assert_eq!(form.back(), 0);
        assert_eq!(form.active_group(), 0);
        assert_eq!(
            form.groups()[0].fields,
            vec!["transactionType", "date", "amount", "isRecurring"]
        );
    }

    #[test]
    fn test_stepper_last_step_collects_unlisted_fields() {
        let form = FormController::new(
            FieldSchema::transaction(),
            FormLayout::transaction_steps(),
            Transaction::blank(),
        );
        assert_eq!(
            form.groups()[2].fields,
            vec![
                "description",
                "isActive",
                "createdDate",
                "originAccount",
                "destinationAccount",
                "category",
                "type"
            ]
        );
        let placed: usize = form.groups().iter().map(|g| g.fields.len()).sum();
        assert_eq!(placed, FieldSchema::transaction().visible_fields(true).len());
    }

    #[test]
    fn test_stepper_submit_after_filling_every_step() {
        let mut form = FormController::new(
            FieldSchema::transaction(),
            FormLayout::transaction_steps(),
            Transaction::blank(),
        );
        let inputs: HashMap<String, String> = [
            ("transactionType", "Online"),
            ("date", "2024-02-01"),
            ("amount", "99.5"),
            ("status", "Pending"),
            ("currency", "USD"),
            ("isActive", "on"),
            ("createdDate", "2024-02-01"),
            ("originAccount", "ACC-1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        for _ in 0..form.groups().len() {
            assert!(form.apply_inputs(&inputs).is_empty());
            form.next();
        }
        let record = form.submit().unwrap();
        assert_eq!(record.origin_account.as_deref(), Some("ACC-1"));
        assert_eq!(record.amount, Some(Decimal::new(995, 1)));
    }

    #[test]
    fn test_stepper_without_steps_has_one_group() {
        let form = FormController::new(
            FieldSchema::channel(),
            FormLayout::Stepper { steps: Vec::new() },
            Channel::blank(),
        );
        assert_eq!(form.groups().len(), 1);
        assert_eq!(form.groups()[0].title, "Details");
        assert_eq!(form.active_fields().len(), 3);
    }

    #[test]
    fn test_jump_out_of_range() {
        let mut form = tabbed(Transaction::blank());
        assert_eq!(form.jump(1).unwrap(), 1);
        assert!(matches!(
            form.jump(2),
            Err(CoreError::InvalidGroup { index: 2, count: 2 })
        ));
        assert_eq!(form.active_group(), 1);
    }

    #[test]
    fn test_single_layout() {
        let form =
            FormController::new(FieldSchema::channel(), FormLayout::Single, Channel::blank());
        assert_eq!(form.groups().len(), 1);
        assert_eq!(form.active_fields().len(), 3);
    }

    #[test]
    fn test_submit_jumps_to_lowest_error_group() {
        let mut tx = complete_draft();
        tx.transaction_type = Some(String::new());
        let mut form = tabbed(tx);
        let err = form.submit().unwrap_err();
        assert_eq!(
            err,
            CoreError::ValidationFailed {
                fields: vec!["transactionType".to_string()]
            }
        );
        assert_eq!(form.active_group(), 1);
        assert_eq!(form.error_for("transactionType"), Some("Transaction Type is required"));
    }

    #[test]
    fn test_missing_amount_lands_on_amount_group() {
        let mut tx = complete_draft();
        tx.amount = None;
        let mut form = tabbed(tx);
        form.next();
        assert!(form.submit().is_err());
        assert_eq!(form.active_group(), form.group_of("amount").unwrap());
        assert_eq!(form.active_group(), 0);
        assert_eq!(form.groups_with_errors().len(), 1);
    }

    #[test]
    fn test_submit_success_returns_draft() {
        let mut form = tabbed(complete_draft());
        let record = form.submit().unwrap();
        assert_eq!(record, complete_draft());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_read_only_write_rejected() {
        let mut form = tabbed(Transaction::blank());
        let err = form
            .set_value("transactionId", FieldValue::Text("X".to_string()))
            .unwrap_err();
        assert!(matches!(err, CoreError::ReadOnlyField { .. }));
        assert!(matches!(
            form.set_value("missing", FieldValue::Empty),
            Err(CoreError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_apply_inputs() {
        let mut form = tabbed(Transaction::blank());
        let inputs: HashMap<String, String> = [
            ("amount", "42.10"),
            ("status", "Completed"),
            ("createdDate", "2024-03-03"),
            ("transactionId", "HACK"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let problems = form.apply_inputs(&inputs);
        assert!(problems.is_empty());
        assert_eq!(form.draft().amount, Some(Decimal::new(4210, 2)));
        assert_eq!(form.draft().status.as_deref(), Some("Completed"));
        assert_eq!(form.draft().transaction_id.as_deref(), Some(""));
    }

    #[test]
    fn test_apply_inputs_unchecked_toggle_and_bad_number() {
        let mut form = tabbed(Transaction::blank());
        form.next();
        let mut inputs = HashMap::new();
        inputs.insert("type".to_string(), "Debit".to_string());
        let problems = form.apply_inputs(&inputs);
        assert!(problems.is_empty());
        assert_eq!(form.draft().is_active, Some(false));
        assert_eq!(form.draft().is_recurring, Some(false));

        form.back();
        let mut inputs = HashMap::new();
        inputs.insert("amount".to_string(), "twelve".to_string());
        let problems = form.apply_inputs(&inputs);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].message, "Amount must be a number");
        assert_eq!(form.draft().amount, None);

        assert!(!form.validate());
        assert_eq!(form.error_for("amount"), Some("Amount must be a number"));
    }

    #[test]
    fn test_reset_rebuilds_groups() {
        let mut tx = complete_draft();
        tx.id = 9;
        let mut form = tabbed(tx);
        form.next();
        form.reset(Transaction::blank());
        assert_eq!(form.active_group(), 0);
        assert_eq!(form.groups()[0].fields[0], "date");
    }
}
