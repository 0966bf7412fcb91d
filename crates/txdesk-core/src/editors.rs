//! Auxiliary sub-editors and the edit session that owns them

use crate::error::{CoreError, CoreResult};
use crate::form::{FormController, FormLayout};
use crate::models::{Channel, Compensation, Record, Territory, Transaction};
use crate::schema::{FieldError, FieldSchema};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Which auxiliary record an editor works on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuxiliaryKind {
    Channel,
    Territory,
    Compensation,
}

impl AuxiliaryKind {
    pub const ALL: [AuxiliaryKind; 3] = [
        AuxiliaryKind::Channel,
        AuxiliaryKind::Territory,
        AuxiliaryKind::Compensation,
    ];

    pub fn title(self) -> &'static str {
        match self {
            AuxiliaryKind::Channel => "Channel",
            AuxiliaryKind::Territory => "Territory",
            AuxiliaryKind::Compensation => "Compensation",
        }
    }
}

impl fmt::Display for AuxiliaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuxiliaryKind::Channel => write!(f, "channel"),
            AuxiliaryKind::Territory => write!(f, "territory"),
            AuxiliaryKind::Compensation => write!(f, "compensation"),
        }
    }
}

impl FromStr for AuxiliaryKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "channel" => Ok(AuxiliaryKind::Channel),
            "territory" => Ok(AuxiliaryKind::Territory),
            "compensation" => Ok(AuxiliaryKind::Compensation),
            _ => Err(format!("Unknown editor: {}", s)),
        }
    }
}

/// Single-page editor for one auxiliary record
#[derive(Debug, Clone)]
pub struct SubEditor<R: Record> {
    name: &'static str,
    schema: FieldSchema,
    saved: Option<R>,
    form: Option<FormController<R>>,
}

impl<R: Record> SubEditor<R> {
    pub fn new(name: &'static str, schema: FieldSchema, saved: Option<R>) -> Self {
        Self {
            name,
            schema,
            saved,
            form: None,
        }
    }

    /// Open on the last saved value, or a blank record
    pub fn open(&mut self) {
        let draft = self.saved.clone().unwrap_or_else(R::blank);
        self.form = Some(FormController::new(
            self.schema.clone(),
            FormLayout::Single,
            draft,
        ));
    }

    pub fn is_open(&self) -> bool {
        self.form.is_some()
    }

    pub fn form(&self) -> Option<&FormController<R>> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> CoreResult<&mut FormController<R>> {
        let name = self.name;
        self.form.as_mut().ok_or_else(|| CoreError::EditorClosed {
            editor: name.to_string(),
        })
    }

    /// Validate and keep the draft; the editor stays open on failure
    pub fn save(&mut self) -> CoreResult<()> {
        let record = self.form_mut()?.submit()?;
        self.saved = Some(record);
        self.form = None;
        Ok(())
    }

    /// Discard the open draft
    pub fn close(&mut self) {
        self.form = None;
    }

    pub fn saved(&self) -> Option<&R> {
        self.saved.as_ref()
    }
}

/// The transaction form plus its three auxiliary editors
#[derive(Debug, Clone)]
pub struct EditSession {
    pub form: FormController<Transaction>,
    pub channel: SubEditor<Channel>,
    pub territory: SubEditor<Territory>,
    pub compensation: SubEditor<Compensation>,
}

impl EditSession {
    /// Editors start from whatever the draft already carries
    pub fn new(schema: FieldSchema, layout: FormLayout, draft: Transaction) -> Self {
        let channel = SubEditor::new("channel", FieldSchema::channel(), draft.channel.clone());
        let territory =
            SubEditor::new("territory", FieldSchema::territory(), draft.territory.clone());
        let compensation = SubEditor::new(
            "compensation",
            FieldSchema::compensation(),
            draft.compensation.clone(),
        );
        Self {
            form: FormController::new(schema, layout, draft),
            channel,
            territory,
            compensation,
        }
    }

    /// Open one editor; any other open editor is closed
    pub fn open_editor(&mut self, kind: AuxiliaryKind) {
        self.close_all();
        match kind {
            AuxiliaryKind::Channel => self.channel.open(),
            AuxiliaryKind::Territory => self.territory.open(),
            AuxiliaryKind::Compensation => self.compensation.open(),
        }
    }

    pub fn close_editor(&mut self, kind: AuxiliaryKind) {
        match kind {
            AuxiliaryKind::Channel => self.channel.close(),
            AuxiliaryKind::Territory => self.territory.close(),
            AuxiliaryKind::Compensation => self.compensation.close(),
        }
    }

    fn close_all(&mut self) {
        for kind in AuxiliaryKind::ALL {
            self.close_editor(kind);
        }
    }

    /// The editor currently shown, if any
    pub fn open_editor_kind(&self) -> Option<AuxiliaryKind> {
        AuxiliaryKind::ALL
            .into_iter()
            .find(|&kind| self.is_editor_open(kind))
    }

    pub fn is_editor_open(&self, kind: AuxiliaryKind) -> bool {
        match kind {
            AuxiliaryKind::Channel => self.channel.is_open(),
            AuxiliaryKind::Territory => self.territory.is_open(),
            AuxiliaryKind::Compensation => self.compensation.is_open(),
        }
    }

    pub fn has_saved(&self, kind: AuxiliaryKind) -> bool {
        match kind {
            AuxiliaryKind::Channel => self.channel.saved().is_some(),
            AuxiliaryKind::Territory => self.territory.saved().is_some(),
            AuxiliaryKind::Compensation => self.compensation.saved().is_some(),
        }
    }

    /// Apply posted inputs to an open editor
    pub fn apply_editor_inputs(
        &mut self,
        kind: AuxiliaryKind,
        inputs: &HashMap<String, String>,
    ) -> CoreResult<Vec<FieldError>> {
        Ok(match kind {
            AuxiliaryKind::Channel => self.channel.form_mut()?.apply_inputs(inputs),
            AuxiliaryKind::Territory => self.territory.form_mut()?.apply_inputs(inputs),
            AuxiliaryKind::Compensation => self.compensation.form_mut()?.apply_inputs(inputs),
        })
    }

    pub fn save_editor(&mut self, kind: AuxiliaryKind) -> CoreResult<()> {
        match kind {
            AuxiliaryKind::Channel => self.channel.save(),
            AuxiliaryKind::Territory => self.territory.save(),
            AuxiliaryKind::Compensation => self.compensation.save(),
        }
    }

    /// Validate the transaction and attach the saved auxiliary records
    pub fn finish(&mut self) -> CoreResult<Transaction> {
        let mut record = self.form.submit()?;
        record.channel = self.channel.saved().cloned();
        record.territory = self.territory.saved().cloned();
        record.compensation = self.compensation.saved().cloned();
        Ok(record)
    }
}
