//! Saved event records, the unit of the event library.
//!
//! JSON shape (one library entry, also the import/export format):
//! {
//!   "name": "GivesKeys",
//!   "outputSchema": [ { "id": "who", "label": "who" } ],
//!   "logicDefinition": "π_{ ... } ( ... )",
//!   "uiState": { ...request document... },
//!   "date": "2026-01-01T00:00:00+00:00"
//! }

use crate::Result;
use crate::diagnostics;
use crate::model::CompiledExpression;
use crate::request::RequestDoc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// One public field of a saved event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

impl SchemaField {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Schema assumed for atomic predicates and for records that declare none.
    pub fn default_schema() -> Vec<SchemaField> {
        vec![
            SchemaField::new("arg1", "Arg1"),
            SchemaField::new("arg2", "Arg2"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedEvent {
    pub name: String,

    #[serde(default)]
    pub output_schema: Vec<SchemaField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic_definition: Option<String>,

    /// Opaque to the compiler. The CLI stores the request document here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_state: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl SavedEvent {
    /// A bare record: a name and a schema, no algebra.
    pub fn stub(name: impl Into<String>, output_schema: Vec<SchemaField>) -> Self {
        Self {
            name: name.into(),
            output_schema,
            logic_definition: None,
            ui_state: None,
            date: None,
        }
    }

    pub fn with_algebra(
        name: impl Into<String>,
        output_schema: Vec<SchemaField>,
        algebra: impl Into<String>,
    ) -> Self {
        Self {
            logic_definition: Some(algebra.into()),
            ..Self::stub(name, output_schema)
        }
    }

    /// Build the record that persists a compiled definition.
    pub fn from_compiled(compiled: &CompiledExpression, request: &RequestDoc) -> Result<Self> {
        // The record's name is authoritative, keep it out of the state blob.
        let mut state = request.clone();
        state.name.clear();
        let ui_state = serde_json::to_value(&state)
            .with_context(|| diagnostics::error_message("serialize request state"))?;

        Ok(Self {
            name: compiled.name.clone(),
            output_schema: compiled.output_schema.clone(),
            logic_definition: Some(compiled.expression.trim().to_string()),
            ui_state: Some(ui_state),
            date: Some(chrono::Utc::now().to_rfc3339()),
        })
    }

    /// Stored algebra, if any. Blank text counts as none.
    pub fn algebra(&self) -> Option<&str> {
        self.logic_definition
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    /// Rebuild the request document this event was compiled from.
    ///
    /// Returns `None` for records saved without a request state.
    pub fn request_doc(&self) -> Result<Option<RequestDoc>> {
        let Some(state) = &self.ui_state else {
            return Ok(None);
        };
        let mut doc: RequestDoc = serde_json::from_value(state.clone()).with_context(|| {
            diagnostics::error_message(format!("saved event '{}' has an unreadable uiState", self.name))
        })?;
        doc.name = self.name.clone();
        Ok(Some(doc))
    }
}
