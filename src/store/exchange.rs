//! Single-event JSON import/export.

use crate::Result;
use crate::diagnostics;
use crate::store::{EventStore, SavedEvent};

use anyhow::{Context, bail};

/// Parse one exported event and upsert it. Returns the imported name.
pub fn import_event(store: &mut dyn EventStore, text: &str) -> Result<String> {
    let evt: SavedEvent = serde_json::from_str(text)
        .with_context(|| diagnostics::error_message("imported event is not valid JSON"))?;

    if evt.name.trim().is_empty() {
        bail!("{}", diagnostics::error_message("imported event has no name"));
    }
    if evt.algebra().is_none() {
        bail!(
            "{}",
            diagnostics::error_message(format!(
                "imported event '{}' has no logicDefinition",
                evt.name
            ))
        );
    }

    let name = evt.name.clone();
    store.put(evt)?;
    Ok(name)
}

/// Pretty JSON for one stored event.
pub fn export_event(store: &dyn EventStore, name: &str) -> Result<String> {
    let Some(evt) = store.get(name) else {
        bail!(
            "{}",
            diagnostics::error_message(format!("no saved event named '{}'", name))
        );
    };
    Ok(serde_json::to_string_pretty(evt)?)
}
