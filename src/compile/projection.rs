//! Output columns and the procedure's return signature.

use crate::model::{ReturnColumn, SqlType};
use crate::request::ProjectionField;
use crate::store::SchemaField;

use std::collections::HashSet;

pub const START_ALIAS: &str = "sf";
pub const END_ALIAS: &str = "ef";

/// How a projection field without an alias gets named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AliasPolicy {
    /// The source text, quotes removed, as a quoted identifier: `"M3.arg1"`.
    #[default]
    Quoted,
    /// `arg<position>`. Used when the result is saved, so that two unaliased
    /// columns of the same operand still get distinct schema ids. A name
    /// already taken moves on to the next free `arg<n>`.
    Positional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// `src AS alias, ..., start AS sf, end AS ef`
    pub clause: String,
    pub signature: Vec<ReturnColumn>,
    /// User columns only.
    pub schema: Vec<SchemaField>,
}

/// Render the projection. Sources must already be remapped.
pub fn render_projection(
    fields: &[ProjectionField],
    start: &str,
    end: &str,
    policy: AliasPolicy,
) -> Projection {
    let mut parts = Vec::with_capacity(fields.len() + 2);
    let mut signature = Vec::with_capacity(fields.len() + 2);
    let mut schema = Vec::with_capacity(fields.len());

    let mut taken: HashSet<String> = fields.iter().filter_map(|f| f.alias.clone()).collect();

    for (i, field) in fields.iter().enumerate() {
        let alias = match &field.alias {
            Some(a) => a.clone(),
            None => default_alias(&field.source, i + 1, policy, &mut taken),
        };
        parts.push(format!("{} AS {}", field.source, alias));

        let id = alias.trim_matches('"').to_string();
        let label = field.alias.clone().unwrap_or_else(|| id.clone());
        schema.push(SchemaField::new(id, label));

        signature.push(ReturnColumn::new(alias, SqlType::Varchar));
    }

    parts.push(format!("{} AS {}", start, START_ALIAS));
    parts.push(format!("{} AS {}", end, END_ALIAS));
    signature.push(ReturnColumn::new(START_ALIAS, SqlType::Integer));
    signature.push(ReturnColumn::new(END_ALIAS, SqlType::Integer));

    Projection {
        clause: parts.join(", "),
        signature,
        schema,
    }
}

fn default_alias(
    source: &str,
    position: usize,
    policy: AliasPolicy,
    taken: &mut HashSet<String>,
) -> String {
    match policy {
        AliasPolicy::Quoted => format!("\"{}\"", source.replace('"', "")),
        AliasPolicy::Positional => {
            let mut n = position;
            while taken.contains(&format!("arg{}", n)) {
                n += 1;
            }
            let alias = format!("arg{}", n);
            taken.insert(alias.clone());
            alias
        }
    }
}
