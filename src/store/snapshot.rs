// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Serialized tree format (export/import payload).
//!
//! The payload is a JSON object keyed by node id with no envelope. Import runs a shape check over
//! the raw JSON first so a rejection can name the offending entry and field; it does not check
//! referential integrity (see `integrity`).

use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{NodeId, NodeKind, NodeMap, TreeNode};

pub const EXPORT_CONTENT_TYPE: &str = "application/json";
const EXPORT_FILE_PREFIX: &str = "tree-structure-";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize tree: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("expected an object keyed by node id, found {found}")]
    NotAnObject { found: &'static str },
    #[error("entry '{key}': {problem}")]
    Shape { key: String, problem: ShapeProblem },
    #[error("entry '{key}' could not be decoded: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// What is wrong with a single entry of an import payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeProblem {
    #[error("entry is {found}, expected an object")]
    NotAnObject { found: &'static str },
    #[error("field '{field}' must be {expected}")]
    Field { field: &'static str, expected: &'static str },
    #[error("field 'type' has unknown kind '{kind}'")]
    UnknownKind { kind: String },
}

/// Serializes the node mapping as pretty-printed JSON (two-space indent).
pub fn export_nodes(nodes: &NodeMap) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(nodes)?)
}

/// Parses and shape-validates an import payload. All-or-nothing.
pub fn parse_nodes(text: &str) -> Result<NodeMap, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::Syntax)?;
    let Value::Object(entries) = value else {
        return Err(ImportError::NotAnObject { found: json_type_name(&value) });
    };

    let mut nodes = NodeMap::new();
    for (key, entry) in entries {
        check_entry_shape(&entry)
            .map_err(|problem| ImportError::Shape { key: key.clone(), problem })?;

        let node: TreeNode = serde_json::from_value(entry)
            .map_err(|source| ImportError::Decode { key: key.clone(), source })?;
        nodes.insert(NodeId::from_raw(key), node);
    }

    Ok(nodes)
}

/// `tree-structure-<YYYY-MM-DD>.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{EXPORT_FILE_PREFIX}{}.json", date.format("%Y-%m-%d"))
}

fn check_entry_shape(entry: &Value) -> Result<(), ShapeProblem> {
    let Value::Object(fields) = entry else {
        return Err(ShapeProblem::NotAnObject { found: json_type_name(entry) });
    };

    require_string(fields, "id")?;
    let kind = require_string(fields, "type")?;
    if kind.parse::<NodeKind>().is_err() {
        return Err(ShapeProblem::UnknownKind { kind: kind.to_owned() });
    }
    require_string(fields, "label")?;

    match fields.get("children") {
        Some(Value::Array(children)) => {
            if !children.iter().all(Value::is_string) {
                return Err(ShapeProblem::Field {
                    field: "children",
                    expected: "an array of strings",
                });
            }
        }
        _ => return Err(ShapeProblem::Field { field: "children", expected: "an array" }),
    }

    match fields.get("parentId") {
        None => {}
        Some(Value::String(_)) => {}
        Some(_) => {
            return Err(ShapeProblem::Field { field: "parentId", expected: "absent or a string" })
        }
    }

    // Metadata values are kept verbatim whatever their type.
    if !matches!(fields.get("data"), Some(Value::Object(_))) {
        return Err(ShapeProblem::Field { field: "data", expected: "an object" });
    }

    Ok(())
}

fn require_string<'a>(
    fields: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, ShapeProblem> {
    match fields.get(field) {
        Some(Value::String(value)) => Ok(value),
        _ => Err(ShapeProblem::Field { field, expected: "a string" }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
