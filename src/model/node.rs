// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::ids::NodeId;
use super::kind::NodeKind;

/// The canonical node mapping, keyed by node id.
pub type NodeMap = BTreeMap<NodeId, TreeNode>;

/// One entity in the tree.
///
/// Field names follow the exported JSON format (`type`, `parentId`, `children`, `data`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    id: NodeId,
    #[serde(rename = "type")]
    kind: NodeKind,
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_id: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

impl TreeNode {
    pub fn new(
        id: NodeId,
        kind: NodeKind,
        label: impl Into<String>,
        parent_id: Option<NodeId>,
        data: NodeData,
    ) -> Self {
        Self { id, kind, label: label.into(), parent_id, children: Vec::new(), data }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The parent reference; an empty `parentId` counts as none.
    pub fn parent_id(&self) -> Option<&NodeId> {
        self.parent_id.as_ref().filter(|parent_id| !parent_id.as_str().is_empty())
    }

    pub fn is_root(&self) -> bool {
        self.parent_id().is_none()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn with_children(mut self, children: Vec<NodeId>) -> Self {
        self.children = children;
        self
    }

    pub(crate) fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub(crate) fn set_description(&mut self, description: impl Into<String>) {
        self.data.description = Some(Value::String(description.into()));
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.children
    }
}

/// Per-node metadata (`data` in the exported format).
///
/// Values are kept as imported, whatever their JSON type, so an export reproduces them. Typed
/// accessors only see string values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    created_at: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    description: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// A field that is present, even as `null`, deserializes to `Some`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl NodeData {
    pub fn new(created_at: Option<String>, description: Option<String>) -> Self {
        Self {
            created_at: created_at.map(Value::String),
            description: description.map(Value::String),
            extra: Map::new(),
        }
    }

    /// Metadata for a node created right now: timestamp set, description empty.
    pub fn created_now() -> Self {
        Self::created_at(Utc::now())
    }

    pub fn created_at(at: DateTime<Utc>) -> Self {
        Self::new(Some(at.to_rfc3339_opts(SecondsFormat::Millis, true)), Some(String::new()))
    }

    pub fn created_at_raw(&self) -> Option<&str> {
        self.created_at.as_ref().and_then(Value::as_str)
    }

    /// Calendar date of `createdAt`, when it parses as RFC 3339.
    pub fn created_date(&self) -> Option<NaiveDate> {
        let raw = self.created_at_raw()?;
        DateTime::parse_from_rfc3339(raw).ok().map(|at| at.with_timezone(&Utc).date_naive())
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_ref().and_then(Value::as_str)
    }
}

/// A derived parent→child link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeEdge {
    parent: NodeId,
    child: NodeId,
}

impl TreeEdge {
    pub fn new(parent: NodeId, child: NodeId) -> Self {
        Self { parent, child }
    }

    pub fn parent(&self) -> &NodeId {
        &self.parent
    }

    pub fn child(&self) -> &NodeId {
        &self.child
    }

    /// Stable edge id, `<parent>-<child>`.
    pub fn edge_id(&self) -> String {
        format!("{}-{}", self.parent, self.child)
    }
}

/// Default label for a fresh node: capitalised kind plus the last four characters of its id.
pub fn default_label(kind: NodeKind, id: &NodeId) -> String {
    format!("{} {}", kind.display_name(), id.suffix(4))
}
