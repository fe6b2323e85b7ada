// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! User-facing actions against the tree store.
//!
//! Every button, key binding and CLI mode goes through `apply_action`, which applies one action
//! atomically and reports a coarse delta so the UI can refresh derived state (layout, panel).

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{NodeId, NodeKind};
use crate::store::{ImportError, TreeStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreateRoot { kind: NodeKind },
    CreateChild { kind: NodeKind, parent_id: NodeId },
    Delete { node_id: NodeId },
    Select { node_id: Option<NodeId> },
    EditLabel { node_id: NodeId, label: String },
    EditDescription { node_id: NodeId, description: String },
    Import { text: String },
    Clear,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateRoot { .. } => "create_root",
            Self::CreateChild { .. } => "create_child",
            Self::Delete { .. } => "delete",
            Self::Select { .. } => "select",
            Self::EditLabel { .. } => "edit_label",
            Self::EditDescription { .. } => "edit_description",
            Self::Import { .. } => "import",
            Self::Clear => "clear",
        }
    }

    /// Destructive actions must be confirmed by the user before `apply_action` is called.
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, Self::Delete { .. } | Self::Clear)
    }

    /// Question to put to the user, for actions that require confirmation.
    pub fn confirmation_prompt(&self, store: &TreeStore) -> Option<String> {
        match self {
            Self::Delete { node_id } => {
                let label =
                    store.node(node_id.as_str()).map_or(node_id.as_str(), |node| node.label());
                Some(format!("Are you sure you want to delete \"{label}\" and all its children?"))
            }
            Self::Clear => Some("Are you sure you want to clear the entire tree?".to_owned()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub delta: Delta,
    /// Id minted by a create action.
    pub created: Option<NodeId>,
}

/// Node ids touched by one action, each list sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
    pub updated: Vec<NodeId>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<NodeId>,
    removed: BTreeSet<NodeId>,
    updated: BTreeSet<NodeId>,
}

impl DeltaBuilder {
    fn record_added(&mut self, node_id: NodeId) {
        self.removed.remove(&node_id);
        self.updated.remove(&node_id);
        self.added.insert(node_id);
    }

    fn record_removed(&mut self, node_id: NodeId) {
        self.added.remove(&node_id);
        self.updated.remove(&node_id);
        self.removed.insert(node_id);
    }

    fn record_updated(&mut self, node_id: NodeId) {
        if self.added.contains(&node_id) || self.removed.contains(&node_id) {
            return;
        }
        self.updated.insert(node_id);
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("import rejected: {0}")]
    Import(#[from] ImportError),
}

/// Applies `action` to `store`.
///
/// Creates select the new node. Delete drops the selection only when it falls inside the removed
/// subtree; import leaves nothing selected. A failed import leaves the store untouched.
pub fn apply_action(store: &mut TreeStore, action: Action) -> Result<ApplyResult, ApplyError> {
    debug!(action = action.name(), rev = store.rev(), "applying action");
    let mut delta = DeltaBuilder::default();
    let mut created = None;

    match action {
        Action::CreateRoot { kind } => {
            if !kind.is_root_kind() {
                warn!(kind = %kind, "creating a root of a kind not offered as a root");
            }
            let node_id = store.create_node(kind, None);
            store.select_node(Some(node_id.clone()));
            delta.record_added(node_id.clone());
            created = Some(node_id);
        }
        Action::CreateChild { kind, parent_id } => {
            let parent_exists = store.contains(parent_id.as_str());
            let node_id = store.create_node(kind, Some(parent_id.as_str()));
            store.select_node(Some(node_id.clone()));
            delta.record_added(node_id.clone());
            if parent_exists {
                delta.record_updated(parent_id);
            }
            created = Some(node_id);
        }
        Action::Delete { node_id } => {
            let parent_id = store.node(node_id.as_str()).and_then(|node| node.parent_id().cloned());
            for removed in store.delete_node(node_id.as_str()) {
                delta.record_removed(removed);
            }
            if let Some(parent_id) = parent_id.filter(|id| store.contains(id.as_str())) {
                delta.record_updated(parent_id);
            }
        }
        Action::Select { node_id } => {
            store.select_node(node_id);
        }
        Action::EditLabel { node_id, label } => {
            if store.update_label(node_id.as_str(), label) {
                delta.record_updated(node_id);
            }
        }
        Action::EditDescription { node_id, description } => {
            if store.update_description(node_id.as_str(), description) {
                delta.record_updated(node_id);
            }
        }
        Action::Import { text } => {
            let before = store.nodes().keys().cloned().collect::<BTreeSet<_>>();
            store.import_json(&text)?;
            let after = store.nodes().keys().cloned().collect::<BTreeSet<_>>();
            for node_id in before.difference(&after) {
                delta.record_removed(node_id.clone());
            }
            for node_id in after.difference(&before) {
                delta.record_added(node_id.clone());
            }
            for node_id in before.intersection(&after) {
                delta.record_updated(node_id.clone());
            }
        }
        Action::Clear => {
            let before = store.nodes().keys().cloned().collect::<Vec<_>>();
            store.clear();
            for node_id in before {
                delta.record_removed(node_id);
            }
        }
    }

    Ok(ApplyResult { new_rev: store.rev(), delta: delta.finish(), created })
}
