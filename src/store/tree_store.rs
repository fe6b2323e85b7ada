// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The canonical in-memory tree.
//!
//! `TreeStore` owns the node mapping and the current selection. Every mutation runs to completion
//! before returning, and every change to the mapping bumps `rev` so derived state (layout, the
//! rendered diagram) can tell when it is stale.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use super::snapshot::{self, ExportError, ImportError};
use crate::model::{default_label, NodeData, NodeId, NodeKind, NodeMap, TreeEdge, TreeNode};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStore {
    nodes: NodeMap,
    selected_id: Option<NodeId>,
    rev: u64,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing mapping as-is (no integrity repair).
    pub fn from_nodes(nodes: NodeMap) -> Self {
        Self { nodes, selected_id: None, rev: 0 }
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn nodes(&self) -> &NodeMap {
        &self.nodes
    }

    pub fn node(&self, node_id: &str) -> Option<&TreeNode> {
        self.nodes.get(node_id)
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The selection, or `None` when the stored id no longer names a node.
    pub fn selected_id(&self) -> Option<&NodeId> {
        self.selected_id.as_ref().filter(|id| self.nodes.contains_key(id.as_str()))
    }

    pub fn selected_node(&self) -> Option<&TreeNode> {
        self.selected_id().and_then(|id| self.nodes.get(id))
    }

    /// Creates a node with a fresh id and returns that id.
    ///
    /// With an existing parent the id is appended to the parent's children. An unknown parent id
    /// creates a root instead. Kind compatibility is not enforced here.
    pub fn create_node(&mut self, kind: NodeKind, parent_id: Option<&str>) -> NodeId {
        let node_id = NodeId::generate();
        let label = default_label(kind, &node_id);

        let parent = match parent_id {
            None => None,
            Some(parent_id) => match self.nodes.get_mut(parent_id) {
                Some(parent) => {
                    if !parent.kind().allows_child(kind) {
                        warn!(
                            parent = %parent.id(),
                            parent_kind = %parent.kind(),
                            child_kind = %kind,
                            "creating child of a kind the parent does not allow"
                        );
                    }
                    parent.children_mut().push(node_id.clone());
                    Some(parent.id().clone())
                }
                None => {
                    warn!(parent = parent_id, kind = %kind, "parent not found; creating a root");
                    None
                }
            },
        };

        let node = TreeNode::new(node_id.clone(), kind, label, parent, NodeData::created_now());
        self.nodes.insert(node_id.clone(), node);
        self.bump_rev();
        debug!(node = %node_id, kind = %kind, rev = self.rev, "created node");
        node_id
    }

    /// Removes `node_id` and its whole subtree. Returns the removed ids (empty when absent).
    pub fn delete_node(&mut self, node_id: &str) -> Vec<NodeId> {
        let removed = self.descendant_closure(node_id);
        let Some(parent_id) = self.nodes.get(node_id).map(|node| node.parent_id().cloned()) else {
            return Vec::new();
        };

        for id in &removed {
            self.nodes.remove(id);
        }

        if let Some(parent) = parent_id.and_then(|parent_id| self.nodes.get_mut(&parent_id)) {
            parent.children_mut().retain(|child| child.as_str() != node_id);
        }

        if self.selected_id.as_ref().is_some_and(|selected| removed.contains(selected)) {
            self.selected_id = None;
        }

        self.bump_rev();
        debug!(node = node_id, removed = removed.len(), rev = self.rev, "deleted subtree");
        removed
    }

    /// Sets the selection without checking that the id exists.
    pub fn select_node(&mut self, node_id: Option<NodeId>) {
        self.selected_id = node_id;
    }

    /// Returns `false` (and changes nothing) when `node_id` is absent.
    pub fn update_label(&mut self, node_id: &str, label: impl Into<String>) -> bool {
        let Some(node) = self.nodes.get_mut(node_id) else {
            return false;
        };
        node.set_label(label);
        self.bump_rev();
        debug!(node = node_id, rev = self.rev, "updated label");
        true
    }

    /// Returns `false` (and changes nothing) when `node_id` is absent.
    pub fn update_description(&mut self, node_id: &str, description: impl Into<String>) -> bool {
        let Some(node) = self.nodes.get_mut(node_id) else {
            return false;
        };
        node.set_description(description);
        self.bump_rev();
        debug!(node = node_id, rev = self.rev, "updated description");
        true
    }

    pub fn clear(&mut self) {
        let dropped = self.nodes.len();
        self.nodes.clear();
        self.selected_id = None;
        self.bump_rev();
        info!(dropped, rev = self.rev, "cleared tree");
    }

    /// Nodes without a parent, in id order.
    pub fn roots(&self) -> Vec<&TreeNode> {
        self.nodes.values().filter(|node| node.is_root()).collect()
    }

    /// Resolved children of `node_id` in `children` order; unresolved ids are skipped.
    pub fn children(&self, node_id: &str) -> Vec<&TreeNode> {
        self.nodes
            .get(node_id)
            .map(|node| node.children().iter().filter_map(|child| self.nodes.get(child)).collect())
            .unwrap_or_default()
    }

    /// Derived parent→child edges: parents in id order, children in list order.
    pub fn edges(&self) -> Vec<TreeEdge> {
        let nodes = &self.nodes;
        nodes
            .iter()
            .flat_map(move |(parent_id, node)| {
                node.children()
                    .iter()
                    .filter(move |child| nodes.contains_key(child.as_str()))
                    .map(move |child| TreeEdge::new(parent_id.clone(), child.clone()))
            })
            .collect()
    }

    /// `node_id` plus everything reachable through `children`, in pre-order.
    ///
    /// Empty when `node_id` is absent. Unresolved child ids are skipped and each node is visited
    /// once, so cyclic imports terminate.
    pub fn descendant_closure(&self, node_id: &str) -> Vec<NodeId> {
        let Some((start, _)) = self.nodes.get_key_value(node_id) else {
            return Vec::new();
        };

        let mut visited = BTreeSet::<&NodeId>::new();
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            order.push(current.clone());
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            for child in node.children().iter().rev() {
                if let Some((child_key, _)) = self.nodes.get_key_value(child) {
                    if !visited.contains(child_key) {
                        stack.push(child_key);
                    }
                }
            }
        }
        order
    }

    pub fn export_json(&self) -> Result<String, ExportError> {
        let text = snapshot::export_nodes(&self.nodes)?;
        info!(nodes = self.nodes.len(), bytes = text.len(), "exported tree");
        Ok(text)
    }

    /// Replaces the whole mapping with the parsed payload and clears the selection.
    ///
    /// On error the store is left untouched.
    pub fn import_json(&mut self, text: &str) -> Result<usize, ImportError> {
        let nodes = match snapshot::parse_nodes(text) {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!(error = %err, "rejected import");
                return Err(err);
            }
        };
        let count = nodes.len();
        self.nodes = nodes;
        self.selected_id = None;
        self.bump_rev();
        info!(nodes = count, rev = self.rev, "imported tree");
        Ok(count)
    }

    fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }
}
