// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only structural diagnostics for a node mapping.
//!
//! Imports are accepted on shape alone, so a mapping can carry dangling references, asymmetric
//! parent/child links, cycles or disallowed kind pairings. `check_tree` reports those without
//! touching the data.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::model::{NodeId, NodeKind, NodeMap};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityIssue {
    #[error("entry '{key}' carries id '{id}'")]
    KeyMismatch { key: NodeId, id: NodeId },
    #[error("node '{node}' names missing parent '{parent}'")]
    DanglingParent { node: NodeId, parent: NodeId },
    #[error("node '{node}' lists missing child '{child}'")]
    DanglingChild { node: NodeId, child: NodeId },
    #[error("node '{child}' names parent '{parent}' but is not in its children")]
    UnlistedChild { parent: NodeId, child: NodeId },
    #[error("node '{parent}' lists child '{child}' whose parent is {actual}")]
    MisplacedChild { parent: NodeId, child: NodeId, actual: ParentRef },
    #[error("node '{parent}' lists child '{child}' more than once")]
    DuplicateChild { parent: NodeId, child: NodeId },
    #[error("node '{node}' is part of a parent cycle")]
    Cycle { node: NodeId },
    #[error("{child_kind} '{child}' is not an allowed child of {parent_kind} '{parent}'")]
    KindNotAllowed { parent: NodeId, parent_kind: NodeKind, child: NodeId, child_kind: NodeKind },
    #[error("selection '{selected}' does not name a node")]
    DanglingSelection { selected: NodeId },
}

/// The parent recorded on a node, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentRef {
    Root,
    Node(NodeId),
}

impl std::fmt::Display for ParentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => f.write_str("none"),
            Self::Node(id) => write!(f, "'{id}'"),
        }
    }
}

/// Reports every invariant violation in `nodes` (and the optional stored selection).
///
/// Issues are emitted in node-id order so the output is stable.
pub fn check_tree(nodes: &NodeMap, selected: Option<&NodeId>) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();

    for (key, node) in nodes {
        if key != node.id() {
            issues.push(IntegrityIssue::KeyMismatch { key: key.clone(), id: node.id().clone() });
        }

        if let Some(parent_id) = node.parent_id() {
            match nodes.get(parent_id) {
                None => issues.push(IntegrityIssue::DanglingParent {
                    node: key.clone(),
                    parent: parent_id.clone(),
                }),
                Some(parent) => {
                    if !parent.children().contains(key) {
                        issues.push(IntegrityIssue::UnlistedChild {
                            parent: parent_id.clone(),
                            child: key.clone(),
                        });
                    }
                    if !parent.kind().allows_child(node.kind()) {
                        issues.push(IntegrityIssue::KindNotAllowed {
                            parent: parent_id.clone(),
                            parent_kind: parent.kind(),
                            child: key.clone(),
                            child_kind: node.kind(),
                        });
                    }
                }
            }
        }

        let mut seen = BTreeSet::<&NodeId>::new();
        let mut reported_duplicates = BTreeSet::<&NodeId>::new();
        for child_id in node.children() {
            if !seen.insert(child_id) {
                if reported_duplicates.insert(child_id) {
                    issues.push(IntegrityIssue::DuplicateChild {
                        parent: key.clone(),
                        child: child_id.clone(),
                    });
                }
                continue;
            }

            match nodes.get(child_id) {
                None => issues.push(IntegrityIssue::DanglingChild {
                    node: key.clone(),
                    child: child_id.clone(),
                }),
                Some(child) if child.parent_id() != Some(key) => {
                    issues.push(IntegrityIssue::MisplacedChild {
                        parent: key.clone(),
                        child: child_id.clone(),
                        actual: child
                            .parent_id()
                            .map_or(ParentRef::Root, |parent| ParentRef::Node(parent.clone())),
                    });
                }
                Some(_) => {}
            }
        }
    }

    for node in nodes_on_parent_cycles(nodes) {
        issues.push(IntegrityIssue::Cycle { node });
    }

    if let Some(selected) = selected {
        if !nodes.contains_key(selected) {
            issues.push(IntegrityIssue::DanglingSelection { selected: selected.clone() });
        }
    }

    issues
}

/// Nodes whose `parent_id` chain loops back onto itself.
fn nodes_on_parent_cycles(nodes: &NodeMap) -> Vec<NodeId> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Active,
        Done,
    }

    let mut marks = BTreeMap::<&NodeId, Mark>::new();
    let mut on_cycle = BTreeSet::<NodeId>::new();

    for start in nodes.keys() {
        if marks.contains_key(start) {
            continue;
        }

        let mut path = Vec::<&NodeId>::new();
        let mut current = Some(start);
        while let Some(node_id) = current {
            match marks.get(node_id) {
                Some(Mark::Done) => break,
                Some(Mark::Active) => {
                    if let Some(pos) = path.iter().position(|id| *id == node_id) {
                        on_cycle.extend(path[pos..].iter().map(|id| (*id).clone()));
                    }
                    break;
                }
                None => {}
            }

            let Some((key, node)) = nodes.get_key_value(node_id) else {
                break;
            };
            marks.insert(key, Mark::Active);
            path.push(key);
            current = node.parent_id();
        }

        for node_id in path {
            marks.insert(node_id, Mark::Done);
        }
    }

    on_cycle.into_iter().collect()
}
