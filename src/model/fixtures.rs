// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::NodeId;
use super::kind::NodeKind;
use super::node::{NodeData, NodeMap, TreeNode};

const FIXTURE_CREATED_AT: &str = "2026-01-15T09:30:00.000Z";

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("fixture node id")
}

fn node(
    id: &str,
    kind: NodeKind,
    label: &str,
    parent: Option<&str>,
    children: &[&str],
    description: &str,
) -> TreeNode {
    TreeNode::new(
        nid(id),
        kind,
        label,
        parent.map(nid),
        NodeData::new(Some(FIXTURE_CREATED_AT.to_owned()), Some(description.to_owned())),
    )
    .with_children(children.iter().map(|child| nid(child)).collect())
}

fn insert(nodes: &mut NodeMap, node: TreeNode) {
    nodes.insert(node.id().clone(), node);
}

/// A small, consistent portfolio: one account with two loans and collateral, plus a standalone
/// loan root.
pub(crate) fn demo_portfolio() -> NodeMap {
    let mut nodes = NodeMap::new();

    insert(
        &mut nodes,
        node(
            "acct-main",
            NodeKind::Account,
            "Main Operating Account",
            None,
            &["loan-term", "loan-credit", "coll-deposit"],
            "Primary borrower relationship",
        ),
    );
    insert(
        &mut nodes,
        node(
            "loan-term",
            NodeKind::Loan,
            "Term Loan A",
            Some("acct-main"),
            &["coll-plant", "coll-fleet"],
            "5y amortising",
        ),
    );
    insert(
        &mut nodes,
        node(
            "loan-credit",
            NodeKind::Loan,
            "Revolving Credit",
            Some("acct-main"),
            &["coll-receivables"],
            "",
        ),
    );
    insert(
        &mut nodes,
        node(
            "coll-deposit",
            NodeKind::Collateral,
            "Cash Deposit",
            Some("acct-main"),
            &[],
            "",
        ),
    );
    insert(
        &mut nodes,
        node("coll-plant", NodeKind::Collateral, "Plant & Machinery", Some("loan-term"), &[], ""),
    );
    insert(
        &mut nodes,
        node("coll-fleet", NodeKind::Collateral, "Vehicle Fleet", Some("loan-term"), &[], ""),
    );
    insert(
        &mut nodes,
        node(
            "coll-receivables",
            NodeKind::Collateral,
            "Receivables",
            Some("loan-credit"),
            &[],
            "",
        ),
    );
    insert(
        &mut nodes,
        node("loan-bridge", NodeKind::Loan, "Bridge Loan", None, &["coll-property"], ""),
    );
    insert(
        &mut nodes,
        node(
            "coll-property",
            NodeKind::Collateral,
            "Office Property",
            Some("loan-bridge"),
            &[],
            "First-lien mortgage",
        ),
    );

    nodes
}

/// account → loan → collateral chain with fixed ids `a`, `l`, `c`.
#[cfg(test)]
pub(crate) fn chain() -> NodeMap {
    let mut nodes = NodeMap::new();
    insert(&mut nodes, node("a", NodeKind::Account, "Account a", None, &["l"], ""));
    insert(&mut nodes, node("l", NodeKind::Loan, "Loan l", Some("a"), &["c"], ""));
    insert(&mut nodes, node("c", NodeKind::Collateral, "Collateral c", Some("l"), &[], ""));
    nodes
}

/// Structurally valid but logically inconsistent: a two-node cycle, a dangling child reference
/// and a collateral parenting an account.
#[cfg(test)]
pub(crate) fn inconsistent() -> NodeMap {
    let mut nodes = NodeMap::new();
    insert(&mut nodes, node("x", NodeKind::Loan, "X", Some("y"), &["y", "ghost"], ""));
    insert(&mut nodes, node("y", NodeKind::Loan, "Y", Some("x"), &["x"], ""));
    insert(&mut nodes, node("k", NodeKind::Collateral, "K", None, &["m"], ""));
    insert(&mut nodes, node("m", NodeKind::Account, "M", Some("k"), &[], ""));
    nodes
}
