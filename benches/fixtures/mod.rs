// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use loan_tree::model::{NodeData, NodeId, NodeKind, NodeMap, TreeNode};
use loan_tree::store::TreeStore;

const CREATED_AT: &str = "2026-01-15T09:30:00.000Z";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortfolioParams {
    pub accounts: usize,
    pub loans_per_account: usize,
    pub collateral_per_loan: usize,
    pub standalone_loans: usize,
    pub label_len: usize,
}

impl PortfolioParams {
    pub const fn new(
        accounts: usize,
        loans_per_account: usize,
        collateral_per_loan: usize,
        standalone_loans: usize,
        label_len: usize,
    ) -> Self {
        Self { accounts, loans_per_account, collateral_per_loan, standalone_loans, label_len }
    }

    pub const fn node_count(self) -> usize {
        let per_loan = 1 + self.collateral_per_loan;
        self.accounts * (1 + self.loans_per_account * per_loan) + self.standalone_loans * per_loan
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Small,
    Medium,
    WideLongLabels,
}

impl Case {
    pub const ALL: [Case; 3] = [Case::Small, Case::Medium, Case::WideLongLabels];

    pub const fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::WideLongLabels => "wide_long_labels",
        }
    }

    pub const fn params(self) -> PortfolioParams {
        match self {
            Self::Small => PortfolioParams::new(3, 2, 2, 1, 16),
            Self::Medium => PortfolioParams::new(20, 4, 3, 10, 24),
            Self::WideLongLabels => PortfolioParams::new(60, 6, 2, 40, 80),
        }
    }
}

fn nid(value: String) -> NodeId {
    NodeId::new(value).expect("valid node id")
}

fn label(prefix: &str, target_len: usize) -> String {
    let mut out = prefix.to_owned();
    while out.chars().count() < target_len {
        out.push('x');
    }
    out
}

fn push_node(
    nodes: &mut NodeMap,
    id: NodeId,
    kind: NodeKind,
    label: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
) {
    let data = NodeData::new(Some(CREATED_AT.to_owned()), Some(String::new()));
    let node = TreeNode::new(id.clone(), kind, label, parent, data).with_children(children);
    nodes.insert(id, node);
}

fn push_loan(nodes: &mut NodeMap, loan: NodeId, parent: Option<NodeId>, params: PortfolioParams) {
    let collateral: Vec<NodeId> = (0..params.collateral_per_loan)
        .map(|idx| nid(format!("{}-c{idx:02}", loan.as_str())))
        .collect();
    for id in &collateral {
        push_node(
            nodes,
            id.clone(),
            NodeKind::Collateral,
            label(&format!("Collateral {}", id.as_str()), params.label_len),
            Some(loan.clone()),
            Vec::new(),
        );
    }
    let loan_label = label(&format!("Loan {}", loan.as_str()), params.label_len);
    push_node(nodes, loan, NodeKind::Loan, loan_label, parent, collateral);
}

/// Deterministic, fully consistent portfolio.
pub fn portfolio(params: PortfolioParams) -> NodeMap {
    let mut nodes = NodeMap::new();

    for a in 0..params.accounts {
        let account = nid(format!("a{a:04}"));
        let loans: Vec<NodeId> = (0..params.loans_per_account)
            .map(|l| nid(format!("{}-l{l:02}", account.as_str())))
            .collect();
        for loan in &loans {
            push_loan(&mut nodes, loan.clone(), Some(account.clone()), params);
        }
        let account_label = label(&format!("Account {a}"), params.label_len);
        push_node(&mut nodes, account, NodeKind::Account, account_label, None, loans);
    }

    for s in 0..params.standalone_loans {
        push_loan(&mut nodes, nid(format!("s{s:04}")), None, params);
    }

    debug_assert_eq!(nodes.len(), params.node_count());
    nodes
}

pub fn fixture(case: Case) -> NodeMap {
    portfolio(case.params())
}

pub fn store(case: Case) -> TreeStore {
    TreeStore::from_nodes(fixture(case))
}

pub fn export_text(case: Case) -> String {
    store(case).export_json().expect("export fixture")
}
