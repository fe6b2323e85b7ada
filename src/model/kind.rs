// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Node kinds and the static parent/child registry.
//!
//! The registry is advisory: the UI uses it to decide which "add child" actions to offer, and the
//! integrity checker reports violations, but the store itself never rejects a disallowed pairing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed category of a tree entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Account,
    Loan,
    Collateral,
}

const ACCOUNT_CHILDREN: &[NodeKind] = &[NodeKind::Loan, NodeKind::Collateral];
const LOAN_CHILDREN: &[NodeKind] = &[NodeKind::Collateral];
const COLLATERAL_CHILDREN: &[NodeKind] = &[];

/// Kinds offered by the toolbar as new roots.
pub const ROOT_KINDS: &[NodeKind] = &[NodeKind::Account, NodeKind::Loan];

impl NodeKind {
    pub const ALL: [NodeKind; 3] = [NodeKind::Account, NodeKind::Loan, NodeKind::Collateral];

    /// Wire name (`account`, `loan`, `collateral`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Loan => "loan",
            Self::Collateral => "collateral",
        }
    }

    /// Capitalised name used in default labels and buttons.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Loan => "Loan",
            Self::Collateral => "Collateral",
        }
    }

    /// Ordered set of kinds that may be created directly under a node of this kind.
    pub fn allowed_children(self) -> &'static [NodeKind] {
        match self {
            Self::Account => ACCOUNT_CHILDREN,
            Self::Loan => LOAN_CHILDREN,
            Self::Collateral => COLLATERAL_CHILDREN,
        }
    }

    pub fn allows_child(self, child: NodeKind) -> bool {
        self.allowed_children().contains(&child)
    }

    pub fn is_leaf(self) -> bool {
        self.allowed_children().is_empty()
    }

    pub fn is_root_kind(self) -> bool {
        ROOT_KINDS.contains(&self)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown node kind '{0}' (expected account|loan|collateral)")]
pub struct ParseNodeKindError(pub String);

impl FromStr for NodeKind {
    type Err = ParseNodeKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "account" => Ok(Self::Account),
            "loan" => Ok(Self::Loan),
            "collateral" => Ok(Self::Collateral),
            other => Err(ParseNodeKindError(other.to_owned())),
        }
    }
}
