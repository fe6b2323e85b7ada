// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A tree is a flat mapping from node id to `TreeNode`; structure lives in each node's
//! `parent_id` and ordered `children` list.

pub(crate) mod fixtures;
pub mod ids;
pub mod kind;
pub mod node;

pub use ids::{Id, IdError, NodeId};
pub use kind::{NodeKind, ParseNodeKindError, ROOT_KINDS};
pub use node::{default_label, NodeData, NodeMap, TreeEdge, TreeNode};

/// Built-in demo tree used by `--demo` and the benchmarks.
pub fn demo_tree() -> NodeMap {
    fixtures::demo_portfolio()
}
