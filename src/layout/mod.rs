// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout of the tree for display.
//!
//! Converts the node mapping plus its derived parent/child edges into positioned nodes and styled
//! edges. Layout is pure and recomputed in full whenever the mapping changes.

pub mod tree;

pub use tree::{
    layout_store, layout_tree, EdgePath, EdgeStyle, LayoutConfig, LayoutEdge, Position,
    PositionedNode, Size, TreeLayout,
};
