// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The tree store and its serialized form.
//!
//! `TreeStore` is the single source of truth for the node mapping and selection. `snapshot`
//! reads/writes the JSON export format; `integrity` diagnoses inconsistent mappings (which
//! imports are allowed to produce).

pub mod integrity;
pub mod snapshot;
pub mod tree_store;

pub use integrity::{check_tree, IntegrityIssue, ParentRef};
pub use snapshot::{
    export_file_name, ExportError, ImportError, ShapeProblem, EXPORT_CONTENT_TYPE,
};
pub use tree_store::TreeStore;
