// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Loan Tree: a terminal editor for account, loan and collateral hierarchies.
//!
//! The store owns the flat node mapping, `ops` is the typed action surface, `layout`
//! positions nodes in ranks and `render` draws them onto a character canvas for the TUI.

pub mod layout;
pub mod model;
pub mod ops;
pub mod render;
pub mod store;
pub mod tui;
