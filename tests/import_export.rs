// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::path::{Path, PathBuf};

use loan_tree::layout::{layout_store, LayoutConfig};
use loan_tree::model::{NodeId, NodeKind};
use loan_tree::ops::{apply_action, Action};
use loan_tree::render::render_tree_unicode;
use loan_tree::store::{check_tree, ImportError, IntegrityIssue, ShapeProblem, TreeStore};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join("exports")
}

fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("failed to read {path:?}: {err}"))
}

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn import_fixture(name: &str) -> TreeStore {
    let mut store = TreeStore::new();
    store
        .import_json(&read_fixture(name))
        .unwrap_or_else(|err| panic!("expected {name} to import, got error: {err}"));
    store
}

#[test]
fn branch_export_imports_cleanly() {
    let store = import_fixture("branch.json");

    assert_eq!(store.len(), 4);
    assert!(check_tree(store.nodes(), store.selected_id()).is_empty());
    assert_eq!(store.selected_id(), None);

    let roots: Vec<&str> = store.roots().iter().map(|node| node.id().as_str()).collect();
    assert_eq!(roots, ["acct-1", "loan-2"]);

    let lien = store.node("coll-1").expect("collateral");
    assert_eq!(lien.kind(), NodeKind::Collateral);
    assert_eq!(lien.parent_id(), Some(&nid("loan-1")));
    assert_eq!(lien.data().description(), Some("First lien on MV Aurora"));

    let bridge = store.node("loan-2").expect("standalone loan");
    assert!(bridge.is_root());
    assert_eq!(bridge.data().description(), None);
}

#[test]
fn export_then_import_reproduces_the_mapping() {
    let original = import_fixture("branch.json");
    let text = original.export_json().expect("export");

    let value: serde_json::Value = serde_json::from_str(&text).expect("export is JSON");
    assert_eq!(value["loan-1"]["parentId"], "acct-1");
    assert_eq!(value["coll-1"]["type"], "collateral");
    assert!(value["acct-1"].get("parentId").is_none());
    assert!(value["loan-2"]["data"].get("description").is_none());
    assert!(value["loan-2"].get("note").is_none());
    assert!(text.starts_with("{\n  \""));

    let mut copy = TreeStore::new();
    assert_eq!(copy.import_json(&text).expect("re-import"), 4);
    assert_eq!(copy.nodes(), original.nodes());
}

#[test]
fn inconsistent_export_is_accepted_and_diagnosed() {
    let store = import_fixture("inconsistent.json");
    assert_eq!(store.len(), 2);

    let issues = check_tree(store.nodes(), store.selected_id());
    assert!(issues.contains(&IntegrityIssue::DanglingChild {
        node: nid("loan-a"),
        child: nid("ghost"),
    }));
    assert!(issues.contains(&IntegrityIssue::DanglingParent {
        node: nid("coll-b"),
        parent: nid("missing-loan"),
    }));

    assert!(store.edges().is_empty());
    let rendered = render_tree_unicode(&store).expect("render");
    assert!(rendered.contains("Loan A"));
    assert!(rendered.contains("Collateral B"));
}

#[test]
fn rejected_import_keeps_the_previous_tree() {
    let mut store = import_fixture("branch.json");
    let rev = store.rev();

    let err = store.import_json(&read_fixture("bad_kind.json")).unwrap_err();
    match err {
        ImportError::Shape { key, problem } => {
            assert_eq!(key, "x-1");
            assert_eq!(problem, ShapeProblem::UnknownKind { kind: "mortgage".to_owned() });
        }
        other => panic!("expected a shape error, got {other:?}"),
    }

    assert_eq!(store.rev(), rev);
    assert_eq!(store.len(), 4);
    assert!(store.contains("acct-1"));
}

#[test]
fn edits_survive_an_export_round_trip() {
    let mut store = TreeStore::new();

    let account = apply_action(&mut store, Action::CreateRoot { kind: NodeKind::Account })
        .expect("create account")
        .created
        .expect("account id");
    let loan = apply_action(
        &mut store,
        Action::CreateChild { kind: NodeKind::Loan, parent_id: account.clone() },
    )
    .expect("create loan")
    .created
    .expect("loan id");
    apply_action(
        &mut store,
        Action::EditLabel { node_id: loan.clone(), label: "Working capital".to_owned() },
    )
    .expect("edit label");
    let description = "Anchor client".to_owned();
    apply_action(&mut store, Action::EditDescription { node_id: account.clone(), description })
        .expect("edit description");

    let text = store.export_json().expect("export");
    apply_action(&mut store, Action::Clear).expect("clear");
    assert!(store.is_empty());

    apply_action(&mut store, Action::Import { text }).expect("import");
    assert_eq!(store.len(), 2);
    assert_eq!(store.node(loan.as_str()).map(|node| node.label()), Some("Working capital"));
    assert_eq!(
        store.node(account.as_str()).and_then(|node| node.data().description()),
        Some("Anchor client")
    );
    assert_eq!(store.node(account.as_str()).map(|node| node.children().to_vec()), Some(vec![loan]));
}

#[test]
fn imported_tree_lays_out_by_depth() {
    let store = import_fixture("branch.json");
    let layout = layout_store(&store, &LayoutConfig::default());

    let rank = |id: &str| layout.node(id).expect("positioned").rank();
    assert_eq!(rank("acct-1"), 0);
    assert_eq!(rank("loan-2"), 0);
    assert_eq!(rank("loan-1"), 1);
    assert_eq!(rank("coll-1"), 2);

    let y = |id: &str| layout.node(id).expect("positioned").position().y;
    assert!(y("acct-1") < y("loan-1"));
    assert!(y("loan-1") < y("coll-1"));
    assert_eq!(layout.edges().len(), 2);
}
