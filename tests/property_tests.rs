//! Property-based tests for core types, the tree model and reload ordering.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use repotree::backend::mock::MockBackend;
use repotree::controller::{ControllerOptions, RecordingDispatcher, RepoTreeController};
use repotree::core::context::RepositoryContext;
use repotree::core::types::{BranchName, Oid, RootKind};
use repotree::sync::{RecordingReporter, ReloadOutcome};
use repotree::tree::{NodeId, NodeSpec, TreeError, TreeModel, TreeWidget};

/// Strategy for generating valid branch name characters.
fn branch_name_char() -> impl Strategy<Value = char> {
    prop_oneof![
        prop::char::range('a', 'z'),
        prop::char::range('A', 'Z'),
        prop::char::range('0', '9'),
        Just('-'),
        Just('_'),
        Just('.'),
        Just('/'),
    ]
}

/// Strategy for generating valid branch names.
fn valid_branch_name() -> impl Strategy<Value = String> {
    prop::collection::vec(branch_name_char(), 1..30).prop_filter_map(
        "must be valid branch name",
        |chars| {
            let name: String = chars.into_iter().collect();
            let bad = name.starts_with('.')
                || name.starts_with('-')
                || name.ends_with('/')
                || name.contains("..")
                || name.contains("//")
                || name
                    .split('/')
                    .any(|c| c.starts_with('.') || c.ends_with(".lock"));
            (!bad).then_some(name)
        },
    )
}

fn hex_oid() -> impl Strategy<Value = String> {
    "[0-9a-f]{40}"
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn controller(backend: &MockBackend, cancel_superseded: bool) -> RepoTreeController<TreeModel> {
    RepoTreeController::new(
        TreeModel::new(),
        Arc::new(backend.clone()),
        RecordingDispatcher::new(),
        Arc::new(RecordingReporter::new()),
        ControllerOptions {
            cancel_superseded,
            ..ControllerOptions::default()
        },
    )
    .unwrap()
}

/// Every node below `root`, depth-first.
fn descendants(tree: &TreeModel, root: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = tree.children(root);
    while let Some(id) = stack.pop() {
        stack.extend(tree.children(id));
        out.push(id);
    }
    out
}

// =============================================================================
// Types
// =============================================================================

proptest! {
    #[test]
    fn valid_branch_names_accepted(name in valid_branch_name()) {
        let branch = BranchName::new(name.clone());
        prop_assert!(branch.is_ok(), "rejected {:?}", name);
        let branch = branch.unwrap();
        prop_assert_eq!(branch.segments().collect::<Vec<_>>().join("/"), name);
    }

    #[test]
    fn forbidden_characters_rejected(
        prefix in "[a-z]{1,8}",
        bad in prop::sample::select(vec![' ', '~', '^', ':', '\\', '?', '*', '[']),
    ) {
        let name = format!("{prefix}{bad}x");
        prop_assert!(BranchName::new(name).is_err());
    }

    #[test]
    fn oid_short_is_prefix(hex in hex_oid(), len in 0usize..50) {
        let oid = Oid::new(hex.to_uppercase()).unwrap();
        prop_assert_eq!(oid.as_str(), hex.as_str());
        prop_assert!(hex.starts_with(oid.short(len)));
        prop_assert_eq!(oid.short(len).len(), len.min(40));
    }
}

// =============================================================================
// Tree model
// =============================================================================

proptest! {
    #[test]
    fn sibling_keys_stay_unique(keys in prop::collection::vec("[a-d]{1,2}", 0..30)) {
        let mut tree = TreeModel::new();
        let root = tree.create_root(RootKind::Tags);

        let mut seen = HashSet::new();
        for key in &keys {
            let result = tree.append_child(root, NodeSpec::new(key.clone(), key.clone()));
            if seen.insert(key.clone()) {
                prop_assert!(result.is_ok());
            } else {
                let is_duplicate = matches!(result, Err(TreeError::DuplicateKey { .. }));
                prop_assert!(is_duplicate);
            }
        }
        prop_assert_eq!(tree.children(root).len(), seen.len());
        prop_assert_eq!(tree.len(), seen.len() + 1);
    }

    #[test]
    fn removed_ids_never_resolve(count in 1usize..20) {
        let mut tree = TreeModel::new();
        let root = tree.create_root(RootKind::Stashes);
        for i in 0..count {
            tree.append_child(root, NodeSpec::new(format!("s{i}"), "x")).unwrap();
        }
        let old = tree.detach_children(root).unwrap();
        tree.remove_subtrees(old.clone());
        for i in 0..count {
            tree.append_child(root, NodeSpec::new(format!("n{i}"), "y")).unwrap();
        }
        // Reused slots carry new stamps
        for id in old {
            prop_assert!(tree.node(id).is_none());
        }
        prop_assert_eq!(tree.len(), count + 1);
    }
}

// =============================================================================
// Reloads
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn only_newest_reload_applies(reloads in 1usize..12, cancel in any::<bool>()) {
        let backend = MockBackend::new().with_tags(&["v1"]);
        let outcomes: Vec<ReloadOutcome> = runtime().block_on(async {
            let mut controller = controller(&backend, cancel);
            let initial = controller.bind(RepositoryContext::new("/repo"));
            controller.settle_all(initial).await;

            let handles: Vec<_> = (0..reloads)
                .filter_map(|_| controller.reload(RootKind::Tags))
                .collect();
            controller.settle_all(handles).await
        });

        let generations: Vec<u64> = outcomes.iter().map(ReloadOutcome::generation).collect();
        prop_assert!(generations.windows(2).all(|w| w[0] < w[1]));

        let applied: Vec<_> = outcomes.iter().filter(|o| o.is_applied()).collect();
        prop_assert_eq!(applied.len(), 1);
        prop_assert_eq!(applied[0].generation(), *generations.last().unwrap());
    }

    #[test]
    fn every_branch_lands_once(names in prop::collection::hash_set(valid_branch_name(), 0..12)) {
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let backend = MockBackend::new().with_branches(&names);

        let leaves: Vec<String> = runtime().block_on(async {
            let mut controller = controller(&backend, true);
            let handles = controller.bind(RepositoryContext::new("/repo"));
            controller.settle_all(handles).await;

            let tree = controller.tree();
            descendants(tree, controller.root(RootKind::Branches))
                .into_iter()
                .filter_map(|id| tree.node(id))
                .filter(|node| !node.key().starts_with("dir:"))
                .map(|node| node.key().to_string())
                .collect()
        });

        let expected: HashSet<&str> = names.iter().copied().collect();
        let actual: HashSet<&str> = leaves.iter().map(String::as_str).collect();
        prop_assert_eq!(leaves.len(), names.len());
        prop_assert_eq!(actual, expected);
    }
}
