//! activate command - Activate a tree node by label

use anyhow::{anyhow, Context as _, Result};

use super::{load_tree, repo_root};
use crate::cli::Context;
use crate::controller::{Activation, GitCheckoutDispatcher};
use crate::core::types::RootKind;
use crate::tree::TreeWidget;
use crate::ui::output;

/// Activate the first node labelled `label` under the `root` region.
///
/// Branch leaves check the branch out (or, with `dry_run`, only say they
/// would). Folders toggle; other regions have no action.
pub fn activate(ctx: &Context, root: RootKind, label: &str, dry_run: bool) -> Result<()> {
    let verbosity = ctx.verbosity();
    let repo = repo_root(ctx)?;
    let dispatcher = GitCheckoutDispatcher::new(&repo).dry_run(dry_run);
    let mut controller = load_tree(ctx, &repo, dispatcher, false)?;

    let region_root = controller.root(root);
    let node = controller
        .tree()
        .find_descendant(region_root, label)
        .ok_or_else(|| anyhow!("No node labelled '{}' under {}", label, root))?;

    let activation = controller
        .on_node_activated(node)
        .with_context(|| format!("Failed to activate '{}'", label))?;

    match activation {
        Activation::Checkout(intent) if dry_run => output::success(
            format!("Would check out {}", intent.branch_label),
            verbosity,
        ),
        Activation::Checkout(intent) => {
            output::success(format!("Checked out {}", intent.branch_label), verbosity)
        }
        Activation::Toggle { .. } => output::print(
            format!("'{}' has children; activating it toggles it", label),
            verbosity,
        ),
        Activation::NoAction { region } => output::print(
            format!("No action for '{}' ({:?})", label, region),
            verbosity,
        ),
    }

    Ok(())
}
