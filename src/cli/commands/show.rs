//! show command - Print the object tree

use anyhow::{Context as _, Result};

use super::{load_tree, repo_root};
use crate::cli::Context;
use crate::controller::GitCheckoutDispatcher;
use crate::tree::render::{render_json, render_text};

/// Load the repository and print its tree.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `json` - Print JSON instead of text
/// * `collapsed` - Leave the roots collapsed
/// * `flat` - Do not group branches by path segment
pub fn show(ctx: &Context, json: bool, collapsed: bool, flat: bool) -> Result<()> {
    let repo = repo_root(ctx)?;
    // Nothing is activated here; the dispatcher only has to exist.
    let dispatcher = GitCheckoutDispatcher::new(&repo).dry_run(true);
    let mut controller = load_tree(ctx, &repo, dispatcher, flat)?;

    if !collapsed {
        controller.expand_all();
    }

    if json {
        let rendered = render_json(controller.tree()).context("Failed to render tree")?;
        println!("{}", rendered);
    } else {
        print!("{}", render_text(controller.tree(), false));
    }

    Ok(())
}
