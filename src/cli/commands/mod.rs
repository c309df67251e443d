//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Locates the repository and loads configuration
//! 2. Builds a controller over an in-memory tree and binds it
//! 3. Drives the reloads to completion on a tokio runtime
//! 4. Formats and displays output
//!
//! The handler's thread owns the tree for the whole command, so it is the
//! one draining the controller's queue while reloads settle.

mod activate;
mod show;

pub use activate::activate;
pub use show::show;

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::args::Command;
use super::Context;
use crate::backend::GitBackend;
use crate::controller::{ActionDispatcher, ControllerOptions, RepoTreeController};
use crate::core::config::Config;
use crate::core::context::RepositoryContext;
use crate::git::Git;
use crate::sync::RecordingReporter;
use crate::tree::TreeModel;
use crate::ui::output;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Show {
            json,
            collapsed,
            flat,
        } => show(ctx, json, collapsed, flat),
        Command::Activate {
            root,
            label,
            dry_run,
        } => activate(ctx, root, &label, dry_run),
    }
}

/// Working directory of the repository containing `--cwd` (or the
/// current directory).
fn repo_root(ctx: &Context) -> Result<PathBuf> {
    let cwd = match &ctx.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let git = Git::open(&cwd).context("Failed to open repository")?;
    Ok(git.work_dir().map(Path::to_path_buf).unwrap_or(cwd))
}

/// Build a controller for `repo`, bind it and wait for every set to settle.
///
/// Sets that fail to load are reported as warnings; their roots stay empty.
fn load_tree(
    ctx: &Context,
    repo: &Path,
    dispatcher: impl ActionDispatcher + 'static,
    flat: bool,
) -> Result<RepoTreeController<TreeModel>> {
    let verbosity = ctx.verbosity();
    let config = Config::load(Some(repo)).context("Failed to load configuration")?;
    if let Some(path) = config.global_config_loaded_from() {
        output::debug(format!("global config: {}", path.display()), verbosity);
    }
    if let Some(path) = config.repo_config_loaded_from() {
        output::debug(format!("repo config: {}", path.display()), verbosity);
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let mut options = ControllerOptions::from_config(&config);
    options.runtime = Some(runtime.handle().clone());
    if flat {
        options.group_branches = false;
    }

    let reporter = RecordingReporter::new();
    let mut controller = RepoTreeController::new(
        TreeModel::new(),
        Arc::new(GitBackend::new()),
        dispatcher,
        Arc::new(reporter.clone()),
        options,
    )
    .context("Failed to build tree")?;

    let outcomes = runtime.block_on(async {
        let handles = controller.bind(RepositoryContext::new(repo));
        controller.settle_all(handles).await
    });

    for failure in reporter.failures() {
        output::warn(&failure, verbosity);
    }
    output::debug(
        format!(
            "{} of {} sets loaded",
            outcomes.iter().filter(|o| o.is_applied()).count(),
            outcomes.len()
        ),
        verbosity,
    );

    Ok(controller)
}
