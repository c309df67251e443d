//! ui::output
//!
//! Terminal output for `rtree`.
//!
//! # Design
//!
//! Status messages (warnings, confirmations, debug notes) respect the
//! verbosity chosen on the command line. Command results, such as the
//! rendered tree, are printed by the commands themselves and are never
//! suppressed. Errors always go to stderr.

use std::fmt::Display;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// `--quiet`: results and errors only
    Quiet,
    #[default]
    Normal,
    /// `--debug`: also debug notes
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags. `--quiet` wins over `--debug`.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        match (quiet, debug) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Debug,
            (false, false) => Verbosity::Normal,
        }
    }

    /// Whether status messages are shown.
    pub fn shows_status(self) -> bool {
        self != Verbosity::Quiet
    }
}

/// Print an informational line to stdout.
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity.shows_status() {
        println!("{}", message);
    }
}

/// Print a confirmation that an action happened.
pub fn success(message: impl Display, verbosity: Verbosity) {
    if verbosity.shows_status() {
        println!("✓ {}", message);
    }
}

/// Print a warning to stderr.
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity.shows_status() {
        eprintln!("warning: {}", message);
    }
}

/// Print a debug note to stderr (debug mode only).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error to stderr. Always shown.
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}
