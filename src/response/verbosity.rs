//! Verbosity of response construction.
//!
//! The level is read by library code before emitting construction
//! warnings. It can only be changed through [`scoped`], whose guard puts
//! the previous level back when dropped, including during unwinding.

use std::cell::Cell;

/// How much response construction reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Nothing.
    Quiet,
    /// Warnings only.
    Warn,
    /// Warnings and progress notes.
    Info,
}

thread_local! {
    static LEVEL: Cell<Verbosity> = const { Cell::new(Verbosity::Warn) };
}

/// Current level.
pub fn level() -> Verbosity {
    LEVEL.with(Cell::get)
}

/// Whether messages at `wanted` are currently reported.
pub fn enabled(wanted: Verbosity) -> bool {
    wanted != Verbosity::Quiet && wanted <= level()
}

/// Set the level until the returned guard is dropped.
#[must_use = "the level is restored as soon as the guard is dropped"]
pub fn scoped(level: Verbosity) -> VerbosityGuard {
    let previous = LEVEL.with(|l| l.replace(level));
    VerbosityGuard { previous }
}

/// Restores the previous verbosity on drop.
#[derive(Debug)]
pub struct VerbosityGuard {
    previous: Verbosity,
}

impl Drop for VerbosityGuard {
    fn drop(&mut self) {
        LEVEL.with(|l| l.set(self.previous));
    }
}
