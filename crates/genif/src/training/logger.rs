//! Structured progress output for fitting and scoring.

use std::time::Instant;

/// How much a fit or score call reports on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Cancellations and other abnormal stops.
    Warning,
    /// Start and end of every fit and score batch.
    Info,
    /// One line per tree.
    Debug,
}

/// Writes `[genif]`-prefixed lines to stderr according to a [`Verbosity`].
#[derive(Debug, Clone)]
pub struct FitLogger {
    verbosity: Verbosity,
    started: Option<Instant>,
}

impl FitLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            started: None,
        }
    }

    #[inline]
    pub fn enabled(&self, level: Verbosity) -> bool {
        level != Verbosity::Silent && self.verbosity >= level
    }

    fn emit(&self, level: Verbosity, message: std::fmt::Arguments<'_>) {
        if self.enabled(level) {
            eprintln!("[genif] {message}");
        }
    }

    fn elapsed_ms(&self) -> f64 {
        self.started
            .map(|t| t.elapsed().as_secs_f64() * 1e3)
            .unwrap_or(0.0)
    }

    pub fn start_fit(&mut self, n_samples: usize, subsample_size: u32, n_trees: u32) {
        self.started = Some(Instant::now());
        self.emit(
            Verbosity::Info,
            format_args!("fit: n={n_samples} m={subsample_size} trees={n_trees}"),
        );
    }

    pub fn log_tree(&self, tree_idx: usize, n_nodes: usize, n_leaves: usize) {
        self.emit(
            Verbosity::Debug,
            format_args!("tree {tree_idx}: nodes={n_nodes} leaves={n_leaves}"),
        );
    }

    pub fn finish_fit(&self, n_trees: usize, n_nodes: usize) {
        self.emit(
            Verbosity::Info,
            format_args!(
                "fit done: trees={n_trees} nodes={n_nodes} elapsed={:.1}ms",
                self.elapsed_ms()
            ),
        );
    }

    pub fn start_scoring(&mut self, n_items: usize) {
        self.started = Some(Instant::now());
        self.emit(Verbosity::Info, format_args!("score: items={n_items}"));
    }

    pub fn finish_scoring(&self, n_items: usize) {
        self.emit(
            Verbosity::Info,
            format_args!(
                "score done: items={n_items} elapsed={:.1}ms",
                self.elapsed_ms()
            ),
        );
    }

    /// `stage` is `"fit"` or `"score"`.
    pub fn log_cancelled(&self, stage: &str) {
        self.emit(
            Verbosity::Warning,
            format_args!("{stage} cancelled after {:.1}ms", self.elapsed_ms()),
        );
    }
}
