//! # xlclone-engine
//!
//! The cloning engine: reads workbook state out of a live host and writes a
//! standalone package, falling back through strategies of decreasing
//! fidelity until one succeeds.
//!
//! - [`snapshot`] - bulk value pass and per-cell style pass against the
//!   [`DocumentHost`](xlclone_core::DocumentHost) port
//! - [`strategy`] - archive recopy, template injection, full rebuild
//! - [`FallbackController`] - the state machine that orders the attempts
//! - [`ClonePipeline`] - controller wired to the real strategies for one
//!   document
//! - [`clone_folder`] - batch driver over a folder of workbook files
//!
//! Expected strategy failures (an encrypted native copy, a missing
//! template) travel as [`StrategyOutcome`] values and drive the fallback;
//! only strategy exhaustion and fatal host or filesystem conditions surface
//! as [`CloneError`].

pub mod batch;
pub mod controller;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod snapshot;
pub mod strategy;

pub use batch::{clone_folder, output_name, BatchSummary};
pub use controller::{FallbackController, FallbackState, StrategyKind, StrategyOutcome};
pub use error::{CloneError, CloneResult};
pub use options::{CloneOptions, StrategyPreference};
pub use pipeline::{ClonePipeline, CloneReport};
pub use snapshot::{snapshot_values, snapshot_with_styles, SheetSnapshot, WorkbookSnapshot};
