//! Native Linux client for Excel COM automation via a WINE bridge process.
//!
//! Excel automation only works in-process on Windows, so the COM calls live
//! in a small Windows executable (`xlclone-host-bridge.exe`) that runs under
//! WINE and speaks JSON-over-stdio. This crate spawns that process, drives
//! the protocol, and adapts the wire types onto the
//! [`DocumentHost`](xlclone_core::DocumentHost) port the cloning engine
//! consumes.
//!
//! # Architecture
//!
//! ```text
//! Cloning engine (native Linux)
//!     └── ExcelHost / ExcelBridge (this crate)
//!           └── spawns: wine xlclone-host-bridge.exe
//!                 └── Excel.Application via COM
//! ```
//!
//! The user's copy of a workbook is never touched: the session attaches to
//! the running instance, batch documents are opened read-only, and every
//! close is a close-without-saving.
//!
//! # Example
//!
//! ```rust,no_run
//! use xlclone_core::DocumentHost;
//! use xlclone_host::{ExcelBridgeConfig, ExcelHost};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let host = ExcelHost::connect(ExcelBridgeConfig::default())?;
//!     for doc in host.list_documents()? {
//!         println!("{} (active: {})", doc.name, doc.active);
//!     }
//!     host.shutdown()?;
//!     Ok(())
//! }
//! ```

mod bridge;
mod host;

pub use bridge::{linux_to_wine_path, BridgeError, ExcelBridge, ExcelBridgeConfig};
pub use host::ExcelHost;
