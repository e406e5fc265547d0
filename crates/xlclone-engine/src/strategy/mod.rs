//! The three cloning strategies.
//!
//! Each strategy is a self-contained function from a host document to an
//! output package: it reads whatever it needs through the port, stages its
//! work under the configured scratch root, and reports a
//! [`StrategyOutcome`]. Preconditions are checked before any host traffic,
//! so an unavailable strategy costs nothing.
//!
//! | strategy | fidelity | cost |
//! |---|---|---|
//! | [`recopy`] | everything the host saves | one native save |
//! | [`inject`] | values at their addresses | one bulk read per sheet |
//! | [`rebuild`] | values, styles, merges, dimensions | per-cell attribute reads |

pub mod inject;
pub mod rebuild;
pub mod recopy;

use xlclone_core::HostError;

use crate::controller::StrategyOutcome;
use crate::error::CloneError;

/// Route a host failure out of a strategy: fatal errors abort the whole
/// run, anything else is an expected failure the controller falls back on.
fn host_failure(stage: &str, error: HostError) -> Result<StrategyOutcome, CloneError> {
    if error.is_fatal() {
        Err(CloneError::Host(error))
    } else {
        Ok(StrategyOutcome::Failed(format!("{stage}: {error}")))
    }
}
