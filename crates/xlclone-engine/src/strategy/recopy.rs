//! Archive recopy: native copy, validated and repacked.
//!
//! Asks the host to write its own copy of the document to a scratch path,
//! proves the product is a readable package, and repacks those exact bytes
//! as the output. Cell content is never interpreted, so everything the host
//! saved (formulas, charts, defined names) survives. An encrypted or
//! otherwise unreadable product fails validation and hands control to the
//! next strategy; the scratch copy is removed on every exit path.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};
use xlclone_container::{pack_parts, unpack, CONTENT_TYPES_PART};
use xlclone_core::{DocumentHost, DocumentId};

use crate::controller::StrategyOutcome;
use crate::error::CloneError;
use crate::options::CloneOptions;
use crate::strategy::host_failure;

pub fn run(
    host: &dyn DocumentHost,
    doc: DocumentId,
    output: &Path,
    options: &CloneOptions,
) -> Result<StrategyOutcome, CloneError> {
    let copy = options.copy_path();

    if let Err(e) = host.save_copy(doc, &copy) {
        remove_copy(&copy);
        return host_failure("native copy", e);
    }
    debug!(copy = %copy.display(), "host wrote a native copy");

    let parts = match unpack(&copy) {
        Ok(parts) => parts,
        Err(e) => {
            // Typical for encrypted workbooks: the host saves a CFB
            // envelope instead of a zip package.
            remove_copy(&copy);
            return Ok(StrategyOutcome::Failed(format!(
                "native copy is not a readable package: {e}"
            )));
        }
    };

    if !parts.iter().any(|(name, _)| name == CONTENT_TYPES_PART) {
        remove_copy(&copy);
        return Ok(StrategyOutcome::Failed(format!(
            "native copy has no {CONTENT_TYPES_PART} part"
        )));
    }

    let packed = pack_parts(output, &parts);
    remove_copy(&copy);
    packed?;

    info!(
        parts = parts.len(),
        output = %output.display(),
        "native copy validated and repacked"
    );
    Ok(StrategyOutcome::Succeeded)
}

/// Best-effort scratch cleanup, taken on every exit path.
fn remove_copy(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            debug!(path = %path.display(), error = %e, "scratch copy not removed");
        }
    }
}
