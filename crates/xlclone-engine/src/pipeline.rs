//! One-document pipeline: the controller wired to the real strategies.

use std::path::{Path, PathBuf};

use tracing::info;
use xlclone_core::{DocumentHost, DocumentId};

use crate::controller::{FallbackController, StrategyKind};
use crate::error::CloneResult;
use crate::options::CloneOptions;
use crate::strategy;

/// What one successful clone produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneReport {
    /// Display name of the source document.
    pub document: String,
    /// Where the clone was written.
    pub output: PathBuf,
    /// The strategy that produced it.
    pub strategy: StrategyKind,
}

/// Clones open documents one at a time against a shared host session.
pub struct ClonePipeline<'a> {
    host: &'a dyn DocumentHost,
    options: CloneOptions,
}

impl<'a> ClonePipeline<'a> {
    pub fn new(host: &'a dyn DocumentHost, options: CloneOptions) -> Self {
        ClonePipeline { host, options }
    }

    /// The host session this pipeline reads through.
    pub fn host(&self) -> &'a dyn DocumentHost {
        self.host
    }

    /// The options this pipeline runs with.
    pub fn options(&self) -> &CloneOptions {
        &self.options
    }

    /// Clone the open document `doc` (named `name` for reporting) to
    /// `output`, walking the configured strategy plan until one succeeds.
    ///
    /// Strategy exhaustion comes back as
    /// [`CloneError::AllStrategiesFailed`](crate::CloneError::AllStrategiesFailed)
    /// with every attempt's reason; the source document is left untouched
    /// either way.
    pub fn clone_document(
        &self,
        doc: DocumentId,
        name: &str,
        output: &Path,
    ) -> CloneResult<CloneReport> {
        info!(document = name, output = %output.display(), "cloning");

        let mut controller = FallbackController::new(name, self.options.plan());
        let strategy = controller.run(|kind| match kind {
            StrategyKind::Recopy => strategy::recopy::run(self.host, doc, output, &self.options),
            StrategyKind::Inject => strategy::inject::run(self.host, doc, output, &self.options),
            StrategyKind::Rebuild => strategy::rebuild::run(self.host, doc, output),
        })?;

        Ok(CloneReport {
            document: name.to_string(),
            output: output.to_path_buf(),
            strategy,
        })
    }
}
