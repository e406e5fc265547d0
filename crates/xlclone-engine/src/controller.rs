//! Fallback sequencing between cloning strategies.
//!
//! The controller owns the strategy order for one document and nothing else:
//! strategies are handed in as a closure so the machine can be exercised in
//! tests without a host, a template, or a filesystem.

use std::fmt;

use tracing::{debug, info, warn};

use crate::error::CloneError;

/// Identifies one cloning technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Native copy from the host, validated and repacked byte-for-byte.
    Recopy,
    /// Template duplicated, value-only worksheet XML injected, rezipped.
    Inject,
    /// Workbook rebuilt from zero through the authoring layer, styles
    /// included.
    Rebuild,
}

impl StrategyKind {
    pub fn label(self) -> &'static str {
        match self {
            StrategyKind::Recopy => "archive recopy",
            StrategyKind::Inject => "template injection",
            StrategyKind::Rebuild => "full rebuild",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What one strategy attempt reported back.
///
/// Expected failures travel through here, not through `Err`: a strategy
/// returns `Err` only for conditions that must abort the whole run (dead
/// host transport, unwritable output disk).
#[derive(Debug)]
pub enum StrategyOutcome {
    /// The output package was written.
    Succeeded,
    /// A precondition is missing (no template, native copies disabled); the
    /// strategy never ran.
    Unavailable(String),
    /// The strategy ran and failed in an expected way (encrypted native
    /// copy, host refused the operation).
    Failed(String),
}

/// Controller states. `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackState {
    NotStarted,
    Trying(StrategyKind),
    Succeeded(StrategyKind),
    /// Every strategy in the plan was exhausted.
    Failed,
}

/// Walks a strategy plan front to back, accepting the first success.
///
/// Transitions happen strictly on the prior strategy reporting failure or
/// unavailability, never on partial success, and no strategy is invoked
/// twice. Exhaustion becomes [`CloneError::AllStrategiesFailed`] carrying
/// every attempt's reason.
pub struct FallbackController {
    document: String,
    plan: Vec<StrategyKind>,
    state: FallbackState,
}

impl FallbackController {
    pub fn new(document: impl Into<String>, plan: Vec<StrategyKind>) -> Self {
        FallbackController {
            document: document.into(),
            plan,
            state: FallbackState::NotStarted,
        }
    }

    /// Current machine state. After a fatal `Err` from [`run`](Self::run)
    /// this is the `Trying` state of the strategy that was cut short, which
    /// is distinct from the exhaustion terminal `Failed`.
    pub fn state(&self) -> FallbackState {
        self.state
    }

    /// Drive the machine to a terminal state, calling `attempt` once per
    /// applicable strategy. Returns the winning strategy.
    pub fn run<F>(&mut self, mut attempt: F) -> Result<StrategyKind, CloneError>
    where
        F: FnMut(StrategyKind) -> Result<StrategyOutcome, CloneError>,
    {
        let plan = self.plan.clone();
        let mut attempts = Vec::with_capacity(plan.len());

        for kind in plan {
            self.state = FallbackState::Trying(kind);
            debug!(document = %self.document, strategy = %kind, "trying strategy");

            match attempt(kind)? {
                StrategyOutcome::Succeeded => {
                    self.state = FallbackState::Succeeded(kind);
                    info!(document = %self.document, strategy = %kind, "clone succeeded");
                    return Ok(kind);
                }
                StrategyOutcome::Unavailable(reason) => {
                    debug!(
                        document = %self.document,
                        strategy = %kind,
                        reason,
                        "strategy unavailable, moving on"
                    );
                    attempts.push(format!("{kind}: unavailable ({reason})"));
                }
                StrategyOutcome::Failed(reason) => {
                    warn!(
                        document = %self.document,
                        strategy = %kind,
                        reason,
                        "strategy failed, falling back"
                    );
                    attempts.push(format!("{kind}: {reason}"));
                }
            }
        }

        self.state = FallbackState::Failed;
        Err(CloneError::AllStrategiesFailed {
            document: self.document.clone(),
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_plan() -> Vec<StrategyKind> {
        vec![
            StrategyKind::Recopy,
            StrategyKind::Inject,
            StrategyKind::Rebuild,
        ]
    }

    #[test]
    fn test_first_success_wins_and_stops() {
        let mut controller = FallbackController::new("book.xlsx", full_plan());
        let mut calls = Vec::new();

        let winner = controller
            .run(|kind| {
                calls.push(kind);
                Ok(StrategyOutcome::Succeeded)
            })
            .unwrap();

        assert_eq!(winner, StrategyKind::Recopy);
        assert_eq!(calls, vec![StrategyKind::Recopy]);
        assert_eq!(controller.state(), FallbackState::Succeeded(StrategyKind::Recopy));
    }

    #[test]
    fn test_failure_falls_through_in_plan_order() {
        let mut controller = FallbackController::new("book.xlsx", full_plan());
        let mut calls = Vec::new();

        let winner = controller
            .run(|kind| {
                calls.push(kind);
                match kind {
                    StrategyKind::Recopy => Ok(StrategyOutcome::Failed("encrypted".into())),
                    StrategyKind::Inject => Ok(StrategyOutcome::Succeeded),
                    StrategyKind::Rebuild => panic!("rebuild must not run"),
                }
            })
            .unwrap();

        assert_eq!(winner, StrategyKind::Inject);
        assert_eq!(calls, vec![StrategyKind::Recopy, StrategyKind::Inject]);
    }

    #[test]
    fn test_unavailable_skips_to_next_without_rerunning() {
        let mut controller = FallbackController::new("book.xlsx", full_plan());
        let mut calls = Vec::new();

        let winner = controller
            .run(|kind| {
                calls.push(kind);
                match kind {
                    StrategyKind::Recopy => Ok(StrategyOutcome::Failed("bad zip".into())),
                    StrategyKind::Inject => Ok(StrategyOutcome::Unavailable("no template".into())),
                    StrategyKind::Rebuild => Ok(StrategyOutcome::Succeeded),
                }
            })
            .unwrap();

        assert_eq!(winner, StrategyKind::Rebuild);
        // Each strategy exactly once, in order; no re-invocation after a failure.
        assert_eq!(
            calls,
            vec![
                StrategyKind::Recopy,
                StrategyKind::Inject,
                StrategyKind::Rebuild
            ]
        );
    }

    #[test]
    fn test_exhaustion_reports_every_attempt() {
        let mut controller = FallbackController::new("book.xlsx", full_plan());

        let err = controller
            .run(|kind| {
                Ok(match kind {
                    StrategyKind::Recopy => StrategyOutcome::Failed("not a zip".into()),
                    StrategyKind::Inject => StrategyOutcome::Unavailable("no template".into()),
                    StrategyKind::Rebuild => StrategyOutcome::Failed("save failed".into()),
                })
            })
            .unwrap_err();

        assert_eq!(controller.state(), FallbackState::Failed);
        match err {
            CloneError::AllStrategiesFailed { document, attempts } => {
                assert_eq!(document, "book.xlsx");
                assert_eq!(attempts.len(), 3);
                assert!(attempts[0].contains("not a zip"));
                assert!(attempts[1].contains("no template"));
                assert!(attempts[2].contains("save failed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_fatal_error_cuts_the_run_short() {
        let mut controller = FallbackController::new("book.xlsx", full_plan());

        let err = controller.run(|kind| match kind {
            StrategyKind::Recopy => Ok(StrategyOutcome::Failed("bad".into())),
            StrategyKind::Inject => Err(CloneError::Host(
                xlclone_core::HostError::Unavailable("bridge died".into()),
            )),
            StrategyKind::Rebuild => panic!("must not continue past a fatal error"),
        });

        assert!(err.is_err());
        // Cut short mid-attempt, not exhausted.
        assert_eq!(controller.state(), FallbackState::Trying(StrategyKind::Inject));
    }

    #[test]
    fn test_empty_plan_fails_immediately() {
        let mut controller = FallbackController::new("book.xlsx", Vec::new());
        let err = controller.run(|_| Ok(StrategyOutcome::Succeeded)).unwrap_err();
        assert!(matches!(err, CloneError::AllStrategiesFailed { .. }));
        assert_eq!(controller.state(), FallbackState::Failed);
    }
}
