use std::env;
use std::path::PathBuf;

use crate::controller::StrategyKind;

/// Relative order of the two snapshot-based strategies.
///
/// Archive recopy, when enabled, always goes first: it is the only strategy
/// that preserves formulas and charts. Between the other two there is a real
/// trade-off (injection is fast but value-only, rebuild is slow but styled),
/// so the order is configuration rather than policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StrategyPreference {
    /// Try value-only template injection before full reconstruction.
    #[default]
    InjectionFirst,
    /// Try full reconstruction before template injection.
    RebuildFirst,
}

/// Tuning knobs for a cloning run.
#[derive(Debug, Clone)]
pub struct CloneOptions {
    /// Unpacked template package for the injection strategy. The strategy
    /// reports itself unavailable when this is `None` or not a directory.
    pub template_dir: Option<PathBuf>,
    /// Ask the host for a native copy first (archive recopy strategy).
    pub use_native_copy: bool,
    /// Order of the snapshot-based fallbacks.
    pub preference: StrategyPreference,
    /// Directory that holds scratch state between strategies.
    pub scratch_root: PathBuf,
}

impl Default for CloneOptions {
    fn default() -> Self {
        CloneOptions {
            template_dir: None,
            use_native_copy: true,
            preference: StrategyPreference::default(),
            scratch_root: env::temp_dir(),
        }
    }
}

impl CloneOptions {
    /// The strategy order this configuration produces. Every run walks this
    /// plan front to back, each entry at most once.
    pub fn plan(&self) -> Vec<StrategyKind> {
        let mut plan = Vec::with_capacity(3);
        if self.use_native_copy {
            plan.push(StrategyKind::Recopy);
        }
        match self.preference {
            StrategyPreference::InjectionFirst => {
                plan.push(StrategyKind::Inject);
                plan.push(StrategyKind::Rebuild);
            }
            StrategyPreference::RebuildFirst => {
                plan.push(StrategyKind::Rebuild);
                plan.push(StrategyKind::Inject);
            }
        }
        plan
    }

    /// Scratch tree used by the injection strategy.
    pub fn work_dir(&self) -> PathBuf {
        self.scratch_root.join("xlclone_work")
    }

    /// Scratch path the native copy is written to.
    pub fn copy_path(&self) -> PathBuf {
        self.scratch_root.join("xlclone_copy.xlsx")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan_is_recopy_inject_rebuild() {
        let plan = CloneOptions::default().plan();
        assert_eq!(
            plan,
            vec![
                StrategyKind::Recopy,
                StrategyKind::Inject,
                StrategyKind::Rebuild
            ]
        );
    }

    #[test]
    fn test_native_copy_can_be_disabled() {
        let options = CloneOptions {
            use_native_copy: false,
            ..Default::default()
        };
        assert_eq!(
            options.plan(),
            vec![StrategyKind::Inject, StrategyKind::Rebuild]
        );
    }

    #[test]
    fn test_rebuild_first_preference() {
        let options = CloneOptions {
            preference: StrategyPreference::RebuildFirst,
            ..Default::default()
        };
        assert_eq!(
            options.plan(),
            vec![
                StrategyKind::Recopy,
                StrategyKind::Rebuild,
                StrategyKind::Inject
            ]
        );
    }

    #[test]
    fn test_scratch_paths_live_under_the_root() {
        let options = CloneOptions {
            scratch_root: PathBuf::from("/tmp/xc"),
            ..Default::default()
        };
        assert_eq!(options.work_dir(), PathBuf::from("/tmp/xc/xlclone_work"));
        assert_eq!(
            options.copy_path(),
            PathBuf::from("/tmp/xc/xlclone_copy.xlsx")
        );
    }
}
