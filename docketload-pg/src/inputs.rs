//! Source file locations
//!
//! Resolution per table: `--<table>` flag, then `[inputs].<table>` from
//! config, then `<data dir>/<default file name>`. The data dir itself is
//! `--data-dir`, then `[inputs].data_dir`, then the working directory.

use std::path::{Path, PathBuf};

use clap::Args;
use docketload_core::TableKind;
use tracing::warn;

use crate::config::InputsConfig;

#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Directory holding cases.csv, billable_hours.csv and tasks.csv
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Cases source (overrides --data-dir)
    #[arg(long, value_name = "PATH")]
    pub cases: Option<PathBuf>,

    /// Billable hours source (overrides --data-dir)
    #[arg(long = "billable-hours", value_name = "PATH")]
    pub billable_hours: Option<PathBuf>,

    /// Tasks source (overrides --data-dir)
    #[arg(long, value_name = "PATH")]
    pub tasks: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    cases: PathBuf,
    billable_hours: PathBuf,
    tasks: PathBuf,
}

impl InputPaths {
    pub fn resolve(args: &InputArgs, config: &InputsConfig) -> Self {
        let data_dir = args
            .data_dir
            .clone()
            .or_else(|| config.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        let pick = |flag: &Option<PathBuf>, configured: &Option<PathBuf>, kind: TableKind| {
            flag.clone()
                .or_else(|| configured.clone())
                .unwrap_or_else(|| data_dir.join(kind.spec().source_file))
        };

        Self {
            cases: pick(&args.cases, &config.cases, TableKind::Cases),
            billable_hours: pick(
                &args.billable_hours,
                &config.billable_hours,
                TableKind::BillableHours,
            ),
            tasks: pick(&args.tasks, &config.tasks, TableKind::Tasks),
        }
    }

    pub fn path_for(&self, kind: TableKind) -> &Path {
        match kind {
            TableKind::Cases => &self.cases,
            TableKind::BillableHours => &self.billable_hours,
            TableKind::Tasks => &self.tasks,
        }
    }

    /// Warn about sources that are not regular files. The load still goes
    /// ahead; these tables will report a source error when reached.
    pub fn check(&self, tables: &[TableKind]) -> Vec<TableKind> {
        let missing: Vec<TableKind> = tables
            .iter()
            .copied()
            .filter(|kind| !self.path_for(*kind).is_file())
            .collect();

        for kind in &missing {
            warn!(
                table = %kind,
                path = %self.path_for(*kind).display(),
                "source file not found"
            );
        }
        missing
    }
}
