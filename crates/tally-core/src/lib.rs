//! Shapes flat measurement observations into a nested, UI-ready report.
//!
//! A [`ReportConfig`] says, per test, which argument is the x-axis, which metrics become
//! y-values and which argument splits points into sequences. Generation runs:
//!
//! - observation filtering (`axis_y` clauses, `not_show_args`)
//! - common argument extraction and point building
//! - grouping into records and sequences
//! - table/chart datasets with relative-gain columns
//!
//! # Quick Start
//!
//! ```no_run
//! use tally_core::{generate_report, ConfigDir, RunFile};
//! use std::path::Path;
//!
//! # fn example() -> tally_core::ReportResult<()> {
//! let run = RunFile::load(Path::new("run.json"))?;
//! let configs = ConfigDir::open("reports")?;
//! let report = generate_report(&run, &configs, &run.id, "net")?;
//! println!("{} tests", report.content.len());
//! # Ok(())
//! # }
//! ```

pub mod common_args;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod filter;
pub mod grouping;
pub mod labels;
pub mod model;
pub mod percentage;
pub mod point;
pub mod report;
mod scalar;
pub mod source;

// Re-export main types
pub use common_args::CommonArgs;
pub use config::{
    load_config, parse_config, ConfigFormat, ConfigInfo, ConfigListing, ReportConfig, TestConfig,
};
pub use dataset::{Cell, Dataset};
pub use errors::{Missing, ReportError, ReportResult};
pub use labels::{ArgValsLabels, LabelConverter};
pub use model::{ArgValue, MetricMeta, Observation};
pub use report::{
    applicable_configs, build_report_title, generate_report, PointMetadata, Record, Report,
    ReportGenerator, ReportTest, SequenceMetadata, UnprocessedIteration,
};
pub use source::{ConfigDir, ConfigSource, ObservationSource, Revision, RunFile, RunInfo};
