//! # brine-apply
//!
//! Generate the minion configuration file and reconcile the daemon:
//! hash-gated atomic config writes, best-effort ownership normalization,
//! conditional master-key download, and the systemd lifecycle transition.
//!
//! Call [`run_at`] for the full generate+apply sequence, or the individual
//! stages ([`generate_at`], [`reconcile_at`]) directly.

pub mod error;
pub mod keyfetch;
pub mod ownership;
pub mod paths;
pub mod pipeline;
pub mod service;
pub mod writer;

pub use error::ApplyError;
pub use keyfetch::KeyOutcome;
pub use ownership::OwnershipReport;
pub use pipeline::{
    generate_at, reconcile_at, run_at, GenerateReport, PipelineReport, ServiceAction,
};
pub use service::{ServiceManager, Systemctl};
pub use writer::WriteResult;
