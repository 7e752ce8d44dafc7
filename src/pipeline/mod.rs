//! Pipeline components: work queue, hashing workers, aggregation, error reporting.

pub mod aggregator;
pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod work_queue;
pub mod workers;

pub use aggregator::{Aggregated, collect_outcomes};
pub use context::{PipelineHandles, PipelineTuning};
pub use error_handler::report_hash_failures;
pub use orchestrator::{collect_hashes, resolve_workers, run_pipeline, shutdown_pipeline_handles};
pub use work_queue::WorkQueue;
pub use workers::{hash_record, spawn_hash_workers};
