//! Pipeline components: scopes, channels, feed, worker pool, orchestration.

pub mod context;
pub mod error_handler;
pub mod feed;
pub mod orchestrator;
pub mod scope;
pub mod worker;

pub use context::{
    PipelineChannels, PipelineHandles, PoolConfig, channel_cap, create_pipeline_channels,
};
pub use error_handler::{RunError, report_record_failure};
pub use feed::feed_jobs;
pub use orchestrator::{collect_report, run_pipeline, wait_for_workers};
pub use scope::{RunScope, TimeoutScope};
pub use worker::{ActorCaller, WorkerContext, spawn_workers};
