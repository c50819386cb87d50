//! NodePulse status - worker health classification
//!
//! Turns the latest heartbeat snapshot of a worker into a presentation-ready
//! status view:
//! - A coarse health code (1 healthy .. 4 all axes hot, 9999 offline)
//! - CPU, memory and disk load texts with a fixed numeric format
//! - Passthrough identity and tracker counters
//!
//! The registry module keeps the current snapshot of every worker so a
//! rendering layer can ask for views on demand.

pub mod error;
pub mod format;
pub mod health;
pub mod metrics;
pub mod registry;
pub mod view;
pub mod worker;

pub use error::StatusError;
pub use format::{format_or_placeholder, format_time, NumberFormat, LOAD_NUMBER_FORMAT};
pub use health::{score, HealthRule, HealthSignals, HealthStatus, UnknownHealthCode, HEALTH_RULES, LOAD_THRESHOLD};
pub use metrics::SystemMetricsSnapshot;
pub use registry::{SharedWorkerRegistry, WorkerRegistry};
pub use view::{StatusClassifier, StatusConfig, WorkerStatusView};
pub use worker::{now_millis, WorkerHeartbeat, WorkerInfo, WORKER_TIMEOUT_MS};
