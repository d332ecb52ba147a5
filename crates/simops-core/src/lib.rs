//! Business logic between `simops-api` and UI consumers.
//!
//! This crate owns the domain model and the pure classification rules
//! the dashboard is built on:
//!
//! - **Domain model** ([`model`]) -- canonical [`BundleInstance`] and
//!   [`Endpoint`] types, built from raw wire records by the boundary
//!   conversions in [`convert`]. Unparseable dates and absent numerics
//!   degrade to `None` there, never to errors.
//!
//! - **Classification** ([`classify`]) -- allowance consumption,
//!   days-to-expiry, display status, row severity tiers, and the
//!   bundle-health buckets behind the overview doughnut. All functions
//!   take an explicit `now` so they stay deterministic under test.
//!
//! - **Alerts** ([`alerts`]) -- per-instance lifecycle alerts plus the
//!   stalled-sequence heuristic over recently expired instances.
//!
//! - **Formatting** ([`format`]) -- human-readable bytes/dates/relative
//!   times and the TADIG-to-country tables used by roaming views.

pub mod alerts;
pub mod classify;
pub mod convert;
pub mod error;
pub mod format;
pub mod health;
pub mod model;

pub use alerts::{Alert, Severity, collect_alerts, instance_alert, stalled_sequence_alerts};
pub use classify::{
    DisplayStatus, HealthBucket, HealthSummary, RowTier, days_until, display_status,
    health_bucket, is_final, percent_used, row_tier,
};
pub use error::CoreError;
pub use health::{Anomaly, EndpointHealth, endpoint_anomalies, endpoint_health};
pub use model::{BundleInstance, Endpoint};
