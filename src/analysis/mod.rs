//! Severity-history aggregation: the pure core behind the dashboard.
//!
//! Everything in this module is a total function over values the caller
//! threads through; nothing here persists, locks, or caches. The photo
//! controller re-runs these aggregates on every change notification.

mod gauge;
mod history;

pub use gauge::{gauge_angle, gauge_arc, severity_band, GaugeArc, SeverityBand};
pub use history::{AnalysisError, SeverityHistory, Trend, SEVERITY_MAX, SEVERITY_MIN};
