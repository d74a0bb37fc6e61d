//! Shared data structures for the traffic dashboard
//!
//! - Junction telemetry: TrafficNode, Lane, SignalStatus (overview panel)
//! - EmergencyAlert (alerts panel)
//! - OverrideLog (manual override panel)
//! - AnalyticsRow, TimeRange, ExportFormat (analytics panel and export)
//! - Session, UserProfile, FeedbackEntry (public endpoints)
//!
//! These types are the schema boundary between the mock feed and its
//! consumers; a real telemetry source has to produce the same shapes.

mod account;
mod alerts;
mod analytics;
mod overrides;
mod traffic;

pub use account::*;
pub use alerts::*;
pub use analytics::*;
pub use overrides::*;
pub use traffic::*;
