//! The two screens of the dashboard, both implementing [`Component`].
//!
//! [`Component`]: crate::component::Component

pub mod dashboard;
pub mod events;

pub use dashboard::DashboardScreen;
pub use events::EventsScreen;
