//! Map controller for the charging station map.
//!
//! All mutable map state lives in [`MapController`]. Background tasks (the
//! status poller and the location watch) never touch it directly; they send
//! [`MapEvent`]s over a channel to the controller driver, which applies them
//! in arrival order.

pub mod controller;
pub mod driver;
pub mod event;
pub mod poller;
pub mod source;
pub mod watch;

pub use controller::{Banner, MapController, MapSnapshot, MarkerEntry, BANNER_TTL};
pub use driver::{spawn_controller, SharedController};
pub use event::MapEvent;
pub use poller::spawn_status_poller;
pub use source::StatusSource;
pub use watch::spawn_location_watch;
