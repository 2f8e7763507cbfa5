//! This crate provides a month-grid task calendar, backed by a remote `/tasks` HTTP service.
//!
//! It provides an HTTP client in the [`client`] module, that can be used as a stand-alone module.
//!
//! The calendar itself is split between a pure state layer ([`view::CalendarView`], built on the
//! date arithmetic of the [`calendar`] module) and a controller ([`App`]) that runs the network calls
//! in the background and applies their results to the view. \
//! Any [`TaskSource`](traits::TaskSource) can feed an `App`: usually a [`Client`](client::Client),
//! but an in-memory [`MemorySource`](memory_source::MemorySource) is available for tests and offline use.

pub mod traits;

pub mod calendar;
mod task;
pub use task::{NewTask, Task, TaskId};
pub mod view;
pub use view::CalendarView;
pub mod app;
pub use app::App;

pub mod client;
pub mod memory_source;
pub mod mock_behaviour;

pub mod config;
pub mod ui;
pub mod utils;
