//! Terminal input: a Tokio task that reads crossterm's `EventStream`,
//! translates events into `core_events::InputEvent` values and forwards them
//! over the main-loop channel.

mod async_service;
mod translate;

pub use async_service::AsyncInputShutdown;

use core_events::Event;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

/// Spawn the async input service backed by `crossterm::EventStream`.
///
/// Returns the `JoinHandle` for the background task alongside a shutdown handle
/// that can be used to request immediate termination.
pub fn spawn_async_input(sender: Sender<Event>) -> (JoinHandle<()>, AsyncInputShutdown) {
    async_service::spawn_event_stream_task(sender)
}
