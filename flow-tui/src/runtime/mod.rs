mod action_queue;
mod actions;
mod event_loop;
mod outcomes;
mod tasks;
mod ticker;
mod views;

pub use actions::{Channels, Runtime};
pub use event_loop::run_app;
