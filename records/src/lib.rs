mod api;
mod auth;
mod client;
pub mod domain;
mod memory;
mod records_url;

pub(crate) use records_url::*;

pub use api::*;
pub use auth::*;
pub use client::*;
pub use domain::*;
pub use memory::*;
