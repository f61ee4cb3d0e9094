//! `notion-page-http` creates a Notion-style page through an HTTP API.
//!
//! The crate is built around [`PageClient`]:
//! - [`PageClient::probe`] checks whether the endpoint answers (never fatal)
//! - [`PageClient::send`] posts a [`RequestDescriptor`] under a [`RetryPolicy`]
//!
//! [`job::run`] wires configuration, the fixed draft page and the client
//! together for the `notion-page-job` binary.

mod client;
mod error;
mod options;
mod request;
mod response;
mod retry;

pub mod config;
pub mod job;
pub mod logging;
pub mod page;

pub use client::PageClient;
pub use config::{JobConfig, Secret};
pub use error::{ErrorKind, PageError};
pub use options::ClientOptions;
pub use request::RequestDescriptor;
pub use response::{Delivery, ResponseBody};
pub use retry::RetryPolicy;

pub type Result<T> = std::result::Result<T, PageError>;
