//! Backend collaborator for the work-log client.
//!
//! This crate provides the [`TaskApi`] contract with an HTTP implementation
//! for the real REST backend and an in-memory implementation for tests and
//! offline use.

#![warn(missing_docs)]

pub mod trait_;
pub mod config;
pub mod wire;
pub mod http_api;
pub mod memory_api;

pub use trait_::{NewTask, RequestError, Result, TaskApi, TaskUpdate};
pub use config::BackendConfig;
pub use wire::{normalize_all, LoginResponse, RawStatus, RawTask};
pub use http_api::HttpTaskApi;
pub use memory_api::{InMemoryTaskApi, Operation};
