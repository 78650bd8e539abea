//! View models for the employee and manager screens.
//!
//! Each view model owns its local task collection, a [`QueryState`] and a
//! selection state machine. Mutations go through the workflow checks in
//! `worklog-core`, then the backend, then a full re-fetch.
//!
//! [`QueryState`]: worklog_query::QueryState

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod notice;
pub mod reconcile;
pub mod selection;
pub mod employee;
pub mod manager;

pub use config::ViewConfig;
pub use error::{Result, ViewError};
pub use notice::Notice;
pub use reconcile::{Scope, TaskCollection, Ticket};
pub use selection::{EmployeeSelection, ManagerSelection};
pub use employee::EmployeeView;
pub use manager::ManagerView;
