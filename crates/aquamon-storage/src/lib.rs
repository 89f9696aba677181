//! Persistence layer for sensor threshold configuration and admin accounts.
//!
//! All access goes through [`store::Store`], a thin SeaORM wrapper around the
//! management database (`admins` + `thresholds` tables). The store is handed
//! to the HTTP layer as a single injected handle; there is no process-global
//! connection state.

pub mod auth;
pub mod entities;
pub mod error;
pub mod store;


pub use error::{Result, StorageError};
pub use store::{AdminRow, Store, ThresholdsRow, ThresholdsUpdate};
