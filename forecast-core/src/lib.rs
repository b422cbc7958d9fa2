//! Core library for the forecast CRUD service.
//!
//! This crate defines:
//! - The forecast record and its in-memory store
//! - The data broker abstraction, with local and remote (HTTP) variants
//! - The HTTP controller exposing list/add/delete
//! - The view service that coordinates a broker and notifies subscribers
//! - Configuration handling
//!
//! It is used by `forecast-cli`, but can also be embedded by other binaries or services.

pub mod broker;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod server;
pub mod store;
pub mod view;

pub use broker::{BrokerKind, DataBroker};
pub use config::{Config, RemoteConfig, ServerConfig};
pub use error::BrokerError;
pub use model::ForecastRecord;
pub use store::ForecastStore;
pub use view::{ListChange, ViewService, ViewState};
