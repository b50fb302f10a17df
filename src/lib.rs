//! Elidune Desk
//!
//! Circulation desk client for the Elidune library web application: catalog
//! search, loan issue and return, overdue listing, and book and member
//! editing over the application's JSON endpoints.

pub mod client;
pub mod config;
pub mod console;
pub mod desk;
pub mod error;
pub mod forms;
pub mod models;
pub mod surface;
pub mod telemetry;

pub use config::AppConfig;
pub use desk::{Desk, Event, Handled};
pub use error::{DeskError, DeskResult};
