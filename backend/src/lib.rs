//! Backend for the employee self-service attendance calendar.
//!
//! Reads clock events, attendance records and WFH/OD applications from a
//! Frappe/ERPNext instance, reconciles them into one status per day, lays the
//! month out as a Sunday-first grid and accepts retroactive clock entries
//! inside a trailing edit window.

pub mod config;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod router;
pub mod services;
pub mod state;
pub mod types;
pub mod utils;
pub mod validation;

pub use router::router;
