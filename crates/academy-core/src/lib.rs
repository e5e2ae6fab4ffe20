//! academy-core: assessment analytics, session generation and invoicing.
//!
//! This crate holds the data model and the pure computations behind the
//! academy's physical-assessment reports and billing invoices, plus the
//! roster/config loading and report persistence that wrap them.

pub mod analytics;
pub mod config;
pub mod error;
pub mod generator;
pub mod invoice;
pub mod model;
pub mod report;
pub mod roster;
pub mod words;

pub use analytics::{compute_analytics, compute_summary, Analytics};
pub use error::AcademyError;
pub use generator::{generate_sessions, generate_sessions_with_rng};
pub use model::{Exercise, Session, Student, StudentId, StudentResult};
pub use words::{amount_in_words, number_to_words};
