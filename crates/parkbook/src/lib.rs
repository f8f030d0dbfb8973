//! # parkbook
//!
//! Automated facility booking for the Parkhurst community's Skedda site.
//!
//! The library drives a headless Chrome session through one booking
//! attempt: build the deep link, log in if the saved session expired, fill
//! the title and signature fields, click the confirmation control, then
//! classify the outcome from the final URL and any visible error banner.

pub mod browser;
pub mod config;
pub mod dom;
pub mod error;
pub mod handlers;
pub mod logger;
pub mod request;
pub mod schedule;
pub mod selectors;
pub mod session;
pub mod utils;

// Re-export commonly used items
pub use config::{resolve_credentials, Config, ResolvedCredentials};
pub use error::{BookingError, VerificationFailure};
pub use logger::init_logger;
pub use request::{build_booking_url, BookingInput, BookingRequest};
pub use session::{book, BookingPlan, SessionOptions};
pub use utils::FailureLog;
