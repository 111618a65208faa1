#![allow(hidden_glob_reexports)]
mod bookings;
mod health_check;
mod services;
mod token;
mod users;

pub use bookings::*;
pub use health_check::*;
pub use services::*;
pub use token::*;
pub use users::*;

/// Milliseconds since the Unix epoch, the format of the `timestamp` field.
fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
