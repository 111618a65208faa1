mod document;
mod document_id;
mod new_booking;
mod person_name;
mod role;
mod user_email;

pub use document::{Document, ID_FIELD};
pub use document_id::DocumentId;
pub use new_booking::{NewBooking, RESIDENT_EMAIL, SERVICE_WORKER_EMAIL, WORKER_EMAIL};
pub use person_name::PersonName;
pub use role::Role;
pub use user_email::UserEmail;
