use super::{Document, PersonName, UserEmail};

pub const RESIDENT_EMAIL: [&str; 2] = ["resident", "email"];
pub const RESIDENT_NAME: [&str; 2] = ["resident", "name"];
pub const WORKER_EMAIL: [&str; 2] = ["worker", "email"];
pub const SERVICE_WORKER_EMAIL: [&str; 3] = ["service", "worker", "email"];

/// A booking document together with the people to notify about it.
#[derive(Debug)]
pub struct NewBooking {
    pub document: Document,
    pub resident_email: UserEmail,
    pub resident_name: PersonName,
    pub worker_email: UserEmail,
}

impl TryFrom<Document> for NewBooking {
    type Error = String;

    fn try_from(document: Document) -> Result<Self, Self::Error> {
        let resident_email = document
            .str_at(&RESIDENT_EMAIL)
            .ok_or("A booking needs `resident.email`.")?;
        let resident_email = UserEmail::parse(resident_email.to_string())?;

        let resident_name = document
            .str_at(&RESIDENT_NAME)
            .ok_or("A booking needs `resident.name`.")?;
        let resident_name = PersonName::parse(resident_name)?;

        let worker_email = document
            .str_at(&WORKER_EMAIL)
            .or_else(|| document.str_at(&SERVICE_WORKER_EMAIL))
            .ok_or("A booking needs `worker.email` or `service.worker.email`.")?;
        let worker_email = UserEmail::parse(worker_email.to_string())?;

        Ok(Self {
            document,
            resident_email,
            resident_name,
            worker_email,
        })
    }
}
