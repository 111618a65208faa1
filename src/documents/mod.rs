//! Schemaless document collections on top of Postgres `JSONB`.
//!
//! Every collection is a table of `(id, doc, created_at)`. Reads return the
//! stored object with the id merged in as `_id`; writes return driver-style
//! result records.

mod persistence;
mod results;

pub use persistence::*;
pub use results::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Services,
    Bookings,
}

impl Collection {
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Services => "services",
            Collection::Bookings => "bookings",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}
