//! sea-orm entities for the lingua database.

pub mod conversations;
