//! sea-orm entities for the directory database.

pub mod documents;
pub mod employees;
pub mod messages;
pub mod tickets;
pub mod training_records;
pub mod users;
