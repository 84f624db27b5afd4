pub mod date;
pub mod formatting;
pub mod path;

pub use formatting::{ticket_date, ticket_time};
