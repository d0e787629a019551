pub mod audit;
pub mod error;
pub mod sqlite;

pub use audit::write_duplicates;
pub use error::SinkError;
pub use sqlite::load;
