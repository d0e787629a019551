pub mod coerce;
pub mod csv_extract;
pub mod error;

pub use coerce::coerce_value;
pub use csv_extract::extract_csv;
pub use error::IngestError;
