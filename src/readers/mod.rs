pub mod concurrent_reader;
pub mod measurement_reader;
pub mod source_text;
pub mod station_reader;

pub use concurrent_reader::{ConcurrentReader, SourceTables};
pub use measurement_reader::MeasurementReader;
pub use source_text::read_source_text;
pub use station_reader::StationReader;
