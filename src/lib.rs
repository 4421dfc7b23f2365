pub mod analyzers;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod readers;
pub mod report;
pub mod store;
pub mod utils;

pub use error::{ReportError, Result};
pub use report::ReportFacade;
pub use store::RecordStore;
