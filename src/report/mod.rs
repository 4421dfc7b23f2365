pub mod facade;
pub mod render;

pub use facade::{Preview, ReportFacade};
