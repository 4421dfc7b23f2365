pub mod constants;
pub mod numeric;
pub mod progress;

pub use constants::*;
pub use numeric::{mean_of_present, round_half_even, MeanAccumulator};
pub use progress::ProgressReporter;
