pub mod column;
pub mod measurement;
pub mod station;
pub mod tables;

pub use column::{Column, Pollutant};
pub use measurement::{Measurement, MeasurementBuilder, WindDirection};
pub use station::{StationExtremes, StationPollutantLevels};
pub use tables::{
    CorrelationMatrix, DegradedPair, DegradedReason, HeadlineMetrics, MonthlyPoint,
    OverallExtremes, PollutantSummary, RainOverview, SeasonalProfile, StationRainRange,
    StationTemperatureRange, TemperatureOverview, YearlyPoint, YearlyTrend,
};
