mod engine;
mod error;
pub mod format;
mod types;

pub use engine::{project, project_series, round_whole, summarize};
pub use error::EngineError;
pub use types::{
    DividendKind, DividendMode, Inputs, PROJECTION_LAST_YEAR, Projection, ProjectionSeries,
    ProjectionYear, Summary,
};
