//! Core library for the `solar` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - The NASA POWER hourly point client behind a provider trait
//! - Reshaping of the response into an hourly table
//! - Spreadsheet persistence and chart rendering
//! - The pipeline that ties them together
//!
//! It is used by `solar-cli`, but the pipeline takes its provider, sink and
//! renderer as parameters so it can run without network, disk or display.

pub mod chart;
pub mod config;
pub mod model;
pub mod persist;
pub mod pipeline;
pub mod provider;
pub mod response;
pub mod transform;

pub use chart::{ChartRenderer, ChartSpec, SvgChartRenderer};
pub use config::{Community, Config};
pub use model::{InputError, Query, Record, Table};
pub use persist::{TableSink, XlsxSink};
pub use pipeline::{Outcome, Pipeline, PipelineError};
pub use provider::{NasaPowerProvider, SolarDataProvider};
pub use response::PowerResponse;
