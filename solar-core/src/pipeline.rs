//! Input → fetch → decide → output, run once per invocation.

use std::{io::Write, path::PathBuf};

use thiserror::Error;
use tracing::{error, info};

use crate::{
    chart::{ChartRenderer, ChartSpec},
    model::{InputError, Query, Table},
    persist::TableSink,
    provider::SolarDataProvider,
    response::PowerResponse,
    transform,
};

pub const NO_DATA_MESSAGE: &str = "No data available for the specified date and location.";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("{0:#}")]
    Persist(anyhow::Error),

    #[error("{0:#}")]
    Render(anyhow::Error),

    #[error("Failed to write console output")]
    Console(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing usable came back; no file was written.
    NoData,
    Completed {
        rows: usize,
        spreadsheet: PathBuf,
        chart: PathBuf,
    },
}

#[derive(Debug)]
pub struct Pipeline<P, S, R> {
    provider: P,
    sink: S,
    renderer: R,
}

impl<P, S, R> Pipeline<P, S, R>
where
    P: SolarDataProvider,
    S: TableSink,
    R: ChartRenderer,
{
    pub fn new(provider: P, sink: S, renderer: R) -> Self {
        Self { provider, sink, renderer }
    }

    /// Validates the raw answers, then runs the pipeline. Nothing is fetched when
    /// the input is rejected.
    pub async fn run_input<W: Write>(
        &self,
        coordinates: &str,
        date: &str,
        out: &mut W,
    ) -> Result<Outcome, PipelineError> {
        let query = Query::parse(coordinates, date)?;
        self.run(&query, out).await
    }

    pub async fn run<W: Write>(&self, query: &Query, out: &mut W) -> Result<Outcome, PipelineError> {
        let raw = acquire(&self.provider, query).await;

        let Some(table) = transform::to_table(raw.as_ref()).filter(Table::has_intensity) else {
            info!("no irradiance readings, skipping output");
            writeln!(out, "{NO_DATA_MESSAGE}")?;
            return Ok(Outcome::NoData);
        };

        let spreadsheet = self.sink.write(&table).map_err(PipelineError::Persist)?;
        writeln!(out, "Data saved to {}", spreadsheet.display())?;
        write!(out, "{table}")?;

        let chart =
            self.renderer.render(&ChartSpec::from_table(&table)).map_err(PipelineError::Render)?;
        writeln!(out, "Chart saved to {}", chart.display())?;

        Ok(Outcome::Completed { rows: table.len(), spreadsheet, chart })
    }
}

/// Fetches the raw response, logging and swallowing any failure.
pub async fn acquire<P>(provider: &P, query: &Query) -> Option<PowerResponse>
where
    P: SolarDataProvider + ?Sized,
{
    match provider.fetch_hourly(query).await {
        Ok(raw) => Some(raw),
        Err(err) => {
            let err = anyhow::Error::new(err);
            error!("An error occurred: {err:#}");
            None
        }
    }
}
