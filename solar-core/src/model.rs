use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

/// Date format accepted from the user, e.g. `01-06-2024`.
pub const INPUT_DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Please enter valid numerical values for latitude and longitude.")]
    Coordinates,

    #[error("Latitude must be between -90 and 90 and longitude between -180 and 180 (got {latitude}, {longitude}).")]
    OutOfRange { latitude: f64, longitude: f64 },

    #[error("Invalid date format. Use DD-MM-YYYY.")]
    Date,
}

/// A single-day, single-point request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    latitude: f64,
    longitude: f64,
    date: NaiveDate,
}

impl Query {
    pub fn new(latitude: f64, longitude: f64, date: NaiveDate) -> Result<Self, InputError> {
        check_range(latitude, longitude)?;
        Ok(Self { latitude, longitude, date })
    }

    /// Builds a query from the raw prompt answers: `"lat,lon"` and `"DD-MM-YYYY"`.
    ///
    /// Coordinates are checked first, so a bad location is reported even when the
    /// date is also wrong.
    pub fn parse(coordinates: &str, date: &str) -> Result<Self, InputError> {
        let (latitude, longitude) = validate_coordinates(coordinates)?;
        let date = parse_date(date)?;
        Self::new(latitude, longitude, date)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

pub fn parse_coordinates(input: &str) -> Result<(f64, f64), InputError> {
    let mut parts = input.split(',');

    let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(InputError::Coordinates);
    };

    let latitude = lat.trim().parse::<f64>().map_err(|_| InputError::Coordinates)?;
    let longitude = lon.trim().parse::<f64>().map_err(|_| InputError::Coordinates)?;

    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(InputError::Coordinates);
    }

    Ok((latitude, longitude))
}

/// Parses `"lat,lon"` and checks both values are on the globe.
pub fn validate_coordinates(input: &str) -> Result<(f64, f64), InputError> {
    let (latitude, longitude) = parse_coordinates(input)?;
    check_range(latitude, longitude)?;
    Ok((latitude, longitude))
}

fn check_range(latitude: f64, longitude: f64) -> Result<(), InputError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(InputError::OutOfRange { latitude, longitude });
    }
    Ok(())
}

pub fn parse_date(input: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(input.trim(), INPUT_DATE_FORMAT).map_err(|_| InputError::Date)
}

/// One hourly row. `None` means the provider had no reading for that hour.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub time: String,
    pub date: String,
    pub solar_intensity: Option<f64>,
    pub temperature: Option<f64>,
}

/// Hourly records in provider order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when at least one hour carries an irradiance reading.
    pub fn has_intensity(&self) -> bool {
        self.records.iter().any(|r| r.solar_intensity.is_some())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index_width = self.records.len().saturating_sub(1).to_string().len();

        writeln!(
            f,
            "{:>iw$}  {:>22}  {:>16}  {:>13}  {:>14}",
            "",
            crate::persist::COLUMNS[0],
            crate::persist::COLUMNS[1],
            crate::persist::COLUMNS[2],
            crate::persist::COLUMNS[3],
            iw = index_width,
        )?;

        for (i, r) in self.records.iter().enumerate() {
            writeln!(
                f,
                "{:>iw$}  {:>22}  {:>16}  {:>13}  {:>14}",
                i,
                display_reading(r.solar_intensity),
                display_reading(r.temperature),
                r.date,
                r.time,
                iw = index_width,
            )?;
        }

        Ok(())
    }
}

fn display_reading(value: Option<f64>) -> String {
    value.map_or_else(|| "<NA>".to_string(), |v| v.to_string())
}
