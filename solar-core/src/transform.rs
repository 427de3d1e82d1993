//! Reshapes a POWER response into the hourly [`Table`].

use chrono::NaiveDateTime;
use tracing::warn;

use crate::{
    model::{Record, Table},
    response::{PowerResponse, reading},
};

/// Key format of the hourly series, e.g. `2024060112`.
pub const HOUR_STAMP_FORMAT: &str = "%Y%m%d%H";

/// Date column format, e.g. `1 Jun, 2024`.
pub const DATE_FORMAT: &str = "%-d %b, %Y";

/// Time column format, e.g. `12:00 PM`.
pub const TIME_FORMAT: &str = "%I:%M %p";

/// Builds one record per irradiance hour-stamp, keeping the provider's key order.
///
/// Returns `None` when there is no response, the expected nesting is missing, or
/// an hour-stamp cannot be parsed. A response without an irradiance series yields
/// an empty table.
pub fn to_table(raw: Option<&PowerResponse>) -> Option<Table> {
    let Some(params) = raw.and_then(PowerResponse::parameters) else {
        warn!("No valid data found in the API response.");
        return None;
    };

    let mut records = Vec::with_capacity(params.solar_intensity.len());

    for (stamp, value) in &params.solar_intensity {
        let Some(at) = parse_hour_stamp(stamp) else {
            warn!(%stamp, "No valid data found in the API response: unparseable hour-stamp.");
            return None;
        };

        records.push(Record {
            time: at.format(TIME_FORMAT).to_string(),
            date: at.format(DATE_FORMAT).to_string(),
            solar_intensity: reading(Some(value)),
            temperature: reading(params.temperature.get(stamp)),
        });
    }

    Some(Table::new(records))
}

fn parse_hour_stamp(stamp: &str) -> Option<NaiveDateTime> {
    // chrono needs minutes to build a time; POWER stamps stop at the hour.
    if stamp.len() != 10 || !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{stamp}00"), &format!("{HOUR_STAMP_FORMAT}%M")).ok()
}
