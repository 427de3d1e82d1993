//! Typed view of the NASA POWER hourly point document.
//!
//! Only the parts the pipeline reads are modelled. Each level is optional so that a
//! document with the wrong shape still decodes and is rejected later as "no valid
//! data" instead of as a transport failure.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Irradiance parameter code: all-sky surface shortwave downward irradiance (W/m²).
pub const SOLAR_INTENSITY_PARAM: &str = "ALLSKY_SFC_SW_DWN";

/// Temperature parameter code: air temperature at 2 meters (°C).
pub const TEMPERATURE_PARAM: &str = "T2M";

/// Value POWER reports for an hour it has no reading for.
pub const FILL_VALUE: f64 = -999.0;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PowerResponse {
    #[serde(default)]
    pub properties: Option<Properties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub parameter: Option<ParameterSet>,
}

/// Hour-stamp (`YYYYMMDDHH`) to reading, in the order the provider sent them.
pub type HourlySeries = Map<String, Value>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParameterSet {
    #[serde(rename = "ALLSKY_SFC_SW_DWN", default)]
    pub solar_intensity: HourlySeries,

    #[serde(rename = "T2M", default)]
    pub temperature: HourlySeries,
}

impl PowerResponse {
    /// The parameter block, if the document has the expected nesting.
    pub fn parameters(&self) -> Option<&ParameterSet> {
        self.properties.as_ref()?.parameter.as_ref()
    }
}

/// Reads one value, mapping the fill value and non-numeric entries to `None`.
pub fn reading(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|v| *v != FILL_VALUE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_nested_parameters_in_order() {
        let raw: PowerResponse = serde_json::from_value(json!({
            "type": "Feature",
            "properties": {
                "parameter": {
                    "ALLSKY_SFC_SW_DWN": { "2024060102": 1.0, "2024060100": 2.0, "2024060101": 3.0 },
                    "T2M": { "2024060100": 20.0 }
                }
            }
        }))
        .unwrap();

        let params = raw.parameters().expect("parameters present");
        let keys: Vec<&str> = params.solar_intensity.keys().map(String::as_str).collect();

        assert_eq!(keys, ["2024060102", "2024060100", "2024060101"]);
        assert_eq!(params.temperature.len(), 1);
    }

    #[test]
    fn missing_levels_decode_as_none() {
        let empty: PowerResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.parameters().is_none());

        let no_param: PowerResponse =
            serde_json::from_value(json!({ "properties": { "parameter": null } })).unwrap();
        assert!(no_param.parameters().is_none());

        let no_series: PowerResponse =
            serde_json::from_value(json!({ "properties": { "parameter": {} } })).unwrap();
        let params = no_series.parameters().expect("parameter block present");
        assert!(params.solar_intensity.is_empty());
        assert!(params.temperature.is_empty());
    }

    #[test]
    fn reading_filters_fill_value_and_non_numbers() {
        assert_eq!(reading(Some(&json!(450.5))), Some(450.5));
        assert_eq!(reading(Some(&json!(0))), Some(0.0));
        assert_eq!(reading(Some(&json!(-999))), None);
        assert_eq!(reading(Some(&json!(-999.0))), None);
        assert_eq!(reading(Some(&json!(null))), None);
        assert_eq!(reading(Some(&json!("12"))), None);
        assert_eq!(reading(None), None);
    }
}
