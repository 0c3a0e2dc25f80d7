//! Record to feature conversion.

use chrono_tz::Tz;
use geojson::{Feature, FeatureCollection};
use serde_json::Value;

use crate::config::{ConfigError, DatasetConfig, DatasetKind, ValidationError};
use crate::transform::features::{collection, feature_id, located_feature, point};
use crate::transform::timestamp::{format_for_title, parse_in_zone, LocalTimestamp};
use crate::transform::title::{food_facility_title, service_request_title};
use crate::transform::types::{display_id, field_text, Record, TransformError};

const CREATED_DATE: &str = "created_date";
const TITLE: &str = "title";

/// Converts upstream records into GeoJSON features for one dataset.
#[derive(Debug, Clone)]
pub struct Transformer {
    kind: DatasetKind,
    id_field: String,
    time_zone: Tz,
}

impl Transformer {
    pub fn new(kind: DatasetKind, id_field: impl Into<String>, time_zone: Tz) -> Self {
        Self {
            kind,
            id_field: id_field.into(),
            time_zone,
        }
    }

    pub fn from_config(config: &DatasetConfig) -> Result<Self, ConfigError> {
        let time_zone = config.time_zone.parse::<Tz>().map_err(|_| {
            ConfigError::Validation(vec![ValidationError {
                field: "dataset.time_zone",
                message: format!("unknown time zone '{}'", config.time_zone),
            }])
        })?;
        Ok(Self::new(config.kind, config.id_field.clone(), time_zone))
    }

    /// Convert one record. The record's fields are kept unmodified in
    /// `properties` next to the derived `title`.
    pub fn transform(&self, record: Record) -> Result<Feature, TransformError> {
        let title = match self.kind {
            DatasetKind::ServiceRequests => {
                let time = self.created_time(&record)?;
                service_request_title(&time, &record)
            }
            DatasetKind::FoodFacilities => food_facility_title(&record),
        };

        let id = feature_id(record.get(&self.id_field));
        let geometry = point(coordinate(&record, "longitude"), coordinate(&record, "latitude"));

        let mut properties = record;
        properties.insert(TITLE.to_string(), Value::String(title));

        Ok(located_feature(id, properties, geometry))
    }

    /// Convert every record in order. The first failing record aborts the
    /// whole collection.
    pub fn transform_all(&self, records: Vec<Record>) -> Result<FeatureCollection, TransformError> {
        let mut features = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match self.transform(record) {
                Ok(feature) => features.push(feature),
                Err(e) => {
                    tracing::warn!(index = index, error = %e, "Record could not be transformed");
                    return Err(e);
                }
            }
        }
        Ok(collection(features))
    }

    fn created_time(&self, record: &Record) -> Result<String, TransformError> {
        let id = || display_id(record, &self.id_field);
        let raw = field_text(record, CREATED_DATE).ok_or_else(|| TransformError::MissingField {
            id: id(),
            field: CREATED_DATE,
        })?;

        match parse_in_zone(&raw, self.time_zone) {
            LocalTimestamp::At(dt) => Ok(format_for_title(&dt)),
            LocalTimestamp::Nonexistent => Err(TransformError::NonexistentLocalTime {
                id: id(),
                field: CREATED_DATE,
                value: raw,
                zone: self.time_zone.name().to_string(),
            }),
            LocalTimestamp::Invalid => Err(TransformError::InvalidTimestamp {
                id: id(),
                field: CREATED_DATE,
                value: raw,
            }),
        }
    }
}

/// Read a coordinate as `f64`; anything unparsable or non-finite is `0.0`.
pub fn coordinate(record: &Record, field: &str) -> f64 {
    let parsed = match record.get(field) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}
