use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::workflows::load_search::domain::{LoadId, LoadRecord};

/// Separator used inside the service tag column.
const TAG_SEPARATOR: char = ';';

#[derive(Debug)]
pub(crate) enum RowError {
    Csv(csv::Error),
    Invalid { line: u64, message: String },
}

impl From<csv::Error> for RowError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub(crate) fn parse_loads<R: Read>(reader: R) -> Result<Vec<LoadRecord>, RowError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut loads = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        // physical line the record starts on, so quoted newlines are counted
        let line = record.position().map(csv::Position::line).unwrap_or_default();
        let row: LoadRow = record.deserialize(Some(&headers))?;
        loads.push(row.into_record(line)?);
    }

    Ok(loads)
}

#[derive(Debug, Deserialize)]
struct LoadRow {
    #[serde(rename = "Load ID")]
    id: String,
    #[serde(rename = "Origin")]
    origin: String,
    #[serde(rename = "Destination")]
    destination: String,
    #[serde(rename = "Distance")]
    distance: f64,
    #[serde(rename = "Weight", default)]
    weight: Option<f64>,
    #[serde(rename = "Loaded RPM")]
    loaded_rpm: f64,
    #[serde(rename = "Total RPM", default)]
    total_rpm: Option<f64>,
    #[serde(rename = "Price", default)]
    price: Option<f64>,
    #[serde(rename = "Distance To Origin", default)]
    distance_to_origin: Option<f64>,
    #[serde(rename = "Load Type", default, deserialize_with = "empty_string_as_none")]
    load_type: Option<String>,
    #[serde(rename = "Customer", default, deserialize_with = "empty_string_as_none")]
    customer: Option<String>,
    #[serde(
        rename = "Service Tags",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    service_tags: Option<String>,
    #[serde(
        rename = "Confirmed Appointment",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    confirmed_appointment: Option<String>,
    #[serde(rename = "Pickup Date")]
    pickup_date: String,
    #[serde(rename = "Drop Date")]
    drop_date: String,
}

impl LoadRow {
    fn into_record(self, line: u64) -> Result<LoadRecord, RowError> {
        if self.id.is_empty() {
            return Err(RowError::Invalid {
                line,
                message: "load id is empty".to_string(),
            });
        }

        let pickup_date = required_datetime(&self.pickup_date, "pickup date", line)?;
        let drop_date = required_datetime(&self.drop_date, "drop date", line)?;

        Ok(LoadRecord {
            id: LoadId(self.id),
            origin: self.origin,
            destination: self.destination,
            distance_num: self.distance,
            weight_num: self.weight.unwrap_or_default(),
            loaded_rpm_num: self.loaded_rpm,
            total_rpm_num: self.total_rpm,
            price_num: self.price,
            distance_to_origin: self.distance_to_origin.unwrap_or_default(),
            load_type: self.load_type.unwrap_or_default(),
            customer: self.customer.unwrap_or_default(),
            service_tags: self
                .service_tags
                .as_deref()
                .map(split_tags)
                .unwrap_or_default(),
            confirmed_appointment: self
                .confirmed_appointment
                .as_deref()
                .map(parse_flag)
                .unwrap_or(false),
            pickup_date,
            drop_date,
        })
    }
}

fn required_datetime(value: &str, column: &str, line: u64) -> Result<DateTime<Utc>, RowError> {
    parse_datetime(value).ok_or_else(|| RowError::Invalid {
        line,
        message: format!("{column} '{value}' is not a date"),
    })
}

fn split_tags(value: &str) -> Vec<String> {
    value
        .split(TAG_SEPARATOR)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

pub(crate) fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn tags_split_on_semicolons_and_drop_blanks() {
        assert_eq!(
            split_tags(" hazmat ; team;;drop-and-hook "),
            vec!["hazmat", "team", "drop-and-hook"]
        );
        assert!(split_tags(" ; ").is_empty());
    }

    #[test]
    fn flags_accept_common_truthy_spellings() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("yes"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("no"));
        assert!(!parse_flag("confirmed"));
    }

    #[test]
    fn datetimes_accept_rfc3339_and_plain_dates() {
        assert_eq!(
            parse_datetime("2025-10-02T08:30:00-05:00"),
            Utc.with_ymd_and_hms(2025, 10, 2, 13, 30, 0).single()
        );
        assert_eq!(
            parse_datetime("2025-10-02"),
            Utc.with_ymd_and_hms(2025, 10, 2, 0, 0, 0).single()
        );
        assert_eq!(parse_datetime("next tuesday"), None);
        assert_eq!(parse_datetime("   "), None);
    }
}
