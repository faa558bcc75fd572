use std::io::Write;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

use crate::record::VisitRecord;
use crate::ExportError;

pub const STILL_INSIDE: &str = "Still Inside";

const DISPLAY_FORMAT: &str = "%d %b %Y, %I:%M %p";

/// One spreadsheet row of the visit log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Vehicle Number")]
    pub vehicle_number: String,
    #[serde(rename = "Names")]
    pub names: String,
    #[serde(rename = "Number of People")]
    pub number_of_people: u8,
    #[serde(rename = "Purpose")]
    pub purpose: String,
    #[serde(rename = "Approved By")]
    pub approved_by: String,
    #[serde(rename = "Entry Time")]
    pub entry_time: String,
    #[serde(rename = "Exit Time")]
    pub exit_time: String,
    #[serde(rename = "Status")]
    pub status: String,
}

impl ExportRow {
    pub fn from_record(record: &VisitRecord) -> Self {
        Self {
            vehicle_number: record.vehicle_number.clone(),
            names: record.names.join(", "),
            number_of_people: record.number_of_people,
            purpose: record.purpose.clone(),
            approved_by: record.approved_by.clone().unwrap_or_default(),
            entry_time: format_timestamp(&record.entry_time),
            exit_time: record
                .exit_time
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_else(|| STILL_INSIDE.to_string()),
            status: record.status.as_str().to_string(),
        }
    }
}

/// Local wall-clock rendering used in exports and listings.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format(DISPLAY_FORMAT)
        .to_string()
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("vehicle_log_{}.csv", date.format("%Y-%m-%d"))
}

pub fn write_csv<W: Write>(rows: &[ExportRow], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        csv_writer
            .write_record(HEADERS)
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }
    for row in rows {
        csv_writer
            .serialize(row)
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }
    csv_writer
        .flush()
        .map_err(|e| ExportError::Io(e.to_string()))
}

const HEADERS: [&str; 8] = [
    "Vehicle Number",
    "Names",
    "Number of People",
    "Purpose",
    "Approved By",
    "Entry Time",
    "Exit Time",
    "Status",
];
