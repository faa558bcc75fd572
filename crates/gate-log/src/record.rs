use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    Inside,
    Exited,
}

impl VisitStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inside => "inside",
            Self::Exited => "exited",
        }
    }
}

/// One vehicle visit. `exit_time` is set exactly when `status` is `Exited`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub id: String,
    pub vehicle_number: String,
    pub names: Vec<String>,
    pub number_of_people: u8,
    pub purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    pub entry_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<DateTime<Utc>>,
    pub status: VisitStatus,
}

impl VisitRecord {
    pub fn is_inside(&self) -> bool {
        self.status == VisitStatus::Inside
    }

    /// Case-insensitive match on vehicle number, any name, or purpose.
    /// `term` must already be lowercase.
    pub(crate) fn mentions(&self, term: &str) -> bool {
        self.vehicle_number.to_lowercase().contains(term)
            || self
                .names
                .iter()
                .any(|name| name.to_lowercase().contains(term))
            || self.purpose.to_lowercase().contains(term)
    }
}

/// Fields supplied by the entry flow when a visit is approved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewVisit {
    pub vehicle_number: String,
    pub names: Vec<String>,
    pub number_of_people: u8,
    pub purpose: String,
    pub approved_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn persisted_shape_uses_camel_case_and_omits_exit_time_while_inside() {
        let record = VisitRecord {
            id: "1760882400000".to_string(),
            vehicle_number: "KA01AB1234".to_string(),
            names: vec!["Asha".to_string()],
            number_of_people: 1,
            purpose: "medical".to_string(),
            approved_by: Some("Dr. Sunita Singh".to_string()),
            entry_time: Utc.with_ymd_and_hms(2025, 10, 19, 14, 0, 0).unwrap(),
            exit_time: None,
            status: VisitStatus::Inside,
        };

        let value = serde_json::to_value(&record).expect("serialize");

        assert_eq!(value["vehicleNumber"], "KA01AB1234");
        assert_eq!(value["numberOfPeople"], 1);
        assert_eq!(value["approvedBy"], "Dr. Sunita Singh");
        assert_eq!(value["status"], "inside");
        assert_eq!(value["entryTime"], "2025-10-19T14:00:00Z");
        assert!(value.get("exitTime").is_none());
    }

    #[test]
    fn reads_records_written_with_millisecond_timestamps() {
        let raw = json!({
            "id": "1760882400000",
            "vehicleNumber": "MH12DE1433",
            "names": ["Ravi", "Meena"],
            "numberOfPeople": 2,
            "purpose": "event",
            "approvedBy": "System",
            "entryTime": "2025-10-19T14:00:00.000Z",
            "exitTime": "2025-10-19T16:30:00.000Z",
            "status": "exited"
        });

        let record: VisitRecord = serde_json::from_value(raw).expect("deserialize");

        assert_eq!(record.status, VisitStatus::Exited);
        assert_eq!(
            record.exit_time,
            Some(Utc.with_ymd_and_hms(2025, 10, 19, 16, 30, 0).unwrap())
        );
        assert!(!record.is_inside());
    }
}
