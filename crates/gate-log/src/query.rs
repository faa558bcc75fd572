use serde::Serialize;

use crate::record::{VisitRecord, VisitStatus};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Inside,
    Exited,
}

impl StatusFilter {
    fn admits(self, status: VisitStatus) -> bool {
        match self {
            Self::All => true,
            Self::Inside => status == VisitStatus::Inside,
            Self::Exited => status == VisitStatus::Exited,
        }
    }
}

/// History view filter: a status tab plus an optional search term.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub status: StatusFilter,
    pub search: Option<String>,
}

impl HistoryQuery {
    pub fn inside() -> Self {
        Self {
            status: StatusFilter::Inside,
            search: None,
        }
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Keeps the input order.
    pub fn apply(&self, records: Vec<VisitRecord>) -> Vec<VisitRecord> {
        let term = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase);

        records
            .into_iter()
            .filter(|record| self.status.admits(record.status))
            .filter(|record| term.as_deref().map_or(true, |term| record.mentions(term)))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LogSummary {
    pub total: usize,
    pub inside: usize,
    pub exited: usize,
}

impl LogSummary {
    pub fn from_records(records: &[VisitRecord]) -> Self {
        let inside = records.iter().filter(|record| record.is_inside()).count();
        Self {
            total: records.len(),
            inside,
            exited: records.len() - inside,
        }
    }
}
