//! Authority roster and purpose-of-visit resolution.

mod builtin;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Purpose that bypasses matching and routes to the head of organization.
pub const OTHER_PURPOSE: &str = "other";

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster read failed: {0}")]
    Io(String),
    #[error("roster parse failed: {0}")]
    Parse(String),
    #[error("duplicate authority id: {0}")]
    DuplicateId(u32),
    #[error("authority {0} declares no purposes")]
    NoPurposes(u32),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorityRecord {
    pub id: u32,
    pub name: String,
    pub designation: String,
    pub department: String,
    pub phone: String,
    pub email: String,
    pub purposes: Vec<String>,
}

impl AuthorityRecord {
    /// Bidirectional, case-insensitive substring match against `purpose`,
    /// which must already be lowercase.
    fn handles(&self, purpose: &str) -> bool {
        self.purposes.iter().any(|declared| {
            let declared = declared.to_lowercase();
            declared.contains(purpose) || purpose.contains(declared.as_str())
        })
    }

    /// Platform dial URL for the stored phone number.
    pub fn dial_url(&self) -> String {
        format!("tel:{}", self.phone)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster {
    authorities: Vec<AuthorityRecord>,
    fallback: AuthorityRecord,
}

#[derive(Debug, Deserialize)]
struct RawRoster {
    #[serde(default)]
    schema_version: Option<u32>,
    authorities: Vec<AuthorityRecord>,
    #[serde(default)]
    fallback: Option<AuthorityRecord>,
}

impl Roster {
    pub fn builtin() -> Self {
        Self {
            authorities: builtin::authorities(),
            fallback: builtin::head_of_organization(),
        }
    }

    /// Builds a roster, lowercasing purposes and rejecting duplicate ids or
    /// authorities without purposes. The fallback shares the id space.
    pub fn new(
        authorities: Vec<AuthorityRecord>,
        fallback: AuthorityRecord,
    ) -> Result<Self, RosterError> {
        let mut seen = HashSet::new();
        let authorities = authorities
            .into_iter()
            .map(|record| {
                if !seen.insert(record.id) {
                    return Err(RosterError::DuplicateId(record.id));
                }
                normalize(record)
            })
            .collect::<Result<Vec<_>, _>>()?;
        if seen.contains(&fallback.id) {
            return Err(RosterError::DuplicateId(fallback.id));
        }

        Ok(Self {
            authorities,
            fallback: normalize(fallback)?,
        })
    }

    pub fn authorities(&self) -> &[AuthorityRecord] {
        &self.authorities
    }

    pub fn fallback(&self) -> &AuthorityRecord {
        &self.fallback
    }

    pub fn find(&self, id: u32) -> Option<&AuthorityRecord> {
        self.authorities
            .iter()
            .chain(std::iter::once(&self.fallback))
            .find(|record| record.id == id)
    }

    /// Authorities responsible for `purpose`, in roster order.
    ///
    /// `"other"` yields only the fallback contact. A blank purpose matches
    /// nothing; zero matches is a normal outcome for the caller to handle.
    pub fn resolve(&self, purpose: &str) -> Vec<&AuthorityRecord> {
        let purpose = purpose.trim().to_lowercase();
        if purpose == OTHER_PURPOSE {
            return vec![&self.fallback];
        }
        if purpose.is_empty() {
            return Vec::new();
        }

        let matches: Vec<&AuthorityRecord> = self
            .authorities
            .iter()
            .filter(|record| record.handles(&purpose))
            .collect();
        debug!(%purpose, matches = matches.len(), "resolved purpose");
        matches
    }

    /// Picklist of purposes: every declared purpose once, in roster order,
    /// followed by `"other"`.
    pub fn available_purposes(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut purposes: Vec<String> = self
            .authorities
            .iter()
            .flat_map(|record| record.purposes.iter())
            .filter(|purpose| seen.insert(purpose.as_str()))
            .cloned()
            .collect();
        purposes.push(OTHER_PURPOSE.to_string());
        purposes
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize(mut record: AuthorityRecord) -> Result<AuthorityRecord, RosterError> {
    record.purposes = record
        .purposes
        .iter()
        .map(|purpose| purpose.trim().to_lowercase())
        .filter(|purpose| !purpose.is_empty())
        .collect();
    if record.purposes.is_empty() {
        return Err(RosterError::NoPurposes(record.id));
    }
    Ok(record)
}

pub fn load_roster(path: &Path) -> Result<Roster, RosterError> {
    let raw = fs::read_to_string(path).map_err(|e| RosterError::Io(e.to_string()))?;
    parse_roster(&raw)
}

/// Parses a JSON roster. A missing `fallback` keeps the built-in head of
/// organization.
pub fn parse_roster(raw: &str) -> Result<Roster, RosterError> {
    let raw_roster: RawRoster =
        serde_json::from_str(raw).map_err(|e| RosterError::Parse(e.to_string()))?;
    let schema_version = raw_roster.schema_version.unwrap_or(1);
    if schema_version != 1 {
        return Err(RosterError::Parse(format!(
            "unsupported schema_version: {schema_version}"
        )));
    }

    let fallback = raw_roster
        .fallback
        .unwrap_or_else(builtin::head_of_organization);
    Roster::new(raw_roster.authorities, fallback)
}
