use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MIN_PEOPLE: u8 = 1;
pub const MAX_PEOPLE: u8 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    MissingVehicleNumber,
    MissingPurpose,
    MissingNames,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingVehicleNumber => {
                write!(f, "vehicle number required: scan or enter the vehicle number")
            }
            ValidationError::MissingPurpose => {
                write!(f, "purpose required: enter the purpose of visit")
            }
            ValidationError::MissingNames => {
                write!(f, "names required: enter at least one name")
            }
        }
    }
}

impl Error for ValidationError {}

/// Operator-entered visit details, one name slot per person.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryForm {
    vehicle_number: String,
    number_of_people: u8,
    names: Vec<String>,
    purpose: String,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self {
            vehicle_number: String::new(),
            number_of_people: MIN_PEOPLE,
            names: vec![String::new()],
            purpose: String::new(),
        }
    }
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vehicle_number(&self) -> &str {
        &self.vehicle_number
    }

    pub fn number_of_people(&self) -> u8 {
        self.number_of_people
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    pub fn set_vehicle_number(&mut self, plate: impl Into<String>) {
        self.vehicle_number = plate.into();
    }

    pub fn set_purpose(&mut self, purpose: impl Into<String>) {
        self.purpose = purpose.into();
    }

    /// Clamps `count` to 1..=10 and resizes the name slots to match, keeping
    /// names already typed at their positions.
    pub fn set_number_of_people(&mut self, count: i64) {
        let clamped = count.clamp(i64::from(MIN_PEOPLE), i64::from(MAX_PEOPLE)) as u8;
        self.number_of_people = clamped;
        self.names.resize(usize::from(clamped), String::new());
    }

    /// Returns false when `index` has no slot.
    pub fn set_name(&mut self, index: usize, name: impl Into<String>) -> bool {
        match self.names.get_mut(index) {
            Some(slot) => {
                *slot = name.into();
                true
            }
            None => false,
        }
    }

    pub fn validate(&self) -> Result<EntryDetails, ValidationError> {
        let vehicle_number = self.vehicle_number.trim();
        if vehicle_number.is_empty() {
            return Err(ValidationError::MissingVehicleNumber);
        }

        let purpose = self.purpose.trim();
        if purpose.is_empty() {
            return Err(ValidationError::MissingPurpose);
        }

        let names: Vec<String> = self
            .names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return Err(ValidationError::MissingNames);
        }

        Ok(EntryDetails {
            vehicle_number: vehicle_number.to_uppercase(),
            number_of_people: self.number_of_people,
            names,
            purpose: purpose.to_string(),
        })
    }
}

/// Validated form contents, ready for authority resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryDetails {
    pub vehicle_number: String,
    pub number_of_people: u8,
    pub names: Vec<String>,
    pub purpose: String,
}
