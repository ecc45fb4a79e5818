use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cities served by the route selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    Delhi,
    Mumbai,
    Bangalore,
    Kolkata,
    Hyderabad,
    Chennai,
}

impl City {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Delhi,
            Self::Mumbai,
            Self::Bangalore,
            Self::Kolkata,
            Self::Hyderabad,
            Self::Chennai,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Delhi => "Delhi",
            Self::Mumbai => "Mumbai",
            Self::Bangalore => "Bangalore",
            Self::Kolkata => "Kolkata",
            Self::Hyderabad => "Hyderabad",
            Self::Chennai => "Chennai",
        }
    }
}

impl FromStr for City {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|city| city.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownCity(trimmed.to_string()))
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Origin/destination pair. Same-city routes are never constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Route {
    origin: City,
    destination: City,
}

impl Route {
    pub fn new(origin: City, destination: City) -> Result<Self, ValidationError> {
        if origin == destination {
            return Err(ValidationError::SameCity(origin));
        }

        Ok(Self {
            origin,
            destination,
        })
    }

    pub fn origin(&self) -> City {
        self.origin
    }

    pub fn destination(&self) -> City {
        self.destination
    }
}

/// Carriers known to the fare artifact. Wire names match the artifact's category labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Airline {
    Indigo,
    SpiceJet,
    AirAsia,
    #[serde(rename = "GO_FIRST")]
    GoFirst,
    Vistara,
    #[serde(rename = "Air_India", alias = "Air India")]
    AirIndia,
}

impl Airline {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Indigo,
            Self::SpiceJet,
            Self::AirAsia,
            Self::GoFirst,
            Self::Vistara,
            Self::AirIndia,
        ]
    }

    /// Category label used by the fare artifact and the review dataset.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Indigo => "Indigo",
            Self::SpiceJet => "SpiceJet",
            Self::AirAsia => "AirAsia",
            Self::GoFirst => "GO_FIRST",
            Self::Vistara => "Vistara",
            Self::AirIndia => "Air_India",
        }
    }
}

impl FromStr for Airline {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed == "Air India" {
            return Ok(Self::AirIndia);
        }

        Self::ordered()
            .into_iter()
            .find(|airline| airline.label() == trimmed)
            .ok_or_else(|| ValidationError::UnknownAirline(trimmed.to_string()))
    }
}

impl fmt::Display for Airline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TravelClass {
    Economy,
    Business,
}

impl TravelClass {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Economy => "Economy",
            Self::Business => "Business",
        }
    }
}

impl FromStr for TravelClass {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "economy" => Ok(Self::Economy),
            "business" => Ok(Self::Business),
            other => Err(ValidationError::UnknownTravelClass(other.to_string())),
        }
    }
}

impl fmt::Display for TravelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Input rejected before any computation runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("source and destination cannot be the same ({0})")]
    SameCity(City),
    #[error("days left must be between {min} and {max}, got {found}")]
    DaysLeftOutOfRange { min: u8, max: u8, found: i64 },
    #[error("unknown city '{0}'")]
    UnknownCity(String),
    #[error("unknown airline '{0}'")]
    UnknownAirline(String),
    #[error("unknown travel class '{0}'")]
    UnknownTravelClass(String),
    #[error("unknown meal preference '{0}'")]
    UnknownPreference(String),
}

/// Failure to read one of the tabular datasets backing the dashboard.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("failed to read {dataset}: {error}")]
    Io {
        dataset: &'static str,
        #[source]
        error: std::io::Error,
    },
    #[error("invalid {dataset} data: {error}")]
    Csv {
        dataset: &'static str,
        #[source]
        error: csv::Error,
    },
}

impl RetrievalError {
    pub(crate) fn io(dataset: &'static str, error: std::io::Error) -> Self {
        Self::Io { dataset, error }
    }

    pub(crate) fn csv(dataset: &'static str, error: csv::Error) -> Self {
        Self::Csv { dataset, error }
    }
}

/// Presentation tone for a rendered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeTone {
    Success,
    Warning,
    Error,
    Info,
}

impl NoticeTone {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Info => "Info",
        }
    }
}

/// Message shown to the user alongside its tone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub tone: NoticeTone,
    pub message: String,
}

impl Notice {
    pub fn new(tone: NoticeTone, message: impl Into<String>) -> Self {
        Self {
            tone,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeTone::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeTone::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeTone::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeTone::Info, message)
    }
}

/// Formats rupee amounts with thousands separators and two decimals.
pub fn format_rupees(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let negative = cents < 0;
    let cents = cents.abs();
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("\u{20b9}{sign}{grouped}.{fraction:02}")
}
