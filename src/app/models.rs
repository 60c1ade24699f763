//! Data models for weather event processing
//!
//! This module contains the input event records (samples and control commands),
//! the per-station temperature extremes, and the summary records emitted by the
//! processor. Input records are decoded from loosely-typed JSON values so that
//! every missing or unexpected field maps onto a specific [`Error`] variant.

use crate::constants::{
    FIELD_COMMAND, FIELD_STATION_NAME, FIELD_TEMPERATURE, FIELD_TIMESTAMP, FIELD_TYPE,
    SAMPLE_FIELDS, commands, message_types,
};
use crate::{Error, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Numbers
// =============================================================================

/// A JSON number compared by value and written back in the form it arrived in
///
/// Timestamps and temperatures may be integers, fractions or exponent-form
/// numbers. `5` and `5.0` compare equal, but each is serialized as it was read.
#[derive(Debug, Clone, Copy)]
pub enum Numeric {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Numeric {
    /// Convert a JSON number, keeping its integer form when it has one
    pub fn from_number(number: &Number) -> Option<Self> {
        if let Some(value) = number.as_i64() {
            Some(Numeric::Int(value))
        } else if let Some(value) = number.as_u64() {
            Some(Numeric::UInt(value))
        } else {
            number.as_f64().map(Numeric::Float)
        }
    }

    /// Value as a float, possibly losing precision for very large integers
    pub fn as_f64(&self) -> f64 {
        match *self {
            Numeric::Int(value) => value as f64,
            Numeric::UInt(value) => value as f64,
            Numeric::Float(value) => value,
        }
    }
}

fn compare_floats(left: f64, right: f64) -> Ordering {
    left.partial_cmp(&right)
        .unwrap_or_else(|| left.total_cmp(&right))
}

impl Ord for Numeric {
    fn cmp(&self, other: &Self) -> Ordering {
        match (*self, *other) {
            (Numeric::Int(left), Numeric::Int(right)) => left.cmp(&right),
            (Numeric::UInt(left), Numeric::UInt(right)) => left.cmp(&right),
            (Numeric::Int(left), Numeric::UInt(right)) => match u64::try_from(left) {
                Ok(left) => left.cmp(&right),
                Err(_) => Ordering::Less,
            },
            (Numeric::UInt(_), Numeric::Int(_)) => other.cmp(self).reverse(),
            (left, right) => compare_floats(left.as_f64(), right.as_f64()),
        }
    }
}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Numeric {}

impl From<i32> for Numeric {
    fn from(value: i32) -> Self {
        Numeric::Int(value.into())
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric::Int(value)
    }
}

impl From<u64> for Numeric {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Numeric::UInt(value), Numeric::Int)
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Numeric::Float(value)
    }
}

macro_rules! numeric_eq {
    ($($ty:ty),*) => {
        $(
            impl PartialEq<$ty> for Numeric {
                fn eq(&self, other: &$ty) -> bool {
                    *self == Numeric::from(*other)
                }
            }
        )*
    };
}

numeric_eq!(i32, i64, u64, f64);

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Int(value) => write!(f, "{}", value),
            Numeric::UInt(value) => write!(f, "{}", value),
            Numeric::Float(value) => write!(f, "{:?}", value),
        }
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match *self {
            Numeric::Int(value) => serializer.serialize_i64(value),
            Numeric::UInt(value) => serializer.serialize_u64(value),
            Numeric::Float(value) => serializer.serialize_f64(value),
        }
    }
}

impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let number = Number::deserialize(deserializer)?;
        Numeric::from_number(&number)
            .ok_or_else(|| D::Error::custom(format!("unsupported number {}", number)))
    }
}

// =============================================================================
// Input Events
// =============================================================================

/// A single temperature reading from one station
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Name of the reporting station
    pub station_name: String,

    /// Observation time; only its ordering matters to the processor
    pub timestamp: Numeric,

    /// Observed temperature
    pub temperature: Numeric,
}

impl Sample {
    /// Create a new sample
    pub fn new(
        station_name: impl Into<String>,
        timestamp: impl Into<Numeric>,
        temperature: impl Into<Numeric>,
    ) -> Self {
        Self {
            station_name: station_name.into(),
            timestamp: timestamp.into(),
            temperature: temperature.into(),
        }
    }

    /// Decode a sample from a record already known to carry `type: "sample"`
    fn from_value(value: &Value) -> Result<Self> {
        let missing: Vec<&str> = SAMPLE_FIELDS
            .iter()
            .copied()
            .filter(|field| value.get(field).is_none())
            .collect();

        if !missing.is_empty() {
            return Err(Error::malformed_sample(format!(
                "missing required fields ({})",
                missing.join(", ")
            )));
        }

        let station_name = value[FIELD_STATION_NAME]
            .as_str()
            .ok_or_else(|| {
                Error::malformed_sample(format!("field '{}' must be a string", FIELD_STATION_NAME))
            })?
            .to_string();

        let timestamp = number_field(value, FIELD_TIMESTAMP)?;
        let temperature = number_field(value, FIELD_TEMPERATURE)?;

        Ok(Self {
            station_name,
            timestamp,
            temperature,
        })
    }
}

/// Read a present field that must hold a JSON number
fn number_field(value: &Value, field: &str) -> Result<Numeric> {
    let number = match &value[field] {
        Value::Number(number) => Numeric::from_number(number),
        _ => None,
    };
    number.ok_or_else(|| Error::malformed_sample(format!("field '{}' must be a number", field)))
}

/// Control instruction interleaved with samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlCommand {
    /// Emit the current extremes without changing state
    Snapshot,
    /// Emit an acknowledgement and clear all station extremes
    Reset,
}

impl ControlCommand {
    /// Wire name of the command
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlCommand::Snapshot => commands::SNAPSHOT,
            ControlCommand::Reset => commands::RESET,
        }
    }
}

impl FromStr for ControlCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            commands::SNAPSHOT => Ok(ControlCommand::Snapshot),
            commands::RESET => Ok(ControlCommand::Reset),
            other => Err(Error::unknown_command(other)),
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input event consumed by the processor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    /// Temperature reading
    Sample(Sample),
    /// Snapshot or reset request
    Control { command: ControlCommand },
}

impl Event {
    /// Build a sample event
    pub fn sample(
        station_name: impl Into<String>,
        timestamp: impl Into<Numeric>,
        temperature: impl Into<Numeric>,
    ) -> Self {
        Event::Sample(Sample::new(station_name, timestamp, temperature))
    }

    /// Build a snapshot control event
    pub fn snapshot() -> Self {
        Event::Control {
            command: ControlCommand::Snapshot,
        }
    }

    /// Build a reset control event
    pub fn reset() -> Self {
        Event::Control {
            command: ControlCommand::Reset,
        }
    }

    /// Decode an event from a JSON record
    ///
    /// Checks run in wire order: the `type` discriminator first, then the
    /// fields required by that type. A record that is not a JSON object has no
    /// `type` and is reported as [`Error::MissingType`].
    pub fn from_value(value: &Value) -> Result<Self> {
        let message_type = value.get(FIELD_TYPE).ok_or(Error::MissingType)?;

        match message_type.as_str() {
            Some(message_types::SAMPLE) => Sample::from_value(value).map(Event::Sample),
            Some(message_types::CONTROL) => {
                let command = value.get(FIELD_COMMAND).ok_or(Error::MissingCommand)?;
                let command = match command.as_str() {
                    Some(name) => name.parse()?,
                    None => return Err(Error::unknown_command(command.to_string())),
                };
                Ok(Event::Control { command })
            }
            Some(other) => Err(Error::unknown_type(other)),
            None => Err(Error::unknown_type(message_type.to_string())),
        }
    }

    /// Encode the event in its wire form
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl TryFrom<&Value> for Event {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        Event::from_value(value)
    }
}

// =============================================================================
// Station Extremes
// =============================================================================

/// Highest and lowest temperature seen for one station since the last reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationStats {
    pub high: Numeric,
    pub low: Numeric,
}

impl StationStats {
    /// Seed both extremes from the first reading
    pub fn new(temperature: impl Into<Numeric>) -> Self {
        let temperature = temperature.into();
        Self {
            high: temperature,
            low: temperature,
        }
    }

    /// Widen the extremes to include a new reading; ties leave them untouched
    pub fn record(&mut self, temperature: Numeric) {
        if temperature > self.high {
            self.high = temperature;
        }
        if temperature < self.low {
            self.low = temperature;
        }
    }
}

/// Station name to extremes, sorted by name for stable output
pub type StationTable = BTreeMap<String, StationStats>;

// =============================================================================
// Output Records
// =============================================================================

/// Current extremes of every station as of the latest sample timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    #[serde(rename = "asOf")]
    pub as_of: Numeric,
    pub stations: StationTable,
}

/// Acknowledgement that station extremes were cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetRecord {
    #[serde(rename = "asOf")]
    pub as_of: Numeric,
}

/// Record emitted in response to an honored control command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputRecord {
    Snapshot(SnapshotRecord),
    Reset(ResetRecord),
}

impl OutputRecord {
    /// Timestamp the record was produced as of
    pub fn as_of(&self) -> Numeric {
        match self {
            OutputRecord::Snapshot(snapshot) => snapshot.as_of,
            OutputRecord::Reset(reset) => reset.as_of,
        }
    }

    /// Command that produced this record
    pub fn command(&self) -> ControlCommand {
        match self {
            OutputRecord::Snapshot(_) => ControlCommand::Snapshot,
            OutputRecord::Reset(_) => ControlCommand::Reset,
        }
    }
}
