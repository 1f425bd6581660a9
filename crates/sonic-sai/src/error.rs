//! SAI status vocabulary and crate error type.
//!
//! Drivers report outcomes as [`SaiStatus`]; the numeric values match
//! `sai_status_t` so statuses can be exchanged with C implementations and
//! recorded in replay scripts by their `SAI_STATUS_*` names.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// SAI status codes matching the SAI C API.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaiStatus {
    Success = 0,
    Failure = -1,
    NotSupported = -2,
    NoMemory = -3,
    InsufficientResources = -4,
    InvalidParameter = -5,
    ItemAlreadyExists = -6,
    ItemNotFound = -7,
    BufferOverflow = -8,
    Uninitialized = -12,
    TableFull = -13,
    MandatoryAttributeMissing = -14,
    NotImplemented = -15,
    ObjectInUse = -17,
    InvalidObjectType = -18,
    InvalidObjectId = -19,
    NotExecuted = -23,
    InvalidAttribute = -24,
}

impl SaiStatus {
    const ALL: [SaiStatus; 18] = [
        SaiStatus::Success,
        SaiStatus::Failure,
        SaiStatus::NotSupported,
        SaiStatus::NoMemory,
        SaiStatus::InsufficientResources,
        SaiStatus::InvalidParameter,
        SaiStatus::ItemAlreadyExists,
        SaiStatus::ItemNotFound,
        SaiStatus::BufferOverflow,
        SaiStatus::Uninitialized,
        SaiStatus::TableFull,
        SaiStatus::MandatoryAttributeMissing,
        SaiStatus::NotImplemented,
        SaiStatus::ObjectInUse,
        SaiStatus::InvalidObjectType,
        SaiStatus::InvalidObjectId,
        SaiStatus::NotExecuted,
        SaiStatus::InvalidAttribute,
    ];

    /// Creates a SaiStatus from a raw i32 value.
    ///
    /// Codes outside the known vocabulary collapse to `Failure`.
    pub fn from_raw(status: i32) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.as_raw() == status)
            .unwrap_or(SaiStatus::Failure)
    }

    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn is_success(&self) -> bool {
        *self == SaiStatus::Success
    }

    pub fn is_error(&self) -> bool {
        *self != SaiStatus::Success
    }

    /// Converts to a Result, returning Ok(()) for success.
    pub fn into_result(self) -> Result<(), SaiStatus> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            SaiStatus::Success => "SAI_STATUS_SUCCESS",
            SaiStatus::Failure => "SAI_STATUS_FAILURE",
            SaiStatus::NotSupported => "SAI_STATUS_NOT_SUPPORTED",
            SaiStatus::NoMemory => "SAI_STATUS_NO_MEMORY",
            SaiStatus::InsufficientResources => "SAI_STATUS_INSUFFICIENT_RESOURCES",
            SaiStatus::InvalidParameter => "SAI_STATUS_INVALID_PARAMETER",
            SaiStatus::ItemAlreadyExists => "SAI_STATUS_ITEM_ALREADY_EXISTS",
            SaiStatus::ItemNotFound => "SAI_STATUS_ITEM_NOT_FOUND",
            SaiStatus::BufferOverflow => "SAI_STATUS_BUFFER_OVERFLOW",
            SaiStatus::Uninitialized => "SAI_STATUS_UNINITIALIZED",
            SaiStatus::TableFull => "SAI_STATUS_TABLE_FULL",
            SaiStatus::MandatoryAttributeMissing => "SAI_STATUS_MANDATORY_ATTRIBUTE_MISSING",
            SaiStatus::NotImplemented => "SAI_STATUS_NOT_IMPLEMENTED",
            SaiStatus::ObjectInUse => "SAI_STATUS_OBJECT_IN_USE",
            SaiStatus::InvalidObjectType => "SAI_STATUS_INVALID_OBJECT_TYPE",
            SaiStatus::InvalidObjectId => "SAI_STATUS_INVALID_OBJECT_ID",
            SaiStatus::NotExecuted => "SAI_STATUS_NOT_EXECUTED",
            SaiStatus::InvalidAttribute => "SAI_STATUS_INVALID_ATTRIBUTE",
        }
    }
}

impl fmt::Display for SaiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SaiStatus {
    type Err = SaiError;

    /// Accepts the full `SAI_STATUS_*` name or the bare suffix.
    fn from_str(s: &str) -> SaiResult<Self> {
        let wanted = s.strip_prefix("SAI_STATUS_").unwrap_or(s);
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.name()["SAI_STATUS_".len()..].eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SaiError::UnknownStatus(s.to_string()))
    }
}

impl Serialize for SaiStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for SaiStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for the SAI vocabulary crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaiError {
    #[error("unknown SAI status: {0}")]
    UnknownStatus(String),

    #[error("unknown SAI object type: {0}")]
    UnknownObjectType(String),
}

/// Result type for SAI vocabulary parsing.
pub type SaiResult<T> = Result<T, SaiError>;
