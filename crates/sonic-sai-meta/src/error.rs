//! Error type for validation and lifecycle tracking.
//!
//! Every variant maps to exactly one [`SaiStatus`] through
//! [`MetaError::status`], which is what bulk per-item arrays and replay
//! expectations compare against.

use sonic_sai::{AttrValueType, RawSaiObjectId, SaiAttrId, SaiObjectType, SaiStatus};
use std::fmt;
use thiserror::Error;

/// The access an operation needs from an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Create,
    Set,
    Get,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Create => write!(f, "creatable"),
            Access::Set => write!(f, "settable"),
            Access::Get => write!(f, "readable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetaError {
    #[error("{object_type}: unknown attribute id {attr_id}")]
    UnknownAttribute {
        object_type: SaiObjectType,
        attr_id: SaiAttrId,
    },

    #[error("{attr}: {value} is not a member of {domain}")]
    InvalidEnumValue {
        attr: &'static str,
        value: i32,
        domain: &'static str,
    },

    #[error("{attr}: {value} outside {min}..={max}")]
    OutOfRange {
        attr: &'static str,
        value: i128,
        min: i128,
        max: i128,
    },

    #[error("{attr}: {reason}")]
    MalformedListElement { attr: &'static str, reason: String },

    #[error("{attr}: expected {expected} value, got {actual}")]
    TypeMismatch {
        attr: &'static str,
        expected: AttrValueType,
        actual: AttrValueType,
    },

    #[error("{attr} is not {access}")]
    AttributeAccess { attr: &'static str, access: Access },

    #[error("{key}: malformed key member {member}")]
    MalformedKey { key: String, member: &'static str },

    #[error("{object_type} cannot be addressed this way: {reason}")]
    InvalidObjectType {
        object_type: SaiObjectType,
        reason: &'static str,
    },

    #[error("{context}: 0x{oid:016x} {reason}")]
    InvalidObjectId {
        context: String,
        oid: RawSaiObjectId,
        reason: &'static str,
    },

    #[error("{context}: 0x{oid:016x} is {actual}, expected one of {expected:?}")]
    WrongObjectType {
        context: String,
        oid: RawSaiObjectId,
        actual: SaiObjectType,
        expected: Vec<SaiObjectType>,
    },

    #[error("{object_type}: attribute {attr} given more than once")]
    DuplicateAttribute {
        object_type: SaiObjectType,
        attr: &'static str,
    },

    #[error("{object_type}: mandatory attribute {attr} missing")]
    MissingMandatoryAttribute {
        object_type: SaiObjectType,
        attr: &'static str,
    },

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{key} is in use: {reason}")]
    ObjectInUse { key: String, reason: String },

    #[error("{attr}: buffer holds {capacity} elements, {required} required")]
    BufferOverflow {
        attr: &'static str,
        capacity: u32,
        required: u32,
    },

    #[error("bulk call has {keys} keys but {values} attribute sets")]
    BulkLengthMismatch { keys: usize, values: usize },

    #[error("driver returned {0}")]
    DriverFailure(SaiStatus),

    #[error("object graph lock poisoned")]
    LockPoisoned,
}

impl MetaError {
    /// The SAI status reported for this error.
    pub fn status(&self) -> SaiStatus {
        match self {
            MetaError::UnknownAttribute { .. } => SaiStatus::InvalidAttribute,
            MetaError::InvalidEnumValue { .. }
            | MetaError::OutOfRange { .. }
            | MetaError::MalformedListElement { .. }
            | MetaError::TypeMismatch { .. }
            | MetaError::AttributeAccess { .. }
            | MetaError::MalformedKey { .. }
            | MetaError::DuplicateAttribute { .. }
            | MetaError::BulkLengthMismatch { .. } => SaiStatus::InvalidParameter,
            MetaError::InvalidObjectType { .. } | MetaError::WrongObjectType { .. } => {
                SaiStatus::InvalidObjectType
            }
            MetaError::InvalidObjectId { .. } => SaiStatus::InvalidObjectId,
            MetaError::MissingMandatoryAttribute { .. } => SaiStatus::MandatoryAttributeMissing,
            MetaError::AlreadyExists(_) => SaiStatus::ItemAlreadyExists,
            MetaError::NotFound(_) => SaiStatus::ItemNotFound,
            MetaError::ObjectInUse { .. } => SaiStatus::ObjectInUse,
            MetaError::BufferOverflow { .. } => SaiStatus::BufferOverflow,
            MetaError::DriverFailure(status) => *status,
            MetaError::LockPoisoned => SaiStatus::Failure,
        }
    }
}

impl From<SaiStatus> for MetaError {
    fn from(status: SaiStatus) -> Self {
        MetaError::DriverFailure(status)
    }
}

pub type MetaResult<T> = Result<T, MetaError>;
