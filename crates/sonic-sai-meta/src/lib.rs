//! Validation and object lifecycle tracking for SAI DASH objects.
//!
//! [`Meta`] wraps a switch driver and refuses any create, remove, set or get
//! that the DASH schema or the current object graph says cannot succeed.
//! Accepted mutations are mirrored into an [`ObjectReferenceGraph`] so
//! that objects still referenced by others cannot be removed.
//!
//! - [`constraint`]: per-attribute and per-operation schema checks
//! - [`graph`]: live objects, their owners and reference counts
//! - [`meta`]: the quad and bulk entry points
//! - [`replay`]: scripted operation sequences, used by `saimeta-replay`
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use sonic_sai::api::VirtualSwitch;
//! use sonic_sai::metadata::dash::{switch, vnet};
//! use sonic_sai::{Attribute, AttributeValue, SaiObjectType, SaiStatus};
//! use sonic_sai_meta::Meta;
//!
//! let meta = Meta::new(Arc::new(VirtualSwitch::new()));
//! let sw = meta
//!     .create(
//!         SaiObjectType::Switch,
//!         0,
//!         &[Attribute::new(switch::INIT_SWITCH, AttributeValue::Bool(true))],
//!     )
//!     .unwrap();
//!
//! let err = meta
//!     .create(
//!         SaiObjectType::Vnet,
//!         sw,
//!         &[Attribute::new(vnet::VNI, AttributeValue::U32(1 << 24))],
//!     )
//!     .unwrap_err();
//! assert_eq!(err.status(), SaiStatus::InvalidParameter);
//! ```

pub mod constraint;
pub mod error;
pub mod graph;
pub mod meta;
pub mod replay;

#[cfg(test)]
mod test_support;

pub use error::{Access, MetaError, MetaResult};
pub use graph::{ObjectRecord, ObjectReferenceGraph};
pub use meta::{AttrOverflow, BulkCreateOutcome, BulkOutcome, GetReport, Meta};
