//! SAI vocabulary for DASH objects.
//!
//! This crate describes what can be said to a switch driver, without
//! deciding whether a particular request is valid:
//!
//! - [`types`]: object types and type-safe object IDs
//! - [`attr`]: tagged attribute values and counted lists
//! - [`entry`]: structural entry keys and the polymorphic object key
//! - [`metadata`]: the read-only attribute schema, including the DASH tables
//! - [`api`]: the driver trait and an in-memory virtual switch
//! - [`error`]: status codes
//!
//! # Example
//!
//! ```
//! use sonic_sai::api::{SaiInterface, VirtualSwitch};
//! use sonic_sai::metadata::dash::vnet;
//! use sonic_sai::{Attribute, AttributeValue, SaiObjectType};
//!
//! let vs = VirtualSwitch::new();
//! let switch_id = vs.create(SaiObjectType::Switch, 0, &[]).unwrap();
//! let vnet_id = vs
//!     .create(
//!         SaiObjectType::Vnet,
//!         switch_id,
//!         &[Attribute::new(vnet::VNI, AttributeValue::U32(10))],
//!     )
//!     .unwrap();
//! assert_ne!(switch_id, vnet_id);
//! ```

pub mod api;
pub mod attr;
pub mod entry;
pub mod error;
pub mod metadata;
pub mod types;

pub use attr::{AttrValueType, Attribute, AttributeValue, SaiAttrId, SaiList, U16Range};
pub use entry::{
    DirectionLookupEntry, EniEtherAddressMapEntry, EntryKey, InboundRoutingEntry, ObjectKey,
    ObjectMetaKey, OutboundCaToPaEntry, OutboundRoutingEntry, PaValidationEntry, VipEntry,
};
pub use error::{SaiError, SaiResult, SaiStatus};
pub use metadata::{AttrFlags, AttrMetadata, EnumMetadata, ObjectTypeInfo, SaiSchema};
pub use types::{
    CounterKind, CounterOid, DashAclGroupKind, DashAclGroupOid, DashAclRuleKind, DashAclRuleOid,
    EniKind, EniOid, RawSaiObjectId, SaiObjectId, SaiObjectKind, SaiObjectType, SwitchKind,
    SwitchOid, VnetKind, VnetOid, NULL_OBJECT_ID,
};
