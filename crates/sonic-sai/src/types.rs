//! SAI object types and type-safe object ID wrappers.
//!
//! [`SaiObjectType`] is the runtime tag used by the metadata schema and the
//! validation layer. [`SaiObjectId`] ties a raw OID to its kind at compile
//! time so entry keys cannot, for instance, carry a VNET where an ENI is
//! expected.

use crate::error::{SaiError, SaiResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::str::FromStr;

/// Raw SAI object ID type (matches sai_object_id_t in C).
pub type RawSaiObjectId = u64;

/// SAI_NULL_OBJECT_ID.
pub const NULL_OBJECT_ID: RawSaiObjectId = 0;

/// Object types known to the DASH schema.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaiObjectType {
    Switch = 1,
    Counter,
    Vnet,
    Eni,
    DashAclGroup,
    DashAclRule,
    VipEntry,
    DirectionLookupEntry,
    InboundRoutingEntry,
    OutboundRoutingEntry,
    OutboundCaToPaEntry,
    PaValidationEntry,
    EniEtherAddressMapEntry,
}

impl SaiObjectType {
    pub const ALL: [SaiObjectType; 13] = [
        SaiObjectType::Switch,
        SaiObjectType::Counter,
        SaiObjectType::Vnet,
        SaiObjectType::Eni,
        SaiObjectType::DashAclGroup,
        SaiObjectType::DashAclRule,
        SaiObjectType::VipEntry,
        SaiObjectType::DirectionLookupEntry,
        SaiObjectType::InboundRoutingEntry,
        SaiObjectType::OutboundRoutingEntry,
        SaiObjectType::OutboundCaToPaEntry,
        SaiObjectType::PaValidationEntry,
        SaiObjectType::EniEtherAddressMapEntry,
    ];

    pub const fn as_raw(self) -> u32 {
        self as u32
    }

    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|ot| ot.as_raw() == raw)
    }

    /// The `SAI_OBJECT_TYPE_*` name.
    pub const fn name(&self) -> &'static str {
        match self {
            SaiObjectType::Switch => "SAI_OBJECT_TYPE_SWITCH",
            SaiObjectType::Counter => "SAI_OBJECT_TYPE_COUNTER",
            SaiObjectType::Vnet => "SAI_OBJECT_TYPE_VNET",
            SaiObjectType::Eni => "SAI_OBJECT_TYPE_ENI",
            SaiObjectType::DashAclGroup => "SAI_OBJECT_TYPE_DASH_ACL_GROUP",
            SaiObjectType::DashAclRule => "SAI_OBJECT_TYPE_DASH_ACL_RULE",
            SaiObjectType::VipEntry => "SAI_OBJECT_TYPE_VIP_ENTRY",
            SaiObjectType::DirectionLookupEntry => "SAI_OBJECT_TYPE_DIRECTION_LOOKUP_ENTRY",
            SaiObjectType::InboundRoutingEntry => "SAI_OBJECT_TYPE_INBOUND_ROUTING_ENTRY",
            SaiObjectType::OutboundRoutingEntry => "SAI_OBJECT_TYPE_OUTBOUND_ROUTING_ENTRY",
            SaiObjectType::OutboundCaToPaEntry => "SAI_OBJECT_TYPE_OUTBOUND_CA_TO_PA_ENTRY",
            SaiObjectType::PaValidationEntry => "SAI_OBJECT_TYPE_PA_VALIDATION_ENTRY",
            SaiObjectType::EniEtherAddressMapEntry => {
                "SAI_OBJECT_TYPE_ENI_ETHER_ADDRESS_MAP_ENTRY"
            }
        }
    }
}

impl fmt::Display for SaiObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SaiObjectType {
    type Err = SaiError;

    fn from_str(s: &str) -> SaiResult<Self> {
        let wanted = s.strip_prefix("SAI_OBJECT_TYPE_").unwrap_or(s);
        Self::ALL
            .iter()
            .copied()
            .find(|ot| ot.name()["SAI_OBJECT_TYPE_".len()..].eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SaiError::UnknownObjectType(s.to_string()))
    }
}

/// Marker trait for SAI object kinds.
///
/// Each OID-addressed SAI object type implements this trait to enable
/// compile-time type checking of object IDs.
pub trait SaiObjectKind: Send + Sync + 'static {
    const OBJECT_TYPE: SaiObjectType;

    /// Returns the SAI object type name for debugging.
    fn type_name() -> &'static str;
}

/// A type-safe SAI object ID.
///
/// The phantom type parameter `T` indicates what kind of SAI object this ID
/// refers to. Serialized as the bare numeric OID.
///
/// ```
/// use sonic_sai::{EniOid, SaiObjectId};
///
/// let eni = EniOid::from_raw(0x4000000000001).unwrap();
/// assert_eq!(eni.to_string(), "0x0004000000000001");
/// ```
#[derive(Clone, Copy)]
pub struct SaiObjectId<T: SaiObjectKind> {
    raw: RawSaiObjectId,
    _marker: PhantomData<T>,
}

impl<T: SaiObjectKind> SaiObjectId<T> {
    /// The null object ID (SAI_NULL_OBJECT_ID).
    pub const NULL: Self = Self {
        raw: NULL_OBJECT_ID,
        _marker: PhantomData,
    };

    /// Creates a new object ID from a raw value.
    ///
    /// Returns `None` if the raw value is the null object ID.
    pub fn from_raw(raw: RawSaiObjectId) -> Option<Self> {
        if raw == NULL_OBJECT_ID {
            None
        } else {
            Some(Self::from_raw_unchecked(raw))
        }
    }

    /// Creates a new object ID from a raw value, including null.
    pub const fn from_raw_unchecked(raw: RawSaiObjectId) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    pub const fn as_raw(&self) -> RawSaiObjectId {
        self.raw
    }

    pub const fn is_null(&self) -> bool {
        self.raw == NULL_OBJECT_ID
    }

    /// The object type this ID is declared to refer to.
    pub const fn object_type(&self) -> SaiObjectType {
        T::OBJECT_TYPE
    }
}

impl<T: SaiObjectKind> fmt::Debug for SaiObjectId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:016x})", T::type_name(), self.raw)
    }
}

impl<T: SaiObjectKind> fmt::Display for SaiObjectId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.raw)
    }
}

impl<T: SaiObjectKind> PartialEq for SaiObjectId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T: SaiObjectKind> Eq for SaiObjectId<T> {}

impl<T: SaiObjectKind> Hash for SaiObjectId<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T: SaiObjectKind> Default for SaiObjectId<T> {
    fn default() -> Self {
        Self::NULL
    }
}

impl<T: SaiObjectKind> Serialize for SaiObjectId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.raw)
    }
}

impl<'de, T: SaiObjectKind> Deserialize<'de> for SaiObjectId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawSaiObjectId::deserialize(deserializer).map(Self::from_raw_unchecked)
    }
}

// ============================================================================
// Object Kind Markers
// ============================================================================

macro_rules! define_object_kind {
    ($name:ident, $object_type:ident, $type_name:literal, $oid_alias:ident) => {
        #[doc = concat!("Marker type for SAI ", $type_name, " objects.")]
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl SaiObjectKind for $name {
            const OBJECT_TYPE: SaiObjectType = SaiObjectType::$object_type;

            fn type_name() -> &'static str {
                $type_name
            }
        }

        #[doc = concat!("Type alias for ", $type_name, " object IDs.")]
        pub type $oid_alias = SaiObjectId<$name>;
    };
}

define_object_kind!(SwitchKind, Switch, "Switch", SwitchOid);
define_object_kind!(CounterKind, Counter, "Counter", CounterOid);
define_object_kind!(VnetKind, Vnet, "Vnet", VnetOid);
define_object_kind!(EniKind, Eni, "Eni", EniOid);
define_object_kind!(DashAclGroupKind, DashAclGroup, "DashAclGroup", DashAclGroupOid);
define_object_kind!(DashAclRuleKind, DashAclRule, "DashAclRule", DashAclRuleOid);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_oid_creation() {
        let eni = EniOid::from_raw(0x4000000000001).unwrap();
        assert_eq!(eni.as_raw(), 0x4000000000001);
        assert!(!eni.is_null());
        assert_eq!(eni.object_type(), SaiObjectType::Eni);
    }

    #[test]
    fn test_null_oid() {
        assert!(VnetOid::from_raw(NULL_OBJECT_ID).is_none());
        assert!(VnetOid::NULL.is_null());
        assert_eq!(VnetOid::default(), VnetOid::NULL);
    }

    #[test]
    fn test_oid_debug() {
        let vnet = VnetOid::from_raw(0x3000000000001).unwrap();
        assert_eq!(format!("{:?}", vnet), "Vnet(0x0003000000000001)");
    }

    #[test]
    fn test_oid_serde_is_numeric() {
        let sw = SwitchOid::from_raw(0x21).unwrap();
        assert_eq!(serde_json::to_string(&sw).unwrap(), "33");
        let back: SwitchOid = serde_json::from_str("33").unwrap();
        assert_eq!(back, sw);
    }

    #[test]
    fn test_object_type_names() {
        assert_eq!(SaiObjectType::VipEntry.to_string(), "SAI_OBJECT_TYPE_VIP_ENTRY");
        assert_eq!(
            "SAI_OBJECT_TYPE_DASH_ACL_RULE".parse::<SaiObjectType>().unwrap(),
            SaiObjectType::DashAclRule
        );
        assert_eq!("eni".parse::<SaiObjectType>().unwrap(), SaiObjectType::Eni);
        assert!("SAI_OBJECT_TYPE_PORT".parse::<SaiObjectType>().is_err());
    }

    #[test]
    fn test_object_type_raw_round_trip() {
        for ot in SaiObjectType::ALL {
            assert_eq!(SaiObjectType::from_raw(ot.as_raw()), Some(ot));
        }
        assert_eq!(SaiObjectType::from_raw(0), None);
    }
}
