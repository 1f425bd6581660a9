//! Structural keys for entry-addressed DASH objects, and the polymorphic
//! [`ObjectKey`] that addresses any object.

use crate::types::{EniOid, RawSaiObjectId, SaiObjectType, SwitchOid, VnetOid};
use serde::{Deserialize, Serialize};
use sonic_types::{IpAddress, IpPrefix, MacAddress};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VipEntry {
    pub switch_id: SwitchOid,
    pub vip: IpAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectionLookupEntry {
    pub switch_id: SwitchOid,
    pub vni: u32,
}

/// Inbound routing key. `sip_mask` must be a contiguous mask of the same
/// family as `sip`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InboundRoutingEntry {
    pub switch_id: SwitchOid,
    pub eni_id: EniOid,
    pub vni: u32,
    pub sip: IpAddress,
    pub sip_mask: IpAddress,
    pub priority: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutboundRoutingEntry {
    pub switch_id: SwitchOid,
    pub eni_id: EniOid,
    pub destination: IpPrefix,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutboundCaToPaEntry {
    pub switch_id: SwitchOid,
    pub dst_vnet_id: VnetOid,
    pub dip: IpAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaValidationEntry {
    pub switch_id: SwitchOid,
    pub vnet_id: VnetOid,
    pub sip: IpAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EniEtherAddressMapEntry {
    pub switch_id: SwitchOid,
    pub address: MacAddress,
}

/// Any entry key. Equality and hashing are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKey {
    VipEntry(VipEntry),
    DirectionLookupEntry(DirectionLookupEntry),
    InboundRoutingEntry(InboundRoutingEntry),
    OutboundRoutingEntry(OutboundRoutingEntry),
    OutboundCaToPaEntry(OutboundCaToPaEntry),
    PaValidationEntry(PaValidationEntry),
    EniEtherAddressMapEntry(EniEtherAddressMapEntry),
}

impl EntryKey {
    pub fn object_type(&self) -> SaiObjectType {
        match self {
            EntryKey::VipEntry(_) => SaiObjectType::VipEntry,
            EntryKey::DirectionLookupEntry(_) => SaiObjectType::DirectionLookupEntry,
            EntryKey::InboundRoutingEntry(_) => SaiObjectType::InboundRoutingEntry,
            EntryKey::OutboundRoutingEntry(_) => SaiObjectType::OutboundRoutingEntry,
            EntryKey::OutboundCaToPaEntry(_) => SaiObjectType::OutboundCaToPaEntry,
            EntryKey::PaValidationEntry(_) => SaiObjectType::PaValidationEntry,
            EntryKey::EniEtherAddressMapEntry(_) => SaiObjectType::EniEtherAddressMapEntry,
        }
    }

    /// The switch embedded in the key.
    pub fn switch_id(&self) -> RawSaiObjectId {
        match self {
            EntryKey::VipEntry(e) => e.switch_id.as_raw(),
            EntryKey::DirectionLookupEntry(e) => e.switch_id.as_raw(),
            EntryKey::InboundRoutingEntry(e) => e.switch_id.as_raw(),
            EntryKey::OutboundRoutingEntry(e) => e.switch_id.as_raw(),
            EntryKey::OutboundCaToPaEntry(e) => e.switch_id.as_raw(),
            EntryKey::PaValidationEntry(e) => e.switch_id.as_raw(),
            EntryKey::EniEtherAddressMapEntry(e) => e.switch_id.as_raw(),
        }
    }

    /// OID-valued key members other than `switch_id`, by member name.
    pub fn oid_members(&self) -> Vec<(&'static str, RawSaiObjectId)> {
        match self {
            EntryKey::InboundRoutingEntry(e) => vec![("eni_id", e.eni_id.as_raw())],
            EntryKey::OutboundRoutingEntry(e) => vec![("eni_id", e.eni_id.as_raw())],
            EntryKey::OutboundCaToPaEntry(e) => vec![("dst_vnet_id", e.dst_vnet_id.as_raw())],
            EntryKey::PaValidationEntry(e) => vec![("vnet_id", e.vnet_id.as_raw())],
            EntryKey::VipEntry(_)
            | EntryKey::DirectionLookupEntry(_)
            | EntryKey::EniEtherAddressMapEntry(_) => Vec::new(),
        }
    }

    /// Name of the first address member that is not well formed, if any.
    pub fn malformed_member(&self) -> Option<&'static str> {
        match self {
            EntryKey::InboundRoutingEntry(e) => {
                let well_formed = e.sip.family() == e.sip_mask.family()
                    && e.sip_mask.mask_len().is_some();
                (!well_formed).then_some("sip_mask")
            }
            EntryKey::OutboundRoutingEntry(e) => {
                (!e.destination.is_well_formed()).then_some("destination")
            }
            _ => None,
        }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKey::VipEntry(e) => write!(f, "vip_entry(switch={}, vip={})", e.switch_id, e.vip),
            EntryKey::DirectionLookupEntry(e) => {
                write!(f, "direction_lookup_entry(switch={}, vni={})", e.switch_id, e.vni)
            }
            EntryKey::InboundRoutingEntry(e) => write!(
                f,
                "inbound_routing_entry(switch={}, eni={}, vni={}, sip={}/{}, priority={})",
                e.switch_id, e.eni_id, e.vni, e.sip, e.sip_mask, e.priority
            ),
            EntryKey::OutboundRoutingEntry(e) => write!(
                f,
                "outbound_routing_entry(switch={}, eni={}, destination={})",
                e.switch_id, e.eni_id, e.destination
            ),
            EntryKey::OutboundCaToPaEntry(e) => write!(
                f,
                "outbound_ca_to_pa_entry(switch={}, dst_vnet={}, dip={})",
                e.switch_id, e.dst_vnet_id, e.dip
            ),
            EntryKey::PaValidationEntry(e) => write!(
                f,
                "pa_validation_entry(switch={}, vnet={}, sip={})",
                e.switch_id, e.vnet_id, e.sip
            ),
            EntryKey::EniEtherAddressMapEntry(e) => write!(
                f,
                "eni_ether_address_map_entry(switch={}, address={})",
                e.switch_id, e.address
            ),
        }
    }
}

macro_rules! entry_key_from {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for EntryKey {
                fn from(entry: $ty) -> Self {
                    EntryKey::$ty(entry)
                }
            }
        )*
    };
}

entry_key_from!(
    VipEntry,
    DirectionLookupEntry,
    InboundRoutingEntry,
    OutboundRoutingEntry,
    OutboundCaToPaEntry,
    PaValidationEntry,
    EniEtherAddressMapEntry,
);

/// Address of a live object: an OID or a structural entry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKey {
    Oid(RawSaiObjectId),
    Entry(EntryKey),
}

impl ObjectKey {
    pub fn is_oid(&self) -> bool {
        matches!(self, ObjectKey::Oid(_))
    }

    pub fn as_oid(&self) -> Option<RawSaiObjectId> {
        match self {
            ObjectKey::Oid(oid) => Some(*oid),
            ObjectKey::Entry(_) => None,
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKey::Oid(oid) => write!(f, "0x{:016x}", oid),
            ObjectKey::Entry(entry) => entry.fmt(f),
        }
    }
}

/// An object key together with the object type the caller addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectMetaKey {
    pub object_type: SaiObjectType,
    pub key: ObjectKey,
}

impl ObjectMetaKey {
    pub fn oid(object_type: SaiObjectType, oid: RawSaiObjectId) -> Self {
        Self {
            object_type,
            key: ObjectKey::Oid(oid),
        }
    }

    pub fn entry(entry: EntryKey) -> Self {
        Self {
            object_type: entry.object_type(),
            key: ObjectKey::Entry(entry),
        }
    }
}

impl From<EntryKey> for ObjectMetaKey {
    fn from(entry: EntryKey) -> Self {
        ObjectMetaKey::entry(entry)
    }
}

impl fmt::Display for ObjectMetaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn switch() -> SwitchOid {
        SwitchOid::from_raw(0x21).unwrap()
    }

    #[test]
    fn test_structural_equality() {
        let a = EntryKey::from(VipEntry {
            switch_id: switch(),
            vip: "192.168.0.1".parse().unwrap(),
        });
        let b = EntryKey::from(VipEntry {
            switch_id: switch(),
            vip: "192.168.0.1".parse().unwrap(),
        });
        assert_eq!(a, b);
        assert_eq!(ObjectMetaKey::from(a.clone()).object_type, SaiObjectType::VipEntry);
        assert_eq!(a.switch_id(), 0x21);
    }

    #[test]
    fn test_oid_members() {
        let entry = EntryKey::from(PaValidationEntry {
            switch_id: switch(),
            vnet_id: VnetOid::from_raw(0x99).unwrap(),
            sip: "1.2.3.4".parse().unwrap(),
        });
        assert_eq!(entry.oid_members(), vec![("vnet_id", 0x99)]);
    }

    #[test]
    fn test_malformed_inbound_mask() {
        let mut entry = InboundRoutingEntry {
            switch_id: switch(),
            eni_id: EniOid::from_raw(0x42).unwrap(),
            vni: 10,
            sip: "192.168.0.1".parse().unwrap(),
            sip_mask: "255.255.0.0".parse().unwrap(),
            priority: 1,
        };
        assert_eq!(EntryKey::from(entry.clone()).malformed_member(), None);

        entry.sip_mask = "ffff::".parse().unwrap();
        assert_eq!(EntryKey::from(entry).malformed_member(), Some("sip_mask"));
    }

    #[test]
    fn test_entry_wire_form() {
        let entry = EntryKey::from(DirectionLookupEntry {
            switch_id: switch(),
            vni: 7,
        });
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"direction_lookup_entry": {"switch_id": 33, "vni": 7}})
        );
    }
}
