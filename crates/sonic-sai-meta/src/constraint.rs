//! Attribute constraint checking.
//!
//! Everything here is a pure function of the schema and the values passed
//! in. Whether a referenced object exists is not decided here; see
//! [`crate::graph`].

use crate::error::{Access, MetaError, MetaResult};
use sonic_sai::metadata::{AttrMetadata, ObjectTypeInfo};
use sonic_sai::{
    AttrValueType, Attribute, AttributeValue, EntryKey, SaiObjectType, SaiSchema,
    NULL_OBJECT_ID,
};
use std::collections::HashSet;

/// Checks one attribute against its declared constraint.
///
/// Returns the attribute's metadata so callers can check access flags.
pub fn check_attribute(
    schema: &SaiSchema,
    object_type: SaiObjectType,
    attr: &Attribute,
) -> MetaResult<&'static AttrMetadata> {
    let md = schema
        .attr(object_type, attr.id)
        .ok_or(MetaError::UnknownAttribute {
            object_type,
            attr_id: attr.id,
        })?;
    check_value(md, &attr.value)?;
    Ok(md)
}

/// Checks a value against `md`: kind, enum domain, range, list shape and
/// element well-formedness, and null-ness of object ids.
pub fn check_value(md: &AttrMetadata, value: &AttributeValue) -> MetaResult<()> {
    if !md.value_type.accepts(value) {
        return Err(MetaError::TypeMismatch {
            attr: md.name,
            expected: md.value_type,
            actual: value.value_type(),
        });
    }

    if let (Some(domain), AttributeValue::S32(v)) = (md.enum_metadata, value) {
        if !domain.contains(*v) {
            return Err(MetaError::InvalidEnumValue {
                attr: md.name,
                value: *v,
                domain: domain.name,
            });
        }
    }

    if let (Some((min, max)), Some(v)) = (md.range, value.as_integer()) {
        if v < min || v > max {
            return Err(MetaError::OutOfRange {
                attr: md.name,
                value: v,
                min,
                max,
            });
        }
    }

    if let Some((count, len)) = value.list_counts() {
        check_list_count(md, count, len)?;
    }
    check_elements(md, value)?;

    if md.value_type.is_oid() {
        check_oid_shape(md, value)?;
    }

    Ok(())
}

fn check_list_count(md: &AttrMetadata, count: u32, len: usize) -> MetaResult<()> {
    if usize::try_from(count).map_or(true, |count| count != len) {
        return Err(MetaError::MalformedListElement {
            attr: md.name,
            reason: format!("declared count {} but {} elements", count, len),
        });
    }
    if let Some(max) = md.max_count {
        if count > max {
            return Err(MetaError::MalformedListElement {
                attr: md.name,
                reason: format!("{} elements exceed maximum {}", count, max),
            });
        }
    }
    Ok(())
}

fn check_elements(md: &AttrMetadata, value: &AttributeValue) -> MetaResult<()> {
    let malformed = |reason: String| MetaError::MalformedListElement {
        attr: md.name,
        reason,
    };

    match value {
        AttributeValue::U16RangeList(ranges) => {
            if let Some((idx, r)) = ranges
                .list
                .iter()
                .enumerate()
                .find(|(_, r)| !r.is_well_formed())
            {
                return Err(malformed(format!(
                    "element {}: range min {} > max {}",
                    idx, r.min, r.max
                )));
            }
        }
        AttributeValue::IpPrefixList(prefixes) => {
            if let Some((idx, p)) = prefixes
                .list
                .iter()
                .enumerate()
                .find(|(_, p)| !p.is_well_formed())
            {
                return Err(malformed(format!("element {}: malformed prefix {}", idx, p)));
            }
        }
        AttributeValue::IpPrefix(p) if !p.is_well_formed() => {
            return Err(malformed(format!("malformed prefix {}", p)));
        }
        _ => {}
    }
    Ok(())
}

fn check_oid_shape(md: &AttrMetadata, value: &AttributeValue) -> MetaResult<()> {
    let oids = value.object_ids();
    if md.allowed_object_types.is_empty() {
        if let Some(&oid) = oids.iter().find(|&&oid| oid != NULL_OBJECT_ID) {
            return Err(MetaError::InvalidObjectId {
                context: md.name.to_string(),
                oid,
                reason: "cannot reference any object type",
            });
        }
    }
    if !md.allow_null && oids.contains(&NULL_OBJECT_ID) {
        return Err(MetaError::InvalidObjectId {
            context: md.name.to_string(),
            oid: NULL_OBJECT_ID,
            reason: "null object id not allowed",
        });
    }
    Ok(())
}

/// Create-time checks: every attribute valid and creatable, no id repeated,
/// and every mandatory-on-create attribute present.
pub fn check_create(
    schema: &SaiSchema,
    object_type: SaiObjectType,
    attrs: &[Attribute],
) -> MetaResult<()> {
    let info = object_info(schema, object_type)?;
    let mut seen = HashSet::with_capacity(attrs.len());

    for attr in attrs {
        let md = check_attribute(schema, object_type, attr)?;
        if !md.flags.creatable {
            return Err(MetaError::AttributeAccess {
                attr: md.name,
                access: Access::Create,
            });
        }
        if !seen.insert(attr.id) {
            return Err(MetaError::DuplicateAttribute {
                object_type,
                attr: md.name,
            });
        }
    }

    if let Some(md) = info
        .mandatory_on_create()
        .find(|md| !seen.contains(&md.attr_id))
    {
        return Err(MetaError::MissingMandatoryAttribute {
            object_type,
            attr: md.name,
        });
    }

    Ok(())
}

/// Set-time checks: the attribute is valid and settable.
pub fn check_set(
    schema: &SaiSchema,
    object_type: SaiObjectType,
    attr: &Attribute,
) -> MetaResult<&'static AttrMetadata> {
    object_info(schema, object_type)?;
    let md = check_attribute(schema, object_type, attr)?;
    if !md.flags.settable {
        return Err(MetaError::AttributeAccess {
            attr: md.name,
            access: Access::Set,
        });
    }
    Ok(md)
}

/// Get-time checks: every requested id is known and readable, and each
/// receive buffer has the declared kind.
pub fn check_get(
    schema: &SaiSchema,
    object_type: SaiObjectType,
    attrs: &[Attribute],
) -> MetaResult<()> {
    object_info(schema, object_type)?;
    for attr in attrs {
        let md = schema
            .attr(object_type, attr.id)
            .ok_or(MetaError::UnknownAttribute {
                object_type,
                attr_id: attr.id,
            })?;
        if !md.flags.readable {
            return Err(MetaError::AttributeAccess {
                attr: md.name,
                access: Access::Get,
            });
        }
        if !md.value_type.accepts(&attr.value) {
            return Err(MetaError::TypeMismatch {
                attr: md.name,
                expected: md.value_type,
                actual: attr.value.value_type(),
            });
        }
    }
    Ok(())
}

/// Checks the shape of an entry key: its type is entry-addressed in the
/// schema, every address member is well formed, and every OID member is
/// declared.
pub fn check_entry_key(
    schema: &SaiSchema,
    entry: &EntryKey,
) -> MetaResult<&'static ObjectTypeInfo> {
    let object_type = entry.object_type();
    let info = object_info(schema, object_type)?;
    if info.is_object_id {
        return Err(MetaError::InvalidObjectType {
            object_type,
            reason: "object type is addressed by object id",
        });
    }
    if let Some(member) = entry.malformed_member() {
        return Err(MetaError::MalformedKey {
            key: entry.to_string(),
            member,
        });
    }
    for (name, _) in entry.oid_members() {
        let declared = info
            .key_member(name)
            .map_or(false, |m| m.value_type == AttrValueType::Oid);
        if !declared {
            return Err(MetaError::MalformedKey {
                key: entry.to_string(),
                member: name,
            });
        }
    }
    Ok(info)
}

pub(crate) fn object_info(
    schema: &SaiSchema,
    object_type: SaiObjectType,
) -> MetaResult<&'static ObjectTypeInfo> {
    schema
        .object_info(object_type)
        .ok_or(MetaError::InvalidObjectType {
            object_type,
            reason: "object type not in schema",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sonic_sai::metadata::dash::{dash_acl_rule, eni, switch, vip_entry, vnet};
    use sonic_sai::{
        InboundRoutingEntry, EniOid, SaiList, SaiStatus, SwitchOid, U16Range,
    };
    use sonic_types::IpPrefix;

    fn schema() -> &'static SaiSchema {
        SaiSchema::dash()
    }

    fn status_of<T>(result: MetaResult<T>) -> SaiStatus {
        match result {
            Ok(_) => SaiStatus::Success,
            Err(e) => e.status(),
        }
    }

    #[test]
    fn test_unknown_attribute() {
        let attr = Attribute::new(42, AttributeValue::U32(1));
        let err = check_attribute(schema(), SaiObjectType::Vnet, &attr).unwrap_err();
        assert_eq!(
            err,
            MetaError::UnknownAttribute {
                object_type: SaiObjectType::Vnet,
                attr_id: 42
            }
        );
    }

    #[test]
    fn test_type_mismatch() {
        let attr = Attribute::new(vnet::VNI, AttributeValue::U16(10));
        let err = check_attribute(schema(), SaiObjectType::Vnet, &attr).unwrap_err();
        assert!(matches!(err, MetaError::TypeMismatch { .. }));
    }

    #[test]
    fn test_range() {
        let ok = Attribute::new(vnet::VNI, AttributeValue::U32(0xFF_FFFF));
        assert!(check_attribute(schema(), SaiObjectType::Vnet, &ok).is_ok());

        let too_big = Attribute::new(vnet::VNI, AttributeValue::U32(0x100_0000));
        let err = check_attribute(schema(), SaiObjectType::Vnet, &too_big).unwrap_err();
        assert!(matches!(err, MetaError::OutOfRange { value: 0x100_0000, .. }));
    }

    #[test]
    fn test_enum_domain() {
        let ok = Attribute::new(vip_entry::ACTION, AttributeValue::S32(vip_entry::ACTION_ACCEPT));
        assert!(check_attribute(schema(), SaiObjectType::VipEntry, &ok).is_ok());

        let bad = Attribute::new(vip_entry::ACTION, AttributeValue::S32(5));
        let err = check_attribute(schema(), SaiObjectType::VipEntry, &bad).unwrap_err();
        assert!(matches!(err, MetaError::InvalidEnumValue { value: 5, .. }));
    }

    #[test]
    fn test_list_count_must_match() {
        let attr = Attribute::new(
            dash_acl_rule::PROTOCOL,
            AttributeValue::U8List(SaiList {
                count: 3,
                list: vec![6, 17],
            }),
        );
        let err = check_attribute(schema(), SaiObjectType::DashAclRule, &attr).unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidParameter);
        assert!(matches!(err, MetaError::MalformedListElement { .. }));
    }

    #[test]
    fn test_list_max_count() {
        let protocols: Vec<u8> = (0..=255).chain([0]).collect();
        let attr = Attribute::new(
            dash_acl_rule::PROTOCOL,
            AttributeValue::U8List(SaiList::from(protocols)),
        );
        let err = check_attribute(schema(), SaiObjectType::DashAclRule, &attr).unwrap_err();
        assert!(matches!(err, MetaError::MalformedListElement { .. }));

        let full: Vec<u8> = (0..=255).collect();
        let attr = Attribute::new(
            dash_acl_rule::PROTOCOL,
            AttributeValue::U8List(SaiList::from(full)),
        );
        assert!(check_attribute(schema(), SaiObjectType::DashAclRule, &attr).is_ok());
    }

    #[test]
    fn test_malformed_range_element() {
        let attr = Attribute::new(
            dash_acl_rule::SRC_PORT,
            AttributeValue::U16RangeList(SaiList::from(vec![
                U16Range::new(1, 2),
                U16Range::new(80, 79),
            ])),
        );
        let err = check_attribute(schema(), SaiObjectType::DashAclRule, &attr).unwrap_err();
        assert_eq!(
            err,
            MetaError::MalformedListElement {
                attr: "SAI_DASH_ACL_RULE_ATTR_SRC_PORT",
                reason: "element 1: range min 80 > max 79".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_prefix_element() {
        let mixed = IpPrefix::with_mask("10.0.0.0".parse().unwrap(), "ffff::".parse().unwrap());
        let attr = Attribute::new(
            dash_acl_rule::DIP,
            AttributeValue::IpPrefixList(SaiList::from(vec![
                "192.168.0.1/255.255.0.0".parse().unwrap(),
                mixed,
            ])),
        );
        let err = check_attribute(schema(), SaiObjectType::DashAclRule, &attr).unwrap_err();
        assert!(matches!(err, MetaError::MalformedListElement { .. }));
    }

    #[test]
    fn test_null_oid() {
        let nullable = Attribute::new(eni::VNET_ID, AttributeValue::Oid(NULL_OBJECT_ID));
        assert!(check_attribute(schema(), SaiObjectType::Eni, &nullable).is_ok());

        let group = Attribute::new(
            dash_acl_rule::DASH_ACL_GROUP_ID,
            AttributeValue::Oid(NULL_OBJECT_ID),
        );
        let err = check_attribute(schema(), SaiObjectType::DashAclRule, &group).unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidObjectId);
    }

    #[test]
    fn test_create_mandatory_and_duplicates() {
        assert_eq!(
            status_of(check_create(schema(), SaiObjectType::VipEntry, &[])),
            SaiStatus::MandatoryAttributeMissing
        );

        let action = Attribute::new(vip_entry::ACTION, AttributeValue::S32(0));
        assert_eq!(
            status_of(check_create(
                schema(),
                SaiObjectType::VipEntry,
                &[action.clone(), action.clone()]
            )),
            SaiStatus::InvalidParameter
        );
        assert!(check_create(schema(), SaiObjectType::VipEntry, &[action]).is_ok());
    }

    #[test]
    fn test_create_only_is_not_settable() {
        let attr = Attribute::new(switch::INIT_SWITCH, AttributeValue::Bool(true));
        assert!(check_create(schema(), SaiObjectType::Switch, &[attr.clone()]).is_ok());

        let err = check_set(schema(), SaiObjectType::Switch, &attr).unwrap_err();
        assert_eq!(
            err,
            MetaError::AttributeAccess {
                attr: "SAI_SWITCH_ATTR_INIT_SWITCH",
                access: Access::Set
            }
        );
    }

    #[test]
    fn test_set_attr_from_other_type() {
        // attribute ids are scoped per type; an id valid elsewhere is still
        // checked against this type's declaration
        let attr = Attribute::new(vip_entry::ACTION, AttributeValue::S32(0));
        let err = check_set(schema(), SaiObjectType::Vnet, &attr).unwrap_err();
        assert!(matches!(err, MetaError::TypeMismatch { .. }));
    }

    #[test]
    fn test_get_buffer_kind() {
        let ok = [Attribute::new(vnet::VNI, AttributeValue::U32(0))];
        assert!(check_get(schema(), SaiObjectType::Vnet, &ok).is_ok());

        let wrong = [Attribute::new(vnet::VNI, AttributeValue::Bool(false))];
        assert!(check_get(schema(), SaiObjectType::Vnet, &wrong).is_err());
    }

    #[test]
    fn test_entry_key_mask() {
        let mut entry = InboundRoutingEntry {
            switch_id: SwitchOid::from_raw(1).unwrap(),
            eni_id: EniOid::from_raw(2).unwrap(),
            vni: 1,
            sip: "10.0.0.1".parse().unwrap(),
            sip_mask: "255.0.255.0".parse().unwrap(),
            priority: 0,
        };
        let err = check_entry_key(schema(), &EntryKey::from(entry.clone())).unwrap_err();
        assert!(matches!(err, MetaError::MalformedKey { member: "sip_mask", .. }));

        entry.sip_mask = "255.255.255.0".parse().unwrap();
        assert!(check_entry_key(schema(), &EntryKey::from(entry)).is_ok());
    }
}
