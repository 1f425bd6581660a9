//! DASH object and attribute declarations.
//!
//! Attribute ids are per object type and start at zero. Each object type has
//! a module with its attribute ids and enum values.

use super::{AttrFlags, AttrMetadata, EnumMetadata, KeyMemberMetadata, ObjectTypeInfo};
use crate::attr::{AttrValueType, SaiAttrId};
use crate::types::SaiObjectType;

const VNI_MAX: i128 = 0xFF_FFFF;

pub mod switch {
    use super::SaiAttrId;

    pub const INIT_SWITCH: SaiAttrId = 0;
    pub const SRC_MAC_ADDRESS: SaiAttrId = 1;
}

pub mod counter {
    use super::SaiAttrId;

    pub const TYPE: SaiAttrId = 0;

    pub const TYPE_REGULAR: i32 = 0;
}

pub mod vnet {
    use super::SaiAttrId;

    pub const VNI: SaiAttrId = 0;
}

pub mod eni {
    use super::SaiAttrId;

    pub const CPS: SaiAttrId = 0;
    pub const PPS: SaiAttrId = 1;
    pub const FLOWS: SaiAttrId = 2;
    pub const ADMIN_STATE: SaiAttrId = 3;
    pub const VM_UNDERLAY_DIP: SaiAttrId = 4;
    pub const VM_VNI: SaiAttrId = 5;
    pub const VNET_ID: SaiAttrId = 6;
    pub const INBOUND_V4_STAGE1_DASH_ACL_GROUP_ID: SaiAttrId = 7;
    pub const INBOUND_V4_STAGE2_DASH_ACL_GROUP_ID: SaiAttrId = 8;
    pub const INBOUND_V4_STAGE3_DASH_ACL_GROUP_ID: SaiAttrId = 9;
    pub const INBOUND_V4_STAGE4_DASH_ACL_GROUP_ID: SaiAttrId = 10;
    pub const INBOUND_V4_STAGE5_DASH_ACL_GROUP_ID: SaiAttrId = 11;
    pub const INBOUND_V6_STAGE1_DASH_ACL_GROUP_ID: SaiAttrId = 12;
    pub const INBOUND_V6_STAGE2_DASH_ACL_GROUP_ID: SaiAttrId = 13;
    pub const INBOUND_V6_STAGE3_DASH_ACL_GROUP_ID: SaiAttrId = 14;
    pub const INBOUND_V6_STAGE4_DASH_ACL_GROUP_ID: SaiAttrId = 15;
    pub const INBOUND_V6_STAGE5_DASH_ACL_GROUP_ID: SaiAttrId = 16;
    pub const OUTBOUND_V4_STAGE1_DASH_ACL_GROUP_ID: SaiAttrId = 17;
    pub const OUTBOUND_V4_STAGE2_DASH_ACL_GROUP_ID: SaiAttrId = 18;
    pub const OUTBOUND_V4_STAGE3_DASH_ACL_GROUP_ID: SaiAttrId = 19;
    pub const OUTBOUND_V4_STAGE4_DASH_ACL_GROUP_ID: SaiAttrId = 20;
    pub const OUTBOUND_V4_STAGE5_DASH_ACL_GROUP_ID: SaiAttrId = 21;
    pub const OUTBOUND_V6_STAGE1_DASH_ACL_GROUP_ID: SaiAttrId = 22;
    pub const OUTBOUND_V6_STAGE2_DASH_ACL_GROUP_ID: SaiAttrId = 23;
    pub const OUTBOUND_V6_STAGE3_DASH_ACL_GROUP_ID: SaiAttrId = 24;
    pub const OUTBOUND_V6_STAGE4_DASH_ACL_GROUP_ID: SaiAttrId = 25;
    pub const OUTBOUND_V6_STAGE5_DASH_ACL_GROUP_ID: SaiAttrId = 26;
}

pub mod dash_acl_group {
    use super::SaiAttrId;

    pub const IP_ADDR_FAMILY: SaiAttrId = 0;

    pub const IP_ADDR_FAMILY_IPV4: i32 = 0;
    pub const IP_ADDR_FAMILY_IPV6: i32 = 1;
}

pub mod dash_acl_rule {
    use super::SaiAttrId;

    pub const ACTION: SaiAttrId = 0;
    pub const DASH_ACL_GROUP_ID: SaiAttrId = 1;
    pub const DIP: SaiAttrId = 2;
    pub const SIP: SaiAttrId = 3;
    pub const PROTOCOL: SaiAttrId = 4;
    pub const SRC_PORT: SaiAttrId = 5;
    pub const DST_PORT: SaiAttrId = 6;
    pub const COUNTER_ID: SaiAttrId = 7;
    pub const PRIORITY: SaiAttrId = 8;

    pub const ACTION_PERMIT: i32 = 0;
    pub const ACTION_PERMIT_AND_CONTINUE: i32 = 1;
    pub const ACTION_DENY: i32 = 2;
    pub const ACTION_DENY_AND_CONTINUE: i32 = 3;

    pub const PROTOCOL_MAX_COUNT: u32 = 256;
}

pub mod vip_entry {
    use super::SaiAttrId;

    pub const ACTION: SaiAttrId = 0;

    pub const ACTION_ACCEPT: i32 = 0;
}

pub mod direction_lookup_entry {
    use super::SaiAttrId;

    pub const ACTION: SaiAttrId = 0;

    pub const ACTION_SET_OUTBOUND_DIRECTION: i32 = 0;
}

pub mod inbound_routing_entry {
    use super::SaiAttrId;

    pub const ACTION: SaiAttrId = 0;
    pub const SRC_VNET_ID: SaiAttrId = 1;

    pub const ACTION_VXLAN_DECAP: i32 = 0;
    pub const ACTION_VXLAN_DECAP_PA_VALIDATE: i32 = 1;
}

pub mod outbound_routing_entry {
    use super::SaiAttrId;

    pub const ACTION: SaiAttrId = 0;
    pub const DST_VNET_ID: SaiAttrId = 1;
    pub const OVERLAY_IP: SaiAttrId = 2;
    pub const COUNTER_ID: SaiAttrId = 3;

    pub const ACTION_ROUTE_VNET: i32 = 0;
    pub const ACTION_ROUTE_VNET_DIRECT: i32 = 1;
    pub const ACTION_ROUTE_DIRECT: i32 = 2;
    pub const ACTION_DROP: i32 = 3;
}

pub mod outbound_ca_to_pa_entry {
    use super::SaiAttrId;

    pub const UNDERLAY_DIP: SaiAttrId = 0;
    pub const OVERLAY_DMAC: SaiAttrId = 1;
    pub const USE_DST_VNET_VNI: SaiAttrId = 2;
    pub const COUNTER_ID: SaiAttrId = 3;
}

pub mod pa_validation_entry {
    use super::SaiAttrId;

    pub const ACTION: SaiAttrId = 0;

    pub const ACTION_PERMIT: i32 = 0;
}

pub mod eni_ether_address_map_entry {
    use super::SaiAttrId;

    pub const ENI_ID: SaiAttrId = 0;
}

// ============================================================================
// Enum domains
// ============================================================================

static COUNTER_TYPE: EnumMetadata = EnumMetadata {
    name: "sai_counter_type_t",
    values: &[(counter::TYPE_REGULAR, "SAI_COUNTER_TYPE_REGULAR")],
};

static IP_ADDR_FAMILY: EnumMetadata = EnumMetadata {
    name: "sai_ip_addr_family_t",
    values: &[
        (dash_acl_group::IP_ADDR_FAMILY_IPV4, "SAI_IP_ADDR_FAMILY_IPV4"),
        (dash_acl_group::IP_ADDR_FAMILY_IPV6, "SAI_IP_ADDR_FAMILY_IPV6"),
    ],
};

static DASH_ACL_RULE_ACTION: EnumMetadata = EnumMetadata {
    name: "sai_dash_acl_rule_action_t",
    values: &[
        (dash_acl_rule::ACTION_PERMIT, "SAI_DASH_ACL_RULE_ACTION_PERMIT"),
        (
            dash_acl_rule::ACTION_PERMIT_AND_CONTINUE,
            "SAI_DASH_ACL_RULE_ACTION_PERMIT_AND_CONTINUE",
        ),
        (dash_acl_rule::ACTION_DENY, "SAI_DASH_ACL_RULE_ACTION_DENY"),
        (
            dash_acl_rule::ACTION_DENY_AND_CONTINUE,
            "SAI_DASH_ACL_RULE_ACTION_DENY_AND_CONTINUE",
        ),
    ],
};

static VIP_ENTRY_ACTION: EnumMetadata = EnumMetadata {
    name: "sai_vip_entry_action_t",
    values: &[(vip_entry::ACTION_ACCEPT, "SAI_VIP_ENTRY_ACTION_ACCEPT")],
};

static DIRECTION_LOOKUP_ENTRY_ACTION: EnumMetadata = EnumMetadata {
    name: "sai_direction_lookup_entry_action_t",
    values: &[(
        direction_lookup_entry::ACTION_SET_OUTBOUND_DIRECTION,
        "SAI_DIRECTION_LOOKUP_ENTRY_ACTION_SET_OUTBOUND_DIRECTION",
    )],
};

static INBOUND_ROUTING_ENTRY_ACTION: EnumMetadata = EnumMetadata {
    name: "sai_inbound_routing_entry_action_t",
    values: &[
        (
            inbound_routing_entry::ACTION_VXLAN_DECAP,
            "SAI_INBOUND_ROUTING_ENTRY_ACTION_VXLAN_DECAP",
        ),
        (
            inbound_routing_entry::ACTION_VXLAN_DECAP_PA_VALIDATE,
            "SAI_INBOUND_ROUTING_ENTRY_ACTION_VXLAN_DECAP_PA_VALIDATE",
        ),
    ],
};

static OUTBOUND_ROUTING_ENTRY_ACTION: EnumMetadata = EnumMetadata {
    name: "sai_outbound_routing_entry_action_t",
    values: &[
        (
            outbound_routing_entry::ACTION_ROUTE_VNET,
            "SAI_OUTBOUND_ROUTING_ENTRY_ACTION_ROUTE_VNET",
        ),
        (
            outbound_routing_entry::ACTION_ROUTE_VNET_DIRECT,
            "SAI_OUTBOUND_ROUTING_ENTRY_ACTION_ROUTE_VNET_DIRECT",
        ),
        (
            outbound_routing_entry::ACTION_ROUTE_DIRECT,
            "SAI_OUTBOUND_ROUTING_ENTRY_ACTION_ROUTE_DIRECT",
        ),
        (
            outbound_routing_entry::ACTION_DROP,
            "SAI_OUTBOUND_ROUTING_ENTRY_ACTION_DROP",
        ),
    ],
};

static PA_VALIDATION_ENTRY_ACTION: EnumMetadata = EnumMetadata {
    name: "sai_pa_validation_entry_action_t",
    values: &[(
        pa_validation_entry::ACTION_PERMIT,
        "SAI_PA_VALIDATION_ENTRY_ACTION_PERMIT",
    )],
};

// ============================================================================
// Attribute tables
// ============================================================================

use AttrValueType as T;
use SaiObjectType as Ot;

const fn attr(
    object_type: SaiObjectType,
    attr_id: SaiAttrId,
    name: &'static str,
    value_type: AttrValueType,
    flags: AttrFlags,
) -> AttrMetadata {
    AttrMetadata::new(object_type, attr_id, name, value_type, flags)
}

const fn eni_acl_group(attr_id: SaiAttrId, name: &'static str) -> AttrMetadata {
    attr(Ot::Eni, attr_id, name, T::Oid, AttrFlags::CREATE_AND_SET)
        .with_objects(&[Ot::DashAclGroup], true)
}

static SWITCH_ATTRS: [AttrMetadata; 2] = [
    attr(
        Ot::Switch,
        switch::INIT_SWITCH,
        "SAI_SWITCH_ATTR_INIT_SWITCH",
        T::Bool,
        AttrFlags::MANDATORY_CREATE_ONLY,
    ),
    attr(
        Ot::Switch,
        switch::SRC_MAC_ADDRESS,
        "SAI_SWITCH_ATTR_SRC_MAC_ADDRESS",
        T::Mac,
        AttrFlags::CREATE_AND_SET,
    ),
];

static COUNTER_ATTRS: [AttrMetadata; 1] = [attr(
    Ot::Counter,
    counter::TYPE,
    "SAI_COUNTER_ATTR_TYPE",
    T::Enum,
    AttrFlags::CREATE_ONLY,
)
.with_enum(&COUNTER_TYPE)];

static VNET_ATTRS: [AttrMetadata; 1] = [attr(
    Ot::Vnet,
    vnet::VNI,
    "SAI_VNET_ATTR_VNI",
    T::U32,
    AttrFlags::CREATE_AND_SET,
)
.with_range(0, VNI_MAX)];

static ENI_ATTRS: [AttrMetadata; 27] = [
    attr(Ot::Eni, eni::CPS, "SAI_ENI_ATTR_CPS", T::U32, AttrFlags::CREATE_AND_SET),
    attr(Ot::Eni, eni::PPS, "SAI_ENI_ATTR_PPS", T::U32, AttrFlags::CREATE_AND_SET),
    attr(Ot::Eni, eni::FLOWS, "SAI_ENI_ATTR_FLOWS", T::U32, AttrFlags::CREATE_AND_SET),
    attr(
        Ot::Eni,
        eni::ADMIN_STATE,
        "SAI_ENI_ATTR_ADMIN_STATE",
        T::Bool,
        AttrFlags::CREATE_AND_SET,
    ),
    attr(
        Ot::Eni,
        eni::VM_UNDERLAY_DIP,
        "SAI_ENI_ATTR_VM_UNDERLAY_DIP",
        T::IpAddress,
        AttrFlags::CREATE_AND_SET,
    ),
    attr(Ot::Eni, eni::VM_VNI, "SAI_ENI_ATTR_VM_VNI", T::U32, AttrFlags::CREATE_AND_SET)
        .with_range(0, VNI_MAX),
    attr(Ot::Eni, eni::VNET_ID, "SAI_ENI_ATTR_VNET_ID", T::Oid, AttrFlags::CREATE_AND_SET)
        .with_objects(&[Ot::Vnet], true),
    eni_acl_group(
        eni::INBOUND_V4_STAGE1_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_INBOUND_V4_STAGE1_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::INBOUND_V4_STAGE2_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_INBOUND_V4_STAGE2_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::INBOUND_V4_STAGE3_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_INBOUND_V4_STAGE3_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::INBOUND_V4_STAGE4_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_INBOUND_V4_STAGE4_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::INBOUND_V4_STAGE5_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_INBOUND_V4_STAGE5_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::INBOUND_V6_STAGE1_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_INBOUND_V6_STAGE1_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::INBOUND_V6_STAGE2_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_INBOUND_V6_STAGE2_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::INBOUND_V6_STAGE3_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_INBOUND_V6_STAGE3_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::INBOUND_V6_STAGE4_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_INBOUND_V6_STAGE4_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::INBOUND_V6_STAGE5_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_INBOUND_V6_STAGE5_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::OUTBOUND_V4_STAGE1_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_OUTBOUND_V4_STAGE1_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::OUTBOUND_V4_STAGE2_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_OUTBOUND_V4_STAGE2_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::OUTBOUND_V4_STAGE3_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_OUTBOUND_V4_STAGE3_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::OUTBOUND_V4_STAGE4_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_OUTBOUND_V4_STAGE4_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::OUTBOUND_V4_STAGE5_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_OUTBOUND_V4_STAGE5_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::OUTBOUND_V6_STAGE1_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_OUTBOUND_V6_STAGE1_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::OUTBOUND_V6_STAGE2_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_OUTBOUND_V6_STAGE2_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::OUTBOUND_V6_STAGE3_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_OUTBOUND_V6_STAGE3_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::OUTBOUND_V6_STAGE4_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_OUTBOUND_V6_STAGE4_DASH_ACL_GROUP_ID",
    ),
    eni_acl_group(
        eni::OUTBOUND_V6_STAGE5_DASH_ACL_GROUP_ID,
        "SAI_ENI_ATTR_OUTBOUND_V6_STAGE5_DASH_ACL_GROUP_ID",
    ),
];

static DASH_ACL_GROUP_ATTRS: [AttrMetadata; 1] = [attr(
    Ot::DashAclGroup,
    dash_acl_group::IP_ADDR_FAMILY,
    "SAI_DASH_ACL_GROUP_ATTR_IP_ADDR_FAMILY",
    T::Enum,
    AttrFlags::CREATE_AND_SET,
)
.with_enum(&IP_ADDR_FAMILY)];

static DASH_ACL_RULE_ATTRS: [AttrMetadata; 9] = [
    attr(
        Ot::DashAclRule,
        dash_acl_rule::ACTION,
        "SAI_DASH_ACL_RULE_ATTR_ACTION",
        T::Enum,
        AttrFlags::CREATE_AND_SET,
    )
    .with_enum(&DASH_ACL_RULE_ACTION),
    attr(
        Ot::DashAclRule,
        dash_acl_rule::DASH_ACL_GROUP_ID,
        "SAI_DASH_ACL_RULE_ATTR_DASH_ACL_GROUP_ID",
        T::Oid,
        AttrFlags::MANDATORY_CREATE_ONLY,
    )
    .with_objects(&[Ot::DashAclGroup], false),
    attr(
        Ot::DashAclRule,
        dash_acl_rule::DIP,
        "SAI_DASH_ACL_RULE_ATTR_DIP",
        T::IpPrefixList,
        AttrFlags::CREATE_AND_SET,
    ),
    attr(
        Ot::DashAclRule,
        dash_acl_rule::SIP,
        "SAI_DASH_ACL_RULE_ATTR_SIP",
        T::IpPrefixList,
        AttrFlags::CREATE_AND_SET,
    ),
    attr(
        Ot::DashAclRule,
        dash_acl_rule::PROTOCOL,
        "SAI_DASH_ACL_RULE_ATTR_PROTOCOL",
        T::U8List,
        AttrFlags::CREATE_AND_SET,
    )
    .with_max_count(dash_acl_rule::PROTOCOL_MAX_COUNT),
    attr(
        Ot::DashAclRule,
        dash_acl_rule::SRC_PORT,
        "SAI_DASH_ACL_RULE_ATTR_SRC_PORT",
        T::U16RangeList,
        AttrFlags::CREATE_AND_SET,
    ),
    attr(
        Ot::DashAclRule,
        dash_acl_rule::DST_PORT,
        "SAI_DASH_ACL_RULE_ATTR_DST_PORT",
        T::U16RangeList,
        AttrFlags::CREATE_AND_SET,
    ),
    attr(
        Ot::DashAclRule,
        dash_acl_rule::COUNTER_ID,
        "SAI_DASH_ACL_RULE_ATTR_COUNTER_ID",
        T::Oid,
        AttrFlags::CREATE_AND_SET,
    )
    .with_objects(&[Ot::Counter], true),
    attr(
        Ot::DashAclRule,
        dash_acl_rule::PRIORITY,
        "SAI_DASH_ACL_RULE_ATTR_PRIORITY",
        T::U32,
        AttrFlags::CREATE_AND_SET,
    ),
];

static VIP_ENTRY_ATTRS: [AttrMetadata; 1] = [attr(
    Ot::VipEntry,
    vip_entry::ACTION,
    "SAI_VIP_ENTRY_ATTR_ACTION",
    T::Enum,
    AttrFlags::MANDATORY_CREATE_AND_SET,
)
.with_enum(&VIP_ENTRY_ACTION)];

static DIRECTION_LOOKUP_ENTRY_ATTRS: [AttrMetadata; 1] = [attr(
    Ot::DirectionLookupEntry,
    direction_lookup_entry::ACTION,
    "SAI_DIRECTION_LOOKUP_ENTRY_ATTR_ACTION",
    T::Enum,
    AttrFlags::MANDATORY_CREATE_AND_SET,
)
.with_enum(&DIRECTION_LOOKUP_ENTRY_ACTION)];

static INBOUND_ROUTING_ENTRY_ATTRS: [AttrMetadata; 2] = [
    attr(
        Ot::InboundRoutingEntry,
        inbound_routing_entry::ACTION,
        "SAI_INBOUND_ROUTING_ENTRY_ATTR_ACTION",
        T::Enum,
        AttrFlags::MANDATORY_CREATE_AND_SET,
    )
    .with_enum(&INBOUND_ROUTING_ENTRY_ACTION),
    attr(
        Ot::InboundRoutingEntry,
        inbound_routing_entry::SRC_VNET_ID,
        "SAI_INBOUND_ROUTING_ENTRY_ATTR_SRC_VNET_ID",
        T::Oid,
        AttrFlags::CREATE_AND_SET,
    )
    .with_objects(&[Ot::Vnet], true),
];

static OUTBOUND_ROUTING_ENTRY_ATTRS: [AttrMetadata; 4] = [
    attr(
        Ot::OutboundRoutingEntry,
        outbound_routing_entry::ACTION,
        "SAI_OUTBOUND_ROUTING_ENTRY_ATTR_ACTION",
        T::Enum,
        AttrFlags::MANDATORY_CREATE_AND_SET,
    )
    .with_enum(&OUTBOUND_ROUTING_ENTRY_ACTION),
    attr(
        Ot::OutboundRoutingEntry,
        outbound_routing_entry::DST_VNET_ID,
        "SAI_OUTBOUND_ROUTING_ENTRY_ATTR_DST_VNET_ID",
        T::Oid,
        AttrFlags::CREATE_AND_SET,
    )
    .with_objects(&[Ot::Vnet], true),
    attr(
        Ot::OutboundRoutingEntry,
        outbound_routing_entry::OVERLAY_IP,
        "SAI_OUTBOUND_ROUTING_ENTRY_ATTR_OVERLAY_IP",
        T::IpAddress,
        AttrFlags::CREATE_AND_SET,
    ),
    attr(
        Ot::OutboundRoutingEntry,
        outbound_routing_entry::COUNTER_ID,
        "SAI_OUTBOUND_ROUTING_ENTRY_ATTR_COUNTER_ID",
        T::Oid,
        AttrFlags::CREATE_AND_SET,
    )
    .with_objects(&[Ot::Counter], true),
];

static OUTBOUND_CA_TO_PA_ENTRY_ATTRS: [AttrMetadata; 4] = [
    attr(
        Ot::OutboundCaToPaEntry,
        outbound_ca_to_pa_entry::UNDERLAY_DIP,
        "SAI_OUTBOUND_CA_TO_PA_ENTRY_ATTR_UNDERLAY_DIP",
        T::IpAddress,
        AttrFlags::CREATE_AND_SET,
    ),
    attr(
        Ot::OutboundCaToPaEntry,
        outbound_ca_to_pa_entry::OVERLAY_DMAC,
        "SAI_OUTBOUND_CA_TO_PA_ENTRY_ATTR_OVERLAY_DMAC",
        T::Mac,
        AttrFlags::CREATE_AND_SET,
    ),
    attr(
        Ot::OutboundCaToPaEntry,
        outbound_ca_to_pa_entry::USE_DST_VNET_VNI,
        "SAI_OUTBOUND_CA_TO_PA_ENTRY_ATTR_USE_DST_VNET_VNI",
        T::Bool,
        AttrFlags::CREATE_AND_SET,
    ),
    attr(
        Ot::OutboundCaToPaEntry,
        outbound_ca_to_pa_entry::COUNTER_ID,
        "SAI_OUTBOUND_CA_TO_PA_ENTRY_ATTR_COUNTER_ID",
        T::Oid,
        AttrFlags::CREATE_AND_SET,
    )
    .with_objects(&[Ot::Counter], true),
];

static PA_VALIDATION_ENTRY_ATTRS: [AttrMetadata; 1] = [attr(
    Ot::PaValidationEntry,
    pa_validation_entry::ACTION,
    "SAI_PA_VALIDATION_ENTRY_ATTR_ACTION",
    T::Enum,
    AttrFlags::MANDATORY_CREATE_AND_SET,
)
.with_enum(&PA_VALIDATION_ENTRY_ACTION)];

static ENI_ETHER_ADDRESS_MAP_ENTRY_ATTRS: [AttrMetadata; 1] = [attr(
    Ot::EniEtherAddressMapEntry,
    eni_ether_address_map_entry::ENI_ID,
    "SAI_ENI_ETHER_ADDRESS_MAP_ENTRY_ATTR_ENI_ID",
    T::Oid,
    AttrFlags::CREATE_AND_SET,
)
.with_objects(&[Ot::Eni], true)];

// ============================================================================
// Entry key layouts
// ============================================================================

const SWITCH_MEMBER: KeyMemberMetadata = KeyMemberMetadata::oid("switch_id", &[Ot::Switch]);

static VIP_ENTRY_KEY: [KeyMemberMetadata; 2] =
    [SWITCH_MEMBER, KeyMemberMetadata::new("vip", T::IpAddress)];

static DIRECTION_LOOKUP_ENTRY_KEY: [KeyMemberMetadata; 2] =
    [SWITCH_MEMBER, KeyMemberMetadata::new("vni", T::U32)];

static INBOUND_ROUTING_ENTRY_KEY: [KeyMemberMetadata; 6] = [
    SWITCH_MEMBER,
    KeyMemberMetadata::oid("eni_id", &[Ot::Eni]),
    KeyMemberMetadata::new("vni", T::U32),
    KeyMemberMetadata::new("sip", T::IpAddress),
    KeyMemberMetadata::new("sip_mask", T::IpAddress),
    KeyMemberMetadata::new("priority", T::U32),
];

static OUTBOUND_ROUTING_ENTRY_KEY: [KeyMemberMetadata; 3] = [
    SWITCH_MEMBER,
    KeyMemberMetadata::oid("eni_id", &[Ot::Eni]),
    KeyMemberMetadata::new("destination", T::IpPrefix),
];

static OUTBOUND_CA_TO_PA_ENTRY_KEY: [KeyMemberMetadata; 3] = [
    SWITCH_MEMBER,
    KeyMemberMetadata::oid("dst_vnet_id", &[Ot::Vnet]),
    KeyMemberMetadata::new("dip", T::IpAddress),
];

static PA_VALIDATION_ENTRY_KEY: [KeyMemberMetadata; 3] = [
    SWITCH_MEMBER,
    KeyMemberMetadata::oid("vnet_id", &[Ot::Vnet]),
    KeyMemberMetadata::new("sip", T::IpAddress),
];

static ENI_ETHER_ADDRESS_MAP_ENTRY_KEY: [KeyMemberMetadata; 2] =
    [SWITCH_MEMBER, KeyMemberMetadata::new("address", T::Mac)];

const fn oid_type(object_type: SaiObjectType, attrs: &'static [AttrMetadata]) -> ObjectTypeInfo {
    ObjectTypeInfo {
        object_type,
        is_object_id: true,
        key_members: &[],
        attrs,
    }
}

const fn entry_type(
    object_type: SaiObjectType,
    key_members: &'static [KeyMemberMetadata],
    attrs: &'static [AttrMetadata],
) -> ObjectTypeInfo {
    ObjectTypeInfo {
        object_type,
        is_object_id: false,
        key_members,
        attrs,
    }
}

/// Every DASH object type.
pub static OBJECT_TYPES: &[ObjectTypeInfo] = &[
    oid_type(Ot::Switch, &SWITCH_ATTRS),
    oid_type(Ot::Counter, &COUNTER_ATTRS),
    oid_type(Ot::Vnet, &VNET_ATTRS),
    oid_type(Ot::Eni, &ENI_ATTRS),
    oid_type(Ot::DashAclGroup, &DASH_ACL_GROUP_ATTRS),
    oid_type(Ot::DashAclRule, &DASH_ACL_RULE_ATTRS),
    entry_type(Ot::VipEntry, &VIP_ENTRY_KEY, &VIP_ENTRY_ATTRS),
    entry_type(
        Ot::DirectionLookupEntry,
        &DIRECTION_LOOKUP_ENTRY_KEY,
        &DIRECTION_LOOKUP_ENTRY_ATTRS,
    ),
    entry_type(
        Ot::InboundRoutingEntry,
        &INBOUND_ROUTING_ENTRY_KEY,
        &INBOUND_ROUTING_ENTRY_ATTRS,
    ),
    entry_type(
        Ot::OutboundRoutingEntry,
        &OUTBOUND_ROUTING_ENTRY_KEY,
        &OUTBOUND_ROUTING_ENTRY_ATTRS,
    ),
    entry_type(
        Ot::OutboundCaToPaEntry,
        &OUTBOUND_CA_TO_PA_ENTRY_KEY,
        &OUTBOUND_CA_TO_PA_ENTRY_ATTRS,
    ),
    entry_type(
        Ot::PaValidationEntry,
        &PA_VALIDATION_ENTRY_KEY,
        &PA_VALIDATION_ENTRY_ATTRS,
    ),
    entry_type(
        Ot::EniEtherAddressMapEntry,
        &ENI_ETHER_ADDRESS_MAP_ENTRY_KEY,
        &ENI_ETHER_ADDRESS_MAP_ENTRY_ATTRS,
    ),
];
