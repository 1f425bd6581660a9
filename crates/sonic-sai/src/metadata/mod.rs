//! Declarative attribute metadata.
//!
//! The schema is a read-only table of per-object-type, per-attribute
//! constraints. It is built from `'static` data and never mutated; the
//! built-in DASH schema is shared process-wide through [`SaiSchema::dash`].

pub mod dash;

use crate::attr::{AttrValueType, SaiAttrId};
use crate::types::SaiObjectType;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Per-attribute access flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrFlags {
    pub mandatory_on_create: bool,
    pub creatable: bool,
    pub settable: bool,
    pub readable: bool,
}

impl AttrFlags {
    pub const CREATE_AND_SET: Self = Self {
        mandatory_on_create: false,
        creatable: true,
        settable: true,
        readable: true,
    };

    pub const MANDATORY_CREATE_AND_SET: Self = Self {
        mandatory_on_create: true,
        ..Self::CREATE_AND_SET
    };

    pub const CREATE_ONLY: Self = Self {
        settable: false,
        ..Self::CREATE_AND_SET
    };

    pub const MANDATORY_CREATE_ONLY: Self = Self {
        mandatory_on_create: true,
        ..Self::CREATE_ONLY
    };
}

/// Enum domain of an enum-typed attribute.
#[derive(Debug)]
pub struct EnumMetadata {
    pub name: &'static str,
    pub values: &'static [(i32, &'static str)],
}

impl EnumMetadata {
    pub fn contains(&self, value: i32) -> bool {
        self.values.iter().any(|(v, _)| *v == value)
    }

    pub fn value_of(&self, name: &str) -> Option<i32> {
        self.values
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(v, _)| *v)
    }
}

/// Constraints declared for one attribute of one object type.
#[derive(Debug, Clone, Copy)]
pub struct AttrMetadata {
    pub object_type: SaiObjectType,
    pub attr_id: SaiAttrId,
    pub name: &'static str,
    pub value_type: AttrValueType,
    pub flags: AttrFlags,
    pub enum_metadata: Option<&'static EnumMetadata>,
    /// Inclusive bounds for scalar numeric values.
    pub range: Option<(i128, i128)>,
    /// Upper bound on the element count of list values.
    pub max_count: Option<u32>,
    /// Object types an OID-valued attribute may point at.
    pub allowed_object_types: &'static [SaiObjectType],
    /// Whether the null OID is an accepted value.
    pub allow_null: bool,
}

impl AttrMetadata {
    pub const fn new(
        object_type: SaiObjectType,
        attr_id: SaiAttrId,
        name: &'static str,
        value_type: AttrValueType,
        flags: AttrFlags,
    ) -> Self {
        Self {
            object_type,
            attr_id,
            name,
            value_type,
            flags,
            enum_metadata: None,
            range: None,
            max_count: None,
            allowed_object_types: &[],
            allow_null: false,
        }
    }

    pub const fn with_enum(self, enum_metadata: &'static EnumMetadata) -> Self {
        Self {
            enum_metadata: Some(enum_metadata),
            ..self
        }
    }

    pub const fn with_range(self, min: i128, max: i128) -> Self {
        Self {
            range: Some((min, max)),
            ..self
        }
    }

    pub const fn with_max_count(self, max_count: u32) -> Self {
        Self {
            max_count: Some(max_count),
            ..self
        }
    }

    pub const fn with_objects(
        self,
        allowed_object_types: &'static [SaiObjectType],
        allow_null: bool,
    ) -> Self {
        Self {
            allowed_object_types,
            allow_null,
            ..self
        }
    }

    pub fn allows_object_type(&self, object_type: SaiObjectType) -> bool {
        self.allowed_object_types.contains(&object_type)
    }
}

/// One field of an entry key.
#[derive(Debug, Clone, Copy)]
pub struct KeyMemberMetadata {
    pub name: &'static str,
    pub value_type: AttrValueType,
    pub allowed_object_types: &'static [SaiObjectType],
}

impl KeyMemberMetadata {
    pub const fn new(name: &'static str, value_type: AttrValueType) -> Self {
        Self {
            name,
            value_type,
            allowed_object_types: &[],
        }
    }

    pub const fn oid(name: &'static str, allowed_object_types: &'static [SaiObjectType]) -> Self {
        Self {
            name,
            value_type: AttrValueType::Oid,
            allowed_object_types,
        }
    }
}

/// Everything the schema declares about one object type.
#[derive(Debug)]
pub struct ObjectTypeInfo {
    pub object_type: SaiObjectType,
    /// OID-addressed when true, entry-addressed otherwise.
    pub is_object_id: bool,
    pub key_members: &'static [KeyMemberMetadata],
    pub attrs: &'static [AttrMetadata],
}

impl ObjectTypeInfo {
    pub fn attr(&self, attr_id: SaiAttrId) -> Option<&'static AttrMetadata> {
        self.attrs.iter().find(|md| md.attr_id == attr_id)
    }

    pub fn key_member(&self, name: &str) -> Option<&'static KeyMemberMetadata> {
        self.key_members.iter().find(|m| m.name == name)
    }

    pub fn mandatory_on_create(&self) -> impl Iterator<Item = &'static AttrMetadata> {
        self.attrs.iter().filter(|md| md.flags.mandatory_on_create)
    }
}

static DASH_SCHEMA: Lazy<SaiSchema> = Lazy::new(|| SaiSchema::new(dash::OBJECT_TYPES));

/// Read-only lookup over a set of object type declarations.
#[derive(Debug)]
pub struct SaiSchema {
    types: HashMap<SaiObjectType, &'static ObjectTypeInfo>,
}

impl SaiSchema {
    pub fn new(object_types: &'static [ObjectTypeInfo]) -> Self {
        let types = object_types
            .iter()
            .map(|info| (info.object_type, info))
            .collect();
        Self { types }
    }

    /// The built-in DASH schema, initialized on first use.
    pub fn dash() -> &'static SaiSchema {
        &DASH_SCHEMA
    }

    pub fn object_info(&self, object_type: SaiObjectType) -> Option<&'static ObjectTypeInfo> {
        self.types.get(&object_type).copied()
    }

    pub fn attr(
        &self,
        object_type: SaiObjectType,
        attr_id: SaiAttrId,
    ) -> Option<&'static AttrMetadata> {
        self.object_info(object_type)?.attr(attr_id)
    }

    /// Looks an attribute up by its `SAI_*_ATTR_*` name.
    pub fn attr_by_name(
        &self,
        object_type: SaiObjectType,
        name: &str,
    ) -> Option<&'static AttrMetadata> {
        self.object_info(object_type)?
            .attrs
            .iter()
            .find(|md| md.name == name)
    }

    pub fn is_object_id(&self, object_type: SaiObjectType) -> bool {
        self.object_info(object_type)
            .map_or(false, |info| info.is_object_id)
    }
}
