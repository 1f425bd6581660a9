//! SAI attributes: an id plus a tagged value.
//!
//! List-valued attributes carry an explicit `count` next to their elements.
//! On create and set the count must equal the number of elements; on get it
//! is the caller's buffer capacity going in and the actual length coming
//! out.

use crate::types::{RawSaiObjectId, NULL_OBJECT_ID};
use serde::{Deserialize, Serialize};
use sonic_types::{IpAddress, IpPrefix, MacAddress};
use std::fmt;

/// Attribute id, scoped to an object type.
pub type SaiAttrId = u32;

/// A counted SAI list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SaiList<T> {
    pub count: u32,
    pub list: Vec<T>,
}

impl<T> SaiList<T> {
    /// An empty receive buffer with room for `capacity` elements.
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            count: capacity,
            list: Vec::new(),
        }
    }

    /// True when the declared count matches the number of elements.
    pub fn is_consistent(&self) -> bool {
        usize::try_from(self.count).map_or(false, |count| count == self.list.len())
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<T: Clone> SaiList<T> {
    /// Copies `source` into this buffer, respecting the capacity in `count`.
    ///
    /// Returns false when the buffer is too small; `count` then holds the
    /// required length and the elements are left untouched.
    pub fn fill_from(&mut self, source: &[T]) -> bool {
        let required = u32::try_from(source.len()).unwrap_or(u32::MAX);
        if required > self.count {
            self.count = required;
            return false;
        }
        self.list = source.to_vec();
        self.count = required;
        true
    }
}

impl<T> From<Vec<T>> for SaiList<T> {
    fn from(list: Vec<T>) -> Self {
        Self {
            count: u32::try_from(list.len()).unwrap_or(u32::MAX),
            list,
        }
    }
}

/// Inclusive u16 range, used for L4 port matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct U16Range {
    pub min: u16,
    pub max: u16,
}

impl U16Range {
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    pub const fn is_well_formed(&self) -> bool {
        self.min <= self.max
    }
}

/// Value kind declared for an attribute in the metadata schema.
///
/// `Enum` values travel as [`AttributeValue::S32`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrValueType {
    Bool,
    U8,
    S8,
    U16,
    S16,
    U32,
    S32,
    U64,
    S64,
    Enum,
    Mac,
    IpAddress,
    IpPrefix,
    Oid,
    OidList,
    U8List,
    U16RangeList,
    IpPrefixList,
}

impl AttrValueType {
    pub const fn is_list(self) -> bool {
        matches!(
            self,
            AttrValueType::OidList
                | AttrValueType::U8List
                | AttrValueType::U16RangeList
                | AttrValueType::IpPrefixList
        )
    }

    pub const fn is_oid(self) -> bool {
        matches!(self, AttrValueType::Oid | AttrValueType::OidList)
    }

    /// True when `value` is carried in the tag this kind expects.
    pub fn accepts(self, value: &AttributeValue) -> bool {
        let carried = value.value_type();
        carried == self || (self == AttrValueType::Enum && carried == AttrValueType::S32)
    }

    /// Builds an empty receive value of this kind for a get request.
    ///
    /// List kinds get a buffer with room for `capacity` elements.
    pub fn receive_buffer(self, capacity: u32) -> AttributeValue {
        match self {
            AttrValueType::Bool => AttributeValue::Bool(false),
            AttrValueType::U8 => AttributeValue::U8(0),
            AttrValueType::S8 => AttributeValue::S8(0),
            AttrValueType::U16 => AttributeValue::U16(0),
            AttrValueType::S16 => AttributeValue::S16(0),
            AttrValueType::U32 => AttributeValue::U32(0),
            AttrValueType::S32 | AttrValueType::Enum => AttributeValue::S32(0),
            AttrValueType::U64 => AttributeValue::U64(0),
            AttrValueType::S64 => AttributeValue::S64(0),
            AttrValueType::Mac => AttributeValue::Mac(MacAddress::ZERO),
            AttrValueType::IpAddress => {
                AttributeValue::IpAddress(IpAddress::V4(sonic_types::Ipv4Address::UNSPECIFIED))
            }
            AttrValueType::IpPrefix => {
                let any = IpAddress::V4(sonic_types::Ipv4Address::UNSPECIFIED);
                AttributeValue::IpPrefix(IpPrefix::with_mask(any, any))
            }
            AttrValueType::Oid => AttributeValue::Oid(NULL_OBJECT_ID),
            AttrValueType::OidList => AttributeValue::OidList(SaiList::with_capacity(capacity)),
            AttrValueType::U8List => AttributeValue::U8List(SaiList::with_capacity(capacity)),
            AttrValueType::U16RangeList => {
                AttributeValue::U16RangeList(SaiList::with_capacity(capacity))
            }
            AttrValueType::IpPrefixList => {
                AttributeValue::IpPrefixList(SaiList::with_capacity(capacity))
            }
        }
    }
}

impl fmt::Display for AttrValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A tagged attribute value.
///
/// Serialized externally tagged by kind, e.g. `{"u32": 10}` or
/// `{"u8_list": {"count": 2, "list": [6, 17]}}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeValue {
    Bool(bool),
    U8(u8),
    S8(i8),
    U16(u16),
    S16(i16),
    U32(u32),
    S32(i32),
    U64(u64),
    S64(i64),
    Mac(MacAddress),
    IpAddress(IpAddress),
    IpPrefix(IpPrefix),
    Oid(RawSaiObjectId),
    OidList(SaiList<RawSaiObjectId>),
    U8List(SaiList<u8>),
    U16RangeList(SaiList<U16Range>),
    IpPrefixList(SaiList<IpPrefix>),
}

impl AttributeValue {
    /// The value kind this tag carries. Enums report `S32`.
    pub fn value_type(&self) -> AttrValueType {
        match self {
            AttributeValue::Bool(_) => AttrValueType::Bool,
            AttributeValue::U8(_) => AttrValueType::U8,
            AttributeValue::S8(_) => AttrValueType::S8,
            AttributeValue::U16(_) => AttrValueType::U16,
            AttributeValue::S16(_) => AttrValueType::S16,
            AttributeValue::U32(_) => AttrValueType::U32,
            AttributeValue::S32(_) => AttrValueType::S32,
            AttributeValue::U64(_) => AttrValueType::U64,
            AttributeValue::S64(_) => AttrValueType::S64,
            AttributeValue::Mac(_) => AttrValueType::Mac,
            AttributeValue::IpAddress(_) => AttrValueType::IpAddress,
            AttributeValue::IpPrefix(_) => AttrValueType::IpPrefix,
            AttributeValue::Oid(_) => AttrValueType::Oid,
            AttributeValue::OidList(_) => AttrValueType::OidList,
            AttributeValue::U8List(_) => AttrValueType::U8List,
            AttributeValue::U16RangeList(_) => AttrValueType::U16RangeList,
            AttributeValue::IpPrefixList(_) => AttrValueType::IpPrefixList,
        }
    }

    /// Integer view of scalar numeric values, for range checks.
    pub fn as_integer(&self) -> Option<i128> {
        match *self {
            AttributeValue::U8(v) => Some(v.into()),
            AttributeValue::S8(v) => Some(v.into()),
            AttributeValue::U16(v) => Some(v.into()),
            AttributeValue::S16(v) => Some(v.into()),
            AttributeValue::U32(v) => Some(v.into()),
            AttributeValue::S32(v) => Some(v.into()),
            AttributeValue::U64(v) => Some(v.into()),
            AttributeValue::S64(v) => Some(v.into()),
            _ => None,
        }
    }

    /// Declared count and element count of a list value.
    pub fn list_counts(&self) -> Option<(u32, usize)> {
        match self {
            AttributeValue::OidList(l) => Some((l.count, l.len())),
            AttributeValue::U8List(l) => Some((l.count, l.len())),
            AttributeValue::U16RangeList(l) => Some((l.count, l.len())),
            AttributeValue::IpPrefixList(l) => Some((l.count, l.len())),
            _ => None,
        }
    }

    /// OIDs this value points at, null included.
    pub fn object_ids(&self) -> &[RawSaiObjectId] {
        match self {
            AttributeValue::Oid(oid) => std::slice::from_ref(oid),
            AttributeValue::OidList(l) => &l.list,
            _ => &[],
        }
    }

    /// Copies `source` into this receive buffer.
    ///
    /// Scalars are overwritten. Lists honour the buffer capacity (see
    /// [`SaiList::fill_from`]). Returns `Some(false)` on overflow and `None`
    /// when the kinds differ.
    pub fn fill_from(&mut self, source: &AttributeValue) -> Option<bool> {
        match (self, source) {
            (AttributeValue::OidList(dst), AttributeValue::OidList(src)) => {
                Some(dst.fill_from(&src.list))
            }
            (AttributeValue::U8List(dst), AttributeValue::U8List(src)) => {
                Some(dst.fill_from(&src.list))
            }
            (AttributeValue::U16RangeList(dst), AttributeValue::U16RangeList(src)) => {
                Some(dst.fill_from(&src.list))
            }
            (AttributeValue::IpPrefixList(dst), AttributeValue::IpPrefixList(src)) => {
                Some(dst.fill_from(&src.list))
            }
            (dst, src) if dst.value_type() == src.value_type() => {
                *dst = src.clone();
                Some(true)
            }
            _ => None,
        }
    }
}

/// One `(id, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub id: SaiAttrId,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn new(id: SaiAttrId, value: AttributeValue) -> Self {
        Self { id, value }
    }
}
