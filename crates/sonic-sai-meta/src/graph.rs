//! Object reference graph.
//!
//! Tracks every live object, the switch it belongs to, its committed
//! attribute values and how many other objects point at it. Entries are
//! never created implicitly: a reference to an unknown object is an error,
//! not a new record.
//!
//! Checks (`check_*`) take `&self` and never mutate, so a caller can
//! validate a whole operation before anything is committed. Mutations
//! (`insert`, `apply_set`, `remove`) assume the matching check passed.

use crate::constraint;
use crate::error::{MetaError, MetaResult};
use sonic_sai::{
    Attribute, AttributeValue, EntryKey, ObjectKey, RawSaiObjectId, SaiAttrId, SaiObjectType,
    SaiSchema, NULL_OBJECT_ID,
};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, error};

/// Bookkeeping for one live object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    pub object_type: SaiObjectType,
    /// Owning switch. A switch owns itself.
    pub switch_id: RawSaiObjectId,
    attrs: BTreeMap<SaiAttrId, AttributeValue>,
    key_references: Vec<RawSaiObjectId>,
    ref_count: u32,
}

impl ObjectRecord {
    fn new(
        object_type: SaiObjectType,
        switch_id: RawSaiObjectId,
        attrs: &[Attribute],
        key_references: Vec<RawSaiObjectId>,
    ) -> Self {
        Self {
            object_type,
            switch_id,
            attrs: attrs
                .iter()
                .map(|attr| (attr.id, attr.value.clone()))
                .collect(),
            key_references,
            ref_count: 0,
        }
    }

    /// Committed value of an attribute, if it was ever supplied.
    pub fn attribute(&self, attr_id: SaiAttrId) -> Option<&AttributeValue> {
        self.attrs.get(&attr_id)
    }

    pub fn ref_count(&self) -> u32 {
        self.ref_count
    }

    /// Every outbound reference, key members first, with multiplicity.
    pub fn references(&self) -> impl Iterator<Item = RawSaiObjectId> + '_ {
        self.key_references
            .iter()
            .copied()
            .chain(self.attrs.values().flat_map(|v| v.object_ids().iter().copied()))
            .filter(|&oid| oid != NULL_OBJECT_ID)
    }

    fn increment_ref(&mut self) -> u32 {
        self.ref_count += 1;
        self.ref_count
    }

    fn decrement_ref(&mut self) -> Option<u32> {
        self.ref_count = self.ref_count.checked_sub(1)?;
        Some(self.ref_count)
    }
}

/// Every live object keyed by its OID or entry key.
#[derive(Debug, Default)]
pub struct ObjectReferenceGraph {
    records: HashMap<ObjectKey, ObjectRecord>,
}

impl ObjectReferenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn exists(&self, key: &ObjectKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn record(&self, key: &ObjectKey) -> Option<&ObjectRecord> {
        self.records.get(key)
    }

    pub fn type_of(&self, key: &ObjectKey) -> MetaResult<SaiObjectType> {
        self.records
            .get(key)
            .map(|record| record.object_type)
            .ok_or_else(|| MetaError::NotFound(key.to_string()))
    }

    pub fn ref_count(&self, key: &ObjectKey) -> Option<u32> {
        self.records.get(key).map(ObjectRecord::ref_count)
    }

    /// Number of objects owned by `switch_id`, not counting the switch.
    pub fn switch_children(&self, switch_id: RawSaiObjectId) -> usize {
        self.records
            .iter()
            .filter(|(key, record)| {
                record.switch_id == switch_id && key.as_oid() != Some(switch_id)
            })
            .count()
    }

    /// Looks `key` up and checks the caller addresses it with its real type.
    pub fn lookup(&self, object_type: SaiObjectType, key: &ObjectKey) -> MetaResult<&ObjectRecord> {
        let record = self
            .records
            .get(key)
            .ok_or_else(|| MetaError::NotFound(format!("{}:{}", object_type, key)))?;
        if record.object_type != object_type {
            return Err(MetaError::WrongObjectType {
                context: key.to_string(),
                oid: key.as_oid().unwrap_or(NULL_OBJECT_ID),
                actual: record.object_type,
                expected: vec![object_type],
            });
        }
        Ok(record)
    }

    /// Checks that `oid` names a live object of one of `allowed` types and,
    /// when `switch_id` is given, that it lives on that switch.
    pub fn check_target(
        &self,
        context: &str,
        oid: RawSaiObjectId,
        allowed: &[SaiObjectType],
        switch_id: Option<RawSaiObjectId>,
    ) -> MetaResult<()> {
        let record = self
            .records
            .get(&ObjectKey::Oid(oid))
            .ok_or_else(|| MetaError::InvalidObjectId {
                context: context.to_string(),
                oid,
                reason: "does not exist",
            })?;
        if !allowed.contains(&record.object_type) {
            return Err(MetaError::WrongObjectType {
                context: context.to_string(),
                oid,
                actual: record.object_type,
                expected: allowed.to_vec(),
            });
        }
        if switch_id.map_or(false, |sw| sw != record.switch_id) {
            return Err(MetaError::InvalidObjectId {
                context: context.to_string(),
                oid,
                reason: "belongs to another switch",
            });
        }
        Ok(())
    }

    pub fn check_switch(&self, context: &str, switch_id: RawSaiObjectId) -> MetaResult<()> {
        if switch_id == NULL_OBJECT_ID {
            return Err(MetaError::InvalidObjectId {
                context: context.to_string(),
                oid: switch_id,
                reason: "null switch id",
            });
        }
        self.check_target(context, switch_id, &[SaiObjectType::Switch], None)
    }

    /// Checks every non-null OID carried by `attrs`.
    pub fn check_attr_references(
        &self,
        schema: &SaiSchema,
        object_type: SaiObjectType,
        switch_id: Option<RawSaiObjectId>,
        attrs: &[Attribute],
    ) -> MetaResult<()> {
        for attr in attrs {
            let md = schema
                .attr(object_type, attr.id)
                .ok_or(MetaError::UnknownAttribute {
                    object_type,
                    attr_id: attr.id,
                })?;
            for &oid in attr.value.object_ids() {
                if oid != NULL_OBJECT_ID {
                    self.check_target(md.name, oid, md.allowed_object_types, switch_id)?;
                }
            }
        }
        Ok(())
    }

    /// Validates the OIDs embedded in an entry key and returns the ones
    /// that count as references.
    pub fn check_key_references(
        &self,
        schema: &SaiSchema,
        entry: &EntryKey,
    ) -> MetaResult<Vec<RawSaiObjectId>> {
        let info = constraint::check_entry_key(schema, entry)?;
        let switch_id = entry.switch_id();
        self.check_switch("switch_id", switch_id)?;

        let mut references = Vec::new();
        for (name, oid) in entry.oid_members() {
            let member = info.key_member(name).ok_or_else(|| MetaError::MalformedKey {
                key: entry.to_string(),
                member: name,
            })?;
            if oid == NULL_OBJECT_ID {
                return Err(MetaError::InvalidObjectId {
                    context: name.to_string(),
                    oid,
                    reason: "null key member",
                });
            }
            self.check_target(name, oid, member.allowed_object_types, Some(switch_id))?;
            references.push(oid);
        }
        Ok(references)
    }

    /// Full create-time reference check for an entry: not yet present,
    /// key members valid, attribute references valid.
    pub fn check_entry_create(
        &self,
        schema: &SaiSchema,
        entry: &EntryKey,
        attrs: &[Attribute],
    ) -> MetaResult<Vec<RawSaiObjectId>> {
        let key = ObjectKey::Entry(entry.clone());
        if self.exists(&key) {
            return Err(MetaError::AlreadyExists(entry.to_string()));
        }
        let references = self.check_key_references(schema, entry)?;
        self.check_attr_references(schema, entry.object_type(), Some(entry.switch_id()), attrs)?;
        Ok(references)
    }

    /// Create-time reference check for an OID object whose id is not yet
    /// known. A switch has no owning switch to check.
    pub fn check_oid_create(
        &self,
        schema: &SaiSchema,
        object_type: SaiObjectType,
        switch_id: RawSaiObjectId,
        attrs: &[Attribute],
    ) -> MetaResult<()> {
        if object_type == SaiObjectType::Switch {
            return self.check_attr_references(schema, object_type, None, attrs);
        }
        self.check_switch("switch_id", switch_id)?;
        self.check_attr_references(schema, object_type, Some(switch_id), attrs)
    }

    /// Set-time reference check against the object's own switch.
    pub fn check_set(
        &self,
        schema: &SaiSchema,
        object_type: SaiObjectType,
        key: &ObjectKey,
        attr: &Attribute,
    ) -> MetaResult<()> {
        let record = self.lookup(object_type, key)?;
        if let Some(own) = key.as_oid() {
            if attr.value.object_ids().contains(&own) {
                return Err(MetaError::InvalidObjectId {
                    context: key.to_string(),
                    oid: own,
                    reason: "object cannot reference itself",
                });
            }
        }
        self.check_attr_references(
            schema,
            object_type,
            Some(record.switch_id),
            std::slice::from_ref(attr),
        )
    }

    /// Checks `key` can be released: it exists, nothing references it and,
    /// for a switch, nothing else lives on it.
    pub fn check_removable(&self, object_type: SaiObjectType, key: &ObjectKey) -> MetaResult<()> {
        let record = self.lookup(object_type, key)?;
        if record.ref_count > 0 {
            return Err(MetaError::ObjectInUse {
                key: key.to_string(),
                reason: format!("{} inbound reference(s)", record.ref_count),
            });
        }
        if let (SaiObjectType::Switch, Some(oid)) = (record.object_type, key.as_oid()) {
            let children = self.switch_children(oid);
            if children > 0 {
                return Err(MetaError::ObjectInUse {
                    key: key.to_string(),
                    reason: format!("{} object(s) remain on the switch", children),
                });
            }
        }
        Ok(())
    }

    /// Registers a validated object and acquires its references.
    pub fn insert(
        &mut self,
        key: ObjectKey,
        object_type: SaiObjectType,
        switch_id: RawSaiObjectId,
        attrs: &[Attribute],
        key_references: Vec<RawSaiObjectId>,
    ) -> MetaResult<()> {
        if self.records.contains_key(&key) {
            return Err(MetaError::AlreadyExists(key.to_string()));
        }
        let record = ObjectRecord::new(object_type, switch_id, attrs, key_references);
        let references: Vec<_> = record.references().collect();
        self.acquire(&references);
        debug!(%object_type, %key, references = references.len(), "graph: inserted");
        self.records.insert(key, record);
        Ok(())
    }

    /// Commits a validated set: new targets are acquired before the old
    /// ones are released.
    pub fn apply_set(&mut self, key: &ObjectKey, attr: &Attribute) -> MetaResult<()> {
        let record = self
            .records
            .get_mut(key)
            .ok_or_else(|| MetaError::NotFound(key.to_string()))?;
        let old: Vec<_> = record
            .attrs
            .insert(attr.id, attr.value.clone())
            .map(|v| v.object_ids().to_vec())
            .unwrap_or_default();
        let new = attr.value.object_ids().to_vec();

        self.acquire(&new);
        self.release(&old);
        debug!(%key, attr = attr.id, "graph: attribute updated");
        Ok(())
    }

    /// Erases a record and releases everything it referenced.
    pub fn remove(&mut self, key: &ObjectKey) -> MetaResult<ObjectRecord> {
        let record = self
            .records
            .remove(key)
            .ok_or_else(|| MetaError::NotFound(key.to_string()))?;
        let references: Vec<_> = record.references().collect();
        self.release(&references);
        debug!(object_type = %record.object_type, %key, "graph: removed");
        Ok(record)
    }

    fn acquire(&mut self, oids: &[RawSaiObjectId]) {
        for &oid in oids.iter().filter(|&&oid| oid != NULL_OBJECT_ID) {
            match self.records.get_mut(&ObjectKey::Oid(oid)) {
                Some(target) => {
                    target.increment_ref();
                }
                None => error!(oid, "graph: reference to unknown object"),
            }
        }
    }

    fn release(&mut self, oids: &[RawSaiObjectId]) {
        for &oid in oids.iter().filter(|&&oid| oid != NULL_OBJECT_ID) {
            let released = self
                .records
                .get_mut(&ObjectKey::Oid(oid))
                .and_then(ObjectRecord::decrement_ref);
            if released.is_none() {
                error!(oid, "graph: reference count underflow");
            }
        }
    }
}
