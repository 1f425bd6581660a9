//! Quad operation validator.
//!
//! [`Meta`] sits between callers and a [`SaiInterface`] driver. Every
//! create, remove, set and get is checked against the schema and the
//! object reference graph before the driver sees it, and the graph is only
//! updated once the driver has accepted the change.
//!
//! Mutations hold the graph's write lock for the whole call, driver call
//! included. Gets share the read lock.

mod bulk;

pub use bulk::{BulkCreateOutcome, BulkOutcome};

use crate::constraint;
use crate::error::{MetaError, MetaResult};
use crate::graph::ObjectReferenceGraph;
use sonic_sai::api::SaiInterface;
use sonic_sai::{
    Attribute, AttributeValue, EntryKey, ObjectKey, ObjectMetaKey, RawSaiObjectId, SaiAttrId,
    SaiObjectType, SaiSchema, SaiStatus,
};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, warn};

/// A list attribute whose value did not fit the caller's buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrOverflow {
    pub attr_id: SaiAttrId,
    pub name: &'static str,
    pub capacity: u32,
    pub required: u32,
}

impl AttrOverflow {
    pub fn to_error(&self) -> MetaError {
        MetaError::BufferOverflow {
            attr: self.name,
            capacity: self.capacity,
            required: self.required,
        }
    }
}

/// Result of a successful get. Every attribute not listed in `overflows`
/// was populated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetReport {
    pub overflows: Vec<AttrOverflow>,
}

impl GetReport {
    pub fn is_complete(&self) -> bool {
        self.overflows.is_empty()
    }

    pub fn status(&self) -> SaiStatus {
        if self.is_complete() {
            SaiStatus::Success
        } else {
            SaiStatus::BufferOverflow
        }
    }
}

/// Validation and lifecycle layer in front of a switch driver.
pub struct Meta {
    schema: &'static SaiSchema,
    driver: Arc<dyn SaiInterface>,
    graph: RwLock<ObjectReferenceGraph>,
}

impl fmt::Debug for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Meta")
            .field("objects", &self.object_count())
            .finish_non_exhaustive()
    }
}

impl Meta {
    /// Creates a `Meta` over the built-in DASH schema.
    pub fn new(driver: Arc<dyn SaiInterface>) -> Self {
        Self::with_schema(driver, SaiSchema::dash())
    }

    pub fn with_schema(driver: Arc<dyn SaiInterface>, schema: &'static SaiSchema) -> Self {
        Self {
            schema,
            driver,
            graph: RwLock::new(ObjectReferenceGraph::new()),
        }
    }

    pub fn schema(&self) -> &'static SaiSchema {
        self.schema
    }

    /// Creates an OID-addressed object under `switch_id` and returns its id.
    ///
    /// A switch is created with `switch_id` ignored; it owns itself.
    pub fn create(
        &self,
        object_type: SaiObjectType,
        switch_id: RawSaiObjectId,
        attrs: &[Attribute],
    ) -> MetaResult<RawSaiObjectId> {
        let mut graph = self.write()?;
        self.validate_oid_create(&graph, object_type, switch_id, attrs)
            .map_err(|err| rejected("create", &object_type, err))?;

        let oid = self
            .driver
            .create(object_type, switch_id, attrs)
            .map_err(|status| driver_failed("create", &object_type, status))?;

        self.commit_oid_create(&mut graph, object_type, switch_id, oid, attrs)?;
        debug!(%object_type, oid, "created");
        Ok(oid)
    }

    /// Creates an entry-addressed object.
    ///
    /// The entry is registered before the driver call and rolled back if
    /// the driver refuses it.
    pub fn create_entry(&self, entry: &EntryKey, attrs: &[Attribute]) -> MetaResult<()> {
        let mut graph = self.write()?;
        self.reserve_entry(&mut graph, entry, attrs)
            .map_err(|err| rejected("create", entry, err))?;

        if let Err(status) = self.driver.create_entry(entry, attrs) {
            Self::release_entry(&mut graph, entry);
            return Err(driver_failed("create", entry, status));
        }
        debug!(%entry, "created");
        Ok(())
    }

    pub fn remove(&self, key: &ObjectMetaKey) -> MetaResult<()> {
        let mut graph = self.write()?;
        graph
            .check_removable(key.object_type, &key.key)
            .map_err(|err| rejected("remove", key, err))?;

        self.driver
            .remove(key)
            .map_err(|status| driver_failed("remove", key, status))?;

        graph.remove(&key.key)?;
        debug!(%key, "removed");
        Ok(())
    }

    pub fn set(&self, key: &ObjectMetaKey, attr: &Attribute) -> MetaResult<()> {
        let mut graph = self.write()?;
        self.validate_set(&graph, key, attr)
            .map_err(|err| rejected("set", key, err))?;

        self.driver
            .set(key, attr)
            .map_err(|status| driver_failed("set", key, status))?;

        graph.apply_set(&key.key, attr)?;
        debug!(%key, attr = attr.id, "set");
        Ok(())
    }

    /// Reads attributes into caller-provided buffers.
    ///
    /// List buffers carry their capacity in `count`. A list that does not
    /// fit is reported in the returned [`GetReport`] with the required
    /// length written back into `count`; the other attributes are still
    /// populated and the call succeeds.
    pub fn get(&self, key: &ObjectMetaKey, attrs: &mut [Attribute]) -> MetaResult<GetReport> {
        let graph = self.read()?;
        self.validate_get(&graph, key, attrs)
            .map_err(|err| rejected("get", key, err))?;

        let capacities = list_capacities(attrs);
        let overflowed = match self.driver.get(key, attrs) {
            Ok(()) => false,
            Err(SaiStatus::BufferOverflow) => true,
            Err(status) => return Err(driver_failed("get", key, status)),
        };

        self.check_returned(key.object_type, attrs)
            .map_err(|err| driver_inconsistent("get", key, err))?;

        let report = GetReport {
            overflows: self.overflows(key.object_type, attrs, &capacities),
        };
        if overflowed && report.is_complete() {
            error!(%key, "driver reported buffer overflow without an oversized list");
            return Err(MetaError::DriverFailure(SaiStatus::BufferOverflow));
        }
        if !report.is_complete() {
            debug!(%key, overflows = report.overflows.len(), "get overflowed");
        }
        Ok(report)
    }

    /// Number of live objects.
    pub fn object_count(&self) -> usize {
        self.read_unchecked().len()
    }

    /// True when `key` names a live object of `key.object_type`.
    pub fn exists(&self, key: &ObjectMetaKey) -> bool {
        self.read_unchecked()
            .lookup(key.object_type, &key.key)
            .is_ok()
    }

    /// Inbound reference count of an OID-addressed object.
    pub fn reference_count(&self, oid: RawSaiObjectId) -> Option<u32> {
        self.read_unchecked().ref_count(&ObjectKey::Oid(oid))
    }

    pub fn object_type_of(&self, oid: RawSaiObjectId) -> MetaResult<SaiObjectType> {
        self.read_unchecked().type_of(&ObjectKey::Oid(oid))
    }

    fn write(&self) -> MetaResult<RwLockWriteGuard<'_, ObjectReferenceGraph>> {
        self.graph.write().map_err(|_| MetaError::LockPoisoned)
    }

    fn read(&self) -> MetaResult<RwLockReadGuard<'_, ObjectReferenceGraph>> {
        self.graph.read().map_err(|_| MetaError::LockPoisoned)
    }

    fn read_unchecked(&self) -> RwLockReadGuard<'_, ObjectReferenceGraph> {
        self.graph.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn validate_oid_create(
        &self,
        graph: &ObjectReferenceGraph,
        object_type: SaiObjectType,
        switch_id: RawSaiObjectId,
        attrs: &[Attribute],
    ) -> MetaResult<()> {
        let info = constraint::object_info(self.schema, object_type)?;
        if !info.is_object_id {
            return Err(MetaError::InvalidObjectType {
                object_type,
                reason: "object type is addressed by entry key",
            });
        }
        constraint::check_create(self.schema, object_type, attrs)?;
        graph.check_oid_create(self.schema, object_type, switch_id, attrs)
    }

    /// Registers an object the driver has just created.
    ///
    /// A driver that hands back an id the graph already tracks is not asked
    /// to remove it: that id names the tracked object on the driver side
    /// too. The new driver object is left in place and the caller gets
    /// `AlreadyExists`.
    fn commit_oid_create(
        &self,
        graph: &mut ObjectReferenceGraph,
        object_type: SaiObjectType,
        switch_id: RawSaiObjectId,
        oid: RawSaiObjectId,
        attrs: &[Attribute],
    ) -> MetaResult<()> {
        let owner = if object_type == SaiObjectType::Switch {
            oid
        } else {
            switch_id
        };
        graph
            .insert(ObjectKey::Oid(oid), object_type, owner, attrs, Vec::new())
            .map_err(|err| {
                error!(%object_type, oid, error = %err, "driver returned an object id already in use");
                err
            })
    }

    fn validate_entry_create(
        &self,
        graph: &ObjectReferenceGraph,
        entry: &EntryKey,
        attrs: &[Attribute],
    ) -> MetaResult<Vec<RawSaiObjectId>> {
        if graph.exists(&ObjectKey::Entry(entry.clone())) {
            return Err(MetaError::AlreadyExists(entry.to_string()));
        }
        constraint::check_entry_key(self.schema, entry)?;
        constraint::check_create(self.schema, entry.object_type(), attrs)?;
        graph.check_entry_create(self.schema, entry, attrs)
    }

    fn reserve_entry(
        &self,
        graph: &mut ObjectReferenceGraph,
        entry: &EntryKey,
        attrs: &[Attribute],
    ) -> MetaResult<()> {
        let references = self.validate_entry_create(graph, entry, attrs)?;
        graph.insert(
            ObjectKey::Entry(entry.clone()),
            entry.object_type(),
            entry.switch_id(),
            attrs,
            references,
        )
    }

    fn release_entry(graph: &mut ObjectReferenceGraph, entry: &EntryKey) {
        if let Err(err) = graph.remove(&ObjectKey::Entry(entry.clone())) {
            error!(%entry, error = %err, "failed to roll back entry reservation");
        }
    }

    fn validate_set(
        &self,
        graph: &ObjectReferenceGraph,
        key: &ObjectMetaKey,
        attr: &Attribute,
    ) -> MetaResult<()> {
        graph.lookup(key.object_type, &key.key)?;
        constraint::check_set(self.schema, key.object_type, attr)?;
        graph.check_set(self.schema, key.object_type, &key.key, attr)
    }

    fn validate_get(
        &self,
        graph: &ObjectReferenceGraph,
        key: &ObjectMetaKey,
        attrs: &[Attribute],
    ) -> MetaResult<()> {
        graph.lookup(key.object_type, &key.key)?;
        constraint::check_get(self.schema, key.object_type, attrs)
    }

    /// Checks values the driver wrote back. A value of the wrong kind is a
    /// driver fault; an enum outside its domain is only logged.
    fn check_returned(&self, object_type: SaiObjectType, attrs: &[Attribute]) -> MetaResult<()> {
        for attr in attrs {
            let Some(md) = self.schema.attr(object_type, attr.id) else {
                continue;
            };
            if !md.value_type.accepts(&attr.value) {
                return Err(MetaError::TypeMismatch {
                    attr: md.name,
                    expected: md.value_type,
                    actual: attr.value.value_type(),
                });
            }
            if let (Some(domain), AttributeValue::S32(v)) = (md.enum_metadata, &attr.value) {
                if !domain.contains(*v) {
                    warn!(
                        attr = md.name,
                        value = *v,
                        domain = domain.name,
                        "driver returned value outside enum domain"
                    );
                }
            }
        }
        Ok(())
    }

    fn overflows(
        &self,
        object_type: SaiObjectType,
        attrs: &[Attribute],
        capacities: &[Option<u32>],
    ) -> Vec<AttrOverflow> {
        attrs
            .iter()
            .zip(capacities)
            .filter_map(|(attr, capacity)| {
                let capacity = (*capacity)?;
                let (required, _) = attr.value.list_counts()?;
                (required > capacity).then(|| AttrOverflow {
                    attr_id: attr.id,
                    name: self
                        .schema
                        .attr(object_type, attr.id)
                        .map_or("unknown", |md| md.name),
                    capacity,
                    required,
                })
            })
            .collect()
    }
}

fn list_capacities(attrs: &[Attribute]) -> Vec<Option<u32>> {
    attrs
        .iter()
        .map(|attr| attr.value.list_counts().map(|(count, _)| count))
        .collect()
}

fn rejected(op: &'static str, key: &dyn fmt::Display, err: MetaError) -> MetaError {
    warn!(op, key = %key, status = %err.status(), error = %err, "rejected");
    err
}

fn driver_failed(op: &'static str, key: &dyn fmt::Display, status: SaiStatus) -> MetaError {
    warn!(op, key = %key, %status, "driver failed");
    MetaError::DriverFailure(status)
}

fn driver_inconsistent(op: &'static str, key: &dyn fmt::Display, err: MetaError) -> MetaError {
    error!(op, key = %key, error = %err, "driver returned an inconsistent value");
    MetaError::DriverFailure(SaiStatus::Failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FaultyDriver, SW_MAC};
    use pretty_assertions::assert_eq;
    use sonic_sai::metadata::dash::{dash_acl_group, dash_acl_rule, eni, switch, vip_entry, vnet};
    use sonic_sai::{SaiList, SwitchOid, VipEntry, NULL_OBJECT_ID};

    fn setup() -> (Arc<FaultyDriver>, Meta, RawSaiObjectId) {
        let driver = Arc::new(FaultyDriver::new());
        let meta = Meta::new(driver.clone());
        let sw = meta
            .create(
                SaiObjectType::Switch,
                NULL_OBJECT_ID,
                &[
                    Attribute::new(switch::INIT_SWITCH, AttributeValue::Bool(true)),
                    Attribute::new(switch::SRC_MAC_ADDRESS, AttributeValue::Mac(SW_MAC)),
                ],
            )
            .unwrap();
        (driver, meta, sw)
    }

    fn vni(v: u32) -> Attribute {
        Attribute::new(vnet::VNI, AttributeValue::U32(v))
    }

    fn vip(sw: RawSaiObjectId) -> EntryKey {
        EntryKey::from(VipEntry {
            switch_id: SwitchOid::from_raw(sw).unwrap(),
            vip: "192.168.0.1".parse().unwrap(),
        })
    }

    fn accept() -> Attribute {
        Attribute::new(vip_entry::ACTION, AttributeValue::S32(vip_entry::ACTION_ACCEPT))
    }

    #[test]
    fn test_invalid_create_never_reaches_driver() {
        let (driver, meta, sw) = setup();
        let calls = driver.calls();

        let err = meta
            .create(SaiObjectType::Vnet, sw, &[vni(0x100_0000)])
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidParameter);
        assert_eq!(driver.calls(), calls);
        assert_eq!(meta.object_count(), 1);
    }

    #[test]
    fn test_reused_oid_keeps_existing_record() {
        let (driver, meta, sw) = setup();
        let vnet_id = meta.create(SaiObjectType::Vnet, sw, &[vni(10)]).unwrap();
        meta.create(
            SaiObjectType::Eni,
            sw,
            &[Attribute::new(eni::VNET_ID, AttributeValue::Oid(vnet_id))],
        )
        .unwrap();

        driver.reuse_oid_on_next_create(vnet_id);
        let calls = driver.calls();
        let err = meta.create(SaiObjectType::Vnet, sw, &[vni(11)]).unwrap_err();
        assert_eq!(err.status(), SaiStatus::ItemAlreadyExists);
        // no remove was sent for the reused id
        assert_eq!(driver.calls(), calls + 1);
        assert_eq!(meta.object_count(), 3);
        assert_eq!(meta.reference_count(vnet_id), Some(1));
        assert_eq!(meta.object_type_of(vnet_id).unwrap(), SaiObjectType::Vnet);
    }

    #[test]
    fn test_create_requires_switch() {
        let (_, meta, _) = setup();
        let err = meta
            .create(SaiObjectType::Vnet, 0x1_0000_0000_0999, &[vni(1)])
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidObjectId);
    }

    #[test]
    fn test_create_entry_type_by_oid_is_rejected() {
        let (_, meta, sw) = setup();
        let err = meta
            .create(SaiObjectType::VipEntry, sw, &[accept()])
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidObjectType);
    }

    #[test]
    fn test_driver_failure_is_passed_through() {
        let (driver, meta, sw) = setup();
        driver.fail_object_type(SaiObjectType::Vnet, SaiStatus::TableFull);
        let err = meta.create(SaiObjectType::Vnet, sw, &[vni(1)]).unwrap_err();
        assert_eq!(err, MetaError::DriverFailure(SaiStatus::TableFull));
        assert_eq!(meta.object_count(), 1);
    }

    #[test]
    fn test_entry_rollback_on_driver_failure() {
        let (driver, meta, sw) = setup();
        let entry = vip(sw);
        driver.fail_key(ObjectMetaKey::entry(entry.clone()), SaiStatus::Failure);

        let err = meta.create_entry(&entry, &[accept()]).unwrap_err();
        assert_eq!(err.status(), SaiStatus::Failure);
        assert!(!meta.exists(&ObjectMetaKey::entry(entry.clone())));

        driver.clear_faults();
        meta.create_entry(&entry, &[accept()]).unwrap();
        assert!(meta.exists(&ObjectMetaKey::entry(entry.clone())));

        let err = meta.create_entry(&entry, &[accept()]).unwrap_err();
        assert_eq!(err.status(), SaiStatus::ItemAlreadyExists);
    }

    #[test]
    fn test_remove_preflight_keeps_driver_untouched() {
        let (driver, meta, sw) = setup();
        let vnet_id = meta.create(SaiObjectType::Vnet, sw, &[vni(10)]).unwrap();
        meta.create(
            SaiObjectType::Eni,
            sw,
            &[Attribute::new(eni::VNET_ID, AttributeValue::Oid(vnet_id))],
        )
        .unwrap();

        let calls = driver.calls();
        let key = ObjectMetaKey::oid(SaiObjectType::Vnet, vnet_id);
        let err = meta.remove(&key).unwrap_err();
        assert_eq!(err.status(), SaiStatus::ObjectInUse);
        assert_eq!(driver.calls(), calls);
        assert_eq!(meta.reference_count(vnet_id), Some(1));
    }

    #[test]
    fn test_remove_driver_failure_keeps_record() {
        let (driver, meta, sw) = setup();
        let vnet_id = meta.create(SaiObjectType::Vnet, sw, &[vni(10)]).unwrap();
        let key = ObjectMetaKey::oid(SaiObjectType::Vnet, vnet_id);
        driver.fail_key(key.clone(), SaiStatus::Failure);

        assert_eq!(
            meta.remove(&key).unwrap_err(),
            MetaError::DriverFailure(SaiStatus::Failure)
        );
        assert!(meta.exists(&key));
    }

    #[test]
    fn test_remove_with_wrong_type() {
        let (_, meta, sw) = setup();
        let vnet_id = meta.create(SaiObjectType::Vnet, sw, &[vni(10)]).unwrap();
        let err = meta
            .remove(&ObjectMetaKey::oid(SaiObjectType::Eni, vnet_id))
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidObjectType);
        assert_eq!(meta.object_type_of(vnet_id), Ok(SaiObjectType::Vnet));
    }

    #[test]
    fn test_set_and_get() {
        let (_, meta, sw) = setup();
        let vnet_id = meta.create(SaiObjectType::Vnet, sw, &[vni(10)]).unwrap();
        let key = ObjectMetaKey::oid(SaiObjectType::Vnet, vnet_id);

        meta.set(&key, &vni(20)).unwrap();
        let mut attrs = [Attribute::new(vnet::VNI, AttributeValue::U32(0))];
        let report = meta.get(&key, &mut attrs).unwrap();
        assert!(report.is_complete());
        assert_eq!(attrs[0].value, AttributeValue::U32(20));
    }

    #[test]
    fn test_set_create_only_rejected() {
        let (_, meta, sw) = setup();
        let err = meta
            .set(
                &ObjectMetaKey::oid(SaiObjectType::Switch, sw),
                &Attribute::new(switch::INIT_SWITCH, AttributeValue::Bool(false)),
            )
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidParameter);
    }

    #[test]
    fn test_set_missing_object() {
        let (_, meta, _) = setup();
        let err = meta
            .set(&ObjectMetaKey::oid(SaiObjectType::Vnet, 0x3_0000_0000_0042), &vni(1))
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::ItemNotFound);
    }

    #[test]
    fn test_get_overflow_is_per_attribute() {
        let (_, meta, sw) = setup();
        let group = meta
            .create(
                SaiObjectType::DashAclGroup,
                sw,
                &[Attribute::new(
                    dash_acl_group::IP_ADDR_FAMILY,
                    AttributeValue::S32(dash_acl_group::IP_ADDR_FAMILY_IPV4),
                )],
            )
            .unwrap();
        let rule = meta
            .create(
                SaiObjectType::DashAclRule,
                sw,
                &[
                    Attribute::new(dash_acl_rule::DASH_ACL_GROUP_ID, AttributeValue::Oid(group)),
                    Attribute::new(
                        dash_acl_rule::PROTOCOL,
                        AttributeValue::U8List(SaiList::from(vec![6, 17, 1])),
                    ),
                    Attribute::new(dash_acl_rule::PRIORITY, AttributeValue::U32(7)),
                ],
            )
            .unwrap();

        let key = ObjectMetaKey::oid(SaiObjectType::DashAclRule, rule);
        let mut attrs = [
            Attribute::new(dash_acl_rule::PROTOCOL, AttributeValue::U8List(SaiList::with_capacity(2))),
            Attribute::new(dash_acl_rule::PRIORITY, AttributeValue::U32(0)),
        ];
        let report = meta.get(&key, &mut attrs).unwrap();
        assert_eq!(
            report.overflows,
            vec![AttrOverflow {
                attr_id: dash_acl_rule::PROTOCOL,
                name: "SAI_DASH_ACL_RULE_ATTR_PROTOCOL",
                capacity: 2,
                required: 3,
            }]
        );
        assert_eq!(report.status(), SaiStatus::BufferOverflow);
        assert_eq!(attrs[1].value, AttributeValue::U32(7));
        assert_eq!(meta.reference_count(group), Some(1));
    }

    #[test]
    fn test_get_wrong_kind_from_driver() {
        let (driver, meta, sw) = setup();
        let vnet_id = meta.create(SaiObjectType::Vnet, sw, &[vni(10)]).unwrap();
        driver.corrupt_gets(true);
        let key = ObjectMetaKey::oid(SaiObjectType::Vnet, vnet_id);
        let mut attrs = [Attribute::new(vnet::VNI, AttributeValue::U32(0))];
        assert_eq!(
            meta.get(&key, &mut attrs).unwrap_err(),
            MetaError::DriverFailure(SaiStatus::Failure)
        );
    }

    #[test]
    fn test_get_unreadable_or_unknown() {
        let (_, meta, sw) = setup();
        let key = ObjectMetaKey::oid(SaiObjectType::Switch, sw);
        let mut attrs = [Attribute::new(77, AttributeValue::U32(0))];
        assert_eq!(
            meta.get(&key, &mut attrs).unwrap_err().status(),
            SaiStatus::InvalidAttribute
        );
    }

    #[test]
    fn test_switch_removal_needs_empty_switch() {
        let (_, meta, sw) = setup();
        let entry = vip(sw);
        meta.create_entry(&entry, &[accept()]).unwrap();

        let switch_key = ObjectMetaKey::oid(SaiObjectType::Switch, sw);
        assert_eq!(
            meta.remove(&switch_key).unwrap_err().status(),
            SaiStatus::ObjectInUse
        );
        meta.remove(&ObjectMetaKey::entry(entry)).unwrap();
        meta.remove(&switch_key).unwrap();
        assert_eq!(meta.object_count(), 0);
    }
}
