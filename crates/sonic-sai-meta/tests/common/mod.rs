//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use sonic_sai::api::{SaiInterface, VirtualSwitch};
use sonic_sai::metadata::dash::{eni, switch, vip_entry, vnet};
use sonic_sai::{
    Attribute, AttributeValue, EntryKey, ObjectMetaKey, RawSaiObjectId, SaiObjectType, SaiStatus,
    SwitchOid, VipEntry, NULL_OBJECT_ID,
};
use sonic_sai_meta::Meta;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Wraps a [`VirtualSwitch`], failing calls on selected keys and recording
/// the operations the driver actually saw.
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    inner: VirtualSwitch,
    failing: Mutex<HashSet<ObjectMetaKey>>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, key: ObjectMetaKey) {
        self.failing.lock().unwrap().insert(key);
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    /// Operations that reached the driver, as `"<op> <object type>"`.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    fn record(&self, op: &str, key: Option<&ObjectMetaKey>, ot: SaiObjectType) -> Result<(), SaiStatus> {
        self.seen.lock().unwrap().push(format!("{op} {ot}"));
        match key {
            Some(key) if self.failing.lock().unwrap().contains(key) => Err(SaiStatus::Failure),
            _ => Ok(()),
        }
    }
}

impl SaiInterface for ScriptedDriver {
    fn create(
        &self,
        object_type: SaiObjectType,
        switch_id: RawSaiObjectId,
        attrs: &[Attribute],
    ) -> Result<RawSaiObjectId, SaiStatus> {
        self.record("create", None, object_type)?;
        self.inner.create(object_type, switch_id, attrs)
    }

    fn create_entry(&self, entry: &EntryKey, attrs: &[Attribute]) -> Result<(), SaiStatus> {
        let key = ObjectMetaKey::entry(entry.clone());
        self.record("create", Some(&key), entry.object_type())?;
        self.inner.create_entry(entry, attrs)
    }

    fn remove(&self, key: &ObjectMetaKey) -> Result<(), SaiStatus> {
        self.record("remove", Some(key), key.object_type)?;
        self.inner.remove(key)
    }

    fn set(&self, key: &ObjectMetaKey, attr: &Attribute) -> Result<(), SaiStatus> {
        self.record("set", Some(key), key.object_type)?;
        self.inner.set(key, attr)
    }

    fn get(&self, key: &ObjectMetaKey, attrs: &mut [Attribute]) -> Result<(), SaiStatus> {
        self.record("get", Some(key), key.object_type)?;
        self.inner.get(key, attrs)
    }
}

pub fn meta_with_switch() -> (Arc<ScriptedDriver>, Meta, RawSaiObjectId) {
    let driver = Arc::new(ScriptedDriver::new());
    let meta = Meta::new(driver.clone());
    let sw = meta
        .create(
            SaiObjectType::Switch,
            NULL_OBJECT_ID,
            &[Attribute::new(switch::INIT_SWITCH, AttributeValue::Bool(true))],
        )
        .unwrap();
    (driver, meta, sw)
}

pub fn vni(value: u32) -> Attribute {
    Attribute::new(vnet::VNI, AttributeValue::U32(value))
}

pub fn vip(sw: RawSaiObjectId, addr: &str) -> EntryKey {
    EntryKey::from(VipEntry {
        switch_id: SwitchOid::from_raw(sw).unwrap(),
        vip: addr.parse().unwrap(),
    })
}

pub fn vip_accept() -> Attribute {
    Attribute::new(vip_entry::ACTION, AttributeValue::S32(vip_entry::ACTION_ACCEPT))
}

/// Creates a VNET and an ENI bound to it. Returns `(vnet, eni)`.
pub fn vnet_and_eni(meta: &Meta, sw: RawSaiObjectId, vni_value: u32) -> (RawSaiObjectId, RawSaiObjectId) {
    let vnet_id = meta.create(SaiObjectType::Vnet, sw, &[vni(vni_value)]).unwrap();
    let eni_id = meta
        .create(
            SaiObjectType::Eni,
            sw,
            &[
                Attribute::new(eni::VNET_ID, AttributeValue::Oid(vnet_id)),
                Attribute::new(eni::ADMIN_STATE, AttributeValue::Bool(true)),
            ],
        )
        .unwrap();
    (vnet_id, eni_id)
}

pub fn entry_keys(entries: &[EntryKey]) -> Vec<ObjectMetaKey> {
    entries.iter().cloned().map(ObjectMetaKey::entry).collect()
}
