//! Driver wrapper that injects failures, for rollback tests.

use sonic_sai::api::{SaiInterface, VirtualSwitch};
use sonic_sai::{
    Attribute, AttributeValue, EntryKey, ObjectMetaKey, RawSaiObjectId, SaiObjectType, SaiStatus,
};
use sonic_types::MacAddress;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub const SW_MAC: MacAddress = MacAddress::new([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);

#[derive(Debug, Default)]
struct Faults {
    by_type: HashMap<SaiObjectType, SaiStatus>,
    by_key: HashMap<ObjectMetaKey, SaiStatus>,
    next_create: Option<SaiStatus>,
    next_oid: Option<RawSaiObjectId>,
}

/// A [`VirtualSwitch`] that fails selected calls and counts quad calls.
#[derive(Debug, Default)]
pub struct FaultyDriver {
    inner: VirtualSwitch,
    faults: Mutex<Faults>,
    calls: AtomicUsize,
    corrupt_gets: AtomicBool,
    spurious_overflow: AtomicBool,
}

impl FaultyDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_object_type(&self, object_type: SaiObjectType, status: SaiStatus) {
        self.faults.lock().unwrap().by_type.insert(object_type, status);
    }

    pub fn fail_key(&self, key: ObjectMetaKey, status: SaiStatus) {
        self.faults.lock().unwrap().by_key.insert(key, status);
    }

    pub fn fail_next_create(&self, status: SaiStatus) {
        self.faults.lock().unwrap().next_create = Some(status);
    }

    /// Creates the next object but hands back `oid` instead of its id.
    pub fn reuse_oid_on_next_create(&self, oid: RawSaiObjectId) {
        self.faults.lock().unwrap().next_oid = Some(oid);
    }

    /// Makes every successful get report `BufferOverflow`.
    pub fn spurious_overflow(&self, on: bool) {
        self.spurious_overflow.store(on, Ordering::SeqCst);
    }

    pub fn clear_faults(&self) {
        *self.faults.lock().unwrap() = Faults::default();
    }

    /// Makes every get return booleans regardless of the stored kind.
    pub fn corrupt_gets(&self, on: bool) {
        self.corrupt_gets.store(on, Ordering::SeqCst);
    }

    fn check(
        &self,
        key: Option<&ObjectMetaKey>,
        object_type: SaiObjectType,
    ) -> Result<(), SaiStatus> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let faults = self.faults.lock().unwrap();
        if let Some(status) = key.and_then(|k| faults.by_key.get(k)) {
            return Err(*status);
        }
        match faults.by_type.get(&object_type) {
            Some(status) => Err(*status),
            None => Ok(()),
        }
    }
}

impl SaiInterface for FaultyDriver {
    fn create(
        &self,
        object_type: SaiObjectType,
        switch_id: RawSaiObjectId,
        attrs: &[Attribute],
    ) -> Result<RawSaiObjectId, SaiStatus> {
        self.check(None, object_type)?;
        if let Some(status) = self.faults.lock().unwrap().next_create.take() {
            return Err(status);
        }
        let oid = self.inner.create(object_type, switch_id, attrs)?;
        Ok(self.faults.lock().unwrap().next_oid.take().unwrap_or(oid))
    }

    fn create_entry(&self, entry: &EntryKey, attrs: &[Attribute]) -> Result<(), SaiStatus> {
        self.check(Some(&ObjectMetaKey::entry(entry.clone())), entry.object_type())?;
        self.inner.create_entry(entry, attrs)
    }

    fn remove(&self, key: &ObjectMetaKey) -> Result<(), SaiStatus> {
        self.check(Some(key), key.object_type)?;
        self.inner.remove(key)
    }

    fn set(&self, key: &ObjectMetaKey, attr: &Attribute) -> Result<(), SaiStatus> {
        self.check(Some(key), key.object_type)?;
        self.inner.set(key, attr)
    }

    fn get(&self, key: &ObjectMetaKey, attrs: &mut [Attribute]) -> Result<(), SaiStatus> {
        self.check(Some(key), key.object_type)?;
        let result = self.inner.get(key, attrs);
        if self.corrupt_gets.load(Ordering::SeqCst) {
            for attr in attrs.iter_mut() {
                attr.value = AttributeValue::Bool(true);
            }
        }
        match result {
            Ok(()) if self.spurious_overflow.load(Ordering::SeqCst) => {
                Err(SaiStatus::BufferOverflow)
            }
            other => other,
        }
    }
}
