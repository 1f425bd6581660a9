//! In-memory switch driver.
//!
//! Stores attribute values per object and answers gets from them. It does no
//! schema validation of its own. OIDs carry the object type in bits 48..56
//! and a per-driver counter below.

use super::SaiInterface;
use crate::attr::{Attribute, AttributeValue, SaiAttrId};
use crate::entry::{EntryKey, ObjectMetaKey};
use crate::error::SaiStatus;
use crate::types::{RawSaiObjectId, SaiObjectType};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

const OBJECT_TYPE_SHIFT: u32 = 48;
const INDEX_MASK: u64 = (1 << OBJECT_TYPE_SHIFT) - 1;

#[derive(Debug, Default)]
struct VsState {
    next_index: u64,
    objects: HashMap<ObjectMetaKey, BTreeMap<SaiAttrId, AttributeValue>>,
}

/// A virtual switch that keeps everything in memory.
#[derive(Debug, Default)]
pub struct VirtualSwitch {
    state: Mutex<VsState>,
}

impl VirtualSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the object type embedded in an OID allocated by this driver.
    pub fn object_type_of(oid: RawSaiObjectId) -> Option<SaiObjectType> {
        let raw = u32::try_from(oid >> OBJECT_TYPE_SHIFT).ok()?;
        SaiObjectType::from_raw(raw)
    }

    pub fn contains(&self, key: &ObjectMetaKey) -> bool {
        self.lock()
            .map(|state| state.objects.contains_key(key))
            .unwrap_or(false)
    }

    pub fn object_count(&self) -> usize {
        self.lock().map(|state| state.objects.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, VsState>, SaiStatus> {
        self.state.lock().map_err(|_| {
            warn!("virtual switch state lock poisoned");
            SaiStatus::Failure
        })
    }

    fn store(attrs: &[Attribute]) -> BTreeMap<SaiAttrId, AttributeValue> {
        attrs
            .iter()
            .map(|attr| (attr.id, attr.value.clone()))
            .collect()
    }
}

impl SaiInterface for VirtualSwitch {
    fn create(
        &self,
        object_type: SaiObjectType,
        _switch_id: RawSaiObjectId,
        attrs: &[Attribute],
    ) -> Result<RawSaiObjectId, SaiStatus> {
        let mut state = self.lock()?;
        state.next_index += 1;
        if state.next_index > INDEX_MASK {
            return Err(SaiStatus::InsufficientResources);
        }
        let oid = (u64::from(object_type.as_raw()) << OBJECT_TYPE_SHIFT) | state.next_index;
        state
            .objects
            .insert(ObjectMetaKey::oid(object_type, oid), Self::store(attrs));
        debug!("vs: created {} 0x{:016x}", object_type, oid);
        Ok(oid)
    }

    fn create_entry(&self, entry: &EntryKey, attrs: &[Attribute]) -> Result<(), SaiStatus> {
        let mut state = self.lock()?;
        let key = ObjectMetaKey::entry(entry.clone());
        if state.objects.contains_key(&key) {
            return Err(SaiStatus::ItemAlreadyExists);
        }
        state.objects.insert(key, Self::store(attrs));
        debug!("vs: created {}", entry);
        Ok(())
    }

    fn remove(&self, key: &ObjectMetaKey) -> Result<(), SaiStatus> {
        let mut state = self.lock()?;
        match state.objects.remove(key) {
            Some(_) => {
                debug!("vs: removed {}", key);
                Ok(())
            }
            None => Err(SaiStatus::ItemNotFound),
        }
    }

    fn set(&self, key: &ObjectMetaKey, attr: &Attribute) -> Result<(), SaiStatus> {
        let mut state = self.lock()?;
        let attrs = state.objects.get_mut(key).ok_or(SaiStatus::ItemNotFound)?;
        attrs.insert(attr.id, attr.value.clone());
        Ok(())
    }

    fn get(&self, key: &ObjectMetaKey, attrs: &mut [Attribute]) -> Result<(), SaiStatus> {
        let state = self.lock()?;
        let stored = state.objects.get(key).ok_or(SaiStatus::ItemNotFound)?;

        let mut overflow = false;
        for attr in attrs.iter_mut() {
            let value = stored.get(&attr.id).ok_or(SaiStatus::NotImplemented)?;
            match attr.value.fill_from(value) {
                Some(true) => {}
                Some(false) => overflow = true,
                None => return Err(SaiStatus::InvalidParameter),
            }
        }

        if overflow {
            Err(SaiStatus::BufferOverflow)
        } else {
            Ok(())
        }
    }
}
