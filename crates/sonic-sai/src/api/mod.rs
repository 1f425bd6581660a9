//! Driver-facing SAI interface.
//!
//! [`SaiInterface`] is what the validation layer calls once an operation
//! has been accepted locally. Implementations only need the quad methods;
//! the bulk methods default to a fan-out that honours [`BulkOpErrorMode`].
//!
//! - [`virtual_switch`]: an in-memory implementation

pub mod virtual_switch;

pub use virtual_switch::VirtualSwitch;

use crate::attr::Attribute;
use crate::entry::{EntryKey, ObjectMetaKey};
use crate::error::SaiStatus;
use crate::types::{RawSaiObjectId, SaiObjectType};
use serde::{Deserialize, Serialize};

/// Bulk error policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkOpErrorMode {
    /// After the first failing item, the rest are not executed.
    #[default]
    StopOnError,
    /// Every item is attempted independently.
    ContinueOnError,
}

/// Per-item outcome of a bulk OID create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkCreateReply {
    pub object_ids: Vec<Option<RawSaiObjectId>>,
    pub statuses: Vec<SaiStatus>,
}

/// Overall status of a bulk call: success, or the first item failure.
pub fn bulk_status(statuses: &[SaiStatus]) -> SaiStatus {
    statuses
        .iter()
        .copied()
        .find(SaiStatus::is_error)
        .unwrap_or(SaiStatus::Success)
}

/// Runs `op` for items `0..count` under `mode`.
///
/// With [`BulkOpErrorMode::StopOnError`] the items after the first failure
/// are reported as `NotExecuted` and `op` is not called for them.
pub fn fan_out<F>(count: usize, mode: BulkOpErrorMode, mut op: F) -> Vec<SaiStatus>
where
    F: FnMut(usize) -> Result<(), SaiStatus>,
{
    let mut statuses = Vec::with_capacity(count);
    let mut stopped = false;

    for idx in 0..count {
        if stopped {
            statuses.push(SaiStatus::NotExecuted);
            continue;
        }
        let status = match op(idx) {
            Ok(()) => SaiStatus::Success,
            Err(status) => status,
        };
        if status.is_error() && mode == BulkOpErrorMode::StopOnError {
            stopped = true;
        }
        statuses.push(status);
    }

    statuses
}

/// Switch driver operations.
///
/// Quad methods return `Err(status)` for any non-success status. A get that
/// overflows a list buffer returns `Err(SaiStatus::BufferOverflow)` after
/// filling every attribute that fits and writing the required count into
/// the ones that do not.
pub trait SaiInterface: Send + Sync {
    /// Creates an OID-addressed object and returns its new OID.
    fn create(
        &self,
        object_type: SaiObjectType,
        switch_id: RawSaiObjectId,
        attrs: &[Attribute],
    ) -> Result<RawSaiObjectId, SaiStatus>;

    fn create_entry(&self, entry: &EntryKey, attrs: &[Attribute]) -> Result<(), SaiStatus>;

    fn remove(&self, key: &ObjectMetaKey) -> Result<(), SaiStatus>;

    fn set(&self, key: &ObjectMetaKey, attr: &Attribute) -> Result<(), SaiStatus>;

    fn get(&self, key: &ObjectMetaKey, attrs: &mut [Attribute]) -> Result<(), SaiStatus>;

    fn bulk_create(
        &self,
        object_type: SaiObjectType,
        switch_id: RawSaiObjectId,
        attrs: &[Vec<Attribute>],
        mode: BulkOpErrorMode,
    ) -> BulkCreateReply {
        let mut object_ids = vec![None; attrs.len()];
        let statuses = fan_out(attrs.len(), mode, |idx| {
            let oid = self.create(object_type, switch_id, &attrs[idx])?;
            object_ids[idx] = Some(oid);
            Ok(())
        });
        BulkCreateReply {
            object_ids,
            statuses,
        }
    }

    fn bulk_create_entries(
        &self,
        entries: &[EntryKey],
        attrs: &[Vec<Attribute>],
        mode: BulkOpErrorMode,
    ) -> Vec<SaiStatus> {
        fan_out(entries.len(), mode, |idx| {
            self.create_entry(&entries[idx], &attrs[idx])
        })
    }

    fn bulk_remove(&self, keys: &[ObjectMetaKey], mode: BulkOpErrorMode) -> Vec<SaiStatus> {
        fan_out(keys.len(), mode, |idx| self.remove(&keys[idx]))
    }

    fn bulk_set(
        &self,
        keys: &[ObjectMetaKey],
        attrs: &[Attribute],
        mode: BulkOpErrorMode,
    ) -> Vec<SaiStatus> {
        fan_out(keys.len(), mode, |idx| self.set(&keys[idx], &attrs[idx]))
    }

    fn bulk_get(
        &self,
        keys: &[ObjectMetaKey],
        attrs: &mut [Vec<Attribute>],
        mode: BulkOpErrorMode,
    ) -> Vec<SaiStatus> {
        fan_out(keys.len(), mode, |idx| self.get(&keys[idx], &mut attrs[idx]))
    }
}
