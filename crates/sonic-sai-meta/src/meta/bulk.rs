//! Bulk operation coordinator.
//!
//! Each item goes through the same checks as its quad counterpart. Items
//! that pass are handed to the driver in one bulk call with the caller's
//! error mode; items that fail locally never reach the driver. Statuses are
//! merged back in caller order and the graph is updated item by item for
//! the ones that succeeded end to end.

use super::{driver_inconsistent, list_capacities, rejected, Meta};
use crate::error::{MetaError, MetaResult};
use sonic_sai::api::{bulk_status, BulkOpErrorMode};
use sonic_sai::{Attribute, EntryKey, ObjectMetaKey, RawSaiObjectId, SaiObjectType, SaiStatus};
use std::collections::HashSet;
use tracing::{debug, error, warn};

/// Per-item statuses of a bulk remove, set, get or entry create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOutcome {
    pub statuses: Vec<SaiStatus>,
}

impl BulkOutcome {
    /// Success, or the status of the first failing item.
    pub fn status(&self) -> SaiStatus {
        bulk_status(&self.statuses)
    }

    pub fn is_success(&self) -> bool {
        self.status().is_success()
    }
}

/// Per-item results of a bulk OID create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkCreateOutcome {
    pub object_ids: Vec<Option<RawSaiObjectId>>,
    pub statuses: Vec<SaiStatus>,
}

impl BulkCreateOutcome {
    pub fn status(&self) -> SaiStatus {
        bulk_status(&self.statuses)
    }

    pub fn is_success(&self) -> bool {
        self.status().is_success()
    }
}

/// Which items go to the driver, and what happened to the rest.
struct BulkPlan {
    op: &'static str,
    mode: BulkOpErrorMode,
    statuses: Vec<SaiStatus>,
    dispatch: Vec<usize>,
    stopped: bool,
}

impl BulkPlan {
    fn new(op: &'static str, len: usize, mode: BulkOpErrorMode) -> Self {
        Self {
            op,
            mode,
            statuses: vec![SaiStatus::NotExecuted; len],
            dispatch: Vec::with_capacity(len),
            stopped: false,
        }
    }

    fn len(&self) -> usize {
        self.statuses.len()
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Records the local verdict for item `idx`.
    fn admit(&mut self, idx: usize, verdict: MetaResult<()>) {
        match verdict {
            Ok(()) => self.dispatch.push(idx),
            Err(err) => {
                let err = rejected(self.op, &format_args!("item {}", idx), err);
                self.fail(idx, err.status());
            }
        }
    }

    fn fail(&mut self, idx: usize, status: SaiStatus) {
        self.statuses[idx] = status;
        if self.mode == BulkOpErrorMode::StopOnError {
            self.stopped = true;
        }
    }

    /// Pairs each dispatched item with the driver's status for it. A short
    /// reply counts as failure for the missing items.
    fn driver_results(&self, reply: &[SaiStatus]) -> Vec<(usize, usize, SaiStatus)> {
        if reply.len() != self.dispatch.len() {
            error!(
                op = self.op,
                expected = self.dispatch.len(),
                got = reply.len(),
                "driver returned a bulk reply of the wrong length"
            );
        }
        self.dispatch
            .iter()
            .enumerate()
            .map(|(pos, &idx)| {
                let status = reply.get(pos).copied().unwrap_or(SaiStatus::Failure);
                (pos, idx, status)
            })
            .collect()
    }

    /// Final per-item array. Under stop-on-error every failure after the
    /// first one, local or from the driver, is reported as not executed.
    fn finish(mut self) -> Vec<SaiStatus> {
        if self.mode == BulkOpErrorMode::StopOnError {
            if let Some(first) = self.statuses.iter().position(SaiStatus::is_error) {
                for status in self.statuses[first + 1..].iter_mut().filter(|s| s.is_error()) {
                    *status = SaiStatus::NotExecuted;
                }
            }
        }
        let failed = self.statuses.iter().filter(|s| s.is_error()).count();
        debug!(op = self.op, items = self.len(), failed, "bulk done");
        self.statuses
    }
}

fn check_lengths(keys: usize, values: usize) -> MetaResult<()> {
    if keys != values {
        return Err(MetaError::BulkLengthMismatch { keys, values });
    }
    Ok(())
}

impl Meta {
    /// Creates `attrs.len()` OID objects of one type under one switch.
    pub fn bulk_create(
        &self,
        object_type: SaiObjectType,
        switch_id: RawSaiObjectId,
        attrs: &[Vec<Attribute>],
        mode: BulkOpErrorMode,
    ) -> MetaResult<BulkCreateOutcome> {
        let mut graph = self.write()?;
        let mut plan = BulkPlan::new("bulk_create", attrs.len(), mode);
        let mut object_ids = vec![None; attrs.len()];

        for (idx, item) in attrs.iter().enumerate() {
            if plan.is_stopped() {
                break;
            }
            let verdict = self.validate_oid_create(&graph, object_type, switch_id, item);
            plan.admit(idx, verdict);
        }

        if !plan.dispatch.is_empty() {
            let batch: Vec<Vec<Attribute>> =
                plan.dispatch.iter().map(|&idx| attrs[idx].clone()).collect();
            let reply = self.driver.bulk_create(object_type, switch_id, &batch, mode);

            for (pos, idx, status) in plan.driver_results(&reply.statuses) {
                if status.is_error() {
                    plan.statuses[idx] = status;
                    continue;
                }
                let Some(oid) = reply.object_ids.get(pos).copied().flatten() else {
                    error!(%object_type, item = idx, "driver reported success without an object id");
                    plan.statuses[idx] = SaiStatus::Failure;
                    continue;
                };
                let committed =
                    self.commit_oid_create(&mut graph, object_type, switch_id, oid, &attrs[idx]);
                plan.statuses[idx] = match committed {
                    Ok(()) => {
                        object_ids[idx] = Some(oid);
                        SaiStatus::Success
                    }
                    Err(err) => err.status(),
                };
            }
        }

        let statuses = plan.finish();
        Ok(BulkCreateOutcome {
            object_ids,
            statuses,
        })
    }

    /// Creates entries; `entries[i]` gets `attrs[i]`.
    ///
    /// Each accepted entry is registered before the driver call so a key
    /// repeated within the batch is refused, and is rolled back if the
    /// driver refuses it.
    pub fn bulk_create_entries(
        &self,
        entries: &[EntryKey],
        attrs: &[Vec<Attribute>],
        mode: BulkOpErrorMode,
    ) -> MetaResult<BulkOutcome> {
        check_lengths(entries.len(), attrs.len())?;
        let mut graph = self.write()?;
        let mut plan = BulkPlan::new("bulk_create_entries", entries.len(), mode);

        for (idx, (entry, item)) in entries.iter().zip(attrs).enumerate() {
            if plan.is_stopped() {
                break;
            }
            let verdict = self.reserve_entry(&mut graph, entry, item);
            plan.admit(idx, verdict);
        }

        if !plan.dispatch.is_empty() {
            let batch_entries: Vec<EntryKey> =
                plan.dispatch.iter().map(|&idx| entries[idx].clone()).collect();
            let batch_attrs: Vec<Vec<Attribute>> =
                plan.dispatch.iter().map(|&idx| attrs[idx].clone()).collect();
            let reply = self
                .driver
                .bulk_create_entries(&batch_entries, &batch_attrs, mode);

            for (_, idx, status) in plan.driver_results(&reply) {
                if status.is_error() {
                    warn!(entry = %entries[idx], %status, "driver refused bulk entry");
                    Self::release_entry(&mut graph, &entries[idx]);
                }
                plan.statuses[idx] = status;
            }
        }

        Ok(BulkOutcome {
            statuses: plan.finish(),
        })
    }

    /// Removes objects. Every item is checked against the graph as it was
    /// before the call, so removing a referrer and its target in the same
    /// batch still refuses the target.
    pub fn bulk_remove(
        &self,
        keys: &[ObjectMetaKey],
        mode: BulkOpErrorMode,
    ) -> MetaResult<BulkOutcome> {
        let mut graph = self.write()?;
        let mut plan = BulkPlan::new("bulk_remove", keys.len(), mode);
        let mut seen = HashSet::with_capacity(keys.len());

        for (idx, key) in keys.iter().enumerate() {
            if plan.is_stopped() {
                break;
            }
            let verdict = if seen.contains(&key.key) {
                Err(MetaError::NotFound(format!("{} (repeated in batch)", key)))
            } else {
                graph.check_removable(key.object_type, &key.key)
            };
            if verdict.is_ok() {
                seen.insert(&key.key);
            }
            plan.admit(idx, verdict);
        }

        if !plan.dispatch.is_empty() {
            let batch: Vec<ObjectMetaKey> =
                plan.dispatch.iter().map(|&idx| keys[idx].clone()).collect();
            let reply = self.driver.bulk_remove(&batch, mode);

            for (_, idx, status) in plan.driver_results(&reply) {
                plan.statuses[idx] = if status.is_success() {
                    match graph.remove(&keys[idx].key) {
                        Ok(_) => SaiStatus::Success,
                        Err(err) => err.status(),
                    }
                } else {
                    status
                };
            }
        }

        Ok(BulkOutcome {
            statuses: plan.finish(),
        })
    }

    /// Sets one attribute per object; `keys[i]` gets `attrs[i]`.
    pub fn bulk_set(
        &self,
        keys: &[ObjectMetaKey],
        attrs: &[Attribute],
        mode: BulkOpErrorMode,
    ) -> MetaResult<BulkOutcome> {
        check_lengths(keys.len(), attrs.len())?;
        let mut graph = self.write()?;
        let mut plan = BulkPlan::new("bulk_set", keys.len(), mode);

        for (idx, (key, attr)) in keys.iter().zip(attrs).enumerate() {
            if plan.is_stopped() {
                break;
            }
            let verdict = self.validate_set(&graph, key, attr);
            plan.admit(idx, verdict);
        }

        if !plan.dispatch.is_empty() {
            let batch_keys: Vec<ObjectMetaKey> =
                plan.dispatch.iter().map(|&idx| keys[idx].clone()).collect();
            let batch_attrs: Vec<Attribute> =
                plan.dispatch.iter().map(|&idx| attrs[idx].clone()).collect();
            let reply = self.driver.bulk_set(&batch_keys, &batch_attrs, mode);

            for (_, idx, status) in plan.driver_results(&reply) {
                plan.statuses[idx] = if status.is_success() {
                    match graph.apply_set(&keys[idx].key, &attrs[idx]) {
                        Ok(()) => SaiStatus::Success,
                        Err(err) => err.status(),
                    }
                } else {
                    status
                };
            }
        }

        Ok(BulkOutcome {
            statuses: plan.finish(),
        })
    }

    /// Reads attributes for several objects; `attrs[i]` are the receive
    /// buffers for `keys[i]`. An item whose list did not fit reports
    /// `BufferOverflow` with the required count written back.
    pub fn bulk_get(
        &self,
        keys: &[ObjectMetaKey],
        attrs: &mut [Vec<Attribute>],
        mode: BulkOpErrorMode,
    ) -> MetaResult<BulkOutcome> {
        check_lengths(keys.len(), attrs.len())?;
        let graph = self.read()?;
        let mut plan = BulkPlan::new("bulk_get", keys.len(), mode);

        for (idx, (key, item)) in keys.iter().zip(attrs.iter()).enumerate() {
            if plan.is_stopped() {
                break;
            }
            let verdict = self.validate_get(&graph, key, item);
            plan.admit(idx, verdict);
        }

        if !plan.dispatch.is_empty() {
            let batch_keys: Vec<ObjectMetaKey> =
                plan.dispatch.iter().map(|&idx| keys[idx].clone()).collect();
            let mut batch_attrs: Vec<Vec<Attribute>> = plan
                .dispatch
                .iter()
                .map(|&idx| std::mem::take(&mut attrs[idx]))
                .collect();
            let capacities: Vec<Vec<Option<u32>>> =
                batch_attrs.iter().map(|item| list_capacities(item)).collect();
            let reply = self.driver.bulk_get(&batch_keys, &mut batch_attrs, mode);

            for (pos, idx, status) in plan.driver_results(&reply) {
                let Some(item) = batch_attrs.get_mut(pos).map(std::mem::take) else {
                    plan.statuses[idx] = SaiStatus::Failure;
                    continue;
                };
                let key = &keys[idx];
                plan.statuses[idx] = match status {
                    SaiStatus::Success | SaiStatus::BufferOverflow => {
                        match self.check_returned(key.object_type, &item) {
                            Ok(()) => {
                                let overflows =
                                    self.overflows(key.object_type, &item, &capacities[pos]);
                                if !overflows.is_empty() {
                                    SaiStatus::BufferOverflow
                                } else if status == SaiStatus::BufferOverflow {
                                    error!(
                                        %key,
                                        item = idx,
                                        "driver reported buffer overflow without an oversized list"
                                    );
                                    SaiStatus::BufferOverflow
                                } else {
                                    SaiStatus::Success
                                }
                            }
                            Err(err) => driver_inconsistent("bulk_get", key, err).status(),
                        }
                    }
                    other => other,
                };
                attrs[idx] = item;
            }
        }

        Ok(BulkOutcome {
            statuses: plan.finish(),
        })
    }
}
