//! Script replay.
//!
//! A script is a list of quad and bulk operations run in order through a
//! [`Meta`]. Created object ids can be bound to names and referenced later
//! as `"$name"` anywhere a value is expected. Each step states the status
//! it expects (success by default); a step whose outcome differs fails.
//!
//! ```yaml
//! steps:
//!   - op: create
//!     object_type: switch
//!     attrs:
//!       - { attr: SAI_SWITCH_ATTR_INIT_SWITCH, value: { bool: true } }
//!     bind: sw
//!   - op: create
//!     object_type: vnet
//!     switch_id: $sw
//!     attrs:
//!       - { attr: SAI_VNET_ATTR_VNI, value: { u32: 16777216 } }
//!     expect: INVALID_PARAMETER
//! ```

use crate::error::MetaError;
use crate::meta::Meta;
use serde::Deserialize;
use serde_json::Value;
use sonic_sai::api::{BulkOpErrorMode, VirtualSwitch};
use sonic_sai::{
    Attribute, AttributeValue, EntryKey, ObjectMetaKey, RawSaiObjectId, SaiAttrId, SaiObjectType,
    SaiSchema, SaiStatus,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON script: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML script: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("step {step}: malformed step: {source}")]
    InvalidStep {
        step: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("step {step}: unbound name ${name}")]
    UnknownBinding { step: usize, name: String },

    #[error("step {step}: {object_type} has no attribute {name}")]
    UnknownAttribute {
        step: usize,
        object_type: SaiObjectType,
        name: String,
    },

    #[error(
        "step {step} ({op}): expected {expected}, got {actual}{}",
        .detail.as_deref().map(|d| format!(" ({d})")).unwrap_or_default()
    )]
    UnexpectedStatus {
        step: usize,
        op: &'static str,
        expected: SaiStatus,
        actual: SaiStatus,
        detail: Option<String>,
    },

    #[error("step {step} ({op}): per-item statuses {actual:?}, expected {expected:?}")]
    UnexpectedItemStatuses {
        step: usize,
        op: &'static str,
        expected: Vec<SaiStatus>,
        actual: Vec<SaiStatus>,
    },

    #[error("step {step}: attribute {attr} is {actual:?}, expected {expected:?}")]
    ValueMismatch {
        step: usize,
        attr: String,
        expected: AttributeValue,
        actual: AttributeValue,
    },
}

/// Script text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScriptFormat {
    Json,
    Yaml,
}

impl ScriptFormat {
    /// Guesses the format from a file extension; anything but `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ScriptFormat::Json,
            _ => ScriptFormat::Yaml,
        }
    }
}

/// A parsed script. Steps stay untyped until `$name` references in them
/// have been resolved.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    pub steps: Vec<Value>,
}

impl Script {
    pub fn parse(text: &str, format: ScriptFormat) -> Result<Self, ReplayError> {
        Ok(match format {
            ScriptFormat::Json => serde_json::from_str(text)?,
            ScriptFormat::Yaml => serde_yaml::from_str(text)?,
        })
    }

    pub fn load(path: &Path, format: Option<ScriptFormat>) -> Result<Self, ReplayError> {
        let text = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, format.unwrap_or_else(|| ScriptFormat::from_path(path)))
    }
}

/// An attribute named by id or by its `SAI_*_ATTR_*` name.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AttrRef {
    Id(SaiAttrId),
    Name(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptAttr {
    pub attr: AttrRef,
    pub value: AttributeValue,
}

/// One attribute to read back.
#[derive(Debug, Clone, Deserialize)]
pub struct GetAttr {
    pub attr: AttrRef,
    /// Receive buffer capacity for list attributes.
    #[serde(default)]
    pub capacity: u32,
    /// Value the read must produce, if any.
    #[serde(default)]
    pub expect: Option<AttributeValue>,
}

/// An object addressed by entry key or by type and OID.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Entry {
        entry: EntryKey,
    },
    Oid {
        object_type: SaiObjectType,
        oid: RawSaiObjectId,
    },
}

impl Target {
    fn meta_key(&self) -> ObjectMetaKey {
        match self {
            Target::Entry { entry } => ObjectMetaKey::entry(entry.clone()),
            Target::Oid { object_type, oid } => ObjectMetaKey::oid(*object_type, *oid),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryItem {
    pub entry: EntryKey,
    #[serde(default)]
    pub attrs: Vec<ScriptAttr>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetItem {
    pub target: Target,
    pub attr: ScriptAttr,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Create {
        object_type: SaiObjectType,
        #[serde(default)]
        switch_id: RawSaiObjectId,
        #[serde(default)]
        attrs: Vec<ScriptAttr>,
    },
    CreateEntry {
        entry: EntryKey,
        #[serde(default)]
        attrs: Vec<ScriptAttr>,
    },
    Remove {
        target: Target,
    },
    Set {
        target: Target,
        attr: ScriptAttr,
    },
    Get {
        target: Target,
        attrs: Vec<GetAttr>,
    },
    BulkCreate {
        object_type: SaiObjectType,
        #[serde(default)]
        switch_id: RawSaiObjectId,
        items: Vec<Vec<ScriptAttr>>,
        #[serde(default)]
        mode: BulkOpErrorMode,
    },
    BulkCreateEntries {
        items: Vec<EntryItem>,
        #[serde(default)]
        mode: BulkOpErrorMode,
    },
    BulkRemove {
        targets: Vec<Target>,
        #[serde(default)]
        mode: BulkOpErrorMode,
    },
    BulkSet {
        items: Vec<SetItem>,
        #[serde(default)]
        mode: BulkOpErrorMode,
    },
}

impl Operation {
    fn name(&self) -> &'static str {
        match self {
            Operation::Create { .. } => "create",
            Operation::CreateEntry { .. } => "create_entry",
            Operation::Remove { .. } => "remove",
            Operation::Set { .. } => "set",
            Operation::Get { .. } => "get",
            Operation::BulkCreate { .. } => "bulk_create",
            Operation::BulkCreateEntries { .. } => "bulk_create_entries",
            Operation::BulkRemove { .. } => "bulk_remove",
            Operation::BulkSet { .. } => "bulk_set",
        }
    }
}

/// Names to bind created object ids to.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Bind {
    One(String),
    Many(Vec<Option<String>>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub op: Operation,
    #[serde(default)]
    pub bind: Option<Bind>,
    #[serde(default)]
    pub expect: Option<SaiStatus>,
    #[serde(default)]
    pub expect_statuses: Option<Vec<SaiStatus>>,
}

#[derive(Debug, Default)]
pub struct ReplaySummary {
    pub steps: usize,
    pub passed: usize,
    pub failures: Vec<ReplayError>,
}

impl ReplaySummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// What a step produced, before it is compared with its expectations.
struct Outcome {
    status: SaiStatus,
    detail: Option<String>,
    item_statuses: Option<Vec<SaiStatus>>,
    object_ids: Vec<Option<RawSaiObjectId>>,
}

impl Outcome {
    fn status(status: SaiStatus) -> Self {
        Self {
            status,
            detail: None,
            item_statuses: None,
            object_ids: Vec::new(),
        }
    }

    fn from_result<T>(result: Result<T, MetaError>) -> (Self, Option<T>) {
        match result {
            Ok(value) => (Self::status(SaiStatus::Success), Some(value)),
            Err(err) => (
                Self {
                    detail: Some(err.to_string()),
                    ..Self::status(err.status())
                },
                None,
            ),
        }
    }
}

/// Runs scripts against one [`Meta`], keeping bindings across runs.
pub struct Replayer {
    meta: Meta,
    bindings: HashMap<String, RawSaiObjectId>,
}

impl Replayer {
    pub fn new(meta: Meta) -> Self {
        Self {
            meta,
            bindings: HashMap::new(),
        }
    }

    /// A replayer over a fresh in-memory switch.
    pub fn with_virtual_switch() -> Self {
        Self::new(Meta::new(Arc::new(VirtualSwitch::new())))
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn binding(&self, name: &str) -> Option<RawSaiObjectId> {
        self.bindings.get(name).copied()
    }

    /// Runs every step. Without `keep_going` the first failing step ends the
    /// run with its error.
    pub fn run(&mut self, script: &Script, keep_going: bool) -> Result<ReplaySummary, ReplayError> {
        let mut summary = ReplaySummary::default();
        for (idx, raw) in script.steps.iter().enumerate() {
            let step = idx + 1;
            summary.steps += 1;
            match self.run_step(step, raw) {
                Ok(()) => summary.passed += 1,
                Err(err) if keep_going => {
                    warn!(step, error = %err, "step failed");
                    summary.failures.push(err);
                }
                Err(err) => return Err(err),
            }
        }
        info!(
            steps = summary.steps,
            passed = summary.passed,
            failed = summary.failures.len(),
            "replay finished"
        );
        Ok(summary)
    }

    /// Resolves, decodes and runs one step. `step` is 1-based.
    pub fn run_step(&mut self, step: usize, raw: &Value) -> Result<(), ReplayError> {
        let resolved = self.substitute(step, raw)?;
        let parsed: Step = serde_json::from_value(resolved)
            .map_err(|source| ReplayError::InvalidStep { step, source })?;
        let op = parsed.op.name();
        debug!(step, op, "running step");

        let outcome = self.execute(step, &parsed.op)?;

        let expected = parsed.expect.unwrap_or(SaiStatus::Success);
        if outcome.status != expected {
            return Err(ReplayError::UnexpectedStatus {
                step,
                op,
                expected,
                actual: outcome.status,
                detail: outcome.detail,
            });
        }
        if let (Some(expected), Some(actual)) = (parsed.expect_statuses, outcome.item_statuses) {
            if expected != actual {
                return Err(ReplayError::UnexpectedItemStatuses {
                    step,
                    op,
                    expected,
                    actual,
                });
            }
        }
        self.bind(parsed.bind, &outcome.object_ids);
        Ok(())
    }

    fn bind(&mut self, bind: Option<Bind>, object_ids: &[Option<RawSaiObjectId>]) {
        match bind {
            Some(Bind::One(name)) => {
                if let Some(Some(oid)) = object_ids.first() {
                    self.bindings.insert(name, *oid);
                }
            }
            Some(Bind::Many(names)) => {
                for (name, oid) in names.into_iter().zip(object_ids) {
                    if let (Some(name), Some(oid)) = (name, oid) {
                        self.bindings.insert(name, *oid);
                    }
                }
            }
            None => {}
        }
    }

    /// Replaces every `"$name"` string with the bound object id.
    fn substitute(&self, step: usize, value: &Value) -> Result<Value, ReplayError> {
        Ok(match value {
            Value::String(s) => match s.strip_prefix('$') {
                Some(name) => {
                    let oid = self.binding(name).ok_or_else(|| ReplayError::UnknownBinding {
                        step,
                        name: name.to_string(),
                    })?;
                    Value::from(oid)
                }
                None => value.clone(),
            },
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.substitute(step, item))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| Ok::<_, ReplayError>((k.clone(), self.substitute(step, v)?)))
                    .collect::<Result<_, _>>()?,
            ),
            other => other.clone(),
        })
    }

    fn resolve(
        &self,
        step: usize,
        object_type: SaiObjectType,
        attr: &AttrRef,
    ) -> Result<SaiAttrId, ReplayError> {
        match attr {
            AttrRef::Id(id) => Ok(*id),
            AttrRef::Name(name) => self
                .schema()
                .attr_by_name(object_type, name)
                .map(|md| md.attr_id)
                .ok_or_else(|| ReplayError::UnknownAttribute {
                    step,
                    object_type,
                    name: name.clone(),
                }),
        }
    }

    fn attrs(
        &self,
        step: usize,
        object_type: SaiObjectType,
        attrs: &[ScriptAttr],
    ) -> Result<Vec<Attribute>, ReplayError> {
        attrs
            .iter()
            .map(|a| {
                let id = self.resolve(step, object_type, &a.attr)?;
                Ok::<_, ReplayError>(Attribute::new(id, a.value.clone()))
            })
            .collect()
    }

    fn schema(&self) -> &'static SaiSchema {
        self.meta.schema()
    }

    fn execute(&mut self, step: usize, op: &Operation) -> Result<Outcome, ReplayError> {
        let outcome = match op {
            Operation::Create {
                object_type,
                switch_id,
                attrs,
            } => {
                let attrs = self.attrs(step, *object_type, attrs)?;
                let (mut outcome, oid) =
                    Outcome::from_result(self.meta.create(*object_type, *switch_id, &attrs));
                outcome.object_ids = vec![oid];
                outcome
            }
            Operation::CreateEntry { entry, attrs } => {
                let attrs = self.attrs(step, entry.object_type(), attrs)?;
                Outcome::from_result(self.meta.create_entry(entry, &attrs)).0
            }
            Operation::Remove { target } => {
                Outcome::from_result(self.meta.remove(&target.meta_key())).0
            }
            Operation::Set { target, attr } => {
                let key = target.meta_key();
                let id = self.resolve(step, key.object_type, &attr.attr)?;
                let attr = Attribute::new(id, attr.value.clone());
                Outcome::from_result(self.meta.set(&key, &attr)).0
            }
            Operation::Get { target, attrs } => return self.get(step, target, attrs),
            Operation::BulkCreate {
                object_type,
                switch_id,
                items,
                mode,
            } => {
                let items = items
                    .iter()
                    .map(|item| self.attrs(step, *object_type, item))
                    .collect::<Result<Vec<_>, _>>()?;
                match self.meta.bulk_create(*object_type, *switch_id, &items, *mode) {
                    Ok(out) => Outcome {
                        status: out.status(),
                        detail: None,
                        item_statuses: Some(out.statuses),
                        object_ids: out.object_ids,
                    },
                    Err(err) => Outcome::from_result::<()>(Err(err)).0,
                }
            }
            Operation::BulkCreateEntries { items, mode } => {
                let entries: Vec<EntryKey> = items.iter().map(|i| i.entry.clone()).collect();
                let attrs = items
                    .iter()
                    .map(|i| self.attrs(step, i.entry.object_type(), &i.attrs))
                    .collect::<Result<Vec<_>, _>>()?;
                bulk_outcome(self.meta.bulk_create_entries(&entries, &attrs, *mode))
            }
            Operation::BulkRemove { targets, mode } => {
                let keys: Vec<_> = targets.iter().map(Target::meta_key).collect();
                bulk_outcome(self.meta.bulk_remove(&keys, *mode))
            }
            Operation::BulkSet { items, mode } => {
                let keys: Vec<_> = items.iter().map(|i| i.target.meta_key()).collect();
                let attrs = items
                    .iter()
                    .zip(&keys)
                    .map(|(item, key)| {
                        let id = self.resolve(step, key.object_type, &item.attr.attr)?;
                        Ok::<_, ReplayError>(Attribute::new(id, item.attr.value.clone()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                bulk_outcome(self.meta.bulk_set(&keys, &attrs, *mode))
            }
        };
        Ok(outcome)
    }

    fn get(&self, step: usize, target: &Target, wanted: &[GetAttr]) -> Result<Outcome, ReplayError> {
        let key = target.meta_key();
        let mut names = Vec::with_capacity(wanted.len());
        let mut attrs = Vec::with_capacity(wanted.len());
        for want in wanted {
            let id = self.resolve(step, key.object_type, &want.attr)?;
            // unknown ids still go through so the lookup is rejected by Meta
            let (name, value) = match self.schema().attr(key.object_type, id) {
                Some(md) => (md.name.to_string(), md.value_type.receive_buffer(want.capacity)),
                None => (id.to_string(), AttributeValue::U32(0)),
            };
            names.push(name);
            attrs.push(Attribute::new(id, value));
        }

        let report = match self.meta.get(&key, &mut attrs) {
            Ok(report) => report,
            Err(err) => return Ok(Outcome::from_result::<()>(Err(err)).0),
        };

        for ((want, attr), name) in wanted.iter().zip(&attrs).zip(names) {
            if let Some(expected) = &want.expect {
                if *expected != attr.value {
                    return Err(ReplayError::ValueMismatch {
                        step,
                        attr: name,
                        expected: expected.clone(),
                        actual: attr.value.clone(),
                    });
                }
            }
        }
        Ok(Outcome::status(report.status()))
    }
}

fn bulk_outcome(result: Result<crate::meta::BulkOutcome, MetaError>) -> Outcome {
    match result {
        Ok(out) => Outcome {
            status: out.status(),
            detail: None,
            item_statuses: Some(out.statuses),
            object_ids: Vec::new(),
        },
        Err(err) => Outcome::from_result::<()>(Err(err)).0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sonic_sai::NULL_OBJECT_ID;

    const SCRIPT: &str = r#"
steps:
  - op: create
    object_type: switch
    attrs:
      - { attr: SAI_SWITCH_ATTR_INIT_SWITCH, value: { bool: true } }
    bind: sw
  - op: create
    object_type: vnet
    switch_id: $sw
    attrs:
      - { attr: SAI_VNET_ATTR_VNI, value: { u32: 10 } }
    bind: vnet
  - op: create
    object_type: eni
    switch_id: $sw
    attrs:
      - { attr: SAI_ENI_ATTR_VNET_ID, value: { oid: $vnet } }
    bind: eni
  - op: remove
    target: { object_type: vnet, oid: $vnet }
    expect: OBJECT_IN_USE
  - op: get
    target: { object_type: vnet, oid: $vnet }
    attrs:
      - { attr: SAI_VNET_ATTR_VNI, expect: { u32: 10 } }
  - op: remove
    target: { object_type: eni, oid: $eni }
  - op: remove
    target: { object_type: vnet, oid: $vnet }
"#;

    #[test]
    fn test_yaml_script() {
        let script = Script::parse(SCRIPT, ScriptFormat::Yaml).unwrap();
        let mut replayer = Replayer::with_virtual_switch();
        let summary = replayer.run(&script, false).unwrap();
        assert_eq!(summary.steps, 7);
        assert_eq!(summary.passed, 7);
        assert!(summary.is_success());
        assert_eq!(replayer.meta().object_count(), 1);
    }

    #[test]
    fn test_unexpected_status_stops_run() {
        let script = Script::parse(
            r#"{"steps": [
                {"op": "create", "object_type": "vnet", "switch_id": 5,
                 "attrs": [{"attr": 0, "value": {"u32": 1}}]},
                {"op": "create", "object_type": "switch",
                 "attrs": [{"attr": 0, "value": {"bool": true}}]}
            ]}"#,
            ScriptFormat::Json,
        )
        .unwrap();
        let mut replayer = Replayer::with_virtual_switch();
        let err = replayer.run(&script, false).unwrap_err();
        match err {
            ReplayError::UnexpectedStatus {
                step,
                expected,
                actual,
                ..
            } => {
                assert_eq!(step, 1);
                assert_eq!(expected, SaiStatus::Success);
                assert_eq!(actual, SaiStatus::InvalidObjectId);
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(replayer.meta().object_count(), 0);

        let summary = Replayer::with_virtual_switch().run(&script, true).unwrap();
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failures.len(), 1);
    }

    #[test]
    fn test_unknown_binding() {
        let script = Script::parse(
            r#"{"steps": [{"op": "remove", "target": {"object_type": "vnet", "oid": "$nope"}}]}"#,
            ScriptFormat::Json,
        )
        .unwrap();
        let err = Replayer::with_virtual_switch()
            .run(&script, false)
            .unwrap_err();
        assert!(matches!(err, ReplayError::UnknownBinding { step: 1, .. }));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ScriptFormat::from_path(Path::new("a.JSON")), ScriptFormat::Json);
        assert_eq!(ScriptFormat::from_path(Path::new("a.yml")), ScriptFormat::Yaml);
        assert_eq!(ScriptFormat::from_path(Path::new("script")), ScriptFormat::Yaml);
    }

    #[test]
    fn test_bulk_bind_many() {
        let script = Script::parse(
            r#"
steps:
  - op: create
    object_type: switch
    attrs: [{ attr: 0, value: { bool: true } }]
    bind: sw
  - op: bulk_create
    object_type: vnet
    switch_id: $sw
    mode: continue_on_error
    items:
      - [{ attr: 0, value: { u32: 1 } }]
      - [{ attr: 0, value: { u32: 99999999 } }]
      - [{ attr: 0, value: { u32: 3 } }]
    bind: [a, b, c]
    expect: INVALID_PARAMETER
    expect_statuses: [SUCCESS, INVALID_PARAMETER, SUCCESS]
"#,
            ScriptFormat::Yaml,
        )
        .unwrap();
        let mut replayer = Replayer::with_virtual_switch();
        replayer.run(&script, false).unwrap();
        assert!(replayer.binding("a").is_some());
        assert!(replayer.binding("b").is_none());
        assert!(replayer.binding("c").is_some());
        assert_ne!(replayer.binding("a"), Some(NULL_OBJECT_ID));
    }
}
