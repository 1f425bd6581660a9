//! Replay scripts loaded from disk.

use pretty_assertions::assert_eq;
use sonic_sai::{ObjectMetaKey, SaiObjectType, SaiStatus};
use sonic_sai_meta::replay::{ReplayError, Replayer, Script, ScriptFormat};
use std::io::Write;
use tempfile::NamedTempFile;

fn script_file(suffix: &str, text: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("saimeta-")
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const ACL_SCRIPT: &str = r#"
steps:
  - op: create
    object_type: switch
    attrs:
      - { attr: SAI_SWITCH_ATTR_INIT_SWITCH, value: { bool: true } }
      - { attr: SAI_SWITCH_ATTR_SRC_MAC_ADDRESS, value: { mac: "02:00:00:00:00:01" } }
    bind: sw
  - op: create
    object_type: dash_acl_group
    switch_id: $sw
    attrs:
      - { attr: SAI_DASH_ACL_GROUP_ATTR_IP_ADDR_FAMILY, value: { s32: 0 } }
    bind: group
  - op: create
    object_type: dash_acl_rule
    switch_id: $sw
    attrs:
      - { attr: SAI_DASH_ACL_RULE_ATTR_DASH_ACL_GROUP_ID, value: { oid: $group } }
      - { attr: SAI_DASH_ACL_RULE_ATTR_ACTION, value: { s32: 2 } }
      - attr: SAI_DASH_ACL_RULE_ATTR_PROTOCOL
        value: { u8_list: { count: 2, list: [6, 17] } }
    bind: rule
  - op: create
    object_type: dash_acl_rule
    switch_id: $sw
    attrs:
      - { attr: SAI_DASH_ACL_RULE_ATTR_ACTION, value: { s32: 0 } }
    expect: MANDATORY_ATTRIBUTE_MISSING
  - op: get
    target: { object_type: dash_acl_rule, oid: $rule }
    attrs:
      - attr: SAI_DASH_ACL_RULE_ATTR_PROTOCOL
        capacity: 4
        expect: { u8_list: { count: 2, list: [6, 17] } }
  - op: get
    target: { object_type: dash_acl_rule, oid: $rule }
    attrs:
      - { attr: SAI_DASH_ACL_RULE_ATTR_PROTOCOL, capacity: 1 }
    expect: BUFFER_OVERFLOW
  - op: remove
    target: { object_type: dash_acl_group, oid: $group }
    expect: SAI_STATUS_OBJECT_IN_USE
"#;

#[test]
fn test_yaml_script_from_file() {
    let file = script_file(".yaml", ACL_SCRIPT);
    let script = Script::load(file.path(), None).unwrap();
    assert_eq!(script.steps.len(), 7);

    let mut replayer = Replayer::with_virtual_switch();
    let summary = replayer.run(&script, false).unwrap();
    assert!(summary.is_success());
    assert_eq!(summary.passed, 7);

    let group = replayer.binding("group").unwrap();
    assert_eq!(replayer.meta().reference_count(group), Some(1));
    assert_eq!(replayer.meta().object_count(), 3);
}

#[test]
fn test_json_script_with_entries() {
    let text = r#"{
      "steps": [
        {"op": "create", "object_type": "switch",
         "attrs": [{"attr": "SAI_SWITCH_ATTR_INIT_SWITCH", "value": {"bool": true}}],
         "bind": "sw"},
        {"op": "bulk_create_entries",
         "mode": "continue_on_error",
         "items": [
           {"entry": {"vip_entry": {"switch_id": "$sw", "vip": "192.168.0.1"}},
            "attrs": [{"attr": "SAI_VIP_ENTRY_ATTR_ACTION", "value": {"s32": 0}}]},
           {"entry": {"vip_entry": {"switch_id": "$sw", "vip": "192.168.0.1"}},
            "attrs": [{"attr": "SAI_VIP_ENTRY_ATTR_ACTION", "value": {"s32": 0}}]},
           {"entry": {"vip_entry": {"switch_id": "$sw", "vip": "192.168.0.2"}},
            "attrs": [{"attr": "SAI_VIP_ENTRY_ATTR_ACTION", "value": {"s32": 7}}]}
         ],
         "expect": "ITEM_ALREADY_EXISTS",
         "expect_statuses": ["SUCCESS", "ITEM_ALREADY_EXISTS", "INVALID_PARAMETER"]},
        {"op": "remove",
         "target": {"entry": {"vip_entry": {"switch_id": "$sw", "vip": "192.168.0.1"}}}},
        {"op": "remove",
         "target": {"entry": {"vip_entry": {"switch_id": "$sw", "vip": "192.168.0.1"}}},
         "expect": "ITEM_NOT_FOUND"}
      ]
    }"#;
    let file = script_file(".json", text);
    let script = Script::load(file.path(), None).unwrap();

    let mut replayer = Replayer::with_virtual_switch();
    let summary = replayer.run(&script, false).unwrap();
    assert_eq!(summary.passed, 4);
    assert_eq!(replayer.meta().object_count(), 1);
}

#[test]
fn test_keep_going_collects_failures() {
    let text = r#"
steps:
  - op: create
    object_type: switch
    attrs: [{ attr: SAI_SWITCH_ATTR_INIT_SWITCH, value: { bool: true } }]
    bind: sw
  - op: create
    object_type: vnet
    switch_id: $sw
    attrs: [{ attr: SAI_VNET_ATTR_VNI, value: { u32: 5 } }]
    expect: INVALID_PARAMETER
  - op: create
    object_type: vnet
    switch_id: $sw
    attrs: [{ attr: SAI_VNET_ATTR_NO_SUCH_THING, value: { u32: 5 } }]
  - op: create
    object_type: vnet
    switch_id: $sw
    attrs: [{ attr: SAI_VNET_ATTR_VNI, value: { u32: 6 } }]
    bind: vnet
"#;
    let file = script_file(".yml", text);
    let script = Script::load(file.path(), Some(ScriptFormat::Yaml)).unwrap();

    let mut replayer = Replayer::with_virtual_switch();
    let summary = replayer.run(&script, true).unwrap();
    assert_eq!(summary.steps, 4);
    assert_eq!(summary.passed, 2);
    assert!(matches!(
        summary.failures[0],
        ReplayError::UnexpectedStatus {
            step: 2,
            expected: SaiStatus::InvalidParameter,
            actual: SaiStatus::Success,
            ..
        }
    ));
    assert!(matches!(
        summary.failures[1],
        ReplayError::UnknownAttribute { step: 3, .. }
    ));

    let vnet = replayer.binding("vnet").unwrap();
    assert!(replayer
        .meta()
        .exists(&ObjectMetaKey::oid(SaiObjectType::Vnet, vnet)));
}

#[test]
fn test_missing_file() {
    let err = Script::load(std::path::Path::new("/nonexistent/script.yaml"), None).unwrap_err();
    assert!(matches!(err, ReplayError::Io { .. }));
}
