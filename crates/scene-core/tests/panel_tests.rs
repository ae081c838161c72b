// Integration tests for the parameter panel: binding validation, clamping,
// snapping, write-through, callbacks, and tree structure.

use std::cell::RefCell;
use std::rc::Rc;

use scene_core::{
    snap_to_step, Binding, ControlKind, ControlValue, PanelEntry, PanelError, ParameterPanel,
};

struct Lamp {
    intensity: f32,
    enabled: bool,
}

fn make_lamp() -> Rc<RefCell<Lamp>> {
    Rc::new(RefCell::new(Lamp {
        intensity: 1.0,
        enabled: false,
    }))
}

fn intensity_binding(lamp: &Rc<RefCell<Lamp>>) -> Binding {
    Binding::number(lamp, |l| l.intensity, |l, v| l.intensity = v)
}

fn enabled_binding(lamp: &Rc<RefCell<Lamp>>) -> Binding {
    Binding::toggle(lamp, |l| l.enabled, |l, v| l.enabled = v)
}

const INTENSITY_RANGE: ControlKind = ControlKind::Range {
    min: 0.0,
    max: 5.0,
    step: 0.25,
};

#[test]
fn control_reflects_current_value_at_registration() {
    let lamp = make_lamp();
    lamp.borrow_mut().intensity = 3.5;
    let mut panel = ParameterPanel::new();
    let id = panel
        .add_control(
            panel.root(),
            "Intensity",
            INTENSITY_RANGE,
            intensity_binding(&lamp),
            None,
        )
        .expect("valid binding");
    assert_eq!(panel.value(id), Some(ControlValue::Number(3.5)));
}

#[test]
fn range_write_clamps_into_bounds() {
    let lamp = make_lamp();
    let mut panel = ParameterPanel::new();
    let id = panel
        .add_control(
            panel.root(),
            "Intensity",
            INTENSITY_RANGE,
            intensity_binding(&lamp),
            None,
        )
        .unwrap();

    let applied = panel.set_value(id, ControlValue::Number(100.0)).unwrap();
    assert_eq!(applied, ControlValue::Number(5.0), "above max clamps to max");
    assert_eq!(lamp.borrow().intensity, 5.0, "clamped value written through");

    let applied = panel.set_value(id, ControlValue::Number(-2.0)).unwrap();
    assert_eq!(applied, ControlValue::Number(0.0), "below min clamps to min");
    assert_eq!(lamp.borrow().intensity, 0.0);
}

#[test]
fn range_write_snaps_to_step_grid() {
    let lamp = make_lamp();
    let mut panel = ParameterPanel::new();
    let id = panel
        .add_control(
            panel.root(),
            "Intensity",
            INTENSITY_RANGE,
            intensity_binding(&lamp),
            None,
        )
        .unwrap();

    // 0.37 sits between the 0.25 and 0.50 grid lines, nearer 0.25
    let applied = panel.set_value(id, ControlValue::Number(0.37)).unwrap();
    assert_eq!(applied, ControlValue::Number(0.25));
    // 0.40 is nearer 0.50
    let applied = panel.set_value(id, ControlValue::Number(0.40)).unwrap();
    assert_eq!(applied, ControlValue::Number(0.5));
    assert_eq!(lamp.borrow().intensity, 0.5);
}

#[test]
fn snap_to_step_anchors_at_min() {
    // grid starts at min, not at zero
    let snapped = snap_to_step(0.9, 0.5, 2.5, 1.0);
    assert_eq!(snapped, 0.5, "0.9 is nearer the 0.5 grid line than 1.5");
    let snapped = snap_to_step(1.2, 0.5, 2.5, 1.0);
    assert_eq!(snapped, 1.5);
}

#[test]
fn snap_to_step_stays_inside_bounds_over_sweep() {
    for i in -50..150 {
        let v = i as f32 * 0.1;
        let snapped = snap_to_step(v, 0.0, 5.0, 0.3);
        assert!(
            (0.0..=5.0).contains(&snapped),
            "snapped value {snapped} escaped [0, 5] for input {v}"
        );
    }
}

#[test]
fn toggle_writes_through_and_fires_callback() {
    let lamp = make_lamp();
    let seen: Rc<RefCell<Vec<ControlValue>>> = Rc::new(RefCell::new(Vec::new()));
    let seen_cb = seen.clone();
    let mut panel = ParameterPanel::new();
    let id = panel
        .add_control(
            panel.root(),
            "Enabled",
            ControlKind::Toggle,
            enabled_binding(&lamp),
            Some(Box::new(move |v| seen_cb.borrow_mut().push(v))),
        )
        .unwrap();

    panel.set_value(id, ControlValue::Bool(true)).unwrap();
    assert!(lamp.borrow().enabled, "toggle wrote through to the target");
    assert_eq!(&*seen.borrow(), &[ControlValue::Bool(true)]);
}

#[test]
fn callback_receives_applied_value_not_raw_input() {
    let lamp = make_lamp();
    let seen: Rc<RefCell<Vec<ControlValue>>> = Rc::new(RefCell::new(Vec::new()));
    let seen_cb = seen.clone();
    let mut panel = ParameterPanel::new();
    let id = panel
        .add_control(
            panel.root(),
            "Intensity",
            INTENSITY_RANGE,
            intensity_binding(&lamp),
            Some(Box::new(move |v| seen_cb.borrow_mut().push(v))),
        )
        .unwrap();

    panel.set_value(id, ControlValue::Number(99.0)).unwrap();
    assert_eq!(
        &*seen.borrow(),
        &[ControlValue::Number(5.0)],
        "callback sees the clamped value"
    );
}

#[test]
fn type_mismatch_rejected_at_registration() {
    let lamp = make_lamp();
    let mut panel = ParameterPanel::new();
    // numeric binding declared as a toggle
    let err = panel
        .add_control(
            panel.root(),
            "Broken",
            ControlKind::Toggle,
            intensity_binding(&lamp),
            None,
        )
        .unwrap_err();
    assert!(matches!(err, PanelError::TypeMismatch));
}

#[test]
fn failed_registration_leaves_existing_controls_intact() {
    let lamp = make_lamp();
    let mut panel = ParameterPanel::new();
    panel
        .add_control(
            panel.root(),
            "Intensity",
            INTENSITY_RANGE,
            intensity_binding(&lamp),
            None,
        )
        .unwrap();

    let before = panel.children(panel.root()).unwrap().len();
    let err = panel
        .add_control(
            panel.root(),
            "Broken",
            ControlKind::Toggle,
            intensity_binding(&lamp),
            None,
        )
        .unwrap_err();
    assert!(matches!(err, PanelError::TypeMismatch));
    let after = panel.children(panel.root()).unwrap().len();
    assert_eq!(before, after, "failed registration must not grow the tree");
}

#[test]
fn dead_target_rejected_at_registration() {
    let lamp = make_lamp();
    let binding = intensity_binding(&lamp);
    drop(lamp);
    let mut panel = ParameterPanel::new();
    let err = panel
        .add_control(panel.root(), "Ghost", INTENSITY_RANGE, binding, None)
        .unwrap_err();
    assert!(matches!(err, PanelError::TargetDropped));
}

#[test]
fn non_finite_current_value_rejected() {
    let lamp = make_lamp();
    lamp.borrow_mut().intensity = f32::NAN;
    let mut panel = ParameterPanel::new();
    let err = panel
        .add_control(
            panel.root(),
            "Intensity",
            INTENSITY_RANGE,
            intensity_binding(&lamp),
            None,
        )
        .unwrap_err();
    assert!(matches!(err, PanelError::NonFiniteValue));
}

#[test]
fn invalid_range_config_rejected() {
    let lamp = make_lamp();
    let mut panel = ParameterPanel::new();
    let inverted = ControlKind::Range {
        min: 5.0,
        max: 0.0,
        step: 0.1,
    };
    let err = panel
        .add_control(
            panel.root(),
            "Intensity",
            inverted,
            intensity_binding(&lamp),
            None,
        )
        .unwrap_err();
    assert!(matches!(err, PanelError::Config(_)));

    let zero_step = ControlKind::Range {
        min: 0.0,
        max: 5.0,
        step: 0.0,
    };
    let err = panel
        .add_control(
            panel.root(),
            "Intensity",
            zero_step,
            intensity_binding(&lamp),
            None,
        )
        .unwrap_err();
    assert!(matches!(err, PanelError::Config(_)));
}

#[test]
fn groups_nest_and_preserve_insertion_order() {
    let lamp = make_lamp();
    let mut panel = ParameterPanel::new();
    let root = panel.root();
    panel
        .add_control(root, "First", INTENSITY_RANGE, intensity_binding(&lamp), None)
        .unwrap();
    let folder = panel.add_group(root, "Folder").unwrap();
    let nested = panel.add_group(folder, "Nested").unwrap();
    panel
        .add_control(
            nested,
            "Deep",
            ControlKind::Toggle,
            enabled_binding(&lamp),
            None,
        )
        .unwrap();
    panel
        .add_control(root, "Last", INTENSITY_RANGE, intensity_binding(&lamp), None)
        .unwrap();

    let entries = panel.children(root).unwrap();
    let labels: Vec<String> = entries
        .iter()
        .map(|e| match e {
            PanelEntry::Group { name, .. } => name.clone(),
            PanelEntry::Control { label, .. } => label.clone(),
        })
        .collect();
    assert_eq!(labels, vec!["First", "Folder", "Last"]);

    let folder_entries = panel.children(folder).unwrap();
    assert_eq!(folder_entries.len(), 1);
    assert!(matches!(
        folder_entries[0],
        PanelEntry::Group { ref name, .. } if name == "Nested"
    ));
}

#[test]
fn duplicate_group_names_allowed() {
    let mut panel = ParameterPanel::new();
    let root = panel.root();
    panel.add_group(root, "Lights").unwrap();
    panel.add_group(root, "Lights").unwrap();
    assert_eq!(panel.children(root).unwrap().len(), 2);
}

#[test]
fn set_collapsed_is_presentational_only() {
    let lamp = make_lamp();
    lamp.borrow_mut().intensity = 2.5;
    let mut panel = ParameterPanel::new();
    let folder = panel.add_group(panel.root(), "Folder").unwrap();
    let id = panel
        .add_control(
            folder,
            "Intensity",
            INTENSITY_RANGE,
            intensity_binding(&lamp),
            None,
        )
        .unwrap();

    assert!(!panel.is_collapsed(folder).unwrap(), "groups start expanded");
    panel.set_collapsed(folder, true).unwrap();
    assert!(panel.is_collapsed(folder).unwrap());
    assert_eq!(
        panel.value(id),
        Some(ControlValue::Number(2.5)),
        "collapsing must not touch bound values"
    );
}

#[test]
fn ids_from_another_panel_are_unknown() {
    let lamp = make_lamp();
    let mut panel_a = ParameterPanel::new();
    let foreign_group = panel_a.add_group(panel_a.root(), "Folder").unwrap();
    let foreign_control = panel_a
        .add_control(
            panel_a.root(),
            "Intensity",
            INTENSITY_RANGE,
            intensity_binding(&lamp),
            None,
        )
        .unwrap();

    let mut panel_b = ParameterPanel::new();
    let err = panel_b
        .set_value(foreign_control, ControlValue::Number(1.0))
        .unwrap_err();
    assert!(matches!(err, PanelError::UnknownControl));
    let err = panel_b.add_group(foreign_group, "Orphan").unwrap_err();
    assert!(matches!(err, PanelError::UnknownGroup));
}

#[test]
fn write_to_dropped_target_is_a_quiet_no_op() {
    let lamp = make_lamp();
    let mut panel = ParameterPanel::new();
    let fired: Rc<RefCell<u32>> = Rc::new(RefCell::new(0));
    let fired_cb = fired.clone();
    let id = panel
        .add_control(
            panel.root(),
            "Intensity",
            INTENSITY_RANGE,
            intensity_binding(&lamp),
            Some(Box::new(move |_| *fired_cb.borrow_mut() += 1)),
        )
        .unwrap();
    drop(lamp);

    // the scene governs target lifetime; a late write must not error out
    let applied = panel.set_value(id, ControlValue::Number(1.0)).unwrap();
    assert_eq!(applied, ControlValue::Number(1.0));
    assert_eq!(*fired.borrow(), 0, "callback only fires after a real write");
    assert_eq!(panel.value(id), None, "reads report the target as gone");
}
