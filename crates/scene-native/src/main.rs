//! Headless demo driver.
//!
//! Stands in for the renderer's frame loop: builds the demo scene, prints the
//! control tree, then ticks it in real time for a few seconds while poking
//! the panel the way a UI frontend would (slider drag, technique toggle).

use std::thread;
use std::time::Duration;

use instant::Instant;
use scene_core::{ControlValue, PanelEntry, ParameterPanel, SceneContext, ShadowMode};

const FRAME_INTERVAL_MS: u64 = 16;
const RUN_SECONDS: f32 = 6.0;
const TOGGLE_AT_SECONDS: f32 = 3.0;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut scene = SceneContext::new(ShadowMode::FakeDecal)?;
    print_tree(&scene.panel, scene.panel.root(), 0);

    // A couple of user-driven changes before the loop starts.
    scene
        .panel
        .set_value(scene.controls.ambient_intensity, ControlValue::Number(0.5))?;
    scene
        .panel
        .set_value(scene.controls.axes_helper, ControlValue::Bool(true))?;

    let start = Instant::now();
    let mut toggled = false;
    let mut last_report = 0u32;
    loop {
        let elapsed = start.elapsed().as_secs_f32();
        if elapsed >= RUN_SECONDS {
            break;
        }

        // halfway through, switch from the decal to real shadow maps
        if !toggled && elapsed >= TOGGLE_AT_SECONDS {
            scene
                .panel
                .set_value(scene.controls.real_shadows, ControlValue::Bool(true))?;
            toggled = true;
        }

        scene.tick(elapsed);

        let second = elapsed as u32;
        if second != last_report {
            last_report = second;
            let rig = scene.sphere.borrow();
            log::info!(
                "[demo] t={second}s sphere=({:.2}, {:.2}, {:.2}) decal opacity={:.3} visible={} cast_shadow={}",
                rig.position.x,
                rig.position.y,
                rig.position.z,
                rig.decal.opacity,
                rig.decal.visible,
                rig.cast_shadow,
            );
        }

        thread::sleep(Duration::from_millis(FRAME_INTERVAL_MS));
    }

    log::info!("[demo] done after {RUN_SECONDS}s");
    Ok(())
}

/// Render the control tree as indented text, the way a UI would lay it out.
fn print_tree(panel: &ParameterPanel, group: scene_core::GroupId, depth: usize) {
    let Ok(entries) = panel.children(group) else {
        return;
    };
    for entry in entries {
        let indent = "  ".repeat(depth);
        match entry {
            PanelEntry::Group {
                id,
                name,
                collapsed,
            } => {
                let marker = if collapsed { "+" } else { "-" };
                println!("{indent}{marker} {name}");
                print_tree(panel, id, depth + 1);
            }
            PanelEntry::Control {
                label, kind, value, ..
            } => {
                let value = match value {
                    Some(ControlValue::Number(n)) => format!("{n:.2}"),
                    Some(ControlValue::Bool(b)) => b.to_string(),
                    None => "<gone>".to_string(),
                };
                println!("{indent}  {label}: {value} ({kind:?})");
            }
        }
    }
}
