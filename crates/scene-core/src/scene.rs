//! Demo scene context: lights, ground, the bouncing caster, and the panel
//! wiring that exposes all of it for live tweaking.
//!
//! Everything here is plain data the host renderer consumes; no GPU types.
//! All scene objects are shared as `Rc<RefCell<..>>` so panel bindings can
//! write through to them without the panel owning anything.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;

use crate::constants::*;
use crate::error::PanelError;
use crate::panel::{Binding, ControlId, ControlKind, ControlValue, GroupId, ParameterPanel};
use crate::shadow::{CasterRig, ShadowApproximator, ShadowMode};

/// Shadow-map resolution and depth range for one shadow-casting light.
#[derive(Clone, Copy, Debug)]
pub struct ShadowMapSettings {
    pub map_size: u32,
    pub near: f32,
    pub far: f32,
}

pub struct AmbientLight {
    pub intensity: f32,
}

pub struct DirectionalLight {
    pub intensity: f32,
    pub position: Vec3,
    pub cast_shadow: bool,
    pub shadow: ShadowMapSettings,
}

pub struct SpotLight {
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub angle: f32,
    pub distance: f32,
    pub cast_shadow: bool,
    pub shadow: ShadowMapSettings,
}

pub struct PointLight {
    pub intensity: f32,
    pub position: Vec3,
    pub decay: f32,
    pub cast_shadow: bool,
    pub shadow: ShadowMapSettings,
}

/// Visibility flags for the debug gizmos, all hidden by default.
#[derive(Default)]
pub struct HelperFlags {
    pub axes: bool,
    pub directional_gizmo: bool,
    pub directional_shadow_cam: bool,
    pub spot_gizmo: bool,
    pub spot_shadow_cam: bool,
    pub point_gizmo: bool,
    pub point_shadow_cam: bool,
}

pub struct GroundPlane {
    pub size: f32,
    pub y: f32,
    pub receive_shadow: bool,
}

/// Panel-bound preference driving the mode switch callback.
pub struct ShadowPrefs {
    pub real_shadows: bool,
}

/// Handles to the controls the demo registers, for drivers and tests.
pub struct SceneControls {
    pub ambient_intensity: ControlId,
    pub directional_intensity: ControlId,
    pub spot_intensity: ControlId,
    pub point_intensity: ControlId,
    pub helpers_group: GroupId,
    pub axes_helper: ControlId,
    pub shadows_group: GroupId,
    pub real_shadows: ControlId,
}

/// Owns every live object in the demo and the panel bound to them.
pub struct SceneContext {
    pub ambient: Rc<RefCell<AmbientLight>>,
    pub directional: Rc<RefCell<DirectionalLight>>,
    pub spot: Rc<RefCell<SpotLight>>,
    pub point: Rc<RefCell<PointLight>>,
    pub helpers: Rc<RefCell<HelperFlags>>,
    pub ground: Rc<RefCell<GroundPlane>>,
    pub sphere: Rc<RefCell<CasterRig>>,
    pub rigs: Vec<Rc<RefCell<CasterRig>>>,
    pub shadows: Rc<RefCell<ShadowApproximator>>,
    pub shadow_prefs: Rc<RefCell<ShadowPrefs>>,
    pub panel: ParameterPanel,
    pub controls: SceneControls,
}

impl SceneContext {
    pub fn new(mode: ShadowMode) -> Result<Self, PanelError> {
        let ambient = Rc::new(RefCell::new(AmbientLight {
            intensity: AMBIENT_INTENSITY,
        }));
        let directional = Rc::new(RefCell::new(DirectionalLight {
            intensity: DIRECTIONAL_INTENSITY,
            position: directional_position(),
            cast_shadow: true,
            shadow: ShadowMapSettings {
                map_size: 512,
                near: 1.0,
                far: 10.0,
            },
        }));
        let spot = Rc::new(RefCell::new(SpotLight {
            intensity: SPOT_INTENSITY,
            position: spot_position(),
            target: Vec3::ZERO,
            angle: std::f32::consts::PI * 0.3,
            distance: 10.0,
            cast_shadow: true,
            shadow: ShadowMapSettings {
                map_size: 1024,
                near: 0.1,
                far: 10.0,
            },
        }));
        let point = Rc::new(RefCell::new(PointLight {
            intensity: POINT_INTENSITY,
            position: point_position(),
            decay: 2.0,
            cast_shadow: true,
            shadow: ShadowMapSettings {
                map_size: 1024,
                near: 0.1,
                far: 5.0,
            },
        }));
        let helpers = Rc::new(RefCell::new(HelperFlags::default()));
        let ground = Rc::new(RefCell::new(GroundPlane {
            size: GROUND_SIZE,
            y: GROUND_Y,
            receive_shadow: true,
        }));

        let sphere = Rc::new(RefCell::new(CasterRig::new(
            Vec3::new(0.0, SPHERE_REST_Y, 0.0),
            SPHERE_REST_Y,
        )));
        let rigs = vec![sphere.clone()];

        let shadows = Rc::new(RefCell::new(ShadowApproximator::new(
            mode,
            GROUND_Y,
            DECAL_OPACITY_SCALE,
        )?));
        shadows.borrow_mut().set_mode(mode, &rigs);
        // lights follow the same policy as the rigs
        let real = mode == ShadowMode::RealShadowMaps;
        apply_light_shadows(real, &directional, &spot, &point);

        let shadow_prefs = Rc::new(RefCell::new(ShadowPrefs { real_shadows: real }));

        let mut panel = ParameterPanel::new();
        let controls = wire_panel(
            &mut panel,
            &ambient,
            &directional,
            &spot,
            &point,
            &helpers,
            &shadows,
            &rigs,
            &shadow_prefs,
        )?;

        Ok(SceneContext {
            ambient,
            directional,
            spot,
            point,
            helpers,
            ground,
            sphere,
            rigs,
            shadows,
            shadow_prefs,
            panel,
            controls,
        })
    }

    /// Per-frame body the host frame driver calls.
    ///
    /// Ordering within a frame is strict: caster pose update first, then
    /// decal recomputation for every rig, then the host renders.
    pub fn tick(&mut self, elapsed_sec: f32) {
        {
            let mut rig = self.sphere.borrow_mut();
            rig.position.x = elapsed_sec.cos() * ORBIT_RADIUS;
            rig.position.z = elapsed_sec.sin() * ORBIT_RADIUS;
            rig.position.y =
                SPHERE_REST_Y + (elapsed_sec * BOUNCE_RATE).sin().abs() * BOUNCE_HEIGHT;
        }
        let shadows = self.shadows.borrow();
        for rig in &self.rigs {
            shadows.update(&mut rig.borrow_mut());
        }
    }
}

/// Flip the three shadow-casting lights to match the active technique.
/// Called at construction and from the panel's technique toggle.
fn apply_light_shadows(
    real: bool,
    directional: &Rc<RefCell<DirectionalLight>>,
    spot: &Rc<RefCell<SpotLight>>,
    point: &Rc<RefCell<PointLight>>,
) {
    directional.borrow_mut().cast_shadow = real;
    spot.borrow_mut().cast_shadow = real;
    point.borrow_mut().cast_shadow = real;
}

/// Register the demo's control layout: four intensity sliders at the root, a
/// "Helpers" folder of gizmo toggles, and a "Shadows" folder whose toggle
/// cascades the technique switch across every rig and light.
#[allow(clippy::too_many_arguments)]
fn wire_panel(
    panel: &mut ParameterPanel,
    ambient: &Rc<RefCell<AmbientLight>>,
    directional: &Rc<RefCell<DirectionalLight>>,
    spot: &Rc<RefCell<SpotLight>>,
    point: &Rc<RefCell<PointLight>>,
    helpers: &Rc<RefCell<HelperFlags>>,
    shadows: &Rc<RefCell<ShadowApproximator>>,
    rigs: &[Rc<RefCell<CasterRig>>],
    prefs: &Rc<RefCell<ShadowPrefs>>,
) -> Result<SceneControls, PanelError> {
    let root = panel.root();
    let soft = ControlKind::Range {
        min: 0.0,
        max: SOFT_LIGHT_INTENSITY_MAX,
        step: INTENSITY_STEP,
    };
    let strong = ControlKind::Range {
        min: 0.0,
        max: STRONG_LIGHT_INTENSITY_MAX,
        step: INTENSITY_STEP,
    };

    let ambient_intensity = panel.add_control(
        root,
        "Ambient Light Intensity",
        soft,
        Binding::number(ambient, |l| l.intensity, |l, v| l.intensity = v),
        None,
    )?;
    let directional_intensity = panel.add_control(
        root,
        "Directional Light Intensity",
        soft,
        Binding::number(directional, |l| l.intensity, |l, v| l.intensity = v),
        None,
    )?;
    let spot_intensity = panel.add_control(
        root,
        "Spot Light Intensity",
        strong,
        Binding::number(spot, |l| l.intensity, |l, v| l.intensity = v),
        None,
    )?;
    let point_intensity = panel.add_control(
        root,
        "Point Light Intensity",
        strong,
        Binding::number(point, |l| l.intensity, |l, v| l.intensity = v),
        None,
    )?;

    let helpers_group = panel.add_group(root, "Helpers")?;
    let axes_helper = panel.add_control(
        helpers_group,
        "Axes Helper",
        ControlKind::Toggle,
        Binding::toggle(helpers, |h| h.axes, |h, v| h.axes = v),
        None,
    )?;
    panel.add_control(
        helpers_group,
        "Directional Light Helper",
        ControlKind::Toggle,
        Binding::toggle(helpers, |h| h.directional_gizmo, |h, v| {
            h.directional_gizmo = v
        }),
        None,
    )?;
    panel.add_control(
        helpers_group,
        "Directional Light Camera Helper",
        ControlKind::Toggle,
        Binding::toggle(helpers, |h| h.directional_shadow_cam, |h, v| {
            h.directional_shadow_cam = v
        }),
        None,
    )?;
    panel.add_control(
        helpers_group,
        "Spot Light Helper",
        ControlKind::Toggle,
        Binding::toggle(helpers, |h| h.spot_gizmo, |h, v| h.spot_gizmo = v),
        None,
    )?;
    panel.add_control(
        helpers_group,
        "Spot Light Camera Helper",
        ControlKind::Toggle,
        Binding::toggle(helpers, |h| h.spot_shadow_cam, |h, v| h.spot_shadow_cam = v),
        None,
    )?;
    panel.add_control(
        helpers_group,
        "Point Light Helper",
        ControlKind::Toggle,
        Binding::toggle(helpers, |h| h.point_gizmo, |h, v| h.point_gizmo = v),
        None,
    )?;
    panel.add_control(
        helpers_group,
        "Point Light Camera Helper",
        ControlKind::Toggle,
        Binding::toggle(helpers, |h| h.point_shadow_cam, |h, v| h.point_shadow_cam = v),
        None,
    )?;

    let shadows_group = panel.add_group(root, "Shadows")?;
    let on_change = {
        let shadows = shadows.clone();
        let rigs = rigs.to_vec();
        let directional = directional.clone();
        let spot = spot.clone();
        let point = point.clone();
        Box::new(move |value: ControlValue| {
            let Some(on) = value.as_bool() else { return };
            let mode = if on {
                ShadowMode::RealShadowMaps
            } else {
                ShadowMode::FakeDecal
            };
            shadows.borrow_mut().set_mode(mode, &rigs);
            apply_light_shadows(on, &directional, &spot, &point);
        }) as Box<dyn FnMut(ControlValue)>
    };
    let real_shadows = panel.add_control(
        shadows_group,
        "Real Shadow Maps",
        ControlKind::Toggle,
        Binding::toggle(prefs, |p| p.real_shadows, |p, v| p.real_shadows = v),
        Some(on_change),
    )?;

    Ok(SceneControls {
        ambient_intensity,
        directional_intensity,
        spot_intensity,
        point_intensity,
        helpers_group,
        axes_helper,
        shadows_group,
        real_shadows,
    })
}
