//! Shadow approximation policy.
//!
//! A caster either casts into the real shadow-map pass or drags a flat
//! semi-transparent decal along the ground; never both. The decal's pose and
//! opacity are recomputed from the caster's position once per frame.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;

use crate::constants::DECAL_LIFT;
use crate::error::ConfigError;

/// Which shadow technique the scene is currently using.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadowMode {
    RealShadowMaps,
    FakeDecal,
}

/// Flat decal standing in for a shadow-map render pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowDecal {
    pub position: Vec3,
    pub opacity: f32,
    pub visible: bool,
}

/// A tracked caster paired with its decal.
///
/// `position` is mutated by the animation each frame; `base_height` is the
/// resting ground-contact height the opacity falloff is normalized against.
pub struct CasterRig {
    pub position: Vec3,
    pub base_height: f32,
    pub cast_shadow: bool,
    pub decal: ShadowDecal,
}

impl CasterRig {
    pub fn new(position: Vec3, base_height: f32) -> Self {
        CasterRig {
            position,
            base_height,
            cast_shadow: false,
            decal: ShadowDecal {
                position,
                opacity: 0.0,
                visible: false,
            },
        }
    }
}

/// Per-frame decal computation plus the atomic mode switch.
#[derive(Debug)]
pub struct ShadowApproximator {
    mode: ShadowMode,
    ground_y: f32,
    opacity_scale: f32,
}

impl ShadowApproximator {
    pub fn new(mode: ShadowMode, ground_y: f32, opacity_scale: f32) -> Result<Self, ConfigError> {
        if !ground_y.is_finite() {
            return Err(ConfigError::NonFinite { name: "ground_y" });
        }
        if !opacity_scale.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "opacity_scale",
            });
        }
        if opacity_scale == 0.0 {
            // would pin opacity to 0 and silently hide every decal
            return Err(ConfigError::ZeroOpacityScale);
        }
        Ok(ShadowApproximator {
            mode,
            ground_y,
            opacity_scale,
        })
    }

    #[inline]
    pub fn mode(&self) -> ShadowMode {
        self.mode
    }

    /// Decal pose and opacity for a caster at `position`, as a pure function.
    ///
    /// Height below `base_height` clamps to the ground-contact maximum, so
    /// opacity stays within `[0, 1]` and is non-increasing in height.
    pub fn decal_for(&self, position: Vec3, base_height: f32) -> (Vec3, f32) {
        let height_above_ground = (position.y - base_height).max(0.0);
        let opacity = ((1.0 - height_above_ground) * self.opacity_scale).clamp(0.0, 1.0);
        let decal_position = Vec3::new(position.x, self.ground_y + DECAL_LIFT, position.z);
        (decal_position, opacity)
    }

    /// Recompute a rig's decal from its current pose.
    ///
    /// Call once per caster per frame, after the pose update and before the
    /// frame renders. Idempotent for a fixed pose; never fails.
    pub fn update(&self, rig: &mut CasterRig) {
        let (position, opacity) = self.decal_for(rig.position, rig.base_height);
        rig.decal.position = position;
        rig.decal.opacity = opacity;
    }

    /// Apply the current mode's flag pair to a single rig.
    pub fn apply_mode(&self, rig: &mut CasterRig) {
        rig.cast_shadow = self.mode == ShadowMode::RealShadowMaps;
        rig.decal.visible = self.mode == ShadowMode::FakeDecal;
    }

    /// Switch technique for every registered rig before returning.
    ///
    /// All rigs are flipped within this call, so no frame can observe a
    /// mixed state across casters or a caster with both effects active.
    pub fn set_mode(&mut self, mode: ShadowMode, rigs: &[Rc<RefCell<CasterRig>>]) {
        self.mode = mode;
        for rig in rigs {
            self.apply_mode(&mut rig.borrow_mut());
        }
        log::info!("[shadow] mode switched to {mode:?} for {} casters", rigs.len());
    }
}
