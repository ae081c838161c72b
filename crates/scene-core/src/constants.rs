use glam::Vec3;

// Shared scene tuning constants used by the demo driver and tests.

// Ground plane
pub const GROUND_Y: f32 = -1.0; // world-space height of the receiving plane
pub const GROUND_SIZE: f32 = 12.0;

// Caster
pub const SPHERE_RADIUS: f32 = 1.0;
pub const SPHERE_REST_Y: f32 = GROUND_Y + SPHERE_RADIUS; // center height when resting

// Caster animation
pub const ORBIT_RADIUS: f32 = 1.5; // x/z circle the sphere drifts along
pub const BOUNCE_RATE: f32 = 3.0; // vertical sine frequency multiplier
pub const BOUNCE_HEIGHT: f32 = 1.0; // peak height above rest

// Fake-shadow decal
pub const DECAL_LIFT: f32 = 0.01; // offset above the plane to avoid z-fighting
pub const DECAL_OPACITY_SCALE: f32 = 0.3; // opacity at ground contact

// Default light placement and intensity
pub const AMBIENT_INTENSITY: f32 = 1.0;
pub const DIRECTIONAL_INTENSITY: f32 = 1.0;
pub const DIRECTIONAL_POSITION: [f32; 3] = [2.0, 2.0, -1.0];
pub const SPOT_INTENSITY: f32 = 10.0;
pub const SPOT_POSITION: [f32; 3] = [-3.0, 2.0, -2.0];
pub const POINT_INTENSITY: f32 = 5.0;
pub const POINT_POSITION: [f32; 3] = [-1.0, 3.0, 0.0];

// Panel slider ranges (intensity sliders)
pub const SOFT_LIGHT_INTENSITY_MAX: f32 = 5.0; // ambient, directional
pub const STRONG_LIGHT_INTENSITY_MAX: f32 = 20.0; // spot, point
pub const INTENSITY_STEP: f32 = 0.01;

#[inline]
pub fn directional_position() -> Vec3 {
    Vec3::from(DIRECTIONAL_POSITION)
}

#[inline]
pub fn spot_position() -> Vec3 {
    Vec3::from(SPOT_POSITION)
}

#[inline]
pub fn point_position() -> Vec3 {
    Vec3::from(POINT_POSITION)
}
