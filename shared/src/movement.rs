//! The deterministic character movement simulator.
//!
//! `step` is a pure function of (state, input, dt) against static world
//! geometry: no clocks, no randomness, no hidden fields. The same input
//! sequence applied to the same starting state produces bit-identical results
//! on every machine running the same build, which is what lets the client
//! replay unacknowledged inputs on top of a server state and land exactly
//! where the server will.

use crate::collide::{slide, CollisionShape, Sweep, SweepCollider};
use crate::config::MovementConfig;
use crate::input::TickInput;
use crate::transform::Transform;
use glam::{Quat, Vec3};
use log::warn;
use serde::{Deserialize, Serialize};

/// Full movement state of one character.
///
/// Owned by exactly one simulation at a time (the server's authority loop, or
/// a client's predictor) and advanced only through [`MovementSimulator::step`].
/// It is `Copy` on purpose: state moves between components by value, never by
/// shared reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementState {
    /// Body root transform; origin is at the feet.
    #[serde(default)]
    pub transform: Transform,
    /// Head transform: pitch rotation, origin at eye height plus the
    /// decaying stair offset.
    #[serde(default)]
    pub head: Transform,
    /// Body orientation: yaw only.
    #[serde(default)]
    pub body: Transform,
    #[serde(default)]
    pub velocity: Vec3,
    /// Vertical component tracked separately so the ground branch can zero
    /// it without touching the slide result.
    #[serde(default)]
    pub vertical_velocity: f32,
    /// Normalized intended horizontal move direction, zero when idle.
    #[serde(default)]
    pub wish_dir: Vec3,
    /// Accumulated gravity since the character last stood on the floor.
    #[serde(default)]
    pub gravity_accum: Vec3,
    /// Snap vector fed to the slide move to keep contact with sloped ground.
    #[serde(default)]
    pub snap: Vec3,
    /// Cosmetic offset left over from a stair step, decayed over time. Part
    /// of the state because camera smoothing consumes it.
    #[serde(default)]
    pub head_offset: Vec3,
    #[serde(default)]
    pub floor_normal: Vec3,
    #[serde(default)]
    pub on_floor: bool,
    #[serde(default)]
    pub on_ceiling: bool,
    /// True on ticks where a stair probe displaced the character.
    #[serde(default)]
    pub is_step: bool,
    #[serde(default)]
    pub tick: u64,
}

impl Default for MovementState {
    fn default() -> Self {
        Self::spawn(Vec3::ZERO)
    }
}

impl MovementState {
    /// A character at rest at `origin`, falling until the first floor contact.
    pub fn spawn(origin: Vec3) -> Self {
        Self {
            transform: Transform::from_origin(origin),
            head: Transform::from_origin(origin),
            body: Transform::from_origin(origin),
            velocity: Vec3::ZERO,
            vertical_velocity: 0.0,
            wish_dir: Vec3::ZERO,
            gravity_accum: Vec3::ZERO,
            snap: Vec3::ZERO,
            head_offset: Vec3::ZERO,
            floor_normal: Vec3::Y,
            on_floor: false,
            on_ceiling: false,
            is_step: false,
            tick: 0,
        }
    }

    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }

    /// Component-wise blend towards `other`, used by the snapshot buffer.
    /// Transforms lerp/slerp, vectors and scalars lerp, contact flags take
    /// the newer side.
    pub fn interpolate(&self, other: &Self, weight: f32) -> Self {
        Self {
            transform: self.transform.interpolate(&other.transform, weight),
            head: self.head.interpolate(&other.head, weight),
            body: self.body.interpolate(&other.body, weight),
            velocity: self.velocity.lerp(other.velocity, weight),
            vertical_velocity: self.vertical_velocity
                + (other.vertical_velocity - self.vertical_velocity) * weight,
            wish_dir: self.wish_dir.lerp(other.wish_dir, weight),
            gravity_accum: self.gravity_accum.lerp(other.gravity_accum, weight),
            snap: self.snap.lerp(other.snap, weight),
            head_offset: self.head_offset.lerp(other.head_offset, weight),
            floor_normal: other.floor_normal,
            on_floor: other.on_floor,
            on_ceiling: other.on_ceiling,
            is_step: other.is_step,
            tick: other.tick,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.transform.is_finite()
            && self.velocity.is_finite()
            && self.vertical_velocity.is_finite()
    }
}

/// Quake-style acceleration: project velocity onto the wish direction, then
/// add at most `acceleration * dt`, capped so the projection never exceeds
/// `max_speed`.
///
/// Because the cap only looks at the projected speed, steering the wish
/// direction away from the current velocity lets total speed grow past the
/// cap. That is the original air-strafing behavior, kept intact.
pub fn accelerate(wish_dir: Vec3, velocity: Vec3, acceleration: f32, max_speed: f32, dt: f32) -> Vec3 {
    let current_speed = velocity.dot(wish_dir);
    let add_speed = (max_speed - current_speed).clamp(0.0, acceleration * dt);
    velocity + wish_dir * add_speed
}

/// Scales horizontal velocity down by `factor` per second. Below 0.1 the
/// character stops dead, and anything slower than a hundredth of the max
/// speed is snapped to zero so the walk never tails off asymptotically.
pub fn friction(velocity: Vec3, factor: f32, max_speed: f32, dt: f32) -> Vec3 {
    let speed = velocity.length();
    if speed < 0.1 {
        return Vec3::new(0.0, velocity.y, 0.0);
    }

    let drop = speed * factor * dt;
    let new_speed = (speed - drop).max(0.0) / speed;

    let scaled = velocity * new_speed;
    if scaled.length() < max_speed / 100.0 {
        Vec3::ZERO
    } else {
        scaled
    }
}

enum DownProbe {
    /// Walked over a lower tread; `drop` is the downward travel to it.
    Step { drop: Vec3 },
    /// No floor within a step height ahead; the character is leaving the
    /// ground for real.
    Falling,
    None,
}

/// Advances [`MovementState`] values against a collision world.
///
/// Holds only immutable inputs of the simulation (geometry, shape, tunables),
/// so one simulator instance can serve any number of characters.
#[derive(Debug, Clone)]
pub struct MovementSimulator<W> {
    world: W,
    shape: CollisionShape,
    config: MovementConfig,
}

impl<W: SweepCollider> MovementSimulator<W> {
    pub fn new(world: W, config: MovementConfig) -> Self {
        Self {
            world,
            shape: CollisionShape::character(),
            config,
        }
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    /// Advances one tick. Malformed inputs (any non-finite float) leave the
    /// previous state untouched; that is the recoverable path for junk off
    /// the wire, not an error the caller has to handle.
    pub fn step(&self, state: &MovementState, input: &TickInput, dt: f32) -> MovementState {
        if let Err(e) = input.validate() {
            warn!("dropping malformed input: {}", e);
            return *state;
        }

        let cfg = &self.config;
        let mut next = *state;
        next.tick = state.tick.wrapping_add(1);
        next.is_step = false;

        // Look rotation from the accumulated mouse deltas. Yaw turns the
        // body, pitch tilts the head, clamped to just short of vertical.
        let (dx, dy) = input.mouse_total();
        let yaw = state.body.yaw() + (dx * cfg.mouse_sensitivity).to_radians();
        let pitch = (state.head.pitch() + (dy * cfg.mouse_sensitivity).to_radians())
            .clamp((-89.0f32).to_radians(), 89.0f32.to_radians());
        next.body.rotation = Quat::from_rotation_y(yaw);
        next.head.rotation = Quat::from_rotation_x(pitch);

        next.wish_dir = {
            let axes = Vec3::new(input.strafe, 0.0, input.forward);
            if axes == Vec3::ZERO {
                Vec3::ZERO
            } else {
                (next.body.rotation * axes).normalize()
            }
        };

        if state.on_floor {
            if input.jump {
                // Launch tick: zero the snap so the slide move can leave the
                // floor, and run one air acceleration step, the way Quake
                // treats the lift-off frame as already airborne.
                next.snap = Vec3::ZERO;
                next.vertical_velocity = cfg.jump_impulse;
                next.velocity = self.move_air(next.wish_dir, state.velocity, next.vertical_velocity, dt);
                next.gravity_accum = state.gravity_accum + Vec3::NEG_Y * cfg.gravity * dt;
            } else {
                next.vertical_velocity = 0.0;
                next.snap = -state.floor_normal;
                next.velocity =
                    self.move_ground(next.wish_dir, state.velocity, next.vertical_velocity, dt);
                next.gravity_accum = Vec3::ZERO;
            }
        } else {
            next.snap = Vec3::NEG_Y;
            next.vertical_velocity = state.vertical_velocity
                - if state.vertical_velocity >= cfg.terminal_velocity {
                    cfg.gravity * dt
                } else {
                    0.0
                };
            next.velocity = self.move_air(next.wish_dir, state.velocity, next.vertical_velocity, dt);
            next.gravity_accum = state.gravity_accum + Vec3::NEG_Y * cfg.gravity * dt;
        }

        if state.on_ceiling {
            next.vertical_velocity = 0.0;
        }

        // Stair climbing runs only while not falling freely.
        if next.gravity_accum.y >= 0.0 {
            if let Some(lift) = self.step_probe(next.transform.origin, next.velocity, dt) {
                next.head_offset = lift;
                next.transform.origin += lift;
                next.is_step = true;
            }
        }

        let mut is_falling = false;
        if !next.is_step && state.on_floor {
            match self.down_step_probe(next.transform.origin, next.velocity, dt) {
                DownProbe::Step { drop } => {
                    // The snap in the slide move does the actual pull-down;
                    // the probe only feeds the camera offset.
                    next.head_offset = drop;
                    next.is_step = true;
                }
                DownProbe::Falling => is_falling = true,
                DownProbe::None => {}
            }
        }

        if !next.is_step {
            next.head_offset = next.head_offset.lerp(
                Vec3::ZERO,
                dt * next.velocity.length() * cfg.stairs_smoothing,
            );
        }

        if is_falling {
            next.snap = Vec3::ZERO;
        }

        let moved = self.world.move_and_slide(
            &self.shape,
            &next.transform,
            next.velocity,
            next.snap,
            Vec3::Y,
            cfg.max_slides,
            cfg.floor_max_angle(),
            dt,
        );
        next.transform.origin = moved.origin;
        next.velocity = moved.velocity;
        next.on_floor = moved.on_floor;
        next.on_ceiling = moved.on_ceiling;
        next.floor_normal = moved.floor_normal;

        next.body.origin = next.transform.origin;
        next.head.origin = next.transform.origin + Vec3::Y * cfg.eye_height + next.head_offset;

        next
    }

    // Friction, then acceleration, on the horizontal components only.
    fn move_ground(&self, wish_dir: Vec3, velocity: Vec3, vertical: f32, dt: f32) -> Vec3 {
        let cfg = &self.config;
        let mut horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
        horizontal = friction(horizontal, cfg.friction, cfg.max_speed, dt);
        horizontal = accelerate(wish_dir, horizontal, cfg.acceleration, cfg.max_speed, dt);
        horizontal.y = vertical;
        horizontal
    }

    // No friction in the air, and a much lower speed cap.
    fn move_air(&self, wish_dir: Vec3, velocity: Vec3, vertical: f32, dt: f32) -> Vec3 {
        let cfg = &self.config;
        let mut horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
        horizontal = accelerate(wish_dir, horizontal, cfg.acceleration, cfg.max_air_speed, dt);
        horizontal.y = vertical;
        horizontal
    }

    fn sweep_from(&self, origin: Vec3, motion: Vec3) -> Sweep {
        self.world
            .sweep(&self.shape, &Transform::from_origin(origin), motion)
    }

    /// Probes for a climbable ledge: sweep up, forward, then back down, at up
    /// to `step_check_count` shrinking heights. Returns the upward lift to
    /// apply when a probe lands on an acceptable surface.
    fn step_probe(&self, origin: Vec3, velocity: Vec3, dt: f32) -> Option<Vec3> {
        let cfg = &self.config;
        let full = Vec3::Y * cfg.step_height;
        let fraction = full / cfg.step_check_count.max(1) as f32;
        let motion = velocity * dt;
        let slope_max = cfg.step_max_slope();
        let margin = cfg.wall_margin;

        for i in 0..cfg.step_check_count {
            let step = full - fraction * i as f32;
            let up = self.sweep_from(origin, step);
            if up.collided && up.normal.y < 0.0 {
                // Overhead geometry; a shorter probe may still fit.
                continue;
            }

            let lift = if !up.collided {
                self.forward_then_down(origin + step, motion, step, slope_max, margin)
            } else {
                // Blocked at the lip by a wall: nudge off it and retry with
                // the motion slid along the wall.
                let wall = up.normal;
                let nudged = origin + wall * margin;
                let up_retry = self.sweep_from(nudged, step);
                if up_retry.collided {
                    None
                } else {
                    self.forward_then_down(nudged + step, slide(motion, wall), step, slope_max, margin)
                }
            };

            if lift.is_some() {
                return lift;
            }
        }
        None
    }

    // From a raised origin, sweep the tick's motion and then back down; the
    // step is accepted when the downward sweep lands on a surface within the
    // slope limit, and the un-descended remainder becomes the lift.
    fn forward_then_down(
        &self,
        origin: Vec3,
        motion: Vec3,
        step: Vec3,
        slope_max: f32,
        margin: f32,
    ) -> Option<Vec3> {
        let forward = self.sweep_from(origin, motion);
        let landing = if !forward.collided {
            origin + motion
        } else {
            // Hit a wall halfway: slide the motion along it and try once more.
            let wall = forward.normal;
            let nudged = origin + wall * margin;
            let slid = slide(motion, wall);
            let retry = self.sweep_from(nudged, slid);
            if retry.collided {
                return None;
            }
            nudged + slid
        };

        let down = self.sweep_from(landing, -step);
        if down.collided && down.normal.angle_between(Vec3::Y) <= slope_max {
            Some(-down.remainder)
        } else {
            None
        }
    }

    /// Grounded and not climbing: check whether the tick's motion walks off
    /// a ledge. A tread within a step height below keeps the character glued
    /// (the snap handles the pull-down); no floor at all means it is falling.
    fn down_step_probe(&self, origin: Vec3, velocity: Vec3, dt: f32) -> DownProbe {
        let cfg = &self.config;
        let step = Vec3::Y * cfg.step_height;
        let motion = velocity * dt;
        let slope_max = cfg.step_max_slope();

        let forward = self.sweep_from(origin, motion);
        let landing = if !forward.collided {
            origin + motion
        } else if forward.normal.y == 0.0 {
            let wall = forward.normal;
            let nudged = origin + wall * cfg.wall_margin;
            let slid = slide(motion, wall);
            let retry = self.sweep_from(nudged, slid);
            if retry.collided {
                return DownProbe::None;
            }
            nudged + slid
        } else {
            return DownProbe::None;
        };

        let down = self.sweep_from(landing, -step);
        if !down.collided {
            DownProbe::Falling
        } else if down.normal.angle_between(Vec3::Y) <= slope_max
            && down.travel.length_squared() > 1e-6
        {
            // A measurable drop; touching-in-place is not a step.
            DownProbe::Step { drop: down.travel }
        } else {
            DownProbe::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Aabb, BoxWorld};
    use assert_approx_eq::assert_approx_eq;

    const DT: f32 = 1.0 / 60.0;

    fn simulator() -> MovementSimulator<BoxWorld> {
        MovementSimulator::new(BoxWorld::flat(0.0), MovementConfig::default())
    }

    fn grounded_state(sim: &MovementSimulator<BoxWorld>) -> MovementState {
        // Let a spawned character settle onto the floor.
        let mut state = MovementState::spawn(Vec3::new(0.0, 0.5, 0.0));
        let idle = TickInput::new(0.0, 0.0);
        for _ in 0..30 {
            state = sim.step(&state, &idle, DT);
        }
        assert!(state.on_floor, "character should have landed");
        state
    }

    #[test]
    fn test_accelerate_caps_projected_speed() {
        let wish = Vec3::new(1.0, 0.0, 0.0);
        let mut velocity = Vec3::ZERO;
        for _ in 0..600 {
            velocity = accelerate(wish, velocity, 60.0, 10.0, DT);
            assert!(velocity.dot(wish) <= 10.0 + 1e-4);
        }
        assert_approx_eq!(velocity.x, 10.0, 1e-3);
    }

    #[test]
    fn test_accelerate_full_add_when_slow() {
        let wish = Vec3::new(0.0, 0.0, 1.0);
        let out = accelerate(wish, Vec3::ZERO, 60.0, 10.0, DT);
        assert_approx_eq!(out.z, 1.0, 1e-5); // 60 * dt
    }

    #[test]
    fn test_friction_converges_to_exact_zero() {
        let mut velocity = Vec3::new(8.0, 0.0, 0.0);
        let mut ticks = 0;
        while velocity != Vec3::ZERO {
            velocity = friction(velocity, 6.0, 10.0, DT);
            assert!(velocity.length() >= 0.0);
            ticks += 1;
            assert!(ticks < 1000, "friction never reached zero");
        }
        // And it stays there.
        assert_eq!(friction(velocity, 6.0, 10.0, DT), Vec3::ZERO);
    }

    #[test]
    fn test_friction_stops_below_threshold() {
        let velocity = Vec3::new(0.05, 0.0, 0.0);
        assert_eq!(friction(velocity, 6.0, 10.0, DT), Vec3::ZERO);
    }

    #[test]
    fn test_ground_run_approaches_max_speed_monotonically() {
        let sim = simulator();
        let mut state = grounded_state(&sim);
        let input = TickInput::new(1.0, 0.0);

        let mut previous = 0.0;
        for _ in 0..60 {
            state = sim.step(&state, &input, DT);
            let speed = state.horizontal_speed();
            assert!(speed <= 10.0 + 1e-3);
            assert!(
                speed > previous || (10.0 - speed) < 0.5,
                "speed should rise until near the cap"
            );
            previous = speed;
        }
        assert!(previous > 8.5);
    }

    #[test]
    fn test_jump_launch_sets_exact_impulse_and_clears_snap() {
        let sim = simulator();
        let state = grounded_state(&sim);
        let input = TickInput::new(0.0, 0.0).with_jump(true, false);

        let launched = sim.step(&state, &input, DT);
        assert_eq!(launched.vertical_velocity, 8.0);
        assert_eq!(launched.snap, Vec3::ZERO);
        assert!(!launched.on_floor);
        assert!(launched.gravity_accum.y < 0.0);
    }

    #[test]
    fn test_airborne_gravity_respects_terminal_velocity() {
        let sim = simulator();
        let mut state = MovementState::spawn(Vec3::new(0.0, 500.0, 0.0));
        let idle = TickInput::new(0.0, 0.0);

        for _ in 0..2000 {
            state = sim.step(&state, &idle, DT);
            if state.on_floor {
                break;
            }
            assert!(state.vertical_velocity >= sim.config().terminal_velocity - sim.config().gravity * DT);
        }
    }

    #[test]
    fn test_grounded_resets_gravity_accumulator() {
        let sim = simulator();
        let state = grounded_state(&sim);
        let next = sim.step(&state, &TickInput::new(0.0, 0.0), DT);
        assert_eq!(next.gravity_accum, Vec3::ZERO);
        assert_eq!(next.vertical_velocity, 0.0);
        assert_eq!(next.snap, -Vec3::Y * 1.0);
    }

    #[test]
    fn test_air_speed_cap_is_much_lower() {
        let sim = simulator();
        let mut state = MovementState::spawn(Vec3::new(0.0, 50.0, 0.0));
        let input = TickInput::new(1.0, 0.0);

        for _ in 0..30 {
            state = sim.step(&state, &input, DT);
        }
        // Pure strafing in the air only reaches max_air_speed.
        assert!(state.horizontal_speed() <= sim.config().max_air_speed + 1e-3);
    }

    #[test]
    fn test_malformed_input_keeps_previous_state() {
        let sim = simulator();
        let state = grounded_state(&sim);

        let mut bad = TickInput::new(1.0, 0.0).with_sequence(9);
        bad.strafe = f32::NAN;
        let next = sim.step(&state, &bad, DT);
        assert_eq!(next, state);
    }

    #[test]
    fn test_step_probe_climbs_low_ledge() {
        let world = BoxWorld::flat(0.0).with_block(Aabb::new(
            Vec3::new(1.0, 0.0, -4.0),
            Vec3::new(40.0, 0.3, 4.0),
        ));
        let sim = MovementSimulator::new(world, MovementConfig::default());

        let mut state = MovementState::spawn(Vec3::new(0.0, 0.01, 0.0));
        let idle = TickInput::new(0.0, 0.0);
        for _ in 0..10 {
            state = sim.step(&state, &idle, DT);
        }
        assert!(state.on_floor);

        let input = TickInput::new(1.0, 0.0);
        let mut stepped = false;
        for _ in 0..120 {
            state = sim.step(&state, &input, DT);
            if state.is_step {
                stepped = true;
            }
        }
        assert!(stepped, "low ledge should be climbed, not treated as a wall");
        assert!(state.transform.origin.y > 0.25, "character should stand on the ledge");
        assert!(state.transform.origin.x > 1.0);
    }

    #[test]
    fn test_tall_wall_is_not_climbed() {
        let world = BoxWorld::flat(0.0).with_block(Aabb::new(
            Vec3::new(2.0, 0.0, -4.0),
            Vec3::new(4.0, 3.0, 4.0),
        ));
        let sim = MovementSimulator::new(world, MovementConfig::default());

        let mut state = MovementState::spawn(Vec3::new(0.0, 0.01, 0.0));
        let input = TickInput::new(1.0, 0.0);
        for _ in 0..180 {
            state = sim.step(&state, &input, DT);
        }
        // Stopped at the wall (shape half-width 0.4), still on the ground.
        assert!(state.transform.origin.x < 1.7);
        assert!(state.transform.origin.y < 0.1);
    }

    #[test]
    fn test_mouse_deltas_turn_body_and_clamp_pitch() {
        let sim = simulator();
        let state = grounded_state(&sim);

        // 0.05 sensitivity: 200 counts = 10 degrees of yaw.
        let input = TickInput::new(0.0, 0.0).with_mouse(vec![crate::input::MouseDelta {
            dx: 200.0,
            dy: 10_000.0,
        }]);
        let next = sim.step(&state, &input, DT);
        assert_approx_eq!(next.body.yaw(), 10.0f32.to_radians(), 1e-4);
        assert_approx_eq!(next.head.pitch(), 89.0f32.to_radians(), 1e-4);
    }

    #[test]
    fn test_wish_dir_rotates_with_yaw() {
        let sim = simulator();
        let mut state = grounded_state(&sim);
        // Face 90 degrees left first.
        let turn = TickInput::new(0.0, 0.0).with_mouse(vec![crate::input::MouseDelta {
            dx: 1800.0,
            dy: 0.0,
        }]);
        state = sim.step(&state, &turn, DT);

        let forward = TickInput::new(0.0, 1.0);
        let next = sim.step(&state, &forward, DT);
        // +Z forward rotated 90 degrees around Y points along +X.
        assert_approx_eq!(next.wish_dir.x, 1.0, 1e-3);
        assert_approx_eq!(next.wish_dir.z, 0.0, 1e-3);
    }

    #[test]
    fn test_step_is_reproducible_bit_for_bit() {
        let sim = simulator();
        let initial = grounded_state(&sim);

        let inputs: Vec<TickInput> = (0..120)
            .map(|i| {
                TickInput::new(if i % 3 == 0 { 1.0 } else { -0.5 }, 1.0)
                    .with_sequence(i + 1)
                    .with_jump(i % 40 == 0, false)
            })
            .collect();

        let run = |start: MovementState| {
            let mut state = start;
            for input in &inputs {
                state = sim.step(&state, input, DT);
            }
            state
        };

        let a = run(initial);
        let b = run(initial);
        assert_eq!(a, b);
        assert_eq!(a.transform.origin.x.to_bits(), b.transform.origin.x.to_bits());
        assert_eq!(a.velocity.z.to_bits(), b.velocity.z.to_bits());
    }

    #[test]
    fn test_interpolate_endpoints_reproduce_states() {
        let sim = simulator();
        let a = grounded_state(&sim);
        let mut b = a;
        b.transform.origin += Vec3::new(4.0, 0.0, 2.0);
        b.velocity = Vec3::new(3.0, 0.0, 0.0);

        let at_zero = a.interpolate(&b, 0.0);
        assert_approx_eq!(at_zero.transform.origin.x, a.transform.origin.x, 1e-5);

        let at_one = a.interpolate(&b, 1.0);
        assert_approx_eq!(at_one.transform.origin.x, b.transform.origin.x, 1e-5);

        let mid = a.interpolate(&b, 0.5);
        assert_approx_eq!(
            mid.transform.origin.x,
            (a.transform.origin.x + b.transform.origin.x) / 2.0,
            1e-5
        );
        assert_approx_eq!(mid.velocity.x, 1.5, 1e-5);
    }
}
