use serde::{Deserialize, Serialize};

/// Tunables for the movement simulator.
///
/// Every constant that shapes how a character moves lives here and is supplied
/// from the outside (command line flags on the binaries, literals in tests).
/// Server and client must run with identical values or prediction diverges on
/// every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Max horizontal speed on the ground.
    pub max_speed: f32,
    /// Max speed the air acceleration steers towards. Deliberately tiny: this
    /// is what makes air strafing work the way it does in Quake.
    pub max_air_speed: f32,
    /// Acceleration factor shared by the ground and air branches.
    pub acceleration: f32,
    /// Ground friction factor.
    pub friction: f32,
    /// Vertical velocity applied on the jump launch tick.
    pub jump_impulse: f32,
    /// Gravity acceleration, positive down.
    pub gravity: f32,
    /// Fastest downward vertical velocity a character can reach.
    pub terminal_velocity: f32,
    /// Degrees of look rotation per accumulated mouse count.
    pub mouse_sensitivity: f32,
    /// Head height above the feet origin.
    pub eye_height: f32,
    /// Tallest ledge the stair probes will climb.
    pub step_height: f32,
    /// Number of shrinking probe heights tried per tick.
    pub step_check_count: u32,
    /// Max angle (degrees, from up) of a surface the step probe accepts.
    pub step_max_slope_deg: f32,
    /// Gap kept from walls when re-probing a blocked step.
    pub wall_margin: f32,
    /// Decay rate of the cosmetic head offset after a step.
    pub stairs_smoothing: f32,
    /// Collision bounces allowed in one slide move.
    pub max_slides: u32,
    /// Max angle (degrees, from up) a surface can have and still count as floor.
    pub floor_max_angle_deg: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            max_speed: 10.0,
            max_air_speed: 0.6,
            acceleration: 60.0,
            friction: 6.0,
            jump_impulse: 8.0,
            gravity: 9.8,
            terminal_velocity: -49.0,
            mouse_sensitivity: 0.05,
            eye_height: 1.6,
            step_height: 0.6,
            step_check_count: 2,
            step_max_slope_deg: 0.0,
            wall_margin: 0.001,
            stairs_smoothing: 2.5,
            max_slides: 4,
            floor_max_angle_deg: 46.0,
        }
    }
}

impl MovementConfig {
    pub fn step_max_slope(&self) -> f32 {
        self.step_max_slope_deg.to_radians()
    }

    pub fn floor_max_angle(&self) -> f32 {
        self.floor_max_angle_deg.to_radians()
    }
}
