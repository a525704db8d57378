//! Server-authoritative movement: the per-player shadow simulation that
//! reproduces, tick by tick, where the server believes the player should be.

pub mod collide;
pub mod simulate;

use glam::Vec3;
use vigil_utils::Aabb;

/// Collision box width of a player.
pub const PLAYER_WIDTH: f32 = 0.6;
/// Collision box height of a player.
pub const PLAYER_HEIGHT: f32 = 1.8;
/// Eye height above the feet; wire positions are at eye level.
pub const EYE_HEIGHT: f32 = 1.62;

/// Velocity components smaller than this are treated as zero.
pub const MOVEMENT_DEADZONE: f32 = 0.003;
/// Downward acceleration per tick.
pub const GRAVITY: f32 = 0.08;
/// Drag applied to vertical velocity after gravity.
pub const GRAVITY_MULTIPLIER: f32 = 0.98;
/// Initial vertical velocity of a jump.
pub const JUMP_VELOCITY: f32 = 0.42;
/// Ticks between jumps while the jump key is held.
pub const JUMP_COOLDOWN_TICKS: i32 = 10;
/// Base ground movement speed per tick.
pub const BASE_SPEED: f32 = 0.1;
/// Speed multiplier while sprinting.
pub const SPRINT_SPEED_MULTIPLIER: f32 = 1.3;
/// Base airborne movement speed per tick.
pub const FLYING_SPEED: f32 = 0.02;
/// Airborne speed bonus while sprinting.
pub const SPRINT_FLYING_BONUS: f32 = 0.006;
/// Height of a lip the client steps over without jumping.
pub const STEP_HEIGHT: f32 = 0.6;
/// Per-tick decay factor of the accumulated step-clip offset.
pub const STEP_CLIP_MULTIPLIER: f32 = 0.4;
/// Ground friction base, multiplied by the stood-on block's factor.
pub const BASE_GROUND_FRICTION: f32 = 0.6;
/// Horizontal speed clamp while on a climbable block.
pub const CLIMB_CLAMP: f32 = 0.2;
/// Feet below this Y are in the void; the simulation is exempt there.
pub const VOID_LEVEL: f32 = -35.0;
/// Ticks a player must have spent in a loaded chunk before a full
/// simulation step is attempted.
pub const LOADED_CHUNK_GRACE_TICKS: u32 = 100;
/// Threshold below which two velocity components compare equal.
pub const FLOAT_EQUAL_THRESHOLD: f32 = 1e-5;

/// Everything the movement simulation knows about one player.
///
/// `client_*` fields mirror what the client reported in its latest
/// authoritative input; `server_*` fields are the proxy's own prediction.
/// Positions here are at foot level; the eye offset is applied at the
/// packet boundary.
#[derive(Clone, Debug)]
pub struct MovementState {
    /// Forward input impulse, in [-0.98, 0.98].
    pub forward_impulse: f32,
    /// Strafe input impulse, in [-0.98, 0.98].
    pub strafe_impulse: f32,
    /// The jump key is held.
    pub jump_bind_pressed: bool,
    /// The sneak key is held.
    pub sneak_bind_pressed: bool,
    /// The sprint key is held.
    pub sprint_bind_pressed: bool,
    /// A jump was initiated this frame (edge trigger).
    pub jumping: bool,
    /// The player is sneaking.
    pub sneaking: bool,
    /// The player is sprinting.
    pub sprinting: bool,
    /// Ticks until the held jump key may trigger another jump.
    pub jump_cooldown_ticks: i32,

    /// Ground movement speed per tick, refreshed from attributes and
    /// effects each input.
    pub speed: f32,
    /// Airborne movement speed per tick.
    pub flying_speed: f32,
    /// Downward acceleration per tick.
    pub gravity: f32,
    /// Initial vertical velocity of a jump.
    pub jump_velocity: f32,
    /// Vertical distance recently gained by stepping, decaying each tick.
    /// Widens the correction threshold so smooth client step-ups are not
    /// punished.
    pub step_clip_offset: f32,

    /// Camera yaw in degrees.
    pub yaw: f32,
    /// Camera pitch in degrees.
    pub pitch: f32,

    /// The movement the client actually performed this frame.
    pub client_movement: Vec3,
    /// The movement the client predicted for this frame.
    pub client_predicted_movement: Vec3,
    /// The client's reported foot position.
    pub client_position: Vec3,
    /// The client's previous reported foot position.
    pub prev_client_position: Vec3,
    /// The proxy's predicted movement for this frame.
    pub server_movement: Vec3,
    /// The proxy's predicted movement for the previous frame, before
    /// gravity and friction were applied to it.
    pub prev_server_movement: Vec3,
    /// The instantaneous velocity from the latest knockback packet.
    pub server_sent_movement: Vec3,
    /// The proxy's predicted foot position.
    pub server_position: Vec3,

    /// The player ended the last step standing on something.
    pub on_ground: bool,
    /// Movement was clipped on X during the last step.
    pub x_collision: bool,
    /// Movement was clipped on Y during the last step.
    pub vertically_collided: bool,
    /// Movement was clipped on Z during the last step.
    pub z_collision: bool,
    /// Either horizontal axis was clipped during the last step.
    pub horizontally_collided: bool,
    /// A server-initiated teleport is in flight; corrections pause.
    pub teleporting: bool,
    /// The immobile actor flag is set.
    pub immobile: bool,
    /// The player is flying.
    pub flying: bool,
    /// The player clips through blocks.
    pub no_clip: bool,
    /// The player's feet are below the void level.
    pub in_void: bool,
    /// The player touches a world condition (liquids) the client-side
    /// rewind cannot correct through; the simulation snaps to the client.
    pub in_unsupported_rewind_scenario: bool,
    /// The previous step was exempt, so this step has no trustworthy
    /// previous state to simulate from.
    pub can_exempt: bool,

    /// Ticks since the server last sent a motion impulse.
    pub motion_ticks: u32,
    /// Ticks since the nearby blocks were last re-sent to the client.
    pub refresh_block_ticks: u32,
}

impl MovementState {
    /// Creates a state with vanilla movement attributes, exempt until the
    /// world around the player is known.
    #[must_use]
    pub fn new() -> Self {
        Self {
            forward_impulse: 0.0,
            strafe_impulse: 0.0,
            jump_bind_pressed: false,
            sneak_bind_pressed: false,
            sprint_bind_pressed: false,
            jumping: false,
            sneaking: false,
            sprinting: false,
            jump_cooldown_ticks: 0,
            speed: BASE_SPEED,
            flying_speed: FLYING_SPEED,
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            step_clip_offset: 0.0,
            yaw: 0.0,
            pitch: 0.0,
            client_movement: Vec3::ZERO,
            client_predicted_movement: Vec3::ZERO,
            client_position: Vec3::ZERO,
            prev_client_position: Vec3::ZERO,
            server_movement: Vec3::ZERO,
            prev_server_movement: Vec3::ZERO,
            server_sent_movement: Vec3::ZERO,
            server_position: Vec3::ZERO,
            on_ground: true,
            x_collision: false,
            vertically_collided: false,
            z_collision: false,
            horizontally_collided: false,
            teleporting: false,
            immobile: false,
            flying: false,
            no_clip: false,
            in_void: false,
            in_unsupported_rewind_scenario: false,
            can_exempt: true,
            motion_ticks: 1,
            refresh_block_ticks: 0,
        }
    }

    /// The player's collision box at the predicted position.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_dimensions(PLAYER_WIDTH, PLAYER_HEIGHT).translate(self.server_position)
    }

    /// Records a server-sent motion impulse; the next simulation step seeds
    /// its velocity from it.
    pub fn update_server_sent_velocity(&mut self, velocity: Vec3) {
        self.server_sent_movement = velocity;
        self.motion_ticks = 0;
    }

    /// Advances the per-tick counters at the end of a step.
    pub fn update_tick_status(&mut self) {
        self.motion_ticks += 1;
        self.refresh_block_ticks += 1;
        self.jump_cooldown_ticks -= 1;
    }

    /// The speed an input impulse converts into, given the current block
    /// friction: ground speed scales with the inverse cube of friction,
    /// airborne movement uses the flat flying speed.
    #[must_use]
    pub fn friction_influenced_speed(&self, block_friction: f32) -> f32 {
        if self.on_ground {
            self.speed * (0.546 / block_friction).powi(3)
        } else {
            self.flying_speed
        }
    }

    /// Abandons the prediction and adopts the client's reported state.
    pub fn snap_to_client(&mut self) {
        self.server_position = self.client_position;
        self.server_movement = self.client_predicted_movement;
    }
}

impl Default for MovementState {
    fn default() -> Self {
        Self::new()
    }
}
