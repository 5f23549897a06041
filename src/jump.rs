//! Jump shaping: coyote time, jump buffer, variable height and multi-jump.
//!
//! Rising vs falling is read from `velocity.y` (negative is up); the only
//! stored flags are the timers, the jump counter and `is_jump_held`.

use crate::body::KinematicBody;
use crate::config::JumpConfig;
use crate::types::{InputIntent, JumpKind};

/// Per-body jump bookkeeping.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct JumpState {
    pub jumps_remaining: u32,
    pub coyote_timer: f32,
    pub jump_buffer_timer: f32,
    pub is_jump_held: bool,
    /// Body's grounded flag at the end of the previous update.
    was_grounded: bool,
}

impl JumpState {
    pub fn new(cfg: &JumpConfig) -> Self {
        Self { jumps_remaining: cfg.max_jumps, ..Default::default() }
    }

    pub fn buffered(&self) -> bool {
        self.jump_buffer_timer > 0.0
    }

    pub fn in_coyote(&self) -> bool {
        self.coyote_timer > 0.0
    }
}

/// Grounded-edge outcome of [`JumpController::update`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct JumpUpdate {
    pub landed: bool,
    pub left_ground: bool,
    /// Buffered jump fired on landing.
    pub jump: Option<JumpKind>,
}

#[derive(Clone, Debug)]
pub struct JumpController {
    pub cfg: JumpConfig,
}

impl JumpController {
    pub fn new(cfg: JumpConfig) -> Self {
        Self { cfg }
    }

    /// Per-tick bookkeeping, run after collision has settled `body.grounded`.
    ///
    /// Timers tick down first; then the grounded edges are handled. Landing
    /// refills the jump counter and fires a pending buffered jump once.
    pub fn update(&self, state: &mut JumpState, body: &mut KinematicBody, dt: f32) -> JumpUpdate {
        let dt = dt.max(0.0);
        let coyote_before = state.coyote_timer;
        state.coyote_timer = (state.coyote_timer - dt).max(0.0);
        state.jump_buffer_timer = (state.jump_buffer_timer - dt).max(0.0);
        if coyote_before > 0.0 && state.coyote_timer == 0.0 && !body.grounded {
            self.forfeit_ground_jump(state);
        }

        let mut out = JumpUpdate {
            landed: body.grounded && !state.was_grounded,
            left_ground: !body.grounded && state.was_grounded,
            jump: None,
        };

        if out.left_ground {
            if self.cfg.coyote_duration > 0.0 {
                state.coyote_timer = self.cfg.coyote_duration;
            } else {
                self.forfeit_ground_jump(state);
            }
        }

        if out.landed {
            state.jumps_remaining = self.cfg.max_jumps;
            state.is_jump_held = false;
            if state.buffered() {
                self.launch(state, body, self.cfg.jump_speed);
                state.jumps_remaining = state.jumps_remaining.saturating_sub(1);
                out.jump = Some(JumpKind::Buffered);
            } else {
                state.coyote_timer = 0.0;
            }
        }

        state.was_grounded = body.grounded;
        out
    }

    /// Jump now if allowed, otherwise remember the press for `buffer_duration`.
    pub fn request_jump(&self, state: &mut JumpState, body: &mut KinematicBody) -> Option<JumpKind> {
        if body.grounded || state.in_coyote() {
            let kind = if body.grounded { JumpKind::Ground } else { JumpKind::Coyote };
            self.launch(state, body, self.cfg.jump_speed);
            state.jumps_remaining = state.jumps_remaining.saturating_sub(1);
            return Some(kind);
        }

        if let Some(wall) = &self.cfg.wall_jump {
            let dir = body.wall_direction();
            if dir != 0.0 {
                self.launch(state, body, self.cfg.jump_speed * wall.vertical_multiplier);
                body.velocity.x = -dir * wall.push_speed;
                return Some(JumpKind::Wall);
            }
        }

        if state.jumps_remaining > 0 {
            self.launch(state, body, self.cfg.jump_speed * self.cfg.air_jump_multiplier);
            state.jumps_remaining -= 1;
            return Some(JumpKind::Air);
        }

        // Refresh, never stack.
        state.jump_buffer_timer = self.cfg.buffer_duration;
        log::trace!("jump buffered for {}s", self.cfg.buffer_duration);
        None
    }

    /// Cut a rising jump short. Fires at most once per jump.
    pub fn release_jump(&self, state: &mut JumpState, body: &mut KinematicBody) -> bool {
        if !state.is_jump_held {
            return false;
        }
        state.is_jump_held = false;
        if body.velocity.y < 0.0 {
            body.velocity.y *= self.cfg.release_multiplier;
            return true;
        }
        false
    }

    /// Feed this tick's press/release edges. Press is handled before release so a
    /// tap shorter than one tick still produces a (short) jump.
    pub fn apply_intent(&self, state: &mut JumpState, body: &mut KinematicBody, intent: &InputIntent) -> Option<JumpKind> {
        let jumped = if intent.jump_pressed { self.request_jump(state, body) } else { None };
        if !intent.jump_held {
            self.release_jump(state, body);
        }
        jumped
    }

    /// One tick of jump handling: bookkeeping, then the intent. A press on the
    /// tick a buffered jump fires is the same press; only its release is applied.
    pub fn tick(&self, state: &mut JumpState, body: &mut KinematicBody, intent: &InputIntent, dt: f32) -> JumpUpdate {
        let mut up = self.update(state, body, dt);
        if up.jump.is_some() {
            if !intent.jump_held {
                self.release_jump(state, body);
            }
        } else {
            up.jump = self.apply_intent(state, body, intent);
        }
        up
    }

    fn launch(&self, state: &mut JumpState, body: &mut KinematicBody, speed: f32) {
        body.velocity.y = -speed;
        body.grounded = false;
        state.was_grounded = false;
        state.coyote_timer = 0.0;
        state.jump_buffer_timer = 0.0;
        state.is_jump_held = true;
    }

    fn forfeit_ground_jump(&self, state: &mut JumpState) {
        state.jumps_remaining = state.jumps_remaining.saturating_sub(1);
        log::trace!("coyote window closed, {} jumps left", state.jumps_remaining);
    }
}
