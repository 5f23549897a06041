use glam::Vec2;

use crate::body::KinematicBody;
use crate::config::{DashConfig, JumpConfig};
use crate::dash::DashState;
use crate::jump::JumpState;
use crate::types::ColKey;

/// A body plus the optional components the world drives for it.
///
/// Players, enemies and moving props differ only in which components they carry
/// and the config the world was built with.
#[derive(Clone, Debug)]
pub struct Character {
    pub body: KinematicBody,
    pub jump: Option<JumpState>,
    pub dash: Option<DashState>,
    /// Key of this character's own obstacle entry, if it pushes one; excluded
    /// from its own collision candidates.
    pub key: Option<ColKey>,
}

impl Character {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { body: KinematicBody::new(position, size), jump: None, dash: None, key: None }
    }

    pub fn with_jump(mut self, cfg: &JumpConfig) -> Self {
        self.jump = Some(JumpState::new(cfg));
        self
    }

    pub fn with_dash(mut self, cfg: &DashConfig) -> Self {
        self.dash = Some(DashState::new(cfg));
        self
    }

    pub fn with_key(mut self, key: ColKey) -> Self {
        self.key = Some(key);
        self
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.as_ref().is_some_and(DashState::is_dashing)
    }

    pub fn jumps_remaining(&self) -> Option<u32> {
        self.jump.as_ref().map(|j| j.jumps_remaining)
    }
}
