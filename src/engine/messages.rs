use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::effects::{Effect, EffectKind};
use crate::monster::{Monster, StateKind};
use crate::player::{Avatar, Hand};
use crate::zone::{GlowTier, TargetZone};

// =====================================================
// Render snapshot (one per frame)
// =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2Msg {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for Vec2Msg {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarMsg {
    pub position: Vec2Msg,
    pub facing: Vec2Msg,
    pub moving: bool,
    pub celebrating: bool,
    pub following_count: usize,
}

impl From<&Avatar> for AvatarMsg {
    fn from(avatar: &Avatar) -> Self {
        Self {
            position: avatar.position.into(),
            facing: avatar.direction.into(),
            moving: avatar.moving,
            celebrating: avatar.is_celebrating(),
            following_count: avatar.hands.following_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterMsg {
    pub id: u32,
    pub design: usize,
    pub design_name: String,
    pub color: [u8; 3],
    pub value: i32,
    pub position: Vec2Msg,
    pub state: StateKind,
    pub hand: Option<Hand>,
    pub zone: Option<usize>,
}

impl From<&Monster> for MonsterMsg {
    fn from(monster: &Monster) -> Self {
        let design = monster.design_info();
        Self {
            id: monster.id.0,
            design: monster.design,
            design_name: design.name.to_string(),
            color: design.body_color,
            value: monster.value,
            position: monster.position.into(),
            state: monster.kind(),
            hand: monster.state.hand(),
            zone: monster.zone.map(|z| z.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneMsg {
    pub id: usize,
    pub position: Vec2Msg,
    pub target: i32,
    pub occupancy: usize,
    pub glow: GlowTier,
    pub pulse_time: f32,
    pub checking: bool,
}

impl From<&TargetZone> for ZoneMsg {
    fn from(zone: &TargetZone) -> Self {
        Self {
            id: zone.id.0,
            position: zone.position.into(),
            target: zone.target,
            occupancy: zone.occupancy,
            glow: zone.glow,
            pulse_time: zone.pulse_time,
            checking: zone.is_checking(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectMsg {
    pub kind: EffectKind,
    pub position: Vec2Msg,
    pub opacity: f32,
    pub rotation: f32,
    pub color: [u8; 3],
}

impl From<&Effect> for EffectMsg {
    fn from(effect: &Effect) -> Self {
        Self {
            kind: effect.kind(),
            position: effect.position.into(),
            opacity: effect.opacity,
            rotation: effect.rotation,
            color: effect.color,
        }
    }
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub elapsed: f32,
    pub score: u32,
    pub parade_triggered: bool,
    pub parade_in_progress: bool,
    pub avatar: Option<AvatarMsg>,
    pub monsters: Vec<MonsterMsg>,
    pub zones: Vec<ZoneMsg>,
    pub effects: Vec<EffectMsg>,
}

impl FrameSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
