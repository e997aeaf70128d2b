//! Player avatar and its two hand slots.
//!
//! Hands reference monsters by id only; the registry owns the monsters.

use std::f32::consts::PI;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::{
    HAND_OFFSET_X, HAND_OFFSET_Y, MONSTER_HALF_EXTENT, PLAYER_CELEBRATION_SECS, PLAYER_DEAD_ZONE,
    PLAYER_HALF_EXTENT, PLAYER_SPEED, PLAYER_SPEED_PER_UNIT,
};
use crate::monster::MonsterId;
use crate::world::Playfield;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Assignment order
    pub const ORDER: [Hand; 2] = [Hand::Left, Hand::Right];

    /// Slot offset from the avatar centre
    pub fn offset(self) -> Vec2 {
        match self {
            Hand::Left => Vec2::new(-HAND_OFFSET_X, HAND_OFFSET_Y),
            Hand::Right => Vec2::new(HAND_OFFSET_X, HAND_OFFSET_Y),
        }
    }

    /// Angular range a released monster scatters into
    pub fn scatter_arc(self) -> (f32, f32) {
        match self {
            Hand::Left => (PI * 0.5, PI * 1.5),
            Hand::Right => (-PI * 0.5, PI * 0.5),
        }
    }
}

/// Which monster, if any, each hand holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandSlots {
    left: Option<MonsterId>,
    right: Option<MonsterId>,
}

impl HandSlots {
    fn slot_mut(&mut self, hand: Hand) -> &mut Option<MonsterId> {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }

    pub fn holder(&self, hand: Hand) -> Option<MonsterId> {
        match hand {
            Hand::Left => self.left,
            Hand::Right => self.right,
        }
    }

    pub fn hand_of(&self, id: MonsterId) -> Option<Hand> {
        Hand::ORDER.into_iter().find(|h| self.holder(*h) == Some(id))
    }

    /// Give `id` the first free hand, Left before Right. A monster already held
    /// or two full hands yield `None`.
    pub fn assign(&mut self, id: MonsterId) -> Option<Hand> {
        if self.hand_of(id).is_some() {
            return None;
        }
        let hand = Hand::ORDER
            .into_iter()
            .find(|h| self.holder(*h).is_none())?;
        *self.slot_mut(hand) = Some(id);
        Some(hand)
    }

    /// Empty one hand, returning who was in it
    pub fn release(&mut self, hand: Hand) -> Option<MonsterId> {
        self.slot_mut(hand).take()
    }

    /// Drop `id` from whichever hand holds it
    pub fn clear_monster(&mut self, id: MonsterId) -> Option<Hand> {
        let hand = self.hand_of(id)?;
        self.release(hand);
        Some(hand)
    }

    pub fn following_count(&self) -> usize {
        usize::from(self.left.is_some()) + usize::from(self.right.is_some())
    }

    pub fn is_full(&self) -> bool {
        self.following_count() == 2
    }

    /// Empty both hands, returning the previous holders
    pub fn clear(&mut self) -> Vec<(Hand, MonsterId)> {
        Hand::ORDER
            .into_iter()
            .filter_map(|h| self.release(h).map(|id| (h, id)))
            .collect()
    }
}

/// The child avatar the player steers
#[derive(Debug, Clone)]
pub struct Avatar {
    pub position: Vec2,
    /// Last non-zero movement direction
    pub direction: Vec2,
    pub moving: bool,
    pub celebrate_timer: f32,
    pub hands: HandSlots,
}

impl Avatar {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            direction: Vec2::X,
            moving: false,
            celebrate_timer: 0.0,
            hands: HandSlots::default(),
        }
    }

    /// Move toward the pointer, faster the further away it is.
    pub fn steer_toward(&mut self, pointer: Vec2, field: &Playfield, dt: f32) {
        let to_pointer = pointer - self.position;
        let distance = to_pointer.length();
        if distance <= PLAYER_DEAD_ZONE {
            self.moving = false;
            return;
        }
        let speed = (distance * PLAYER_SPEED_PER_UNIT).min(PLAYER_SPEED);
        self.direction = to_pointer / distance;
        self.moving = true;
        self.position = field.clamp_inset(self.position + self.direction * speed * dt);
    }

    /// Ease a fraction of the way toward `target`, used while parading
    pub fn ease_toward(&mut self, target: Vec2, factor: f32) {
        let delta = (target - self.position) * factor;
        self.moving = delta.length_squared() > f32::EPSILON;
        if let Some(dir) = delta.try_normalize() {
            self.direction = dir;
        }
        self.position += delta;
    }

    pub fn start_celebration(&mut self) {
        self.celebrate_timer = PLAYER_CELEBRATION_SECS;
    }

    pub fn tick_celebration(&mut self, dt: f32) {
        self.celebrate_timer = (self.celebrate_timer - dt).max(0.0);
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebrate_timer > 0.0
    }

    pub fn hand_slot(&self, hand: Hand) -> Vec2 {
        self.position + hand.offset()
    }

    /// Axis-aligned overlap between the avatar and a monster body
    pub fn overlaps(&self, monster: Vec2) -> bool {
        let reach = PLAYER_HALF_EXTENT + MONSTER_HALF_EXTENT;
        let d = (monster - self.position).abs();
        d.x < reach && d.y < reach
    }
}
