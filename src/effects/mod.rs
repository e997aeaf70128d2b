//! Cosmetic, self-terminating effects: sparkles, confetti, balloons, candy,
//! the release burst and the parade banner.
//!
//! Effects never influence gameplay. Each one may point back at the entity
//! that emitted it; that reference is dropped when the entity goes away.

use std::collections::BTreeMap;
use std::f32::consts::TAU;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::monster::MonsterId;
use crate::rng::GameRng;
use crate::world::Playfield;
use crate::zone::ZoneId;

const CONFETTI_COLORS: [[u8; 3]; 7] = [
    [255, 100, 100],
    [100, 255, 100],
    [100, 100, 255],
    [255, 255, 100],
    [255, 100, 255],
    [100, 255, 255],
    [255, 180, 100],
];

const BALLOON_COLORS: [[u8; 3]; 6] = [
    [255, 100, 100],
    [100, 200, 255],
    [255, 255, 100],
    [255, 150, 200],
    [150, 255, 150],
    [200, 150, 255],
];

const CANDY_COLORS: [[u8; 3]; 5] = [
    [255, 50, 50],
    [50, 200, 50],
    [255, 200, 50],
    [200, 50, 200],
    [255, 150, 50],
];

const SPARKLE_COUNT: usize = 12;
const RELEASE_BURST_COUNT: usize = 8;
const RELEASE_BURST_SPEED: f32 = 150.0;
const RELEASE_BURST_LIFE: f32 = 0.5;
const CONFETTI_GRAVITY: f32 = 300.0;
const CONFETTI_FADE_SECS: f32 = 0.5;
const BALLOON_FADE_RATE: f32 = 0.5;
const BALLOON_SWAY: f32 = 20.0;
const CANDY_GRAVITY: f32 = 250.0;
const CANDY_FLOOR_INSET: f32 = 20.0;
const CANDY_REST_SECS: f32 = 2.0;
const BANNER_TEXT: &str = "PARADE TIME!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectId(pub u64);

/// Non-owning back-reference to whatever emitted an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityRef {
    Monster(MonsterId),
    Zone(ZoneId),
    Avatar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Sparkle,
    Confetti,
    Balloon,
    Candy,
    ReleaseBurst,
    Banner,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EffectBody {
    Sparkle {
        life: f32,
    },
    Confetti {
        life: f32,
        spin: f32,
    },
    Balloon {
        wobble: f32,
        wobble_speed: f32,
    },
    Candy {
        spin: f32,
        bounces: u8,
        wrapped: bool,
        /// Counts down once the candy has settled
        rest: Option<f32>,
    },
    ReleaseBurst {
        life: f32,
    },
    Banner {
        text: &'static str,
        elapsed: f32,
        duration: f32,
    },
}

#[derive(Debug, Clone)]
pub struct Effect {
    pub id: EffectId,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Radians
    pub rotation: f32,
    pub opacity: f32,
    pub color: [u8; 3],
    pub source: Option<EntityRef>,
    pub body: EffectBody,
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self.body {
            EffectBody::Sparkle { .. } => EffectKind::Sparkle,
            EffectBody::Confetti { .. } => EffectKind::Confetti,
            EffectBody::Balloon { .. } => EffectKind::Balloon,
            EffectBody::Candy { .. } => EffectKind::Candy,
            EffectBody::ReleaseBurst { .. } => EffectKind::ReleaseBurst,
            EffectBody::Banner { .. } => EffectKind::Banner,
        }
    }

    /// Advance one step. Returns false once the effect has expired.
    fn step(&mut self, dt: f32, field: &Playfield) -> bool {
        match &mut self.body {
            EffectBody::Sparkle { life } => {
                self.position += self.velocity * dt;
                *life -= dt;
                self.opacity = life.max(0.0);
                *life > 0.0
            }
            EffectBody::Confetti { life, spin } => {
                self.velocity.y += CONFETTI_GRAVITY * dt;
                self.position += self.velocity * dt;
                self.rotation += *spin * dt;
                *life -= dt;
                if *life < CONFETTI_FADE_SECS {
                    self.opacity = (*life / CONFETTI_FADE_SECS).max(0.0);
                }
                *life > 0.0
            }
            EffectBody::Balloon {
                wobble,
                wobble_speed,
            } => {
                *wobble += *wobble_speed * dt;
                self.position.x += wobble.sin() * BALLOON_SWAY * dt;
                self.position.y += self.velocity.y * dt;
                if self.position.y < field.height * 0.2 {
                    self.opacity -= BALLOON_FADE_RATE * dt;
                }
                self.position.y >= -30.0 && self.opacity > 0.0
            }
            EffectBody::Candy {
                spin,
                bounces,
                rest,
                ..
            } => {
                if let Some(remaining) = rest {
                    *remaining -= dt;
                    return *remaining > 0.0;
                }
                self.velocity.y += CANDY_GRAVITY * dt;
                self.position += self.velocity * dt;
                self.rotation += *spin * dt;
                if self.position.y > field.height - CANDY_FLOOR_INSET && self.velocity.y > 0.0 {
                    if *bounces > 0 {
                        self.velocity.y = -self.velocity.y * 0.5;
                        self.velocity.x *= 0.7;
                        *bounces -= 1;
                    } else {
                        self.velocity = Vec2::ZERO;
                        *spin = 0.0;
                    }
                }
                let grounded = self.position.y > field.height - CANDY_FLOOR_INSET;
                if *bounces == 0 && grounded && self.velocity.y.abs() < 5.0 {
                    *rest = Some(CANDY_REST_SECS);
                }
                true
            }
            EffectBody::ReleaseBurst { life } => {
                self.position += self.velocity * dt;
                *life -= dt;
                self.opacity = (*life * 2.0).max(0.0);
                *life > 0.0
            }
            EffectBody::Banner {
                elapsed, duration, ..
            } => {
                *elapsed += dt;
                self.opacity = (*elapsed * 5.0).sin().abs();
                *elapsed <= *duration
            }
        }
    }
}

/// Every live effect keyed by id
#[derive(Debug, Default)]
pub struct EffectRegistry {
    effects: BTreeMap<EffectId, Effect>,
    next_id: u64,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        color: [u8; 3],
        source: Option<EntityRef>,
        body: EffectBody,
    ) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        self.effects.insert(
            id,
            Effect {
                id,
                position,
                velocity,
                rotation: 0.0,
                opacity: 1.0,
                color,
                source,
                body,
            },
        );
        id
    }

    /// Twelve radial sparkles
    pub fn sparkles(&mut self, position: Vec2, source: Option<EntityRef>, rng: &mut GameRng) {
        for i in 0..SPARKLE_COUNT {
            let dir = Vec2::from_angle(i as f32 * TAU / SPARKLE_COUNT as f32);
            let velocity = Vec2::new(
                dir.x * rng.range_f32(100.0, 200.0),
                dir.y * rng.range_f32(100.0, 200.0),
            );
            let blue = rng.range_i32(100, 255) as u8;
            self.insert(
                position,
                velocity,
                [255, 255, blue],
                source,
                EffectBody::Sparkle { life: 1.0 },
            );
        }
    }

    pub fn confetti(
        &mut self,
        position: Vec2,
        count: usize,
        source: Option<EntityRef>,
        rng: &mut GameRng,
    ) {
        for _ in 0..count {
            let velocity = Vec2::new(rng.range_f32(-120.0, 120.0), rng.range_f32(-250.0, -150.0));
            let color = rng.pick_copied(&CONFETTI_COLORS).unwrap_or([255, 255, 255]);
            let body = EffectBody::Confetti {
                life: rng.range_f32(1.5, 2.5),
                spin: rng.range_f32(-400.0, 400.0).to_radians(),
            };
            let id = self.insert(position, velocity, color, source, body);
            if let Some(effect) = self.effects.get_mut(&id) {
                effect.rotation = rng.range_f32(0.0, TAU);
            }
        }
    }

    pub fn balloon(&mut self, position: Vec2, source: Option<EntityRef>, rng: &mut GameRng) {
        let velocity = Vec2::new(0.0, -rng.range_f32(80.0, 120.0));
        let color = rng.pick_copied(&BALLOON_COLORS).unwrap_or([255, 100, 100]);
        let body = EffectBody::Balloon {
            wobble: rng.range_f32(0.0, TAU),
            wobble_speed: rng.range_f32(3.0, 5.0),
        };
        let id = self.insert(position, velocity, color, source, body);
        if let Some(effect) = self.effects.get_mut(&id) {
            effect.opacity = 0.9;
        }
    }

    /// Candy thrown along `direction` with an upward kick
    pub fn candy(
        &mut self,
        position: Vec2,
        direction: Vec2,
        source: Option<EntityRef>,
        rng: &mut GameRng,
    ) {
        let velocity = Vec2::new(
            direction.x * rng.range_f32(60.0, 120.0),
            direction.y * rng.range_f32(60.0, 120.0) - 100.0,
        );
        let color = rng.pick_copied(&CANDY_COLORS).unwrap_or([255, 50, 50]);
        let body = EffectBody::Candy {
            spin: rng.range_f32(-300.0, 300.0).to_radians(),
            bounces: 2,
            wrapped: rng.chance(0.5),
            rest: None,
        };
        let id = self.insert(position, velocity, color, source, body);
        if let Some(effect) = self.effects.get_mut(&id) {
            effect.rotation = rng.range_f32(0.0, TAU);
        }
    }

    /// Eight particles fanning out from the avatar on release
    pub fn release_burst(&mut self, position: Vec2) {
        for i in 0..RELEASE_BURST_COUNT {
            let dir = Vec2::from_angle(i as f32 * TAU / RELEASE_BURST_COUNT as f32);
            self.insert(
                position,
                dir * RELEASE_BURST_SPEED,
                [255, 200, 100],
                Some(EntityRef::Avatar),
                EffectBody::ReleaseBurst {
                    life: RELEASE_BURST_LIFE,
                },
            );
        }
    }

    pub fn banner(&mut self, field: &Playfield, duration: f32) -> EffectId {
        self.insert(
            field.frac(0.5, 1.0 / 3.0),
            Vec2::ZERO,
            [255, 220, 50],
            None,
            EffectBody::Banner {
                text: BANNER_TEXT,
                elapsed: 0.0,
                duration,
            },
        )
    }

    /// Advance every effect and drop the expired ones.
    pub fn tick(&mut self, dt: f32, field: &Playfield) {
        self.effects.retain(|_, effect| effect.step(dt, field));
    }

    /// Clear back-references to a destroyed entity
    pub fn forget_source(&mut self, source: EntityRef) {
        for effect in self.effects.values_mut() {
            if effect.source == Some(source) {
                effect.source = None;
            }
        }
    }

    pub fn get(&self, id: EffectId) -> Option<&Effect> {
        self.effects.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.values()
    }

    pub fn count(&self, kind: EffectKind) -> usize {
        self.effects.values().filter(|e| e.kind() == kind).count()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
