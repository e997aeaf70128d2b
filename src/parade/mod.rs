//! Parade route and sequencer.
//!
//! The route is a closed rectangle inset from the playfield. The lead
//! marcher walks it at a fixed speed; everyone else trails by a fixed
//! spacing along the same path. The sequencer only computes where marchers
//! should be and when to emit decorations; the engine applies it.

use bevy::math::Vec2;

use crate::constants::{
    PARADE_BALLOON_INTERVAL, PARADE_CANDY_INTERVAL, PARADE_END_BUFFER, PARADE_MARGIN,
    PARADE_SPACING, PARADE_SPEED, PARADE_TOP_CLEARANCE, REFERENCE_FRAME_SECS,
};
use crate::monster::MonsterId;
use crate::world::Playfield;

/// Vertical bob applied per reference frame while marching
const MARCH_BOB: f32 = 3.0;
const MARCH_BOB_RATE: f32 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ParadeRoute {
    points: [Vec2; 5],
    lengths: [f32; 4],
    total: f32,
}

impl ParadeRoute {
    /// Bottom-left, top-left, top-right, bottom-right, back to bottom-left
    pub fn new(field: &Playfield) -> Self {
        let m = PARADE_MARGIN;
        let (w, h) = (field.width, field.height);
        let points = [
            Vec2::new(m, h - m),
            Vec2::new(m, m + PARADE_TOP_CLEARANCE),
            Vec2::new(w - m, m + PARADE_TOP_CLEARANCE),
            Vec2::new(w - m, h - m),
            Vec2::new(m, h - m),
        ];
        let mut lengths = [0.0; 4];
        for (i, len) in lengths.iter_mut().enumerate() {
            *len = points[i].distance(points[i + 1]);
        }
        Self {
            points,
            lengths,
            total: lengths.iter().sum(),
        }
    }

    pub fn total(&self) -> f32 {
        self.total
    }

    pub fn points(&self) -> &[Vec2; 5] {
        &self.points
    }

    /// Point `distance` along the loop. Negative distances clamp to the start.
    pub fn position_at(&self, distance: f32) -> Vec2 {
        if self.total <= 0.0 {
            return self.points[0];
        }
        let mut remaining = distance.max(0.0) % self.total;
        for (i, len) in self.lengths.iter().enumerate() {
            if remaining <= *len {
                let t = if *len > 0.0 { remaining / len } else { 0.0 };
                return self.points[i].lerp(self.points[i + 1], t);
            }
            remaining -= len;
        }
        self.points[0]
    }
}

/// Where one marcher should head this step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchTarget {
    pub id: MonsterId,
    /// `None` until the marcher's turn to step off
    pub point: Option<Vec2>,
    pub bob: f32,
}

/// Output of one sequencer step
#[derive(Debug, Clone, PartialEq)]
pub struct MarchStep {
    pub targets: Vec<MarchTarget>,
    pub avatar_target: Vec2,
    pub avatar_bob: f32,
    pub emit_balloon: bool,
    pub emit_candy: bool,
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct March {
    lineup: Vec<MonsterId>,
    distance: f32,
    time: f32,
    last_balloon: f32,
    last_candy: f32,
}

#[derive(Debug, Clone, PartialEq)]
enum ParadePhase {
    Idle,
    Marching(March),
    /// March over, finale playing, waiting for the settle task
    Settling,
}

#[derive(Debug, Clone)]
pub struct ParadeSequencer {
    route: ParadeRoute,
    phase: ParadePhase,
    runs: u32,
}

impl ParadeSequencer {
    pub fn new(field: &Playfield) -> Self {
        Self {
            route: ParadeRoute::new(field),
            phase: ParadePhase::Idle,
            runs: 0,
        }
    }

    pub fn route(&self) -> &ParadeRoute {
        &self.route
    }

    /// Begin marching with `lineup` in slot order.
    pub fn start(&mut self, lineup: Vec<MonsterId>) {
        self.phase = ParadePhase::Marching(March {
            lineup,
            distance: 0.0,
            time: 0.0,
            last_balloon: 0.0,
            last_candy: 0.0,
        });
    }

    /// Add a late arrival to the end of the line. Returns its slot.
    pub fn join(&mut self, id: MonsterId) -> Option<usize> {
        match &mut self.phase {
            ParadePhase::Marching(march) => {
                march.lineup.push(id);
                Some(march.lineup.len() - 1)
            }
            _ => None,
        }
    }

    pub fn tick(&mut self, dt: f32) -> Option<MarchStep> {
        let ParadePhase::Marching(march) = &mut self.phase else {
            return None;
        };
        march.time += dt;
        march.distance += PARADE_SPEED * dt;
        let frames = dt / REFERENCE_FRAME_SECS;

        let targets = march
            .lineup
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let along = march.distance - index as f32 * PARADE_SPACING;
                let started = along > 0.0;
                MarchTarget {
                    id: *id,
                    point: started.then(|| self.route.position_at(along)),
                    bob: if started {
                        (march.time * MARCH_BOB_RATE + index as f32).sin() * MARCH_BOB * frames
                    } else {
                        0.0
                    },
                }
            })
            .collect();

        let count = march.lineup.len() as f32;
        let avatar_target = self
            .route
            .position_at(march.distance - count * PARADE_SPACING);
        let avatar_bob = (march.time * MARCH_BOB_RATE).sin() * MARCH_BOB * frames;

        let emit_balloon = march.time - march.last_balloon > PARADE_BALLOON_INTERVAL;
        if emit_balloon {
            march.last_balloon = march.time;
        }
        let emit_candy = march.time - march.last_candy > PARADE_CANDY_INTERVAL;
        if emit_candy {
            march.last_candy = march.time;
        }

        let finished =
            march.distance > self.route.total + count * PARADE_SPACING + PARADE_END_BUFFER;
        if finished {
            self.phase = ParadePhase::Settling;
        }
        Some(MarchStep {
            targets,
            avatar_target,
            avatar_bob,
            emit_balloon,
            emit_candy,
            finished,
        })
    }

    /// Finish the settle delay and return to idle
    pub fn settle(&mut self) {
        if self.phase == ParadePhase::Settling {
            self.phase = ParadePhase::Idle;
            self.runs += 1;
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase != ParadePhase::Idle
    }

    pub fn is_marching(&self) -> bool {
        matches!(self.phase, ParadePhase::Marching(_))
    }

    /// Completed parades this session
    pub fn runs(&self) -> u32 {
        self.runs
    }
}
