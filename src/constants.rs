//! Centralized game constants for the monster math core.
//!
//! Timers are in seconds, distances in playfield units, speeds in units per
//! second. Layout-dependent values are expressed as fractions of the
//! playfield and resolved through [`crate::world::Playfield`].

// =====================================================
// Playfield
// =====================================================

/// Landscape (desktop) playfield size
pub const LANDSCAPE_WIDTH: f32 = 800.0;
pub const LANDSCAPE_HEIGHT: f32 = 600.0;

/// Portrait (phone) playfield size
pub const PORTRAIT_WIDTH: f32 = 400.0;
pub const PORTRAIT_HEIGHT: f32 = 700.0;

/// Inset kept between wandering/following entities and the playfield edge
pub const SAFE_INSET: f32 = 30.0;

// =====================================================
// Avatar
// =====================================================

/// Top avatar speed
pub const PLAYER_SPEED: f32 = 300.0;

/// Avatar speed scales with pointer distance up to PLAYER_SPEED
pub const PLAYER_SPEED_PER_UNIT: f32 = 3.0;

/// Pointer dead zone around the avatar
pub const PLAYER_DEAD_ZONE: f32 = 10.0;

/// Half extent of the avatar's square collision region (40x40)
pub const PLAYER_HALF_EXTENT: f32 = 20.0;

/// Half extent of a monster's square collision region (50x50)
pub const MONSTER_HALF_EXTENT: f32 = 25.0;

/// Horizontal offset of each hand slot from the avatar centre
pub const HAND_OFFSET_X: f32 = 50.0;

/// Vertical offset of the hand slots
pub const HAND_OFFSET_Y: f32 = 10.0;

/// Avatar celebration length
pub const PLAYER_CELEBRATION_SECS: f32 = 1.5;

// =====================================================
// Monsters
// =====================================================

/// Smallest and largest number a monster can carry
pub const MIN_MONSTER_VALUE: i32 = 1;
pub const MAX_MONSTER_VALUE: i32 = 5;

/// Slow wander speed
pub const MONSTER_SPEED: f32 = 60.0;

/// Base chase speed; following and exiting run at 1.5x
pub const MONSTER_CHASE_SPEED: f32 = 280.0;

/// Following / exiting speed
pub const MONSTER_FAST_SPEED: f32 = MONSTER_CHASE_SPEED * 1.5;

/// Following monsters snap onto the hand slot inside this distance
pub const FOLLOW_SNAP_DISTANCE: f32 = 5.0;

/// Wandering monsters stop inside this distance of their rest point
pub const WANDER_ARRIVE_DISTANCE: f32 = 10.0;

/// Wander timer range
pub const WANDER_TIMER_MIN: f32 = 3.0;
pub const WANDER_TIMER_MAX: f32 = 6.0;

/// Scatter (release) timer and distance ranges
pub const SCATTER_TIMER_MIN: f32 = 2.0;
pub const SCATTER_TIMER_MAX: f32 = 4.0;
pub const SCATTER_DISTANCE_MIN: f32 = 150.0;
pub const SCATTER_DISTANCE_MAX: f32 = 250.0;

/// Scatter targets keep this far from the side and bottom edges
pub const SCATTER_EDGE_MARGIN: f32 = 50.0;

/// Scatter targets stay below this fraction of the playfield height
pub const SCATTER_MIN_Y_FRAC: f32 = 0.35;

/// Number of unique monster designs
pub const DESIGN_COUNT: usize = 8;

// =====================================================
// Celebration / Bump / Exit
// =====================================================

/// Celebration dance length
pub const CELEBRATION_SECS: f32 = 1.5;

/// Bump phase speed (radians per second)
pub const BUMP_PHASE_RATE: f32 = 6.0;

/// Pair moves together while phase < PI at this speed
pub const BUMP_TOGETHER_SPEED: f32 = 80.0;

/// Pair bounces apart while phase < 3*PI at this speed
pub const BUMP_APART_SPEED: f32 = 120.0;

/// Monsters leave the playfield once this far beyond an edge
pub const EXIT_MARGIN: f32 = 60.0;

/// Exit target lies this far beyond the chosen edge
pub const EXIT_EDGE_OVERSHOOT: f32 = 50.0;

/// Delay between a monster leaving and its replacement appearing
pub const REPLACEMENT_DELAY_SECS: f32 = 1.0;

/// Minimum gap between exit-trail confetti drops
pub const EXIT_TRAIL_INTERVAL: f32 = 0.2;

/// Chance of dropping trail confetti once the interval has passed
pub const EXIT_TRAIL_CHANCE: f64 = 0.3;

/// Loop exit path circles the start point for this long
pub const EXIT_LOOP_SECS: f32 = 0.5;

// =====================================================
// Zones
// =====================================================

/// Monsters within this distance of a zone centre occupy it
pub const ZONE_RADIUS: f32 = 70.0;

/// Dwell delay before a zone evaluates its pair
pub const ZONE_CHECK_DELAY: f32 = 1.0;

/// Target sum range (inclusive)
pub const MIN_TARGET: i32 = 3;
pub const MAX_TARGET: i32 = 10;

/// Default zone targets in layout order
pub const DEFAULT_ZONE_TARGETS: [i32; 3] = [5, 7, 4];

// =====================================================
// Session / Spawning
// =====================================================

/// Points per solved pair
pub const SCORE_PER_PAIR: u32 = 10;

/// Score that arms the one-shot parade
pub const PARADE_SCORE_THRESHOLD: u32 = 50;

/// Chance a spawn is steered toward a solvable value when the field is already solvable
pub const CONSTRAINED_SPAWN_CHANCE: f64 = 0.6;

/// Monsters created at session start (guaranteed pair + smart spawns)
pub const OPENING_MONSTERS: usize = 5;

// =====================================================
// Parade
// =====================================================

/// Delay between the triggering pair starting to exit and the parade
pub const PARADE_ARM_DELAY_SECS: f32 = 2.0;

/// Distance of the route rectangle from the playfield edge
pub const PARADE_MARGIN: f32 = 60.0;

/// Extra top clearance of the route
pub const PARADE_TOP_CLEARANCE: f32 = 50.0;

/// Lead speed along the route
pub const PARADE_SPEED: f32 = 80.0;

/// Distance between consecutive marchers
pub const PARADE_SPACING: f32 = 50.0;

/// Extra distance walked after a full loop before the parade ends
pub const PARADE_END_BUFFER: f32 = 100.0;

/// Per-frame (1/60 s) easing of marchers toward their route point
pub const PARADE_MONSTER_EASE: f32 = 0.1;

/// Per-frame (1/60 s) easing of the avatar behind the line
pub const PARADE_AVATAR_EASE: f32 = 0.08;

/// Emission intervals during the march
pub const PARADE_BALLOON_INTERVAL: f32 = 0.4;
pub const PARADE_CANDY_INTERVAL: f32 = 0.25;

/// Finale bursts and their stagger
pub const PARADE_FINALE_BURSTS: u32 = 10;
pub const PARADE_FINALE_STAGGER: f32 = 0.1;

/// Confetti pieces per finale burst
pub const PARADE_FINALE_CONFETTI: usize = 15;

/// Delay between the end of the march and monsters resuming play
pub const PARADE_SETTLE_SECS: f32 = 1.5;

/// Announcement banner lifetime
pub const PARADE_BANNER_SECS: f32 = 2.0;

// =====================================================
// Input
// =====================================================

/// Acceleration magnitude that counts as a shake
pub const SHAKE_THRESHOLD: f32 = 15.0;

/// Minimum gap between accepted shakes
pub const SHAKE_COOLDOWN_MS: u64 = 500;

/// Reference frame time used to convert per-frame easing to per-second
pub const REFERENCE_FRAME_SECS: f32 = 1.0 / 60.0;
