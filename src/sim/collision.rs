//! Continuous collision detection for axis-aligned boxes
//!
//! Balls are swept against bricks, the paddle and the walls so that a fast
//! ball cannot tunnel through a 20px brick between two ticks. Candidate hits
//! are reduced to the earliest (possibly simultaneous) set with an explicit
//! fold, so tie handling lives in one place.

use glam::Vec2;

use super::rect::Rect;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, TIE_EPSILON, WALL_THICKNESS};

/// Result of a swept box test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweptHit {
    /// Whether the boxes touch during the step
    pub hit: bool,
    /// Fraction of the step at first contact (1.0 on a miss)
    pub time: f32,
    /// Axis-aligned surface normal of the static box (zero on a miss)
    pub normal: Vec2,
}

impl SweptHit {
    pub fn miss() -> Self {
        Self {
            hit: false,
            time: 1.0,
            normal: Vec2::ZERO,
        }
    }
}

/// Entry and exit times of one axis, or `None` when that axis can never overlap
fn axis_window(min: f32, max: f32, target_min: f32, target_max: f32, vel: f32) -> Option<(f32, f32)> {
    if vel == 0.0 {
        // Stationary on this axis: overlapping for the whole step or never
        if min < target_max && target_min < max {
            Some((f32::NEG_INFINITY, f32::INFINITY))
        } else {
            None
        }
    } else if vel > 0.0 {
        Some(((target_min - max) / vel, (target_max - min) / vel))
    } else {
        Some(((target_max - min) / vel, (target_min - max) / vel))
    }
}

/// Sweep `moving` by `velocity` over one unit step against a static box
///
/// Slab method on the Minkowski difference: per-axis entry/exit times are
/// combined by taking the latest entry and the earliest exit. Boxes that
/// already overlap at the start are not reported. When both axes enter at the
/// same instant (an exact corner hit) the Y normal wins.
pub fn swept_rect_vs_rect(moving: &Rect, velocity: Vec2, target: &Rect) -> SweptHit {
    let Some((x_entry, x_exit)) = axis_window(
        moving.left(),
        moving.right(),
        target.left(),
        target.right(),
        velocity.x,
    ) else {
        return SweptHit::miss();
    };
    let Some((y_entry, y_exit)) = axis_window(
        moving.top(),
        moving.bottom(),
        target.top(),
        target.bottom(),
        velocity.y,
    ) else {
        return SweptHit::miss();
    };

    let entry = x_entry.max(y_entry);
    let exit = x_exit.min(y_exit);

    if entry > exit || (x_entry < 0.0 && y_entry < 0.0) || x_entry > 1.0 || y_entry > 1.0 {
        return SweptHit::miss();
    }

    let normal = if x_entry > y_entry {
        Vec2::new(-velocity.x.signum(), 0.0)
    } else {
        Vec2::new(0.0, -velocity.y.signum())
    };

    SweptHit {
        hit: true,
        time: entry.max(0.0),
        normal,
    }
}

/// Static play-field walls (the bottom is open)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Top,
    Left,
    Right,
}

impl Wall {
    pub const ALL: [Wall; 3] = [Wall::Top, Wall::Left, Wall::Right];

    /// Solid box just outside the field edge
    pub fn rect(self) -> Rect {
        match self {
            Wall::Top => Rect::new(
                -WALL_THICKNESS,
                -WALL_THICKNESS,
                FIELD_WIDTH + 2.0 * WALL_THICKNESS,
                WALL_THICKNESS,
            ),
            Wall::Left => Rect::new(-WALL_THICKNESS, 0.0, WALL_THICKNESS, FIELD_HEIGHT),
            Wall::Right => Rect::new(FIELD_WIDTH, 0.0, WALL_THICKNESS, FIELD_HEIGHT),
        }
    }
}

/// What a ball ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Paddle,
    Wall(Wall),
    Brick { row: usize, col: usize },
}

/// One candidate contact found during a sub-step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub time: f32,
    pub normal: Vec2,
    pub contact: Contact,
}

impl CollisionEvent {
    /// Candidate from a swept test, if it hit
    pub fn from_sweep(hit: SweptHit, contact: Contact) -> Option<Self> {
        hit.hit.then_some(Self {
            time: hit.time,
            normal: hit.normal,
            contact,
        })
    }
}

/// The earliest contacts of a sub-step, ties included
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EarliestContacts {
    pub events: Vec<CollisionEvent>,
}

impl EarliestContacts {
    /// Fold one candidate into the running earliest set
    pub fn fold(mut self, event: CollisionEvent) -> Self {
        match self.events.first() {
            None => self.events.push(event),
            Some(best) if event.time < best.time - TIE_EPSILON => {
                self.events.clear();
                self.events.push(event);
            }
            Some(best) if (event.time - best.time).abs() <= TIE_EPSILON => {
                self.events.push(event);
            }
            Some(_) => {}
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Time of impact of the set (earliest member)
    pub fn time(&self) -> Option<f32> {
        self.events.iter().map(|e| e.time).reduce(f32::min)
    }

    /// Sum of member normals, used for a combined reflection
    pub fn normal(&self) -> Vec2 {
        self.events.iter().map(|e| e.normal).sum()
    }

    /// Paddle contacts are handled exclusively when present
    pub fn has_paddle(&self) -> bool {
        self.events.iter().any(|e| e.contact == Contact::Paddle)
    }

    /// Grid cells of every brick in the set
    pub fn bricks(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.events.iter().filter_map(|e| match e.contact {
            Contact::Brick { row, col } => Some((row, col)),
            _ => None,
        })
    }

    pub fn walls(&self) -> impl Iterator<Item = Wall> + '_ {
        self.events.iter().filter_map(|e| match e.contact {
            Contact::Wall(wall) => Some(wall),
            _ => None,
        })
    }
}

/// Reduce candidates to the earliest set
pub fn earliest_contacts<I>(events: I) -> EarliestContacts
where
    I: IntoIterator<Item = CollisionEvent>,
{
    events
        .into_iter()
        .fold(EarliestContacts::default(), EarliestContacts::fold)
}
