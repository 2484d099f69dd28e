//! Axis-aligned collision detection and incremental movement
//!
//! Every entity is an axis-aligned box. Moving entities never jump straight
//! to their destination: they advance in steps of at most [`MAX_STEP`] units
//! and stop in front of the first box the next step would overlap, so even a
//! fast projectile cannot tunnel through a one-tile wall.

use glam::Vec2;

/// Longest distance covered by a single movement step
pub const MAX_STEP: f32 = 1.0;

/// An axis-aligned bounding box (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Square box of the given side
    pub fn square(pos: Vec2, side: f32) -> Self {
        Self::new(pos, Vec2::splat(side))
    }

    /// Box of the given size centered on a point
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size / 2.0, size)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Strict overlap test: boxes that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        let overlap_x = self.pos.x < other.pos.x + other.size.x && self.pos.x + self.size.x > other.pos.x;
        let overlap_y = self.pos.y < other.pos.y + other.size.y && self.pos.y + self.size.y > other.pos.y;
        overlap_x && overlap_y
    }

    /// True if `other` lies entirely inside this box
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min().cmpge(self.min()).all() && other.max().cmple(self.max()).all()
    }

    pub fn translated(&self, delta: Vec2) -> Rect {
        Rect::new(self.pos + delta, self.size)
    }

    /// Grow the box by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Rect {
        Rect::new(self.pos - Vec2::splat(margin), self.size + Vec2::splat(margin * 2.0))
    }
}

/// What stopped a movement step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blocker {
    /// Obstacle, by entity ID
    Obstacle(u32),
    /// Character, by entity ID
    Character(u32),
}

/// Outcome of an axis-separated move
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveResult {
    /// Distance actually covered
    pub moved: Vec2,
    /// Blocker that halted horizontal movement
    pub blocked_x: Option<Blocker>,
    /// Blocker that halted vertical movement
    pub blocked_y: Option<Blocker>,
}

impl MoveResult {
    /// First blocker met (horizontal axis is resolved first)
    pub fn first_blocker(&self) -> Option<Blocker> {
        self.blocked_x.or(self.blocked_y)
    }

    pub fn is_blocked(&self) -> bool {
        self.first_blocker().is_some()
    }
}

/// Find the first blocker in `blockers` overlapping `candidate`
pub fn first_overlap(candidate: &Rect, blockers: &[(Blocker, Rect)]) -> Option<Blocker> {
    blockers
        .iter()
        .find(|(_, rect)| candidate.overlaps(rect))
        .map(|(blocker, _)| *blocker)
}

/// Move `rect` by `delta`, X axis first then Y, in steps of at most [`MAX_STEP`].
///
/// `probe` reports the blocker (if any) overlapping a hypothetical box. An
/// axis halts at the last position where the probe found nothing.
pub fn move_stepped<F>(rect: &mut Rect, delta: Vec2, mut probe: F) -> MoveResult
where
    F: FnMut(&Rect) -> Option<Blocker>,
{
    let mut result = MoveResult::default();
    result.blocked_x = step_axis(rect, delta.x, Vec2::X, &mut result.moved, &mut probe);
    result.blocked_y = step_axis(rect, delta.y, Vec2::Y, &mut result.moved, &mut probe);
    result
}

fn step_axis<F>(rect: &mut Rect, amount: f32, axis: Vec2, moved: &mut Vec2, probe: &mut F) -> Option<Blocker>
where
    F: FnMut(&Rect) -> Option<Blocker>,
{
    let Some((steps, step)) = split_steps(amount) else {
        return None;
    };

    let offset = axis * step;
    for _ in 0..steps {
        let candidate = rect.translated(offset);
        if let Some(blocker) = probe(&candidate) {
            return Some(blocker);
        }
        *rect = candidate;
        *moved += offset;
    }
    None
}

/// Split a distance into a whole number of equal steps no longer than
/// [`MAX_STEP`]. `None` for zero or non-finite distances.
fn split_steps(distance: f32) -> Option<(u32, f32)> {
    if !distance.is_finite() || distance == 0.0 {
        return None;
    }
    let steps = (distance.abs() / MAX_STEP).ceil().max(1.0) as u32;
    Some((steps, distance / steps as f32))
}

/// Sweep `rect` along `delta` in straight steps of at most [`MAX_STEP`].
///
/// Unlike [`move_stepped`] both axes advance together; used for projectiles,
/// which stop dead on their first contact. Returns the blocker hit, if any.
pub fn sweep<F>(rect: &mut Rect, delta: Vec2, mut probe: F) -> Option<Blocker>
where
    F: FnMut(&Rect) -> Option<Blocker>,
{
    let Some((steps, step)) = split_steps(delta.length()) else {
        return None;
    };

    let offset = delta.normalize_or_zero() * step;
    for _ in 0..steps {
        let candidate = rect.translated(offset);
        if let Some(blocker) = probe(&candidate) {
            return Some(blocker);
        }
        *rect = candidate;
    }
    None
}
