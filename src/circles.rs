//! The circle set: the ordered collection of rotating vectors shared by the
//! audio engine, the renderer and the editors.
//!
//! Structural changes (add/remove) publish a fresh vector through
//! [`ArcSwap`], so the audio callback and the render loop always iterate a
//! stable snapshot without locking. Numeric fields live in atomics and may be
//! edited in place at any time.

use arc_swap::{ArcSwap, Guard};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::atomic::AtomicF64;
use crate::error::EditError;

/// Radius given to circles added without an explicit radius.
pub const DEFAULT_RADIUS: f64 = 0.1;

/// Stable handle issued when a circle is added, used for editing and removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CircleId(u64);

impl fmt::Display for CircleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One epicycle: a rotating vector with a signed radius and relative speed.
#[derive(Debug)]
pub struct Circle {
    id: CircleId,
    radius: AtomicF64,
    relative_speed: AtomicF64,
    /// Audio phase accumulator (radians). Written only by the synthesis engine.
    phase: AtomicF64,
}

impl Circle {
    fn new(id: CircleId, radius: f64, relative_speed: f64, phase: f64) -> Self {
        Self {
            id,
            radius: AtomicF64::new(radius),
            relative_speed: AtomicF64::new(relative_speed),
            phase: AtomicF64::new(phase),
        }
    }

    pub fn id(&self) -> CircleId {
        self.id
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius.load()
    }

    #[inline]
    pub fn relative_speed(&self) -> f64 {
        self.relative_speed.load()
    }

    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase.load()
    }

    #[inline]
    pub(crate) fn set_phase(&self, phase: f64) {
        self.phase.store(phase);
    }
}

/// Snapshot of the circle set as seen by one audio buffer or display frame.
pub type Snapshot = Guard<Arc<Vec<Arc<Circle>>>>;

struct Inner {
    circles: ArcSwap<Vec<Arc<Circle>>>,
    next_id: AtomicU64,
}

/// Ordered, concurrently readable set of circles.
///
/// Cloning is cheap and yields another handle to the same set.
#[derive(Clone)]
pub struct CircleSet {
    inner: Arc<Inner>,
}

impl Default for CircleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CircleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.snapshot().iter()).finish()
    }
}

impl CircleSet {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                circles: ArcSwap::from_pointee(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Lock-free view of the current circles, in draw-chain order.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.circles.load()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    pub fn ids(&self) -> Vec<CircleId> {
        self.snapshot().iter().map(|c| c.id()).collect()
    }

    pub fn get(&self, id: CircleId) -> Option<Arc<Circle>> {
        self.snapshot().iter().find(|c| c.id == id).cloned()
    }

    /// Append a circle using the harmonic speed policy.
    ///
    /// The Nth circle (0-indexed) gets speed magnitude `N / 2 + 1`, positive
    /// for even N and negative for odd N, giving +1, -1, +2, -2, ...
    pub fn add(&self, radius: f64) -> CircleId {
        self.push_with(radius, |n| {
            let magnitude = (n / 2 + 1) as f64;
            if n % 2 == 0 {
                magnitude
            } else {
                -magnitude
            }
        })
    }

    /// Append a circle with an explicit relative speed.
    pub fn add_with_speed(&self, radius: f64, relative_speed: f64) -> CircleId {
        self.push_with(radius, |_| relative_speed)
    }

    /// Two consecutive [`add`](Self::add) calls: one +/- pair of the same
    /// harmonic magnitude.
    pub fn add_harmonic_pair(&self) -> (CircleId, CircleId) {
        let positive = self.add(DEFAULT_RADIUS);
        let negative = self.add(DEFAULT_RADIUS);
        (positive, negative)
    }

    /// New circles copy the phase of circle 0 so they start locked to the group.
    fn push_with(&self, radius: f64, speed_for_index: impl Fn(usize) -> f64) -> CircleId {
        let id = CircleId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));

        self.inner.circles.rcu(|current| {
            let n = current.len();
            let phase = current.first().map_or(0.0, |c| c.phase());
            let mut next = Vec::with_capacity(n + 1);
            next.extend(current.iter().cloned());
            next.push(Arc::new(Circle::new(id, radius, speed_for_index(n), phase)));
            next
        });

        id
    }

    /// Remove a circle by handle. Returns `false` (and changes nothing) if no
    /// such circle is present.
    pub fn remove(&self, id: CircleId) -> bool {
        if self.get(id).is_none() {
            return false;
        }

        let previous = self.inner.circles.rcu(|current| {
            current
                .iter()
                .filter(|c| c.id != id)
                .cloned()
                .collect::<Vec<_>>()
        });

        previous.iter().any(|c| c.id == id)
    }

    /// Remove the most recently added circle still present.
    pub fn remove_last(&self) -> Option<CircleId> {
        let last = self.snapshot().last().map(|c| c.id())?;
        self.remove(last).then_some(last)
    }

    pub fn set_radius(&self, id: CircleId, radius: f64) -> Result<(), EditError> {
        let circle = self.checked_target(id, radius)?;
        circle.radius.store(radius);
        Ok(())
    }

    pub fn set_relative_speed(&self, id: CircleId, relative_speed: f64) -> Result<(), EditError> {
        let circle = self.checked_target(id, relative_speed)?;
        circle.relative_speed.store(relative_speed);
        Ok(())
    }

    fn checked_target(&self, id: CircleId, value: f64) -> Result<Arc<Circle>, EditError> {
        if !value.is_finite() {
            return Err(EditError::NonFinite(value));
        }
        self.get(id).ok_or(EditError::UnknownCircle(id))
    }
}
