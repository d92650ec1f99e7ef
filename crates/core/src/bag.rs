//! Bag module - 7-bag piece randomizer and the lookahead queue
//!
//! The bag holds one of each kind, shuffled. Draws pop from it until it is
//! empty, then a fresh shuffled bag is made, so every aligned run of seven
//! draws contains each kind exactly once.
//!
//! [`ShapeQueue`] keeps the next [`PREVIEW_LEN`] kinds visible for the
//! "next piece" panel and hands them to the engine in order.

use arrayvec::ArrayVec;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::types::{ShapeKind, PREVIEW_LEN};

/// Supplies the kind of each newly spawned piece.
///
/// Called synchronously from inside an engine step; implementations must not
/// call back into the engine.
pub trait ShapeSource {
    fn next_shape(&mut self) -> ShapeKind;

    /// Upcoming kinds in spawn order, if the source knows them.
    fn preview(&self) -> &[ShapeKind] {
        &[]
    }
}

impl<F: FnMut() -> ShapeKind> ShapeSource for F {
    fn next_shape(&mut self) -> ShapeKind {
        self()
    }
}

/// 7-bag randomizer.
#[derive(Debug, Clone)]
pub struct Bag<R = Pcg32> {
    pool: ArrayVec<ShapeKind, 7>,
    rng: R,
}

impl Bag<Pcg32> {
    /// Reproducible bag: the same seed always yields the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> Bag<R> {
    /// Empty bag; the first draw fills it.
    pub fn new(rng: R) -> Self {
        Self {
            pool: ArrayVec::new(),
            rng,
        }
    }

    fn refill(&mut self) {
        self.pool.clear();
        self.pool.extend(ShapeKind::ALL);
        self.pool.shuffle(&mut self.rng);
    }

    pub fn draw(&mut self) -> ShapeKind {
        loop {
            if let Some(kind) = self.pool.pop() {
                return kind;
            }
            self.refill();
        }
    }

    /// Kinds left before the next refill, in reverse draw order.
    pub fn remaining(&self) -> &[ShapeKind] {
        &self.pool
    }
}

/// Bag plus a fixed-size FIFO of upcoming kinds.
#[derive(Debug, Clone)]
pub struct ShapeQueue<R = Pcg32> {
    bag: Bag<R>,
    upcoming: ArrayVec<ShapeKind, PREVIEW_LEN>,
}

impl ShapeQueue<Pcg32> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(Bag::seeded(seed))
    }

    /// Queue seeded from the thread RNG; the seed is logged so a game can be
    /// replayed with `seeded`.
    pub fn from_entropy() -> Self {
        let seed: u64 = rand::random();
        log::info!("shape queue seed {}", seed);
        Self::seeded(seed)
    }
}

impl<R: Rng> ShapeQueue<R> {
    pub fn new(mut bag: Bag<R>) -> Self {
        let mut upcoming = ArrayVec::new();
        while !upcoming.is_full() {
            upcoming.push(bag.draw());
        }
        Self { bag, upcoming }
    }

    /// Take the front kind and top the queue back up from the bag.
    pub fn pop(&mut self) -> ShapeKind {
        let next = self.upcoming.remove(0);
        self.upcoming.push(self.bag.draw());
        next
    }

    pub fn upcoming(&self) -> &[ShapeKind] {
        &self.upcoming
    }
}

impl<R: Rng> ShapeSource for ShapeQueue<R> {
    fn next_shape(&mut self) -> ShapeKind {
        self.pop()
    }

    fn preview(&self) -> &[ShapeKind] {
        self.upcoming()
    }
}
