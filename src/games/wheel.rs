//! European single-zero wheel
//!
//! Colours follow the canonical layout table, not number parity. The physical
//! pocket order only matters for where the wheel comes to rest on screen.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of pockets on a single-zero wheel
pub const POCKETS: usize = 37;

pub const RED_NUMBERS: [u8; 18] = [1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36];

/// Pocket order clockwise from zero
pub const WHEEL_SEQUENCE: [u8; POCKETS] = [
    0, 32, 15, 19, 4, 21, 2, 25, 17, 34, 6, 27, 13, 36, 11, 30, 8, 23, 10, 5, 24, 16, 33, 1, 20,
    14, 31, 9, 22, 18, 29, 7, 28, 12, 35, 3, 26,
];

const DEGREES_PER_POCKET: f64 = 360.0 / POCKETS as f64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Green,
    Red,
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Green => write!(f, "green"),
            Color::Red => write!(f, "red"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Colour of a pocket. Anything outside 1-36 is treated as the zero pocket.
pub fn color_of(number: u8) -> Color {
    if number == 0 || number > 36 {
        Color::Green
    } else if RED_NUMBERS.contains(&number) {
        Color::Red
    } else {
        Color::Black
    }
}

/// Position of a number in `WHEEL_SEQUENCE`
pub fn pocket_index(number: u8) -> Option<usize> {
    WHEEL_SEQUENCE.iter().position(|&n| n == number)
}

/// Rotation after a spin that comes to rest on `outcome`.
///
/// The result is always past `current` by at least `full_rotations` turns.
pub fn rotation_for(current: f64, outcome: u8, full_rotations: u32) -> f64 {
    let base = (current / 360.0).ceil() * 360.0;
    let index = pocket_index(outcome).unwrap_or(0) as f64;
    let landing = (360.0 - index * DEGREES_PER_POCKET) % 360.0;
    base + f64::from(full_rotations) * 360.0 + landing
}

/// Source of winning numbers.
///
/// Implementations must return a value in 0-36.
pub trait OutcomeSource: Send {
    fn draw(&mut self) -> u8;
}

impl<T: OutcomeSource + ?Sized> OutcomeSource for Box<T> {
    fn draw(&mut self) -> u8 {
        (**self).draw()
    }
}

/// Uniform draw over the 37 pockets
pub struct RandomOutcome<R = StdRng> {
    rng: R,
}

impl RandomOutcome<StdRng> {
    /// Reproducible outcomes for a given seed
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Seeded when a seed is given, OS entropy otherwise
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> RandomOutcome<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> OutcomeSource for RandomOutcome<R> {
    fn draw(&mut self) -> u8 {
        WHEEL_SEQUENCE[self.rng.gen_range(0..POCKETS)]
    }
}

/// Scripted outcomes, repeated in order. Values are reduced modulo 37;
/// an empty script always lands on zero.
#[derive(Debug, Clone)]
pub struct FixedOutcomes {
    script: Vec<u8>,
    next: usize,
}

impl FixedOutcomes {
    pub fn always(number: u8) -> Self {
        Self::sequence([number])
    }

    pub fn sequence(numbers: impl IntoIterator<Item = u8>) -> Self {
        Self {
            script: numbers.into_iter().map(|n| n % POCKETS as u8).collect(),
            next: 0,
        }
    }
}

impl OutcomeSource for FixedOutcomes {
    fn draw(&mut self) -> u8 {
        if self.script.is_empty() {
            return 0;
        }
        let number = self.script[self.next % self.script.len()];
        self.next = self.next.wrapping_add(1);
        number
    }
}
