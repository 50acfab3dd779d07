//! Sobol low-discrepancy sequence with optional digital-shift scrambling.
//!
//! Direction numbers follow Joe & Kuo (2008) for the first 21 dimensions.
//! Points are generated in Gray-code order, one XOR per coordinate.

/// Highest dimension supported by the bundled direction numbers.
pub const MAX_DIMENSIONS: usize = 21;

const BITS: usize = 32;

/// `(degree, polynomial coefficients, initial direction integers)` for
/// dimensions 2 through 21.
const DIRECTION_NUMBERS: [(u32, u32, &[u32]); MAX_DIMENSIONS - 1] = [
    (1, 0, &[1]),
    (2, 1, &[1, 3]),
    (3, 1, &[1, 3, 1]),
    (3, 2, &[1, 1, 1]),
    (4, 1, &[1, 1, 3, 3]),
    (4, 4, &[1, 3, 5, 13]),
    (5, 2, &[1, 1, 5, 5, 17]),
    (5, 4, &[1, 1, 5, 5, 5]),
    (5, 7, &[1, 1, 7, 11, 19]),
    (5, 11, &[1, 1, 5, 1, 1]),
    (5, 13, &[1, 1, 1, 3, 11]),
    (5, 14, &[1, 3, 5, 5, 31]),
    (6, 1, &[1, 3, 3, 9, 7, 49]),
    (6, 13, &[1, 1, 1, 15, 21, 21]),
    (6, 16, &[1, 3, 1, 13, 27, 49]),
    (6, 19, &[1, 1, 1, 15, 7, 5]),
    (6, 22, &[1, 3, 1, 15, 13, 25]),
    (6, 25, &[1, 1, 5, 5, 19, 61]),
    (7, 1, &[1, 3, 7, 11, 23, 15, 103]),
    (7, 4, &[1, 3, 7, 13, 13, 15, 69]),
];

/// Iterator over points of the unit hypercube.
#[derive(Debug, Clone)]
pub struct SobolSequence {
    directions: Vec<[u32; BITS]>,
    shift: Vec<u32>,
    state: Vec<u32>,
    index: u64,
}

impl SobolSequence {
    /// Returns `None` when `dimensions` exceeds [`MAX_DIMENSIONS`].
    pub fn new(dimensions: usize) -> Option<Self> {
        if dimensions > MAX_DIMENSIONS {
            return None;
        }
        let directions = (0..dimensions).map(direction_vector).collect();
        Some(Self {
            directions,
            shift: vec![0; dimensions],
            state: vec![0; dimensions],
            index: 0,
        })
    }

    /// XOR every coordinate with a per-dimension shift. Keeps the
    /// stratification of the unscrambled sequence. Returns `None` unless
    /// there is exactly one shift per dimension.
    pub fn with_shift(mut self, shift: Vec<u32>) -> Option<Self> {
        if shift.len() != self.directions.len() {
            return None;
        }
        self.shift = shift;
        Some(self)
    }

    pub fn dimensions(&self) -> usize {
        self.directions.len()
    }
}

impl Iterator for SobolSequence {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Vec<f64>> {
        if self.index >= 1 << BITS {
            return None;
        }
        let scale = 1.0 / (1u64 << BITS) as f64;
        let point = self
            .state
            .iter()
            .zip(&self.shift)
            .map(|(x, s)| (x ^ s) as f64 * scale)
            .collect();

        // Gray code: flip the direction number at the lowest zero bit.
        let bit = (!self.index).trailing_zeros() as usize;
        if bit < BITS {
            for (x, v) in self.state.iter_mut().zip(&self.directions) {
                *x ^= v[bit];
            }
        }
        self.index += 1;
        Some(point)
    }
}

fn direction_vector(dimension: usize) -> [u32; BITS] {
    let mut v = [0u32; BITS];
    if dimension == 0 {
        for (k, slot) in v.iter_mut().enumerate() {
            *slot = 1 << (BITS - 1 - k);
        }
        return v;
    }

    let (degree, coefficients, initial) = DIRECTION_NUMBERS[dimension - 1];
    let s = degree as usize;
    for k in 0..BITS {
        v[k] = if k < s {
            initial[k] << (BITS - 1 - k)
        } else {
            let mut value = v[k - s] ^ (v[k - s] >> s);
            for j in 1..s {
                if (coefficients >> (s - 1 - j)) & 1 == 1 {
                    value ^= v[k - j];
                }
            }
            value
        };
    }
    v
}
