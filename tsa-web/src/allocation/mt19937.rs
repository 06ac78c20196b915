//! Legacy MT19937 generator and shuffle
//!
//! Reproduces the permutation produced by the classic seeded Mersenne
//! Twister shuffle (`init_genrand` seeding, Fisher-Yates from the top,
//! masked rejection sampling for the bounded draw). Set ordering that was
//! handed out to annotators depends on this exact sequence, so the generator
//! must stay bit-compatible.

const N: usize = 624;
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

/// 32-bit Mersenne Twister
pub struct Mt19937 {
    state: [u32; N],
    index: usize,
}

impl Mt19937 {
    /// Seed with a single 32-bit value (`init_genrand`)
    pub fn new(seed: u32) -> Self {
        let mut state = [0u32; N];
        state[0] = seed;
        for i in 1..N {
            let prev = state[i - 1];
            state[i] = 1_812_433_253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        Self { state, index: N }
    }

    fn twist(&mut self) {
        for k in 0..N {
            let y = (self.state[k] & UPPER_MASK) | (self.state[(k + 1) % N] & LOWER_MASK);
            let mut next = self.state[(k + M) % N] ^ (y >> 1);
            if y & 1 != 0 {
                next ^= MATRIX_A;
            }
            self.state[k] = next;
        }
        self.index = 0;
    }

    /// Next tempered 32-bit output
    pub fn next_u32(&mut self) -> u32 {
        if self.index >= N {
            self.twist();
        }

        let mut y = self.state[self.index];
        self.index += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^= y >> 18;
        y
    }

    /// Uniform integer in `[0, max]` by masked rejection sampling
    pub fn bounded(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }

        let mut mask = max;
        mask |= mask >> 1;
        mask |= mask >> 2;
        mask |= mask >> 4;
        mask |= mask >> 8;
        mask |= mask >> 16;

        loop {
            let value = self.next_u32() & mask;
            if value <= max {
                return value;
            }
        }
    }
}

/// Seeded permutation of `0..n`
pub fn permutation(n: u32, seed: u32) -> Vec<u32> {
    let mut rng = Mt19937::new(seed);
    let mut values: Vec<u32> = (0..n).collect();

    for i in (1..values.len()).rev() {
        let j = rng.bounded(i as u32) as usize;
        values.swap(i, j);
    }

    values
}
