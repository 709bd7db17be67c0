/// Mulberry32: a tiny 32-bit PRNG with a fully reproducible stream.
///
/// All arithmetic wraps at 32 bits, so a given seed produces the same
/// sequence on every platform and every run.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }
}

/// Seed for shuffles whose caller has no seed of its own.
pub const DEFAULT_SHUFFLE_SEED: u32 = 1337;

/// Return a seeded permutation of `items` (Fisher–Yates, backward pass).
pub fn shuffle_stable<T: Clone>(items: &[T], seed: u32) -> Vec<T> {
    let mut rng = Mulberry32::new(seed);
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = (rng.next_f64() * (i + 1) as f64).floor() as usize;
        out.swap(i, j);
    }
    out
}

/// Seeded visiting order for `count` items, as indices into the item list.
pub fn layout_order(count: usize, seed: u32) -> Vec<usize> {
    let indices: Vec<usize> = (0..count).collect();
    shuffle_stable(&indices, seed)
}
