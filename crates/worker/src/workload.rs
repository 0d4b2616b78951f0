//! CPU-burning workload.

use std::hint::black_box;

/// Burn `iterations` units of CPU time.
///
/// Each unit is one linear-congruential mixing step into an accumulator the
/// optimizer cannot see through. No I/O, no sleeping, no yielding: elapsed
/// time depends only on how much CPU the scheduler hands out.
pub fn burn(iterations: u64) {
    let mut acc: u32 = 0;
    for i in 0..iterations {
        acc ^= (i as u32).wrapping_mul(1_103_515_245).wrapping_add(12_345);
        acc = black_box(acc);
    }
    black_box(acc);
}
