//! Answer token placement
//!
//! Tokens are spread evenly across the arena with a little jitter, then a
//! few relaxation passes push neighbours apart. With four tokens and small
//! jitter this converges well inside the pass budget; it is not a general
//! constraint solver.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::{clamp, rand_range};

/// Relaxation passes over the sorted positions
const RELAX_PASSES: usize = 4;
/// Cap on per-token jitter (pixels)
const MAX_JITTER: f32 = 20.0;

/// One token's value and spawn column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenSlot {
    pub value: u32,
    pub x: f32,
}

/// Horizontal spawn positions for `count` tokens, sorted left to right.
///
/// Each position lies in `[radius, width - radius]`. When the arena is too
/// narrow for even one token every position collapses to the centre.
pub fn spread_positions<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    width: f32,
    radius: f32,
    padding: f32,
) -> Vec<f32> {
    if count == 0 {
        return Vec::new();
    }

    let lo = radius;
    let hi = width - radius;
    if hi < lo || !hi.is_finite() {
        log::warn!("Arena width {width} too narrow for token radius {radius}");
        return vec![(width / 2.0).max(0.0); count];
    }
    if count == 1 {
        return vec![(lo + hi) / 2.0];
    }

    let spacing = (hi - lo) / (count - 1) as f32;
    let max_jitter = (spacing * 0.2).min(MAX_JITTER);

    let mut positions: Vec<f32> = (0..count)
        .map(|i| {
            let base = lo + spacing * i as f32;
            clamp(base + rand_range(rng, -max_jitter, max_jitter), lo, hi)
        })
        .collect();

    positions.sort_by(f32::total_cmp);

    let min_dist = radius * 2.0 + padding;
    for _ in 0..RELAX_PASSES {
        for i in 1..positions.len() {
            let gap = positions[i] - positions[i - 1];
            if gap < min_dist {
                let push = (min_dist - gap) / 2.0;
                positions[i - 1] = clamp(positions[i - 1] - push, lo, hi);
                positions[i] = clamp(positions[i] + push, lo, hi);
            }
        }
    }

    positions
}

/// Shuffle `values` and pair each with a spawn column
pub fn layout_tokens<R: Rng + ?Sized>(
    rng: &mut R,
    values: &[u32],
    width: f32,
    radius: f32,
    padding: f32,
) -> Vec<TokenSlot> {
    let mut shuffled = values.to_vec();
    shuffled.shuffle(rng);

    let positions = spread_positions(rng, shuffled.len(), width, radius, padding);
    shuffled
        .into_iter()
        .zip(positions)
        .map(|(value, x)| TokenSlot { value, x })
        .collect()
}
