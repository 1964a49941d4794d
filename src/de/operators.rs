//! Variable-length differential evolution operators.
//!
//! A trial plan is built in separate, individually testable steps:
//!
//! 1. [`align_parents`] — repair: cut (or pad) three parents to one length
//! 2. [`differential_combine`] — `a + F·(b − c)` elementwise, wrapped into the pool
//! 3. [`dedup_first_occurrence`] — drop repeated locations, keeping order
//! 4. [`repair_length`] — pad back up to the minimum signal count
//! 5. [`mutate_length`] — grow or shrink by one signal
//!
//! Steps 1–3 are bundled as [`recombine`].

use std::collections::HashSet;

use rand::seq::{index, IndexedRandom};
use rand::Rng;

use super::chromosome::SignalPlan;

/// Draws a plan of random length in `[min_len, max_len]` with distinct
/// locations from `0..pool_size`.
///
/// Both bounds are capped at `pool_size`.
pub fn random_plan<R: Rng>(
    pool_size: usize,
    min_len: usize,
    max_len: usize,
    rng: &mut R,
) -> Vec<usize> {
    let hi = max_len.min(pool_size);
    let lo = min_len.min(hi);
    let len = rng.random_range(lo as u64..=hi as u64) as usize;
    index::sample(rng, pool_size, len).into_vec()
}

/// Creates `population_size` random plans over a pool of `pool_size`
/// locations.
///
/// # Examples
///
/// ```
/// use u_signals::de::create_population;
///
/// let mut rng = u_numflow::random::create_rng(42);
/// let population = create_population(30, 50, 5, 10, &mut rng);
/// assert_eq!(population.len(), 50);
/// assert!(population.iter().all(|p| (5..=10).contains(&p.len())));
/// assert!(population.iter().all(|p| p.has_unique_signals()));
/// ```
pub fn create_population<R: Rng>(
    pool_size: usize,
    population_size: usize,
    min_len: usize,
    max_len: usize,
    rng: &mut R,
) -> Vec<SignalPlan> {
    (0..population_size)
        .map(|_| SignalPlan::new(random_plan(pool_size, min_len, max_len, rng)))
        .collect()
}

/// Picks a location from `0..pool_size` not already in `signals`.
///
/// Returns `None` when every location is taken.
pub fn unused_index<R: Rng>(
    signals: &[usize],
    pool_size: usize,
    rng: &mut R,
) -> Option<usize> {
    let used: HashSet<usize> = signals.iter().copied().collect();
    let free: Vec<usize> = (0..pool_size).filter(|i| !used.contains(i)).collect();
    free.choose(rng).copied()
}

/// Appends unused locations until `signals` holds `target_len` entries or
/// the pool runs out.
fn pad_unique<R: Rng>(
    signals: &mut Vec<usize>,
    target_len: usize,
    pool_size: usize,
    rng: &mut R,
) {
    while signals.len() < target_len {
        match unused_index(signals, pool_size, rng) {
            Some(idx) => signals.push(idx),
            None => break,
        }
    }
}

/// Length shared by three parents: the shortest one.
pub fn shared_length(parents: [&[usize]; 3]) -> usize {
    parents.iter().map(|p| p.len()).min().unwrap_or(0)
}

/// Brings three parents to exactly `len` locations each.
///
/// Longer parents are truncated. Shorter ones are padded with fresh
/// locations they do not already contain. Called with
/// [`shared_length`], only truncation happens.
pub fn align_parents<R: Rng>(
    parents: [&[usize]; 3],
    len: usize,
    pool_size: usize,
    rng: &mut R,
) -> [Vec<usize>; 3] {
    parents.map(|p| {
        let mut aligned = p[..len.min(p.len())].to_vec();
        pad_unique(&mut aligned, len, pool_size, rng);
        aligned
    })
}

/// Differential mutation vector `a + weight * (b - c)`, elementwise.
///
/// Each value is rounded half-to-even and wrapped into `0..pool_size`
/// with a Euclidean remainder. The result has the length of the
/// shortest input and may contain repeats.
pub fn differential_combine(
    a: &[usize],
    b: &[usize],
    c: &[usize],
    weight: f64,
    pool_size: usize,
) -> Vec<usize> {
    if pool_size == 0 {
        return Vec::new();
    }
    let pool = pool_size as i64;
    a.iter()
        .zip(b)
        .zip(c)
        .map(|((&a, &b), &c)| {
            let v = (a as f64 + weight * (b as f64 - c as f64)).round_ties_even() as i64;
            v.rem_euclid(pool) as usize
        })
        .collect()
}

/// Removes repeated locations, keeping the first occurrence of each.
///
/// The traversal order of the survivors is preserved, since fitness
/// depends on which signals are consecutive.
pub fn dedup_first_occurrence(signals: Vec<usize>) -> Vec<usize> {
    let mut seen = HashSet::with_capacity(signals.len());
    let mut out = signals;
    out.retain(|s| seen.insert(*s));
    out
}

/// Builds a trial child from three parents: align, combine, deduplicate.
///
/// # Examples
///
/// ```
/// use u_signals::de::recombine;
///
/// let mut rng = u_numflow::random::create_rng(1);
/// let child = recombine(&[2, 4, 6, 8, 10], &[1, 3, 5, 7, 9], &[3, 3, 3, 3, 3], 20, 0.5, &mut rng);
/// // 2 + 0.5 * (1 - 3) = 1, 4 + 0.5 * 0 = 4, 6 + 1 = 7, 8 + 2 = 10, 10 + 3 = 13
/// assert_eq!(child, vec![1, 4, 7, 10, 13]);
/// ```
pub fn recombine<R: Rng>(
    a: &[usize],
    b: &[usize],
    c: &[usize],
    pool_size: usize,
    weight: f64,
    rng: &mut R,
) -> Vec<usize> {
    let parents = [a, b, c];
    let len = shared_length(parents);
    let [a, b, c] = align_parents(parents, len, pool_size, rng);
    dedup_first_occurrence(differential_combine(&a, &b, &c, weight, pool_size))
}

/// Pads a child that deduplication left short back up to `min_len`.
pub fn repair_length<R: Rng>(
    child: &mut Vec<usize>,
    pool_size: usize,
    min_len: usize,
    rng: &mut R,
) {
    pad_unique(child, min_len, pool_size, rng);
}

/// Outcome of [`mutate_length`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMutation {
    /// The signal at this location was removed.
    Shrunk(usize),
    /// A signal at this location was appended.
    Grown(usize),
    /// Nothing changed.
    Unchanged,
}

/// Grows or shrinks a plan by at most one signal.
///
/// A first draw below `rate` removes a random signal if the plan holds
/// more than `min_len`. Otherwise a second draw below `rate` appends an
/// unused location if the plan holds fewer than `max_len`; when the pool is
/// exhausted the grow step is skipped.
pub fn mutate_length<R: Rng>(
    child: &mut Vec<usize>,
    pool_size: usize,
    min_len: usize,
    max_len: usize,
    rate: f64,
    rng: &mut R,
) -> LengthMutation {
    if rng.random::<f64>() < rate && child.len() > min_len {
        let pos = rng.random_range(0..child.len() as u64) as usize;
        return LengthMutation::Shrunk(child.remove(pos));
    }
    if rng.random::<f64>() < rate && child.len() < max_len {
        if let Some(idx) = unused_index(child, pool_size, rng) {
            child.push(idx);
            return LengthMutation::Grown(idx);
        }
    }
    LengthMutation::Unchanged
}
