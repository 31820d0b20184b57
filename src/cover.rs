//! Greedy minimal-cover generation.
//!
//! Given blankets `A` (optional), `B` and `F`, [`minimal_cover`] groups the
//! blocks of `B` into the fewest blocks `Q` such that `A x Q <= F` (or
//! `Q <= F` when `A` is absent), merging whole blocks only, never splitting
//! them. The result is minimal in block count for the greedy order tried, not
//! globally optimal; repeated runs are deterministic.
//!
//! This is the combinatorial primitive both decomposition forms are built on.

use log::debug;

use crate::blanket::Blanket;
use crate::block::Block;

/// Finds a fewest-block blanket `Q`, built by merging whole blocks of `b`,
/// such that `a x Q <= f` (or `Q <= f` when `a` is `None`).
///
/// Blocks are taken from a presentation-ordered copy of `b` and processed
/// from the synthesis tail (largest first): the largest blocks are the
/// hardest to merge, so they are committed first. Each pass grows one
/// accumulator block as far as the constraint allows, then closes it out.
///
/// Returns `None` when `b` has no blocks, or when some remaining block cannot
/// satisfy the constraint even on its own.
pub fn minimal_cover(a: Option<&Blanket>, b: &Blanket, f: &Blanket) -> Option<Blanket> {
    let mut result = Blanket::empty();
    let mut pool: Vec<Option<Block>> = b.copy().blocks().iter().cloned().map(Some).collect();
    let mut remaining = pool.len();

    loop {
        let mut used = false;
        let mut acc: Option<Block> = None;

        if remaining > 0 {
            for i in (0..pool.len()).rev() {
                let Some(candidate) = pool[i].as_ref() else {
                    continue;
                };
                let merged = match &acc {
                    Some(q) => q.union(candidate),
                    None => candidate.clone(),
                };
                if covers(a, &merged, f) {
                    remaining -= 1;
                    if remaining == 0 {
                        result.add_block_synthesis(&merged);
                        debug!("minimal_cover: done, {} block(s)", result.len());
                        return Some(result);
                    }
                    acc = Some(merged);
                    pool[i] = None;
                    used = true;
                }
            }
            if let Some(acc) = &acc {
                result.add_block_unsorted(acc);
            }
        }

        if !used {
            debug!("minimal_cover: no feasible assignment, {} block(s) left", remaining);
            return None;
        }
    }
}

/// The constrained variant: finds a fewest-block `Q` with `a x Q <= f` and,
/// additionally, `q1 x Q = b`. A tentative merge is rejected when
/// `q1 x {q}` would introduce a block that `b` does not already contain, i.e.
/// when the merge would cut `b` finer than it is relative to `q1`.
pub fn minimal_cover_constrained(
    a: &Blanket,
    b: &Blanket,
    q1: &Blanket,
    f: &Blanket,
) -> Option<Blanket> {
    let mut result = Blanket::empty();
    let mut pool: Vec<Option<Block>> = b.copy().blocks().iter().cloned().map(Some).collect();
    let mut remaining = pool.len();

    loop {
        let mut used = false;
        let mut acc: Option<Block> = None;

        if remaining > 0 {
            for i in (0..pool.len()).rev() {
                let Some(candidate) = pool[i].as_ref() else {
                    continue;
                };
                let merged = match &acc {
                    Some(q) => q.union(candidate),
                    None => candidate.clone(),
                };
                let lifted = Blanket::from_block(&merged);
                let feasible = a
                    .product_unsorted(&lifted)
                    .is_some_and(|p| p.refines(f));
                if feasible && splits_no_finer(q1, &lifted, b) {
                    remaining -= 1;
                    if remaining == 0 {
                        result.add_block_synthesis(&merged);
                        return Some(result);
                    }
                    acc = Some(merged);
                    pool[i] = None;
                    used = true;
                }
            }
            if let Some(acc) = &acc {
                result.add_block_unsorted(acc);
            }
        }

        if !used {
            debug!(
                "minimal_cover_constrained: no feasible assignment, {} block(s) left",
                remaining
            );
            return None;
        }
    }
}

fn covers(a: Option<&Blanket>, q: &Block, f: &Blanket) -> bool {
    let lifted = Blanket::from_block(q);
    match a {
        Some(a) => {
            a.product_unsorted(&lifted).is_some_and(|p| p.refines(f)) || lifted.refines(f)
        }
        None => lifted.refines(f),
    }
}

// True iff every block of q1 x q already exists (bit-exact) in b.
fn splits_no_finer(q1: &Blanket, q: &Blanket, b: &Blanket) -> bool {
    match q1.product_unsorted(q) {
        Some(product) => product
            .blocks()
            .iter()
            .all(|p| b.blocks().iter().any(|bb| p == bb)),
        None => false,
    }
}
