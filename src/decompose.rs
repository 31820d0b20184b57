//! Parallel and serial decomposition of logic functions for LUT targets.
//!
//! Both entry points decide whether the function described by the input
//! blankets is deterministically decomposable under the requested split, and
//! if so produce the encoding blankets of the sub-functions. A `None` return
//! is a negative decision, not an error: the search simply found no
//! decomposition under this split.
//!
//! Blanket roles follow the usual naming of partition-based decomposition:
//! `I` (binary inputs, optionally split into `Iv`/`Iu`), `Q` (the variable
//! under encoding), `G`/`H` (parallel targets, `Y = G x H`) and `Y` (serial
//! target, `Y = H(Iu, Qu, G(Iv, Qv))`).

use log::debug;

use crate::blanket::Blanket;
use crate::block::Block;
use crate::cover::{minimal_cover, minimal_cover_constrained};
use crate::result::{Dependency, Joint, ParallelDecomposition, SerialDecomposition};

/// Options for [`serial`] decomposition.
#[derive(Debug, Clone)]
pub struct SerialOptions {
    /// Input width of the target LUT cell.
    pub lut_inputs: u32,
    /// Desired number of blocks in Qv; 0 selects the automatic target
    /// `2^(lut_inputs - log2(|Iv|))`.
    pub qv_expected_blocks: usize,
    /// Prefer a minimal G over a minimal Qu when scoring candidates.
    pub minimize_g: bool,
}

impl Default for SerialOptions {
    fn default() -> Self {
        Self {
            lut_inputs: 4,
            qv_expected_blocks: 0,
            minimize_g: false,
        }
    }
}

/// Finds a parallel decomposition of `Y = F(I, Q)` into `Y = G x H`, with an
/// undivided binary-input blanket `i` shared by both sub-functions.
///
/// Requires the split of the output into `g` and `h` to be provided. Returns
/// `None` when `(I x Q) <= (G x H)` does not hold: the function is not
/// deterministically decomposable under this split.
pub fn parallel(
    i: Option<&Blanket>,
    q: &Blanket,
    g: &Blanket,
    h: &Blanket,
) -> Option<ParallelDecomposition> {
    if !decomposable(i, q, g, h) {
        debug!("parallel: (I x Q) <= (G x H) does not hold");
        return None;
    }

    let (qv, g_dependency) = resolve_function(i, q, g, None);
    let (qu, h_dependency) = resolve_function(i, q, h, qv.as_ref());
    debug!("parallel: G depends on {:?}, H depends on {:?}", g_dependency, h_dependency);

    let joint = match (&qv, &qu) {
        (Some(qv), Some(qu)) => detect_joint(qv, qu),
        _ => None,
    };

    Some(ParallelDecomposition {
        i: i.cloned(),
        iv: None,
        iu: None,
        q: q.clone(),
        g: g.clone(),
        h: h.clone(),
        qv: qv.map(presentation_sorted),
        qu: qu.map(presentation_sorted),
        joint,
        g_dependency,
        h_dependency,
    })
}

/// Finds a parallel decomposition with the binary inputs split per
/// sub-function: `Yg = G(Iv, V)`, `Yh = H(Iu, U)` with `V x U = Q`.
///
/// The decomposability gate uses the combined input blanket `Iv x Iu`; a
/// missing side simply drops out of the product.
pub fn parallel_split(
    iv: Option<&Blanket>,
    iu: Option<&Blanket>,
    q: &Blanket,
    g: &Blanket,
    h: &Blanket,
) -> Option<ParallelDecomposition> {
    let combined = match (iv, iu) {
        (Some(iv), Some(iu)) => iv.product(iu),
        (Some(iv), None) => Some(iv.clone()),
        (None, Some(iu)) => Some(iu.clone()),
        (None, None) => None,
    };
    if !decomposable(combined.as_ref(), q, g, h) {
        debug!("parallel_split: (Iv x Iu x Q) <= (G x H) does not hold");
        return None;
    }

    let (qv, g_dependency) = resolve_function(iv, q, g, None);
    let (qu, h_dependency) = resolve_function(iu, q, h, qv.as_ref());
    debug!("parallel_split: G depends on {:?}, H depends on {:?}", g_dependency, h_dependency);

    let joint = match (&qv, &qu) {
        (Some(qv), Some(qu)) => detect_joint(qv, qu),
        _ => None,
    };

    Some(ParallelDecomposition {
        i: None,
        iv: iv.cloned(),
        iu: iu.cloned(),
        q: q.clone(),
        g: g.clone(),
        h: h.clone(),
        qv: qv.map(presentation_sorted),
        qu: qu.map(presentation_sorted),
        joint,
        g_dependency,
        h_dependency,
    })
}

// The decomposability precondition: (I x Q) <= (G x H), or Q <= (G x H) when
// there are no binary inputs.
fn decomposable(i: Option<&Blanket>, q: &Blanket, g: &Blanket, h: &Blanket) -> bool {
    let Some(gh) = g.product_unsorted(h) else {
        return false;
    };
    match i {
        None => q.refines(&gh),
        Some(i) => i
            .product_unsorted(q)
            .is_some_and(|iq| iq.refines(&gh)),
    }
}

// Decides, for one sub-function target, which inputs it depends on and
// computes the cover of Q feeding it. First match wins:
//
//   1. I <= target          => binary inputs alone, no cover needed,
//   2. Q <= target          => cover of Q against the target,
//   3. I x Q <= target      => cover with A = I.
//
// When the other sub-function's cover `q1` already exists, the cover here is
// additionally constrained so that `q1 x cover = Q` keeps holding.
fn resolve_function(
    i: Option<&Blanket>,
    q: &Blanket,
    target: &Blanket,
    q1: Option<&Blanket>,
) -> (Option<Blanket>, Option<Dependency>) {
    if let Some(i) = i {
        if i.refines(target) {
            return (None, Some(Dependency::I));
        }
    }
    if q.refines(target) {
        let cover = match q1 {
            Some(q1) => minimal_cover_constrained(q, q, q1, target),
            None => minimal_cover(Some(q), q, target),
        };
        return (cover, Some(Dependency::Q));
    }
    if let Some(i) = i {
        let holds = i
            .product_unsorted(q)
            .is_some_and(|iq| iq.refines(target));
        if holds {
            let cover = match q1 {
                Some(q1) => minimal_cover_constrained(i, q, q1, target),
                None => minimal_cover(Some(i), q, target),
            };
            return (cover, Some(Dependency::IAndQ));
        }
    }
    (None, None)
}

// Checks whether one encoding refines the other; if so, computes the
// residual blanket deriving the finer encoding from the coarser one. A
// one-block residual means the encodings coincide and is discarded.
fn detect_joint(qv: &Blanket, qu: &Blanket) -> Option<Joint> {
    if qv.refines(qu) {
        let mut partial = minimal_cover(Some(qu), qv, qv);
        if partial.as_ref().is_some_and(|p| p.len() == 1) {
            partial = None;
        }
        debug!("joint: Qv <= Qu, residual {}", partial.is_some());
        Some(Joint::QvWithinQu {
            partial: partial.map(presentation_sorted),
        })
    } else if qu.refines(qv) {
        let mut partial = minimal_cover(Some(qv), qu, qu);
        if partial.as_ref().is_some_and(|p| p.len() == 1) {
            partial = None;
        }
        debug!("joint: Qu <= Qv, residual {}", partial.is_some());
        Some(Joint::QuWithinQv {
            partial: partial.map(presentation_sorted),
        })
    } else {
        None
    }
}

fn presentation_sorted(mut blanket: Blanket) -> Blanket {
    blanket.sort_presentation();
    blanket
}

// Best partial assignment found while scoring one step of the serial loop.
struct Candidate {
    qv: Blanket,
    qu: Blanket,
    g: Blanket,
    index: usize,
}

/// Finds a serial decomposition `Y = H(Iu, Qu, G(Iv, Qv))`.
///
/// The blocks of `q` are distributed between `qv` (feeding G, paced toward
/// `2^(lut_inputs - log2(|Iv|))` blocks) and `qu` (feeding H alongside G's
/// output), maintaining `Iv x Qv <= G` and `G x Iu x Qu <= Y` throughout.
/// Returns `None` when the precondition `(Iv x Iu x Q) <= Y` fails or when no
/// feasible assignment exists for the helper covers.
///
/// # Panics
///
/// Panics when `options.lut_inputs` is 0 or `q` has no blocks (caller
/// contract).
pub fn serial(
    iv: Option<&Blanket>,
    iu: Option<&Blanket>,
    q: &Blanket,
    y: &Blanket,
    options: &SerialOptions,
) -> Option<SerialDecomposition> {
    assert!(options.lut_inputs > 0, "LUT input width must be positive");
    assert!(!q.is_empty(), "Q must contain at least one block");

    let combined = match iv {
        Some(iv) => match iu {
            Some(iu) => iv.product_unsorted(iu),
            None => Some(iv.clone()),
        },
        None => None,
    };
    let feasible = combined
        .as_ref()
        .and_then(|i| i.product_unsorted(q))
        .map_or(false, |iq| iq.refines(y))
        || q.refines(y);
    if !feasible {
        debug!("serial: (I x Q) <= Y does not hold");
        return None;
    }

    // Helper blanket M: from Iu x Qu x G <= Y and the worst-case assumption
    // Qu x G ~ M, a cover with Iu x M <= Y is built over the worst-case
    // G = Iv x Q. M bounds every G candidate below.
    let m = match iu {
        None => y.copy(),
        Some(iu) => {
            let worst_g = match iv {
                Some(iv) => iv.product(q)?,
                None => q.clone(),
            };
            minimal_cover(Some(iu), &worst_g, y)?
        }
    };

    // Probable block count of G: with the worst case Qv = Qu = Q the serial
    // conditions collapse to G <= M, and the cover of Q's worst-case G
    // against M estimates the fewest blocks a deterministic G can have.
    let g_prob = {
        let seed = match iv {
            Some(iv) => iv.product_unsorted(q)?,
            None => q.clone(),
        };
        minimal_cover(Some(q), &seed, &m)?
    };
    debug!("serial: |M| = {}, probable |G| = {}", m.len(), g_prob.len());

    let mut pool: Vec<Block> = q.copy().blocks().to_vec();

    // Qv and Qu start out as the first block of Q; G follows.
    let mut qv = Blanket::from_block(&pool[0]);
    let mut qu = Blanket::from_block(&pool[0]);
    pool.remove(0);

    let mut g: Option<Blanket> = match iv {
        Some(iv) => iv.product(&qv),
        None => Some(qv.copy()),
    };

    // Pacing: how many blocks of Q to sum into each block of Qv so that Qv
    // lands near the target count. `summed == 0` opens a new Qv block.
    let qv_target: i64 = if options.qv_expected_blocks > 0 {
        options.qv_expected_blocks as i64
    } else {
        let iv_bits = iv.map_or(0, |iv| (iv.len() as f64).log2().ceil() as i64);
        2f64.powi((options.lut_inputs as i64 - iv_bits) as i32) as i64
    };
    let mut sum_target: i64 = (q.len() as f32 / qv_target as f32).ceil() as i64;
    let mut summed: i64 = if sum_target == 1 { 0 } else { 1 };

    while !pool.is_empty() {
        let mut best: Option<Candidate> = None;

        for i in 0..pool.len() {
            // Either sum the block into the last block of Qv or open a new
            // Qv block, per the pacing counter.
            let mut qv_tmp = qv.copy();
            if summed == 0 {
                qv_tmp.add_block(&pool[i]);
            } else {
                let last = qv_tmp.len() - 1;
                let merged = qv_tmp.blocks()[last].union(&pool[i]);
                qv_tmp.replace_block(last, merged);
            }

            let g_tmp = match iv {
                Some(iv) => match iv.product(&qv_tmp) {
                    Some(g_tmp) => g_tmp,
                    None => continue,
                },
                None => qv_tmp.copy(),
            };

            let mut best_qu_g = 0usize;
            let mut best_qu_m = 0usize;

            for j in 0..qu.len() {
                let mut qu_tmp = qu.copy();

                // Blocks summed into one block of Qv must land in distinct
                // blocks of Qu, so that Qv x Qu still reconstructs Q: the
                // candidate Qu block must not overlap the updated Qv block.
                let qv_last = &qv_tmp.blocks()[qv_tmp.len() - 1];
                if !qv_last.intersects(&qu_tmp.blocks()[j]) {
                    let merged = qu_tmp.blocks()[j].union(&pool[i]);
                    qu_tmp.replace_block(j, merged);
                } else {
                    qu_tmp.add_block(&pool[i]);
                }

                let Some(g_candidate) = minimal_cover(Some(&qu_tmp), &g_tmp, &m) else {
                    continue;
                };
                let Some(qu_g) = qu_tmp.product_unsorted(&g_candidate) else {
                    continue;
                };
                let Some(qu_m) = qu_tmp.product_unsorted(&m) else {
                    continue;
                };

                // Pinned scoring ladder: the first differing criterion
                // decides, preferring fewer G blocks (within the probable
                // ceiling), then fewer Qu x G blocks, then fewer Qu x M
                // blocks, then fewer Qu blocks.
                let optimal = match &best {
                    None => {
                        if options.minimize_g {
                            g_candidate.len() <= g_prob.len()
                        } else {
                            true
                        }
                    }
                    Some(best) => {
                        let held = best.g.len();
                        let tried = g_candidate.len();
                        if options.minimize_g {
                            (held < tried && tried <= g_prob.len() && best.qu.len() > qu_tmp.len())
                                || (held < tried && tried <= g_prob.len() && best_qu_g > qu_g.len())
                                || (held < tried
                                    && tried <= g_prob.len()
                                    && best_qu_g == qu_g.len()
                                    && best_qu_m > qu_m.len())
                                || (held == tried && best.qu.len() > qu_tmp.len())
                                || (held > tried)
                        } else {
                            (held < tried && tried <= g_prob.len() && best.qu.len() > qu_tmp.len())
                                || (held <= tried && best_qu_g > qu_g.len())
                                || (held <= tried
                                    && best_qu_g == qu_g.len()
                                    && best_qu_m > qu_m.len())
                                || (held == tried && best.qu.len() > qu_tmp.len())
                                || (held > tried)
                        }
                    }
                };

                if optimal && qu_g.refines(&m) {
                    best_qu_g = qu_g.len();
                    best_qu_m = qu_m.len();
                    best = Some(Candidate {
                        qv: qv_tmp.clone(),
                        qu: qu_tmp,
                        g: g_candidate,
                        index: i,
                    });
                }
            }
        }

        let step = match best {
            Some(best) if best.g.len() <= g_prob.len() => best,
            other => {
                // Either no remaining block could be absorbed, or the best
                // assignment pushed G past the probable ceiling: open a
                // separate Qv/Qu block for the chosen Q block and recompute
                // G as a plain cover.
                let (qv_fallback, index) = match other {
                    Some(best) => (best.qv, best.index),
                    None => {
                        let mut qv_fallback = qv.copy();
                        qv_fallback.add_block(&pool[0]);
                        summed = 0;
                        (qv_fallback, 0)
                    }
                };
                let mut qu_fallback = qu.copy();
                qu_fallback.add_block(&pool[index]);
                let seed = match iv {
                    Some(iv) => iv.product(&qv_fallback),
                    None => Some(qv_fallback.clone()),
                };
                let g_fallback = match seed.and_then(|s| minimal_cover(Some(&qu_fallback), &s, &m)) {
                    Some(g_fallback) => g_fallback,
                    None => {
                        debug!("serial: fallback cover infeasible");
                        return None;
                    }
                };
                Candidate {
                    qv: qv_fallback,
                    qu: qu_fallback,
                    g: g_fallback,
                    index,
                }
            }
        };

        qv = step.qv;
        qu = step.qu;
        g = Some(step.g);

        summed += 1;
        if summed == sum_target {
            let room = qv_target - qv.len() as i64;
            if room > 0 {
                sum_target = ((pool.len() - 1) as f32 / room as f32).ceil() as i64;
                summed = 0;
            }
        }
        pool.remove(step.index);
    }

    let g = g?;
    let joint = detect_joint(&qv, &qu);
    qv.sort_presentation();
    qu.sort_presentation();

    Some(SerialDecomposition {
        iv: iv.cloned(),
        iu: iu.cloned(),
        q: q.clone(),
        qv,
        qu,
        g,
        y: y.clone(),
        joint,
    })
}
