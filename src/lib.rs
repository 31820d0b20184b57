//! # deco-rs: functional decomposition for LUT mapping
//!
//! **`deco-rs`** decomposes combinational logic functions defined over binary
//! and symbolic (multiple-valued) inputs into compositions of smaller
//! sub-functions, each fitting a fixed-input-width LUT cell. This is the core
//! step of technology mapping for FPGA-like targets.
//!
//! ## How it works
//!
//! Every input variable (or group of variables) is represented as a
//! [`Blanket`][crate::blanket::Blanket]: a cover of the truth table's rows
//! ("terms") by [`Block`][crate::block::Block]s of rows that are equivalent
//! for that variable. Decomposability then becomes a statement in the blanket
//! algebra (`Y = F(X)` splits into `G` and `H` exactly when the refinement
//! relation `(I x Q) <= (G x H)` holds), and the engine searches for the
//! smallest encodings that preserve it.
//!
//! ## Key components
//!
//! - **[`block`]** / **[`blanket`]**: the set/partition algebra (product,
//!   refinement, equality, reduction).
//! - **[`cover`]**: the greedy minimal-cover generator, the combinatorial
//!   primitive behind every encoding computed here.
//! - **[`decompose`]**: parallel (`Y = G x H`) and serial
//!   (`Y = H(Iu, Qu, G(Iv, Qv))`) decomposition, with joint-decomposition
//!   detection.
//! - **[`encoding`]**: export of a finished blanket as binary signals with
//!   don't-cares.
//!
//! ## Basic usage
//!
//! ```rust
//! use deco_rs::blanket::Blanket;
//! use deco_rs::decompose;
//!
//! // A controller with binary inputs x1 x2 (grouped into I) and a
//! // six-valued state variable Q; the target outputs are split into G and H.
//! let i = Blanket::parse("1,2,4,5,7,9,10; 1,4,5,7,8,9,10; 2,4,5,6,9,10; 3,4,5,8,9,10;").unwrap();
//! let q = Blanket::parse("S0:1,2,3; S1:4; S2:5; S3:6,7,8; S4:9; S5:10;").unwrap();
//! let g = Blanket::parse("0:1,2,5,6,10; 1:3,4,7,8,9;").unwrap();
//! let h = Blanket::parse("0:1,2,4,6,9; 1:3,5,7,8,10;").unwrap();
//!
//! let result = decompose::parallel(Some(&i), &q, &g, &h).unwrap();
//!
//! // Each sub-function received its own encoding of Q, and together they
//! // reconstruct Q exactly.
//! let qv = result.qv.as_ref().unwrap();
//! let qu = result.qu.as_ref().unwrap();
//! assert_eq!(qv.to_string(), "S0:1,2,3; S4+S1:4,9; S5+S2:5,10; S3:6,7,8;");
//! assert!(qv.product(qu).unwrap().eq_blocks(&q));
//! ```
//!
//! A `None` from the engine is a negative decision (not decomposable under
//! that split), never an error. Repeated application of single steps to build
//! a full LUT network is the caller's concern: the blankets of a result can
//! be fed back as the `Q`/`Y` of the next step.

pub mod blanket;
pub mod block;
pub mod cover;
pub mod decompose;
pub mod encoding;
pub mod result;
