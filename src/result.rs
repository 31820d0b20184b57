//! Result records for decomposition steps.
//!
//! Each decomposition kind has its own record type, so that which fields are
//! populated is visible in the types: a serial step always produces `qv`,
//! `qu` and `g`, while a parallel step may resolve a sub-function to its
//! binary inputs alone and produce no encoding split for it.

use std::fmt;

use crate::blanket::Blanket;

/// Which inputs a resulting sub-function depends on.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Dependency {
    /// Depends on the binary inputs alone.
    I,
    /// Depends on the encoded variable alone.
    Q,
    /// Depends on both the binary inputs and the encoded variable.
    IAndQ,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependency::I => write!(f, "I"),
            Dependency::Q => write!(f, "Q"),
            Dependency::IAndQ => write!(f, "I and Q"),
        }
    }
}

/// A joint decomposition: one encoding blanket refines the other, so it can
/// be reconstructed from the other plus a residual.
///
/// The residual is `None` when it would consist of a single block: then the
/// two encodings are identical and no independent residual is meaningful.
#[derive(Debug, Clone)]
pub enum Joint {
    /// `Qv <= Qu`: `Qv = Qu x partial`.
    QvWithinQu { partial: Option<Blanket> },
    /// `Qu <= Qv`: `Qu = Qv x partial`.
    QuWithinQv { partial: Option<Blanket> },
}

impl Joint {
    pub fn partial(&self) -> Option<&Blanket> {
        match self {
            Joint::QvWithinQu { partial } | Joint::QuWithinQv { partial } => partial.as_ref(),
        }
    }
}

/// Result of a parallel decomposition step `Y = G x H`.
///
/// `qv`/`qu` are the covers of `Q` feeding G and H respectively; either is
/// absent when the corresponding sub-function depends on its binary inputs
/// alone (dependency [`Dependency::I`]), or when no dependency variant
/// matched that sub-function.
#[derive(Debug, Clone)]
pub struct ParallelDecomposition {
    /// Joint binary-input blanket, when the undivided form was used.
    pub i: Option<Blanket>,
    /// Binary inputs of G, when the split form was used.
    pub iv: Option<Blanket>,
    /// Binary inputs of H, when the split form was used.
    pub iu: Option<Blanket>,
    /// The variable under encoding.
    pub q: Blanket,
    /// Target blanket of sub-function G.
    pub g: Blanket,
    /// Target blanket of sub-function H.
    pub h: Blanket,
    /// Cover of `q` feeding G.
    pub qv: Option<Blanket>,
    /// Cover of `q` feeding H.
    pub qu: Option<Blanket>,
    /// Present when one encoding refines the other.
    pub joint: Option<Joint>,
    pub g_dependency: Option<Dependency>,
    pub h_dependency: Option<Dependency>,
}

/// Result of a serial decomposition step `Y = H(Iu, Qu, G(Iv, Qv))`.
#[derive(Debug, Clone)]
pub struct SerialDecomposition {
    /// Binary inputs of G.
    pub iv: Option<Blanket>,
    /// Binary inputs of H.
    pub iu: Option<Blanket>,
    /// The variable under encoding.
    pub q: Blanket,
    /// The split of `q` feeding G. `qv x qu` reconstructs `q`.
    pub qv: Blanket,
    /// The split of `q` feeding H alongside G's output.
    pub qu: Blanket,
    /// The computed blanket of sub-function G (in the synthesis order the
    /// cover generator produced).
    pub g: Blanket,
    /// The target output blanket.
    pub y: Blanket,
    /// Present when one encoding refines the other.
    pub joint: Option<Joint>,
}

/// A decomposition outcome, tagged by kind.
#[derive(Debug, Clone)]
pub enum Decomposition {
    Parallel(ParallelDecomposition),
    Serial(SerialDecomposition),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DecompositionKind {
    Parallel,
    Serial,
}

impl Decomposition {
    pub fn kind(&self) -> DecompositionKind {
        match self {
            Decomposition::Parallel(_) => DecompositionKind::Parallel,
            Decomposition::Serial(_) => DecompositionKind::Serial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_partial_accessor() {
        let partial = Blanket::parse("A:1,2; B:3;").unwrap();
        let joint = Joint::QvWithinQu {
            partial: Some(partial.clone()),
        };
        assert!(joint.partial().unwrap().eq_blocks(&partial));
        let discarded = Joint::QuWithinQv { partial: None };
        assert!(discarded.partial().is_none());
    }

    #[test]
    fn test_dependency_display() {
        assert_eq!(Dependency::I.to_string(), "I");
        assert_eq!(Dependency::Q.to_string(), "Q");
        assert_eq!(Dependency::IAndQ.to_string(), "I and Q");
    }

    #[test]
    fn test_decomposition_kind() {
        let q = Blanket::parse("A:1; B:2;").unwrap();
        let parallel = Decomposition::Parallel(ParallelDecomposition {
            i: None,
            iv: None,
            iu: None,
            q: q.clone(),
            g: q.clone(),
            h: q.clone(),
            qv: None,
            qu: None,
            joint: None,
            g_dependency: None,
            h_dependency: None,
        });
        assert_eq!(parallel.kind(), DecompositionKind::Parallel);
        let serial = Decomposition::Serial(SerialDecomposition {
            iv: None,
            iu: None,
            q: q.clone(),
            qv: q.clone(),
            qu: q.clone(),
            g: q.clone(),
            y: q,
            joint: None,
        });
        assert_eq!(serial.kind(), DecompositionKind::Serial);
    }
}
