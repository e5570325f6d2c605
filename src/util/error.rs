//! Error types for ndmatch.

use thiserror::Error;

/// Result alias for ndmatch operations.
pub type MatchResult<T> = std::result::Result<T, MatchError>;

/// Errors that can occur when validating a template matching request.
///
/// Every variant is detected before any aggregate table is built or any
/// output element is written; a failed call leaves no partial output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    /// Source and template have different numbers of axes.
    #[error("rank mismatch: source has {source_rank} axes, template has {template_rank}")]
    RankMismatch {
        /// Number of axes of the source array.
        source_rank: usize,
        /// Number of axes of the template array.
        template_rank: usize,
    },
    /// The rank is outside the supported range.
    #[error("unsupported rank {rank}: expected 1..={max}")]
    UnsupportedRank {
        /// Rank of the offending arrays.
        rank: usize,
        /// Largest rank the engine accepts.
        max: usize,
    },
    /// An input array has a zero-length axis.
    #[error("{what} has zero extent on axis {axis}")]
    ZeroExtent {
        /// Which input the axis belongs to.
        what: &'static str,
        /// The offending axis.
        axis: usize,
    },
    /// The template does not fit inside the source along some axis.
    #[error(
        "template exceeds source on axis {axis}: template extent {template_extent} > source extent {source_extent}"
    )]
    TemplateTooLarge {
        /// The offending axis.
        axis: usize,
        /// Template extent along that axis.
        template_extent: usize,
        /// Source extent along that axis.
        source_extent: usize,
    },
    /// A pre-allocated destination has the wrong number of axes.
    #[error("destination rank mismatch: expected {expected} axes, got {got}")]
    DestRankMismatch {
        /// Required rank, equal to the source rank.
        expected: usize,
        /// Actual destination rank.
        got: usize,
    },
    /// A pre-allocated destination does not have the required result shape.
    #[error("destination shape mismatch on axis {axis}: expected extent {expected}, got {got}")]
    DestShapeMismatch {
        /// The offending axis.
        axis: usize,
        /// Required extent `source - template + 1`.
        expected: usize,
        /// Actual destination extent.
        got: usize,
    },
    /// Size arithmetic overflowed `usize`.
    #[error("array sizes overflow while computing {what}")]
    SizeOverflow {
        /// Which derived quantity overflowed.
        what: &'static str,
    },
}
