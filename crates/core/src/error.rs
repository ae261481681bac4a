//! Domain errors raised by the topology, path and fare computations.

use thiserror::Error;

use crate::models::{LineId, StationId};

/// Convenience alias for results produced by the domain layer.
pub type Result<T> = std::result::Result<T, SubwayError>;

/// Closed set of domain-rule violations.
///
/// Every variant carries the identifiers involved so callers can branch on
/// the variant (or on [`SubwayError::kind`]) instead of on message text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubwayError {
    /// A section was built with the same station on both ends.
    #[error("up and down station must differ (both are {station})")]
    InvalidEndpoints {
        /// The repeated station.
        station: StationId,
    },
    /// A section distance below 1.
    #[error("section distance must be at least 1, got {distance}")]
    InvalidDistance {
        /// The rejected distance.
        distance: i64,
    },
    /// A split candidate is not strictly shorter than the section it splits.
    #[error("split distance {requested} must be shorter than existing section distance {existing}")]
    DistanceTooLarge {
        /// Distance of the section being split.
        existing: i64,
        /// Distance of the candidate section.
        requested: i64,
    },
    /// Neither endpoint of a new section is on the line.
    #[error("neither station {up} nor station {down} is on line {line}")]
    NoMatchingEndpoint {
        /// Target line.
        line: LineId,
        /// Candidate up station.
        up: StationId,
        /// Candidate down station.
        down: StationId,
    },
    /// Both endpoints of a new section are already on the line.
    #[error("stations {up} and {down} are both already on line {line}")]
    BothEndpointsAlreadyPresent {
        /// Target line.
        line: LineId,
        /// Candidate up station.
        up: StationId,
        /// Candidate down station.
        down: StationId,
    },
    /// Deleting from a line that only has one section left.
    #[error("line {line} has a single section and cannot lose a station")]
    MinimumSectionCountViolation {
        /// Target line.
        line: LineId,
    },
    /// Deleting a station that is not on the line.
    #[error("station {station} is not on line {line}")]
    StationNotFound {
        /// Target line.
        line: LineId,
        /// Requested station.
        station: StationId,
    },
    /// Path query for a station that no section references.
    #[error("station {station} is not registered in any section")]
    StationNotRegistered {
        /// Requested station.
        station: StationId,
    },
    /// Path query between disconnected stations.
    #[error("no path connects station {departure} to station {arrival}")]
    NoPath {
        /// Departure station.
        departure: StationId,
        /// Arrival station.
        arrival: StationId,
    },
    /// The sections of a line do not form a single simple chain.
    #[error("sections of line {line} do not form a chain at station {station}")]
    BrokenChain {
        /// Line whose sections are malformed.
        line: LineId,
        /// Station where the walk stopped.
        station: StationId,
    },
    /// Two sections handed to a merge do not share an endpoint head-to-tail.
    #[error("sections {first:?} and {second:?} are not adjacent on the same line")]
    NotAdjacent {
        /// `(up, down)` of the receiver.
        first: (StationId, StationId),
        /// `(up, down)` of the argument.
        second: (StationId, StationId),
    },
    /// A line id that is missing from the line metadata.
    #[error("line {line} is not registered")]
    LineNotRegistered {
        /// Requested line.
        line: LineId,
    },
}

/// Coarse classification used by calling layers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request breaks a domain rule.
    InvalidInput,
    /// The request names something that does not exist.
    NotFound,
    /// The stored data is inconsistent.
    Internal,
}

impl SubwayError {
    /// Classify the error for the calling layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StationNotFound { .. } | Self::LineNotRegistered { .. } => ErrorKind::NotFound,
            Self::BrokenChain { .. } => ErrorKind::Internal,
            _ => ErrorKind::InvalidInput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_failure_class() {
        assert_eq!(
            SubwayError::InvalidDistance { distance: 0 }.kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            SubwayError::NoPath {
                departure: 1,
                arrival: 5
            }
            .kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            SubwayError::StationNotFound {
                line: 1,
                station: 9
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            SubwayError::BrokenChain {
                line: 1,
                station: 2
            }
            .kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn messages_carry_identifiers() {
        let err = SubwayError::DistanceTooLarge {
            existing: 10,
            requested: 15,
        };
        assert_eq!(
            err.to_string(),
            "split distance 15 must be shorter than existing section distance 10"
        );
    }
}
