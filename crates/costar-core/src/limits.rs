//! Resource limits for searches and batches

/// Default depth bound, in hops
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Maximum configurable depth bound (12)
pub const MAX_SEARCH_DEPTH: u32 = 12;

/// Maximum in-flight neighbor lookups per search (256)
pub const MAX_CONCURRENCY: usize = 256;

/// Maximum concurrently running pair searches (64)
pub const MAX_WORKERS: usize = 64;

/// Maximum roster size for a pairwise batch (500)
pub const MAX_ROSTER_SIZE: usize = 500;

/// Maximum retries of a transiently failing pair (10)
pub const MAX_PAIR_RETRIES: u32 = 10;

/// Validation error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    SearchDepthTooLarge { depth: u32, max: u32 },
    ZeroConcurrency,
    ConcurrencyTooLarge { count: usize, max: usize },
    ZeroWorkers,
    TooManyWorkers { count: usize, max: usize },
    TooManyRetries { count: u32, max: u32 },
    RosterTooLarge { count: usize, max: usize },
    ZeroNeighborLimit,
    ZeroFrontierLimit,
    EmptyNodeId,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SearchDepthTooLarge { depth, max } => {
                write!(f, "Search depth too large: {} (max {})", depth, max)
            }
            Self::ZeroConcurrency => write!(f, "Search concurrency must be at least 1"),
            Self::ConcurrencyTooLarge { count, max } => {
                write!(f, "Search concurrency too large: {} (max {})", count, max)
            }
            Self::ZeroWorkers => write!(f, "Worker budget must be at least 1"),
            Self::TooManyWorkers { count, max } => {
                write!(f, "Worker budget too large: {} (max {})", count, max)
            }
            Self::TooManyRetries { count, max } => {
                write!(f, "Too many pair retries: {} (max {})", count, max)
            }
            Self::RosterTooLarge { count, max } => {
                write!(f, "Roster too large: {} actors (max {})", count, max)
            }
            Self::ZeroNeighborLimit => write!(f, "Neighbor limit must be at least 1"),
            Self::ZeroFrontierLimit => write!(f, "Frontier limit must be at least 1"),
            Self::EmptyNodeId => write!(f, "Node id cannot be empty"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate depth bound
pub fn validate_depth(depth: u32) -> Result<(), ValidationError> {
    if depth > MAX_SEARCH_DEPTH {
        return Err(ValidationError::SearchDepthTooLarge {
            depth,
            max: MAX_SEARCH_DEPTH,
        });
    }
    Ok(())
}

/// Validate per-search concurrency
pub fn validate_concurrency(count: usize) -> Result<(), ValidationError> {
    if count == 0 {
        return Err(ValidationError::ZeroConcurrency);
    }
    if count > MAX_CONCURRENCY {
        return Err(ValidationError::ConcurrencyTooLarge {
            count,
            max: MAX_CONCURRENCY,
        });
    }
    Ok(())
}

/// Validate driver worker budget
pub fn validate_workers(count: usize) -> Result<(), ValidationError> {
    if count == 0 {
        return Err(ValidationError::ZeroWorkers);
    }
    if count > MAX_WORKERS {
        return Err(ValidationError::TooManyWorkers {
            count,
            max: MAX_WORKERS,
        });
    }
    Ok(())
}

/// Validate pair retry count
pub fn validate_retries(count: u32) -> Result<(), ValidationError> {
    if count > MAX_PAIR_RETRIES {
        return Err(ValidationError::TooManyRetries {
            count,
            max: MAX_PAIR_RETRIES,
        });
    }
    Ok(())
}

/// Validate roster size
pub fn validate_roster(count: usize) -> Result<(), ValidationError> {
    if count > MAX_ROSTER_SIZE {
        return Err(ValidationError::RosterTooLarge {
            count,
            max: MAX_ROSTER_SIZE,
        });
    }
    Ok(())
}

/// Validate an optional per-node neighbor cap
pub fn validate_neighbor_limit(limit: Option<usize>) -> Result<(), ValidationError> {
    match limit {
        Some(0) => Err(ValidationError::ZeroNeighborLimit),
        _ => Ok(()),
    }
}

/// Validate node id
pub fn validate_node_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::EmptyNodeId);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_depth() {
        assert!(validate_depth(DEFAULT_MAX_DEPTH).is_ok());
        assert!(validate_depth(0).is_ok());
        assert!(validate_depth(MAX_SEARCH_DEPTH + 1).is_err());
    }

    #[test]
    fn test_validate_pools() {
        assert!(validate_concurrency(4).is_ok());
        assert_eq!(validate_concurrency(0), Err(ValidationError::ZeroConcurrency));
        assert!(validate_workers(5).is_ok());
        assert_eq!(validate_workers(0), Err(ValidationError::ZeroWorkers));
        assert!(validate_workers(MAX_WORKERS + 1).is_err());
    }

    #[test]
    fn test_validate_limits() {
        assert!(validate_neighbor_limit(None).is_ok());
        assert!(validate_neighbor_limit(Some(10)).is_ok());
        assert!(validate_neighbor_limit(Some(0)).is_err());
        assert!(validate_node_id("nm0000138").is_ok());
        assert!(validate_node_id("  ").is_err());
    }
}
