//! Soft heap configuration
//!
//! The error parameter `ε` bounds the fraction of inserted elements whose key
//! may be reported inflated. It is turned into the structural threshold
//!
//! ```text
//! r = ceil(log₂(1/ε)) + 5
//! ```
//!
//! Nodes of rank at most `r` hold a single element, so a heap that never grows
//! a tree above rank `r` behaves exactly like an ordinary priority queue.
//! Above `r` a node's capacity grows by one per rank, which is where elements
//! start sharing (and inflating) keys.

use crate::rank::{Rank, MAX_RANK};
use crate::traits::HeapError;
use tracing::debug;

/// Validated parameters for a [`SoftHeap`](crate::SoftHeap)
///
/// # Example
///
/// ```rust
/// use rust_soft_heaps::SoftHeapConfig;
///
/// let config = SoftHeapConfig::new(0.1).unwrap();
/// assert_eq!(config.threshold(), 9);
///
/// assert!(SoftHeapConfig::new(1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftHeapConfig {
    epsilon: f64,
    threshold: Rank,
    track_corruption: bool,
}

impl SoftHeapConfig {
    /// Error parameter used by [`Default`]
    pub const DEFAULT_EPSILON: f64 = 0.1;

    /// Creates a configuration for the given error parameter
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::InvalidEpsilon`] unless `0 < epsilon < 1`.
    pub fn new(epsilon: f64) -> Result<Self, HeapError> {
        if !(0.0 < epsilon && epsilon < 1.0) {
            return Err(HeapError::InvalidEpsilon(epsilon));
        }
        let threshold = threshold_for(epsilon);
        debug!(epsilon, threshold, "configured soft heap");
        Ok(Self {
            epsilon,
            threshold,
            track_corruption: false,
        })
    }

    /// Creates a configuration from the integer form `1/ε`
    ///
    /// ```rust
    /// use rust_soft_heaps::SoftHeapConfig;
    ///
    /// let config = SoftHeapConfig::from_inverse_epsilon(8).unwrap();
    /// assert_eq!(config.epsilon(), 0.125);
    /// assert_eq!(config.threshold(), 8);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::InvalidInverseEpsilon`] if `inverse_epsilon < 2`.
    pub fn from_inverse_epsilon(inverse_epsilon: u32) -> Result<Self, HeapError> {
        if inverse_epsilon < 2 {
            return Err(HeapError::InvalidInverseEpsilon(inverse_epsilon));
        }
        Self::new(1.0 / f64::from(inverse_epsilon))
    }

    /// Enables or disables corruption reporting for sifts that happen outside
    /// [`SoftHeap::extract_min_c`](crate::SoftHeap::extract_min_c)
    ///
    /// With tracking enabled, corruption discovered while inserting or melding
    /// is queued and handed out by the next `extract_min_c`. A plain
    /// `extract_min` discards the queue, so it never outgrows the work done
    /// since the last extraction. Consumers that re-validate every reported
    /// element rely on this to never miss one.
    #[must_use]
    pub fn with_corruption_tracking(mut self, enabled: bool) -> Self {
        self.track_corruption = enabled;
        self
    }

    /// The error parameter `ε`
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// The structural threshold `r`
    pub fn threshold(&self) -> Rank {
        self.threshold
    }

    /// Whether inserts and melds queue corruption reports
    pub fn tracks_corruption(&self) -> bool {
        self.track_corruption
    }
}

impl Default for SoftHeapConfig {
    fn default() -> Self {
        Self {
            epsilon: Self::DEFAULT_EPSILON,
            threshold: threshold_for(Self::DEFAULT_EPSILON),
            track_corruption: false,
        }
    }
}

/// `ceil(log₂(1/ε)) + 5`, saturated to the largest representable rank
fn threshold_for(epsilon: f64) -> Rank {
    let levels = (1.0 / epsilon).log2().ceil() + 5.0;
    if levels >= f64::from(MAX_RANK) {
        MAX_RANK
    } else {
        levels as Rank
    }
}
