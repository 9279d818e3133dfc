//! Cross-venue pair index.
//!
//! Built once from the loaded venue snapshots, then queried per trigger
//! event. Lookups match by token address only; symbols are display-only and
//! venues disagree on them.

use crate::error::IndexError;
use crate::pairs::snapshot::VenueSnapshot;
use crate::types::{Pool, PoolCandidate, VenueRouting};
use alloy::primitives::Address;
use anyhow::Result;
use tracing::warn;

struct IndexedVenue {
    routing: VenueRouting,
    pools: Vec<Pool>,
}

/// All tracked pools across all venues, in snapshot file order.
pub struct PairIndex {
    venues: Vec<IndexedVenue>,
}

impl PairIndex {
    /// Build the index from loaded snapshots. A malformed pool record is
    /// logged and skipped; a malformed venue (bad routing) fails the build.
    pub fn from_snapshots(snapshots: &[VenueSnapshot]) -> Result<Self> {
        let mut venues = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            let routing = snapshot.routing()?;
            let mut pools = Vec::with_capacity(snapshot.pools.len());
            for record in &snapshot.pools {
                match record.clone().into_pool() {
                    Ok(pool) => pools.push(pool),
                    Err(e) => {
                        warn!("Skipping malformed pool in venue '{}': {e:#}", routing.venue);
                    }
                }
            }
            venues.push(IndexedVenue { routing, pools });
        }
        Ok(Self { venues })
    }

    /// Every equivalent pool for the trigger's unordered token pair,
    /// including the trigger pool itself, tagged with venue routing.
    ///
    /// First scan locates the trigger and extracts its token pair; second
    /// scan collects every pool matching either token ordering.
    pub fn find_equivalent_pools(
        &self,
        trigger: Address,
    ) -> Result<Vec<PoolCandidate>, IndexError> {
        let (a, b) = self
            .venues
            .iter()
            .flat_map(|v| v.pools.iter())
            .find(|p| p.id == trigger)
            .map(|p| p.token_pair())
            .ok_or(IndexError::NotFound(trigger))?;

        let mut candidates = Vec::new();
        for venue in &self.venues {
            for pool in &venue.pools {
                if pool.matches_pair(a, b) {
                    candidates.push(PoolCandidate {
                        routing: venue.routing.clone(),
                        pool: pool.clone(),
                    });
                }
            }
        }
        Ok(candidates)
    }

    /// Addresses of every indexed pool, for the swap-event log filter.
    pub fn tracked_pools(&self) -> Vec<Address> {
        self.venues
            .iter()
            .flat_map(|v| v.pools.iter().map(|p| p.id))
            .collect()
    }

    pub fn venue_count(&self) -> usize {
        self.venues.len()
    }

    pub fn pool_count(&self) -> usize {
        self.venues.iter().map(|v| v.pools.len()).sum()
    }
}
