//! Venue snapshot loading and the cross-venue pair index.

pub mod index;
pub mod snapshot;

pub use index::PairIndex;
pub use snapshot::{load_dir, VenueSnapshot};
