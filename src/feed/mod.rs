mod client;
mod error;
mod types;

pub use client::HttpFeed;
pub use error::FeedError;
pub use types::Snapshot;

#[cfg(test)]
pub use client::AIRCRAFT_PATH;
#[cfg(test)]
pub use types::AircraftSample;

/// Anything that can hand out a fresh aircraft snapshot.
pub trait SampleSource {
    async fn fetch(&self) -> Result<Snapshot, FeedError>;
}
