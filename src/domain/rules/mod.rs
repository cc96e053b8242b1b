// Domain rules - Business logic and policies

pub mod compatibility;
pub mod dedupe;
pub mod merge;

pub use compatibility::{CompatibilityAssessor, CompatibilitySummary, ConversionPlan};
pub use dedupe::{hamming_distance, SceneDeduplicator};
pub use merge::DetectionMerger;

#[cfg(test)]
mod tests;
