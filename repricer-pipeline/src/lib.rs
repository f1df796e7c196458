//! Candidate pipeline for size-based catalog markdowns.
//!
//! A feed of products goes through five eligibility gates, a sales join,
//! sell-through and inflation scoring, and tiered pricing. Each step is a
//! small component plugged into a generic [`CandidatePipeline`]; the
//! arithmetic lives in `repricer-engine`.

pub mod candidate_pipeline;
pub mod components;
pub mod config;
pub mod error;
pub mod feed_loader;
pub mod filter;
pub mod hydrator;
pub mod pipelines;
pub mod query_hydrator;
pub mod scorer;
pub mod selector;
pub mod side_effect;
pub mod source;
pub mod types;
pub mod util;

pub use candidate_pipeline::{CandidatePipeline, HasRequestId, PipelineResult, Stage};
pub use config::RepricingConfig;
pub use error::{ConfigError, LoadError};
pub use feed_loader::{CatalogFeedRecord, FeedFormat};
pub use pipelines::size_repricing::SizeRepricingPipeline;
pub use types::{exclusion_counts, repriced_products, ProductCandidate, RepricedProduct, RepricingRun};
