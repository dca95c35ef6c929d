pub mod cqm;
pub use cqm::*;
pub mod instance;
pub use instance::*;
pub mod knapsack;
pub use knapsack::*;
pub mod report;
pub use report::*;
pub mod sampler;
pub use sampler::*;
pub mod sampleset;
pub use sampleset::*;
