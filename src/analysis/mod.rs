//! Classification and distribution analysis over a framework.

pub mod classifier;
pub mod distribution;
pub mod types;

pub use classifier::{Classifier, dominant_components};
pub use distribution::DistributionAnalyzer;
pub use types::{
    AlignmentLevel, AlignmentReport, Classification, ComponentDetail, ComponentScore,
    ComponentScoreMap, Contribution, DominantComponent, InterestSignal, signals_from_value,
};
