pub mod constants;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod neighborhood;
pub mod prediction;
pub mod publisher;
pub mod rating_engine;
pub mod structures;
pub mod weighting;
