//! Core library: document model, vector cache, similarity, ranking, retrieval pipeline.

pub mod cache;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod ranker;
pub mod report;
pub mod similarity;
