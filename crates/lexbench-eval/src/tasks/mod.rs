//! Benchmark inputs: gold answers, predictions and the task catalog
//!
//! This module provides the loaders the engine consumes.

mod catalog;
mod gold;
mod predictions;

pub use catalog::{TaskCatalog, TaskSelection};
pub use gold::{
    ANSWER_COLUMNS, GoldData, GoldProvider, GoldRow, GoldSet, INDEX_COLUMN, InMemoryGoldProvider,
    TsvGoldProvider,
};
pub use predictions::{PredictionRecord, PredictionSet, TaskPredictions};
