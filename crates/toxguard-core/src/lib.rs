//! ToxGuard Core
//!
//! Core types and utilities shared across ToxGuard components.
//!
//! This crate provides:
//! - Error types and result handling
//! - Prediction records produced by the classifiers
//! - The wire record returned by the analysis API

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    round_score, AnalysisResult, Emotion, EmotionPrediction, ModelStatus, ToxicLabel,
    ToxicityPrediction,
};
