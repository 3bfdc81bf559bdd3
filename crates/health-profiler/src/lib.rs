//! Health survey intake and risk profiling.
//!
//! Submissions arrive as structured answers, free text, or an image of a paper
//! form. [`profiler::HealthProfiler`] normalizes them, rejects incomplete
//! surveys, scores the remaining answers against a fixed rule table and attaches
//! advisory tips.

pub mod config;
pub mod error;
pub mod profiler;
pub mod telemetry;
