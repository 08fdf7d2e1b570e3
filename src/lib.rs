#![deny(missing_docs)]

//! Core library for the ApplicantBuddy resume intake backend.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Embedding client abstraction and adapters.
pub mod embedding;
/// LLM-backed summarization and structured field extraction.
pub mod llm;
/// Structured logging and tracing setup.
pub mod logging;
/// Intake metrics helpers.
pub mod metrics;
/// OCR text extraction adapter.
pub mod ocr;
/// Resume processing pipeline: chunking, indexing, and orchestration.
pub mod processing;
/// Qdrant vector store integration.
pub mod qdrant;
/// Background job queue and worker pool.
pub mod queue;
/// Resume records and the record store abstraction.
pub mod resume;
