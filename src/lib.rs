//! Transcript Analyzer - summaries and next actions for transcripts
//!
//! This crate provides an HTTP API that sends a transcript to a language model
//! with a structured-output request, normalizes whatever comes back into a
//! summary plus a list of next actions, and keeps the results for lookup by id.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, entities, prompts, configuration, and errors
//! - **Application**: The analyze use case, output normalization, adapter binding, and port traits
//! - **Infrastructure**: Adapter implementations (OpenAI, in-memory repository, XDG config)
//! - **API**: axum routes, request/response bodies, and HTTP error mapping
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod api;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
