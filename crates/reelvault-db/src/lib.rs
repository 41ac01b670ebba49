//! Reelvault record store
//!
//! Video records live behind the [`VideoStore`] trait: PostgreSQL in
//! deployments, an in-process map for development and tests.

pub mod db;

pub use db::{InMemoryVideoStore, VideoRepository, VideoStore};
