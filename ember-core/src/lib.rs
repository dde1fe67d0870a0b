//! # Ember Core
//!
//! Chunk storage and the light propagation engine.

pub mod chunk;
pub mod config;
pub mod light_engine;
pub mod world;
