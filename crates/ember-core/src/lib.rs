//! Ember Core
//!
//! This crate contains foundational utilities shared by the Ember 2D engine.

pub mod geometry;
pub mod logging;
