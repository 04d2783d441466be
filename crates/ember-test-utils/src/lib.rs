//! Test utilities for the Ember engine.
//!
//! Provides a mock [`GraphicsDevice`](ember_render::GraphicsDevice)
//! implementation that records every backend call for verification in
//! tests, without touching a real GPU. Enable the `mock` feature to use it.
//!
//! # Design
//!
//! The device trait takes `&self` everywhere, so the mock uses
//! `parking_lot::Mutex` for interior mutability: methods record calls and
//! advance counters through a shared lock, and tests read the transcript
//! back with [`MockDevice::calls`] and the count helpers.

#[cfg(feature = "mock")]
pub mod mock_device;

#[cfg(feature = "mock")]
pub use mock_device::*;
