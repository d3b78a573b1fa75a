//! Radio Control Logic
//!
//! Pure state transitions for the encoder-driven UI and the controller
//! that runs them against the tuner.

pub mod controller;
pub mod state;
