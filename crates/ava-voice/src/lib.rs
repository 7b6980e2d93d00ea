//! Room credential signing for the Ava voice-call client.
//!
//! The real-time room (audio, video, data channels) is hosted by LiveKit.
//! This crate holds the LiveKit connection settings and signs the short-lived
//! join tokens that let a caller into a fresh appointment room. Nothing here
//! talks to the media plane.

pub mod config;
pub mod error;
pub mod service;

pub use config::LiveKitConfig;
pub use error::VoiceError;
pub use service::{JoinGrant, VoiceService};
