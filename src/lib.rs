// THEORY:
// This file is the main entry point for the `swing_vision` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the public
// API that will be exposed to external consumers (the capture UI and its video
// transport).
//
// The primary goal is to export the `FramingAdvisor` and its associated data
// structures (`AdvisorConfig`, `FrameVerdict`, `FramingStatus`, etc.) as the
// clean, high-level interface for the framing engine, alongside the
// stream-session plumbing and the still-photo capture helpers. The internal
// analysis modules (`core_modules`) are encapsulated behind `pipeline`,
// providing a clean separation of concerns.

pub mod capture;
pub mod config;
pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod session;
