//! Core types for figbridge.
//!
//! This crate provides the foundational types used across all other figbridge crates:
//! - The scene capability model (`SceneNode`, `TextNode`) and the `Prop` tri-state
//! - Scene-side value types (paints, effects, fonts, layout enums)
//! - The intermediate representation emitted by the serializer
//! - A JSON-loadable in-memory scene document
//! - Error types

pub mod document;
pub mod errors;
pub mod ir;
pub mod prop;
pub mod scene;
pub mod types;

pub use document::*;
pub use errors::*;
pub use ir::*;
pub use prop::*;
pub use scene::*;
pub use types::*;
