//! Canvas interaction engine for an industrial marking designer.
//!
//! The host UI feeds raw pointer and wheel events into an [`engine::Engine`],
//! which hit-tests marks, drives the press/drag/release gesture state
//! machine, maintains the pan/zoom viewport, and records undo snapshots
//! before structural edits. Rendering is the host's job: every handler
//! returns [`engine::Action`]s describing what changed.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Event dispatcher, structural commands, and host actions |
//! | [`viewport`] | Pan/zoom transform, grid lock, and pointwise coordinates |
//! | [`mark`] | Mark base type and the per-variant capability trait |
//! | [`variants`] | Variant payloads (text, arc letters, dot matrix, ruler, ...) |
//! | [`collection`] | Ordered mark registry |
//! | [`hit`] | Hit-testing and control-handle resolution |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`history`] | Bounded undo/redo snapshots |
//! | [`mirror`] | Horizontal and vertical mirror operations |
//! | [`config`] | Immutable engine configuration |
//! | [`consts`] | Default numeric limits (zoom range, handle sizes, etc.) |

pub mod collection;
pub mod config;
pub mod consts;
pub mod engine;
pub mod hit;
pub mod history;
pub mod input;
pub mod mark;
pub mod mirror;
pub mod variants;
pub mod viewport;
