//! Board geometry, interaction state and note collection.
//!
//! # Responsibility
//! - `ops`: pure geometry/model helpers.
//! - `interaction`: transient gesture state machine.
//! - `collection`: the in-memory persisted note list.
//!
//! Nothing in this module touches storage or pointer events directly; the
//! board service is the only integration point.

pub mod collection;
pub mod interaction;
pub mod ops;
