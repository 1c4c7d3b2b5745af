//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate interaction state, geometry and storage into board-level
//!   operations.
//! - Keep rendering layers decoupled from storage details.

pub mod board_service;
