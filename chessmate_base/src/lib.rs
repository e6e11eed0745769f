//! # Base types for chessmate
//!
//! This is an auxiliary crate for `chessmate`, which contains the core value types: squares,
//! colors, piece kinds and movement geometry. It carries no game logic.
//!
//! Normally you don't want to use this crate directly. Use `chessmate` instead.

pub mod geometry;
pub mod types;
