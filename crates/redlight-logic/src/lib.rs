//! Pure round logic for Redlight.
//!
//! This crate contains all game logic that is independent of any engine or
//! runtime. Functions take plain data and return results, making them
//! unit-testable and portable across the headless harness, the round engine,
//! and any future presentation layer.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`builder`] | Socket-aligned corridor assembly from a parsed layout |
//! | [`catalog`] | Module prototype registry (one spec per module kind) |
//! | [`layout`] | Layout string parsing (`F`,`L`,`R`,`D`,`X`, terminator `E`) |
//! | [`manifest`] | JSON module-set manifest records and validation sweep |
//! | [`modules`] | Module kinds, dimensions, derived entry/exit sockets |
//! | [`observation`] | FreeMove/Watching freeze-game state machine |
//! | [`pose`] | Ground-plane pose algebra (position + yaw) |
//! | [`tension`] | Smoothed tension scalar and presentation curves |
//! | [`validation`] | Shared validation-error records for config sweeps |

pub mod builder;
pub mod catalog;
pub mod layout;
pub mod manifest;
pub mod modules;
pub mod observation;
pub mod pose;
pub mod tension;
pub mod validation;
