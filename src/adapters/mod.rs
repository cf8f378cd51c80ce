//! External system integrations for consentsync.
//!
//! This module provides adapters for the two remote systems:
//!
//! - [`ripple`] - the source registry (participant export, status import)
//! - [`redcap`] - the destination data-capture system (record lookup,
//!   partition import)
//!
//! Adapters own all HTTP concerns and translate transport failures into
//! domain errors; nothing above this layer sees a reqwest type. There is
//! no retry policy anywhere: a transport failure is fatal for the run and
//! propagates immediately.

pub mod redcap;
pub mod ripple;
