//! Core domain logic for querygate
//!
//! This crate contains the configuration model and the error type shared by
//! the parser, the connectors and the outer layers.

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::{ErrorKind, GatewayError};
