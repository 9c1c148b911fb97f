//! Mount utility implementations
//!
//! This module contains implementations of the `MountUtility` trait
//! for different share protocols.

pub mod cifs;

pub use cifs::{get_install_instructions, CifsUtility};
