//! Helpers shared by unit tests across modules.

pub(crate) mod fixtures;
pub(crate) mod socket_guard;
