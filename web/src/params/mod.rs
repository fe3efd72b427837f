//! This module holds typed parameters for endpoint inputs.
//!
//! Parameters are read leniently: the relay forwards whatever the caller sent and
//! leaves validation to Gotify, so a missing or oddly shaped field becomes `None`
//! rather than a rejection.

pub(crate) mod notification;
