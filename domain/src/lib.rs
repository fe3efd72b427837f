//! Notification relay domain logic: the Gotify gateway and the operation that
//! forwards a user's notification through it.

pub mod error;
pub mod gateway;
pub mod notification;
