//! Types shared by the price estimation server and its clients.

pub mod domain;
pub mod error;
pub mod protocol;
