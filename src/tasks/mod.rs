//! Background Tasks Module
//!
//! Contains background tasks that run periodically while a connection is open.
//!
//! # Tasks
//! - Expiry Sweeper: Purges expired keys from the in-memory store at a configured interval

mod sweeper;

pub use sweeper::spawn_expiry_sweeper;
