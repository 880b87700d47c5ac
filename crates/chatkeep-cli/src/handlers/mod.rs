//! Command handlers.

pub mod init_db;
pub mod serve;
