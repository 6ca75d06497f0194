pub mod error;
pub mod models;
pub mod services;
pub mod shell;
pub mod storage;
