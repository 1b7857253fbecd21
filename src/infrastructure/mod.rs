//! Infrastructure layer - storage, cache backends and the employee service

pub mod cache;
pub mod employee;
pub mod logging;
pub mod observability;
pub mod storage;
