pub mod config;
pub mod logging;

pub mod batch;
pub mod destination;
pub mod error;
pub mod failure_log;
pub mod fetch;
pub mod job;
pub mod outcome;
pub mod report;
pub mod retry;
pub mod storage;
pub mod url_model;
