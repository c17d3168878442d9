//! The reading service and the worker thread that serializes access to it.

pub mod alert;
pub mod service;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use service::ReadingService;
pub use worker::Station;
