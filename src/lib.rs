#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod listing;
pub mod prep;
pub mod transfer;
pub mod utils;
