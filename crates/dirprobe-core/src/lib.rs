pub mod config;
pub mod logging;

pub mod dispatcher;
pub mod error;
pub mod probe;
pub mod report;
pub mod scan;
pub mod target;
pub mod wordlist;

pub use error::ScanError;
