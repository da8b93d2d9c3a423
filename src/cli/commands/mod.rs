//! CLI command implementations.

mod ask;
mod config;
mod doctor;
mod ingest;
mod init;
mod reset;
mod search;

pub use ask::run_ask;
pub use config::run_config;
pub use doctor::run_doctor;
pub use ingest::run_ingest;
pub use init::run_init;
pub use reset::run_reset;
pub use search::run_search;
