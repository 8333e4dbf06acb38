pub mod add;
pub mod config;
pub mod db;
pub mod del;
pub mod edit;
pub mod init;
pub mod list;
pub mod log;
pub mod report;
pub mod status;
pub mod timings;
pub mod toggle;
