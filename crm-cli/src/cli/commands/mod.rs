pub mod config;
pub mod employees;
pub mod records;
