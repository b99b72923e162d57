// Core modules: record recognition, key-file parsing, JSON encoding, errors.
pub mod config;
pub mod error;
pub mod keyfile;
pub mod record;
pub mod serialize;
