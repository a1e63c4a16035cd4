//! corpusq-cli library
//!
//! Provides the argument parser, Config, Executor and output rendering for
//! programmatic use and for the `corpusq` binary.

pub mod cli;
pub mod config;
pub mod executor;
pub mod output;

pub use config::Config;
pub use executor::Executor;
pub use output::OutputWriter;
