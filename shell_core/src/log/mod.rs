// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Opt in [`tracing`] setup. The library itself only emits events, an application calls
//! [`init_tracing`] (process wide) or [`TracingConfig::install_thread_local`] (tests) to
//! decide where they go.
//!
//! ```no_run
//! use shell_core::{DisplayPreference, TracingConfig, WriterConfig, init_tracing};
//! use tracing_core::LevelFilter;
//!
//! let config = TracingConfig::from(LevelFilter::INFO)
//!     + TracingConfig::from(WriterConfig::File("/tmp/shell.log".into()))
//!     + TracingConfig::from(DisplayPreference::Stderr);
//! init_tracing(config).unwrap();
//! ```

// Attach sources.
pub mod rolling_file_appender_impl;
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use tracing_config::*;
pub use tracing_init::*;
