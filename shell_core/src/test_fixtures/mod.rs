// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Mock input and output devices, for tests that drive a [`crate::Console`] or a
//! [`crate::LineEditor`] without a real terminal.

// Attach.
pub mod event_source_mock;
pub mod stdout_mock;

// Re-export.
pub use event_source_mock::*;
pub use stdout_mock::*;
