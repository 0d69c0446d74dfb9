// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod common_constants;
pub mod common_type_aliases;

// Re-export.
pub use common_constants::*;
pub use common_type_aliases::*;
