// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod app;            // lifecycle state machine
pub mod backends;       // built-in module behaviours
pub mod config;         // config files + runtime builder
pub mod engine;         // resolver, drive loop, schedulers
pub mod errors;         // error handling
pub mod modules;        // descriptors + registry
pub mod observability;
pub mod traits;         // unified abstractions
