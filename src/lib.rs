// Copyright 2026 Allot Contributors
// SPDX-License-Identifier: Apache-2.0

//! Allot runtime library — IPO allotment checker.
//!
//! This library crate exposes the core modules for integration testing.

#![allow(dead_code, clippy::new_without_default)]

pub mod acquisition;
pub mod cli;
pub mod config;
pub mod extract;
pub mod registrar;
pub mod registry;
pub mod rest;
