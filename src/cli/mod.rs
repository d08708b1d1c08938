// Copyright 2026 Allot Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI subcommand implementations for the allot binary.

pub mod check_cmd;
pub mod companies_cmd;
pub mod output;
pub mod serve;
