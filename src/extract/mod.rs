// Copyright 2026 Allot Contributors
// SPDX-License-Identifier: Apache-2.0

//! Extraction engines for data embedded in registrar web assets.

pub mod companies;
