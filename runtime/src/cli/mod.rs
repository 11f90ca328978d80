// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI subcommand implementations for the planscrape binary.

pub mod control_cmd;
pub mod doctor;
pub mod warrant_cmd;
