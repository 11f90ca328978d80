// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Browserless page acquisition.

pub mod http_client;
