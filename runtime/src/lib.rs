// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Planscrape: case scrapers for UK planning and building-control portals.
//!
//! Two pipelines share one extraction layer:
//!
//! - [`warrant`] drives Chromium through the tabs of an IDOX building-warrant
//!   case and assembles a [`warrant::WarrantRecord`].
//! - [`control`] accepts a planning-register disclaimer over HTTP and parses
//!   the building-control application page into a
//!   [`control::ApplicationRecord`].
//!
//! Both parse page snapshots through [`dom::DocumentReader`] and write their
//! result with [`sink::write_json`].

pub mod acquisition;
pub mod cli;
pub mod config;
pub mod control;
pub mod dom;
pub mod error;
pub mod normalize;
pub mod renderer;
pub mod sink;
pub mod warrant;
