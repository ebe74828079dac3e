// Copyright 2026 Paperflow Contributors
// SPDX-License-Identifier: Apache-2.0

//! Paperflow runtime: browser, HTTP and storage adapters plus the three
//! pipelines (crawl, answer, siteshot) and the CLI that drives them.
//!
//! The pure data model lives in the `paperflow` crate; this crate owns
//! everything that talks to the network or a browser.

pub mod acquisition;
pub mod audit;
pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod renderer;
pub mod store;
pub mod upload;
