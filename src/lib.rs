// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Keep shared lint configuration in sync across repository checkouts.
//!
//! repo-sync distributes a shared configuration template from the user's
//! settings store to every registered repository. Each repository can layer
//! its own override on top of the shared template. See [`document`] for the
//! merge policy, and [`store`] for the settings store layout.

pub mod config;
pub mod document;
pub mod path;
pub mod store;
pub mod sync;
