// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod stats;
pub mod tokens;
pub mod user;

pub use stats::{DateRange, FitbitStat, OuraStat};
pub use tokens::{ProviderTokens, WellnessProvider};
pub use user::User;
