// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - provider clients and token bookkeeping.

pub mod fitbit;
pub mod identity;
pub mod oauth;
pub mod oura;
pub mod tokens;
pub mod wellness;

pub use fitbit::{fitbit_auth, FitbitClient};
pub use identity::{IdentityClient, VerifiedIdentity};
pub use oura::{oura_auth, OuraClient};
pub use tokens::TokenVault;
pub use wellness::{ClientError, WellnessAuth};
