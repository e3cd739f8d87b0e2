// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Tool protocol for in-flight agents.
//!
//! Wire format: newline-delimited JSON over stdio. Agents write one
//! [`Request`] per line; the server answers with one [`Response`] per line.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod request;
mod response;
mod wire;

pub use request::{Request, ToolCall};
pub use response::Response;
pub use wire::{decode, encode, read_request, write_response, ProtocolError};

#[cfg(test)]
mod property_tests;
