// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ed25519 signed-request authentication for the Cryptum vault server.
//!
//! Clients hold an Ed25519 keypair; the base64 public key doubles as the
//! profile identifier. Mutating and profile-reading operations carry a
//! signature over a 4-byte little-endian timestamp (and payload, when there
//! is a body). Every operation's timestamp must fall inside the freshness
//! window.

pub mod authenticator;
pub mod codec;
pub mod signature;
pub mod signer;
pub mod timestamp;

pub use authenticator::{
    AuthenticatedRequest, BODY_FIELD, HeaderSource, OperationAuth, ProofLocation,
    RequestAuthenticator, header, operation_auth,
};
pub use signer::{RequestSigner, SignedHeaders};
pub use timestamp::TimestampWindow;
