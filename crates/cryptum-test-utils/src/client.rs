// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A signing vault client that builds HTTP requests the way a browser client does.

use axum::body::Body;
use axum::http::{Method, Request};
use cryptum_auth::codec::encode_base64;
use cryptum_auth::{RequestSigner, header, timestamp};

pub const PROFILES_PATH: &str = "/api/profiles/";
pub const CREDENTIALS_PATH: &str = "/api/credentials/";

/// Builds signed requests for one keypair.
pub struct TestClient {
    signer: RequestSigner,
    /// Clock offset applied to every timestamp, in seconds.
    skew_secs: i64,
}

impl TestClient {
    pub fn new(signer: RequestSigner) -> Self {
        Self {
            signer,
            skew_secs: 0,
        }
    }

    pub fn generate() -> Self {
        Self::new(RequestSigner::generate())
    }

    /// Shift this client's clock relative to the server.
    pub fn with_skew(mut self, skew_secs: i64) -> Self {
        self.skew_secs = skew_secs;
        self
    }

    pub fn public_key(&self) -> String {
        self.signer.public_key_base64()
    }

    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp() + self.skew_secs
    }

    fn timestamp_header(&self) -> String {
        encode_base64(&timestamp::encode(self.now()))
    }

    fn header_signed(&self, method: Method, uri: &str) -> Request<Body> {
        let signed = self.signer.sign_timestamp(self.now());
        request(method, uri)
            .header(header::PUBLIC_KEY, signed.public_key)
            .header(header::TIMESTAMP, signed.timestamp)
            .header(header::SIGNATURE, signed.signature)
            .body(Body::empty())
            .unwrap()
    }

    pub fn get_profile(&self) -> Request<Body> {
        self.header_signed(Method::GET, PROFILES_PATH)
    }

    pub fn delete_profile(&self) -> Request<Body> {
        self.header_signed(Method::DELETE, PROFILES_PATH)
    }

    pub fn post_profile(&self, services: &[u8]) -> Request<Body> {
        request(Method::POST, PROFILES_PATH)
            .header(header::PUBLIC_KEY, self.public_key())
            .body(Body::from(self.signer.sign_body(self.now(), services)))
            .unwrap()
    }

    pub fn post_credential(&self, hashed_pin: &str, entropy: &[u8]) -> Request<Body> {
        request(Method::POST, CREDENTIALS_PATH)
            .header(header::PUBLIC_KEY, self.public_key())
            .header(header::HASHED_PIN, hashed_pin)
            .body(Body::from(self.signer.sign_body(self.now(), entropy)))
            .unwrap()
    }

    pub fn get_credential(&self, hashed_pin: &str, protector: &str) -> Request<Body> {
        request(Method::GET, CREDENTIALS_PATH)
            .header(header::PUBLIC_KEY, self.public_key())
            .header(header::HASHED_PIN, hashed_pin)
            .header(header::PROTECTOR, protector)
            .header(header::TIMESTAMP, self.timestamp_header())
            .body(Body::empty())
            .unwrap()
    }

    pub fn delete_credential(&self, protector: &str) -> Request<Body> {
        request(Method::DELETE, CREDENTIALS_PATH)
            .header(header::PUBLIC_KEY, self.public_key())
            .header(header::PROTECTOR, protector)
            .header(header::TIMESTAMP, self.timestamp_header())
            .body(Body::empty())
            .unwrap()
    }
}

fn request(method: Method, uri: &str) -> axum::http::request::Builder {
    Request::builder().method(method).uri(uri)
}
