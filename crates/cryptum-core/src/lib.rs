// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Cryptum vault server.
//!
//! Provides the error taxonomy, the profile and credential domain types, and
//! the storage adapter trait that persistence backends implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{AuthError, CryptumError};
pub use traits::{PluginAdapter, StorageAdapter};
pub use types::{
    Admission, ClearOutcome, Credential, HealthStatus, NewCredential, Operation, Profile,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_fields_name_the_offending_input() {
        assert_eq!(AuthError::missing("Public-Key").field(), "Public-Key");
        assert_eq!(AuthError::invalid_format("Hashed-Pin").field(), "Hashed-Pin");
        assert_eq!(AuthError::BodyTooShort { len: 3 }.field(), "body");
        assert_eq!(
            AuthError::InvalidTimestamp {
                timestamp: 0,
                now: 1000
            }
            .field(),
            "Timestamp"
        );
        assert_eq!(AuthError::InvalidSignature.field(), "Signature");
    }

    #[test]
    fn auth_error_converts_into_cryptum_error() {
        let err: CryptumError = AuthError::InvalidSignature.into();
        assert!(matches!(err, CryptumError::Auth(AuthError::InvalidSignature)));
        assert_eq!(err.to_string(), "authentication failed: invalid signature");
    }

    #[test]
    fn not_found_messages() {
        assert_eq!(CryptumError::profile_not_found().to_string(), "profile not found");
        assert_eq!(
            CryptumError::credential_not_found().to_string(),
            "credential not found"
        );
    }

    #[test]
    fn operation_display_and_parse_roundtrip() {
        use std::str::FromStr;

        let ops = [
            Operation::ProfileGet,
            Operation::ProfilePost,
            Operation::ProfileDelete,
            Operation::CredentialGet,
            Operation::CredentialPost,
            Operation::CredentialDelete,
        ];
        for op in ops {
            let parsed = Operation::from_str(&op.to_string()).expect("should parse back");
            assert_eq!(op, parsed);
        }
        assert_eq!(Operation::CredentialPost.to_string(), "credential_post");
    }

    #[test]
    fn operation_serializes_snake_case() {
        let json = serde_json::to_string(&Operation::ProfileDelete).unwrap();
        assert_eq!(json, "\"profile_delete\"");
    }

    #[test]
    fn empty_services_count_as_absent() {
        let empty = Profile {
            public_key: "pk".into(),
            services: Some(String::new()),
        };
        let none = Profile {
            public_key: "pk".into(),
            services: None,
        };
        let stored = Profile {
            public_key: "pk".into(),
            services: Some("aGVsbG8=".into()),
        };
        assert!(empty.stored_services().is_none());
        assert!(none.stored_services().is_none());
        assert_eq!(stored.stored_services(), Some("aGVsbG8="));
    }

    #[test]
    fn credential_debug_redacts_secrets() {
        let cred = Credential {
            id: 1,
            public_key: "pk".into(),
            pin: "secret-pin".into(),
            protector: "secret-protector".into(),
            entropy: Some("secret-entropy".into()),
            created_at: "2026-01-01T00:00:00.000Z".into(),
        };
        let debug = format!("{cred:?}");
        assert!(!debug.contains("secret-pin"));
        assert!(!debug.contains("secret-protector"));
        assert!(!debug.contains("secret-entropy"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
    }
}
