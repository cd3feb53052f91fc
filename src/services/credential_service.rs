use std::sync::Arc;

use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::{
    dao::{document_store::DocumentStore, models::DocumentEntity},
    error::ServiceError,
};

/// Salt length in bytes. 16 bytes gives 128 bits of entropy.
const SALT_LEN: usize = 16;

/// Credential material persisted for a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    /// Hex-encoded SHA-256 digest of password and salt.
    pub hash: String,
    /// Hex-encoded random salt.
    pub salt: String,
}

/// Derive fresh credential material from a password.
pub fn derive(password: &str) -> StoredCredential {
    let salt: [u8; SALT_LEN] = rand::rng().random();
    StoredCredential {
        hash: hex::encode(digest(password, &salt)),
        salt: hex::encode(salt),
    }
}

/// Check a candidate password against stored credential material.
///
/// A malformed salt or hash cannot match anything and yields `false`
/// rather than an error.
pub fn verify(password: &str, hash: &str, salt: &str) -> bool {
    let Ok(salt_bytes) = hex::decode(salt) else {
        return false;
    };
    let Ok(expected) = hex::decode(hash) else {
        return false;
    };

    constant_time_eq(&digest_dyn(password, &salt_bytes), &expected)
}

/// Rewrite any group still carrying a plaintext password (no salt) with
/// derived credential material. Returns whether anything changed so the
/// caller can skip the save when the document was already migrated.
pub fn migrate_legacy_credentials(document: &mut DocumentEntity) -> bool {
    let mut changed = false;
    for group in &mut document.groups {
        if group.password_salt.is_some() {
            continue;
        }

        let credential = derive(&group.password_hash);
        group.password_hash = credential.hash;
        group.password_salt = Some(credential.salt);
        changed = true;
        info!(group = %group.id, "migrated legacy plaintext credential");
    }
    changed
}

/// Startup migration pass: load the document, rewrite legacy credentials,
/// and persist only when something changed. Safe to run on every boot.
pub async fn run_startup_migration(store: &Arc<dyn DocumentStore>) -> Result<(), ServiceError> {
    let mut document = store.load().await?;
    if migrate_legacy_credentials(&mut document) {
        store.save(document).await?;
    }
    Ok(())
}

fn digest(password: &str, salt: &[u8; SALT_LEN]) -> [u8; 32] {
    digest_dyn(password, salt)
}

fn digest_dyn(password: &str, salt: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt);
    hasher.finalize().into()
}

/// Compare two byte strings without short-circuiting on the first
/// mismatching byte, so verification time does not depend on how much of
/// the digest matches.
fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::GroupEntity;
    use std::time::SystemTime;
    use uuid::Uuid;

    fn legacy_group(password: &str) -> GroupEntity {
        GroupEntity {
            id: Uuid::new_v4(),
            name: "legacy".into(),
            password_hash: password.into(),
            password_salt: None,
            player_names: vec!["Alice".into(), "Bob".into()],
            games: Vec::new(),
            created_at: SystemTime::UNIX_EPOCH,
            updated_at: SystemTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn derive_then_verify_roundtrip() {
        let credential = derive("secret");
        assert!(verify("secret", &credential.hash, &credential.salt));
        assert!(!verify("wrong", &credential.hash, &credential.salt));
    }

    #[test]
    fn derive_salts_are_unique() {
        let first = derive("secret");
        let second = derive("secret");
        assert_ne!(first.salt, second.salt);
        assert_ne!(first.hash, second.hash);
    }

    #[test]
    fn malformed_credential_material_never_matches() {
        assert!(!verify("secret", "zz-not-hex", "also-not-hex"));
        let credential = derive("secret");
        assert!(!verify("secret", &credential.hash, "0g0g"));
    }

    #[test]
    fn migration_rewrites_plaintext_groups_once() {
        let mut document = DocumentEntity {
            groups: vec![legacy_group("hunter2")],
        };

        assert!(migrate_legacy_credentials(&mut document));
        let group = &document.groups[0];
        assert_ne!(group.password_hash, "hunter2");
        let salt = group.password_salt.clone().unwrap();
        assert!(verify("hunter2", &group.password_hash, &salt));

        // Second pass finds nothing left to touch.
        let before = document.clone();
        assert!(!migrate_legacy_credentials(&mut document));
        assert_eq!(document, before);
    }
}
