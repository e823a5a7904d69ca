//! Shared helpers for CLI adapter tests

use crate::common::{create_test_services, index_test_vault, TestVault};
use std::sync::Arc;
use tempfile::TempDir;
use vaultdex::core::services::Services;

/// Services with a temp index file plus an already indexed sample vault.
/// Keep both returned guards alive for the duration of the test.
pub fn setup_indexed_vault() -> (Arc<Services>, TempDir, TestVault) {
    let (services, storage_temp) = create_test_services();
    let vault = TestVault::small();
    index_test_vault(&services, vault.path());
    (services, storage_temp, vault)
}
