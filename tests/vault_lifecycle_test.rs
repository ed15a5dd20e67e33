// Integration tests for the admin vault lifecycle: bootstrap, mutation, reload, self-healing

mod common;

use std::sync::Arc;

use admin_vault::errors::{AdminVaultError, BootstrapError, LoadError};
use admin_vault::services::{ADMINS_UPDATED_EVENT, IntegrityStatus, OnlineAdminsNotifier};
use admin_vault::stores::{AdminEdit, AdminFileStore, BootstrapOutcome, FlushOutcome};
use admin_vault::types::{MasterPassword, OnlinePlayer, ProviderKind, ProviderLink, ProviderLinks};
use admin_vault::config::DefaultMaster;
use common::{BCRYPT_HASH, FakeHost, notifier_for, vault_in};
use serde_json::json;
use tempfile::TempDir;

fn discord(id: &str) -> ProviderLinks {
    let mut links = ProviderLinks::new();
    links.insert(ProviderKind::Discord, ProviderLink::new(id, format!("discord:{}", id)));
    links
}

#[tokio::test]
async fn test_first_run_without_defaults_waits_for_master() {
    let dir = TempDir::new().unwrap();
    let vault = vault_in(&dir, OnlineAdminsNotifier::detached());

    let outcome = vault.init(None).await.unwrap();

    let BootstrapOutcome::AwaitingMaster { pin } = outcome else {
        panic!("Expected AwaitingMaster, got {:?}", outcome);
    };
    assert_eq!(pin.len(), 4);
    assert!(!vault.has_admins());
    assert_eq!(vault.add_master_pin(), Some(pin));
    assert!(!dir.path().join("admins.json").exists());

    vault
        .create_master("tabarra", ProviderLinks::new(), MasterPassword::Plaintext("changeme".into()))
        .await
        .unwrap();
    assert!(vault.has_admins());
    assert!(vault.add_master_pin().is_none());
}

#[tokio::test]
async fn test_first_run_with_defaults_creates_master() {
    let dir = TempDir::new().unwrap();
    let vault = vault_in(&dir, OnlineAdminsNotifier::detached());
    let defaults = DefaultMaster {
        name: "tabarra".to_string(),
        password: MasterPassword::Plaintext("changeme".to_string()),
    };

    let outcome = vault.init(Some(&defaults)).await.unwrap();

    assert_eq!(outcome, BootstrapOutcome::Created { name: "tabarra".to_string() });
    let on_disk: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("admins.json")).unwrap()).unwrap();
    assert_eq!(on_disk[0]["master"], json!(true));
    assert_eq!(on_disk[0]["permissions"], json!(["all_permissions"]));
    assert!(on_disk[0]["password_hash"].as_str().unwrap().starts_with("$argon2id$"));
}

#[tokio::test]
async fn test_second_start_loads_existing_directory() {
    let dir = TempDir::new().unwrap();
    let first = vault_in(&dir, OnlineAdminsNotifier::detached());
    first.init(None).await.unwrap();
    first
        .create_master("tabarra", discord("272800190639898628"), MasterPassword::Hashed(BCRYPT_HASH.into()))
        .await
        .unwrap();
    first
        .add_admin("helper", discord("123456789"), "temporary-pass", vec!["players.kick".into()])
        .await
        .unwrap()
        .wait()
        .await;
    first.shutdown().await;

    let second = vault_in(&dir, OnlineAdminsNotifier::detached());
    let outcome = second.init(None).await.unwrap();

    assert_eq!(outcome, BootstrapOutcome::Loaded { admins: 2 });
    assert_eq!(second.list_raw(), first.list_raw());
    assert!(second.admin_by_name("HELPER").unwrap().password_temporary);
}

#[tokio::test]
async fn test_double_master_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let admins = json!([
        {"$schema": 1, "name": "first", "master": true, "password_hash": BCRYPT_HASH, "providers": {}, "permissions": []},
        {"$schema": 1, "name": "second", "master": true, "password_hash": BCRYPT_HASH, "providers": {}, "permissions": []}
    ]);
    std::fs::write(dir.path().join("admins.json"), admins.to_string()).unwrap();
    let vault = vault_in(&dir, OnlineAdminsNotifier::detached());

    let err = vault.init(None).await.unwrap_err();

    match err {
        BootstrapError::Load(load) => assert_eq!(load.reason_code(), "master-count-invalid"),
        other => panic!("Expected load error, got {:?}", other),
    }
    assert!(!vault.has_admins());
    assert!(vault.admin_by_name("first").is_none());
}

#[tokio::test]
async fn test_malformed_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("admins.json"), b"{ not json").unwrap();
    let vault = vault_in(&dir, OnlineAdminsNotifier::detached());

    let err = vault.load().await.unwrap_err();
    assert!(matches!(err, LoadError::MalformedJson(_)));
}

#[tokio::test]
async fn test_legacy_file_is_migrated_and_rewritten() {
    let dir = TempDir::new().unwrap();
    let legacy = json!([
        {
            "name": "tabarra",
            "master": true,
            "password_hash": BCRYPT_HASH,
            "providers": {
                "citizenfx": {"id": "tabarra", "data": {"nameid": "https://forum.cfx.re/internal/user/271816"}}
            },
            "permissions": []
        },
        {
            "name": "helper",
            "master": false,
            "password_hash": BCRYPT_HASH,
            "providers": {},
            "permissions": ["players.message", "players.kick"]
        }
    ]);
    std::fs::write(dir.path().join("admins.json"), legacy.to_string()).unwrap();
    let vault = vault_in(&dir, OnlineAdminsNotifier::detached());

    vault.load().await.unwrap();

    let master = vault.admin_by_name("tabarra").unwrap();
    assert_eq!(master.providers[&ProviderKind::Citizenfx].identifier, "fivem:271816");
    let helper = vault.admin_by_name("helper").unwrap();
    assert_eq!(
        helper.permissions,
        vec!["players.kick", "players.direct_message", "announcement", "server.log.view"]
    );

    let reloaded = vault_in(&dir, OnlineAdminsNotifier::detached());
    reloaded.load().await.unwrap();
    assert_eq!(reloaded.list_raw(), vault.list_raw());
}

#[tokio::test]
async fn test_mutations_notify_online_admins() {
    let dir = TempDir::new().unwrap();
    let host = Arc::new(FakeHost {
        players: vec![
            OnlinePlayer::new(11, "Helper", vec!["discord:123456789".into()]),
            OnlinePlayer::new(12, "Visitor", vec!["license:abc".into()]),
        ],
        ..Default::default()
    });
    let vault = vault_in(&dir, notifier_for(&host));
    vault.init(None).await.unwrap();
    vault
        .create_master("tabarra", ProviderLinks::new(), MasterPassword::Hashed(BCRYPT_HASH.into()))
        .await
        .unwrap();

    vault
        .add_admin("helper", discord("123456789"), "temporary-pass", vec![])
        .await
        .unwrap()
        .wait()
        .await;

    let events = host.events.lock().unwrap().clone();
    assert_eq!(events.last().unwrap(), &(ADMINS_UPDATED_EVENT.to_string(), json!([11])));

    let rechecks_before = *host.rechecks.lock().unwrap();
    vault
        .edit_admin("helper", AdminEdit::new().unlink(ProviderKind::Discord))
        .await
        .unwrap()
        .wait()
        .await;

    assert_eq!(*host.rechecks.lock().unwrap(), rechecks_before + 1);
    let events = host.events.lock().unwrap().clone();
    assert_eq!(events.last().unwrap(), &(ADMINS_UPDATED_EVENT.to_string(), json!([])));
}

#[tokio::test]
async fn test_runtime_errors_do_not_disturb_directory() {
    let dir = TempDir::new().unwrap();
    let vault = vault_in(&dir, OnlineAdminsNotifier::detached());
    vault
        .create_master("tabarra", ProviderLinks::new(), MasterPassword::Hashed(BCRYPT_HASH.into()))
        .await
        .unwrap();
    let before = vault.list_raw();

    let taken = vault.add_admin("Tabarra", ProviderLinks::new(), "pw-123456", vec![]).await;
    let missing = vault.edit_admin("ghost", AdminEdit::new()).await;
    let master = vault.delete_admin("tabarra").await;

    assert_eq!(taken.unwrap_err().code(), "name_taken");
    assert_eq!(missing.unwrap_err().code(), "admin_not_found");
    assert!(matches!(master, Err(AdminVaultError::MasterProtected(_))));
    assert_eq!(vault.list_raw(), before);
}

#[tokio::test]
async fn test_deleted_file_is_restored_with_same_fingerprint() {
    let dir = TempDir::new().unwrap();
    let vault = vault_in(&dir, OnlineAdminsNotifier::detached());
    vault
        .create_master("tabarra", ProviderLinks::new(), MasterPassword::Hashed(BCRYPT_HASH.into()))
        .await
        .unwrap();
    let FlushOutcome::Persisted { fingerprint } = vault
        .add_admin("helper", ProviderLinks::new(), "temporary-pass", vec![])
        .await
        .unwrap()
        .wait()
        .await
    else {
        panic!("Expected the flush to persist");
    };

    std::fs::remove_file(dir.path().join("admins.json")).unwrap();
    let status = vault.check_integrity().await;

    assert_eq!(status, IntegrityStatus::Restored { fingerprint: fingerprint.clone() });
    let bytes = std::fs::read(dir.path().join("admins.json")).unwrap();
    assert_eq!(AdminFileStore::fingerprint(&bytes), fingerprint);
}

#[tokio::test]
async fn test_tampered_file_is_overwritten_from_memory() {
    let dir = TempDir::new().unwrap();
    let vault = vault_in(&dir, OnlineAdminsNotifier::detached());
    vault
        .create_master("tabarra", ProviderLinks::new(), MasterPassword::Hashed(BCRYPT_HASH.into()))
        .await
        .unwrap();

    let tampered = json!([
        {"$schema": 1, "name": "intruder", "master": true, "password_hash": BCRYPT_HASH, "providers": {}, "permissions": ["all_permissions"]}
    ]);
    std::fs::write(dir.path().join("admins.json"), tampered.to_string()).unwrap();

    assert!(matches!(vault.check_integrity().await, IntegrityStatus::Restored { .. }));

    let reloaded = vault_in(&dir, OnlineAdminsNotifier::detached());
    reloaded.load().await.unwrap();
    assert!(reloaded.admin_by_name("intruder").is_none());
    assert!(reloaded.admin_by_name("tabarra").is_some());
}

#[tokio::test]
async fn test_rejected_provider_links_never_break_restart() {
    let dir = TempDir::new().unwrap();
    let vault = vault_in(&dir, OnlineAdminsNotifier::detached());
    vault
        .create_master("tabarra", ProviderLinks::new(), MasterPassword::Hashed(BCRYPT_HASH.into()))
        .await
        .unwrap();

    let mut short = ProviderLinks::new();
    short.insert(ProviderKind::Citizenfx, ProviderLink::new("ab", ""));
    let added = vault.add_admin("helper", short, "temporary-pass", vec![]).await;
    assert_eq!(added.unwrap_err().code(), "invalid_provider_link");

    let blank = AdminEdit::new().link(ProviderKind::Discord, ProviderLink::new("  ", "x"));
    let edited = vault.edit_admin("tabarra", blank).await;
    assert_eq!(edited.unwrap_err().code(), "invalid_provider_link");
    vault.shutdown().await;

    let restarted = vault_in(&dir, OnlineAdminsNotifier::detached());
    assert_eq!(restarted.init(None).await.unwrap(), BootstrapOutcome::Loaded { admins: 1 });
}
