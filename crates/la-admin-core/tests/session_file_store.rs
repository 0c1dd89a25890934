//! Session guard persistence through the on-disk store.

use std::sync::Arc;

use la_admin_core::session::{
    EXPIRY_KEY, FileStore, KeyValueStore, ManualClock, SESSION_DURATION_MS, SessionGuard,
    SessionState, TOKEN_KEY,
};
use secrecy::ExposeSecret;
use tempfile::TempDir;

const START: i64 = 1_700_000_000_000;

fn guard(path: &std::path::Path, clock: &Arc<ManualClock>) -> SessionGuard {
    SessionGuard::new(Arc::new(FileStore::new(path)), clock.clone())
}

#[test]
fn session_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    let clock = Arc::new(ManualClock::new(START));

    let first = guard(&path, &clock);
    first.login("tok-1").unwrap();
    assert!(path.exists());

    clock.advance(SESSION_DURATION_MS - 1);
    let second = guard(&path, &clock);
    assert_eq!(
        second.initialize(),
        SessionState::Authenticated {
            expires_at: START + SESSION_DURATION_MS
        }
    );
    assert_eq!(second.token().unwrap().expose_secret(), "tok-1");
}

#[test]
fn expired_session_clears_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    let clock = Arc::new(ManualClock::new(START));

    guard(&path, &clock).login("tok-1").unwrap();

    clock.advance(SESSION_DURATION_MS + 1);
    let restarted = guard(&path, &clock);
    assert_eq!(restarted.initialize(), SessionState::Unauthenticated);
    assert!(restarted.token().is_none());
    assert!(!path.exists());
}

#[test]
fn logout_removes_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("session.json");
    let clock = Arc::new(ManualClock::new(START));

    let session = guard(&path, &clock);
    session.login("tok-1").unwrap();
    session.logout().unwrap();

    assert!(!path.exists());
    assert_eq!(guard(&path, &clock).initialize(), SessionState::Unauthenticated);
}

#[test]
fn relogin_replaces_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    let clock = Arc::new(ManualClock::new(START));

    let session = guard(&path, &clock);
    session.login("tok-1").unwrap();
    clock.advance(10_000);
    session.login("tok-2").unwrap();

    let store = FileStore::new(&path);
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-2"));
    assert_eq!(
        store.get(EXPIRY_KEY).unwrap(),
        Some((START + 10_000 + SESSION_DURATION_MS).to_string())
    );
}

#[test]
fn corrupt_file_starts_unauthenticated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{ not json").unwrap();
    let clock = Arc::new(ManualClock::new(START));

    let session = guard(&path, &clock);
    assert_eq!(session.initialize(), SessionState::Unauthenticated);

    // A fresh login overwrites the unreadable file
    session.login("tok-1").unwrap();
    assert!(guard(&path, &clock).initialize().is_authenticated());
}

#[cfg(unix)]
#[test]
fn session_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    let clock = Arc::new(ManualClock::new(START));

    guard(&path, &clock).login("tok-1").unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
