//! End-to-end runs over a real datagram socket in a temporary directory.

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;

use vaultpick_core::daemon::{send_command, DaemonCommand};
use vaultpick_core::vault::SessionState;

use crate::fixtures::{mail_and_bank, wait_for, ScriptedPicker, TestRig};

fn is_socket(path: &Path) -> bool {
    use std::os::unix::fs::FileTypeExt;
    std::fs::metadata(path).is_ok_and(|m| m.file_type().is_socket())
}

#[tokio::test]
async fn test_open_and_close_over_socket() {
    let rig = TestRig::new(mail_and_bank(), ScriptedPicker::happy());
    let socket_path = rig.socket_path();

    // Leftovers from a crashed run
    std::fs::write(&socket_path, "").unwrap();
    std::fs::write(rig.lock_path(), "pid=1").unwrap();

    let daemon = Arc::new(rig.daemon());
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server = {
        let daemon = Arc::clone(&daemon);
        tokio::spawn(async move {
            daemon
                .run_until(async {
                    let _ = stop_rx.await;
                })
                .await
        })
    };

    assert!(wait_for(|| is_socket(&socket_path)).await, "daemon never bound");
    let mode = std::fs::metadata(&socket_path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);

    send_command(&socket_path, DaemonCommand::Open).unwrap();
    assert!(
        wait_for(|| rig.clipboard.writes().len() == 2).await,
        "clipboard was never flushed"
    );
    assert_eq!(rig.clipboard.writes(), vec!["mail-pass", ""]);
    assert_eq!(daemon.state().await, SessionState::Unlocked);

    send_command(&socket_path, DaemonCommand::Close).unwrap();
    assert!(wait_for(|| rig.vault.lock_calls() == 1).await);

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();

    assert!(!socket_path.exists());
    assert_eq!(daemon.state().await, SessionState::Locked);
}

#[tokio::test]
async fn test_garbage_does_not_stop_listener() {
    let rig = TestRig::new(mail_and_bank(), ScriptedPicker::happy());
    let socket_path = rig.socket_path();

    let daemon = Arc::new(rig.daemon());
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server = {
        let daemon = Arc::clone(&daemon);
        tokio::spawn(async move {
            daemon
                .run_until(async {
                    let _ = stop_rx.await;
                })
                .await
        })
    };
    assert!(wait_for(|| is_socket(&socket_path)).await);

    let sender = std::os::unix::net::UnixDatagram::unbound().unwrap();
    sender.send_to(b"HELLO", &socket_path).unwrap();
    sender
        .send_to(b"OPEN OPEN OPEN OPEN", &socket_path)
        .unwrap();
    send_command(&socket_path, DaemonCommand::Open).unwrap();

    assert!(wait_for(|| rig.clipboard.writes().len() == 2).await);
    assert_eq!(rig.picker.prompt_calls(), 1);

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_bind_fails_in_missing_directory() {
    let rig = TestRig::new(mail_and_bank(), ScriptedPicker::happy());
    let daemon = vaultpick_core::daemon::VaultPickDaemon::new(
        rig.dir.path().join("missing").join("daemon.sock"),
        rig.services(),
    );

    assert!(daemon.run_until(std::future::ready(())).await.is_err());
}
