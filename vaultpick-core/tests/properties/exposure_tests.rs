//! Property-based tests for the clipboard exposure window
//!
//! At most one exposure may own the window; every owner leaves the
//! clipboard empty and the marker removed.

use proptest::prelude::*;
use secrecy::SecretString;
use std::sync::Arc;
use vaultpick_core::clipboard::{ExposureLock, ExposureOutcome};

use crate::fixtures::{mail_and_bank, ScriptedPicker, TestRig};

fn current_thread_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    /// Of several exposures started together exactly one writes the
    /// clipboard; the others are skipped without touching it
    #[test]
    fn prop_concurrent_exposures_are_exclusive(
        contenders in 2usize..6,
        secret in "[ -~]{1,24}",
    ) {
        let rig = TestRig::new(mail_and_bank(), ScriptedPicker::happy());
        let controller = Arc::new(rig.controller());
        let rt = current_thread_runtime();

        let outcomes: Vec<ExposureOutcome> = rt.block_on(async {
            let handles: Vec<_> = (0..contenders)
                .map(|_| {
                    let controller = Arc::clone(&controller);
                    let secret = SecretString::from(secret.clone());
                    tokio::spawn(async move { controller.expose_and_flush(&secret).await })
                })
                .collect();

            let mut outcomes = Vec::with_capacity(handles.len());
            for handle in handles {
                outcomes.push(handle.await.unwrap().unwrap());
            }
            outcomes
        });

        let flushed = outcomes.iter().filter(|o| **o == ExposureOutcome::Flushed).count();
        prop_assert_eq!(flushed, 1);
        prop_assert_eq!(rig.clipboard.writes(), vec![secret, String::new()]);
        prop_assert!(!ExposureLock::is_active(&rig.lock_path()));
    }

    /// Back-to-back exposures each get the window once the previous one
    /// has flushed
    #[test]
    fn prop_sequential_exposures_all_flush(secrets in prop::collection::vec("[a-z0-9]{1,12}", 1..4)) {
        let rig = TestRig::new(mail_and_bank(), ScriptedPicker::happy());
        let controller = rig.controller();
        let rt = current_thread_runtime();

        for secret in &secrets {
            let outcome = rt
                .block_on(controller.expose_and_flush(&SecretString::from(secret.clone())))
                .unwrap();
            prop_assert_eq!(outcome, ExposureOutcome::Flushed);
        }

        let expected: Vec<String> = secrets
            .iter()
            .flat_map(|s| [s.clone(), String::new()])
            .collect();
        prop_assert_eq!(rig.clipboard.writes(), expected);
    }
}

/// A marker from another process blocks the exposure until it is cleared
#[test]
fn test_foreign_marker_blocks_until_cleared() {
    let rig = TestRig::new(mail_and_bank(), ScriptedPicker::happy());
    let controller = rig.controller();
    let rt = current_thread_runtime();
    std::fs::write(rig.lock_path(), "pid=1").unwrap();

    let outcome = rt
        .block_on(controller.expose_and_flush(&SecretString::from("s")))
        .unwrap();
    assert_eq!(outcome, ExposureOutcome::Skipped);
    assert!(rig.clipboard.writes().is_empty());

    controller.clear_stale_marker().unwrap();
    let outcome = rt
        .block_on(controller.expose_and_flush(&SecretString::from("s")))
        .unwrap();
    assert_eq!(outcome, ExposureOutcome::Flushed);
}

/// The secret stays on the clipboard for the whole delay
#[test]
fn test_flush_waits_for_delay() {
    let rig = TestRig::new(mail_and_bank(), ScriptedPicker::happy());
    let controller = rig.controller();
    let rt = current_thread_runtime();

    let started = std::time::Instant::now();
    rt.block_on(controller.expose_and_flush(&SecretString::from("s")))
        .unwrap();
    assert!(started.elapsed() >= controller.flush_delay());
}
