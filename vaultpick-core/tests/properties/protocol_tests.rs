//! Property-based tests for datagram decoding

use proptest::prelude::*;
use vaultpick_core::daemon::{DaemonCommand, MAX_DATAGRAM};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Only the exact command words decode; everything else is ignored
    #[test]
    fn prop_only_exact_words_decode(payload in prop::collection::vec(any::<u8>(), 0..=MAX_DATAGRAM)) {
        let parsed = DaemonCommand::parse(&payload);
        match payload.as_slice() {
            b"OPEN" => prop_assert_eq!(parsed, Some(DaemonCommand::Open)),
            b"CLOSE" => prop_assert_eq!(parsed, Some(DaemonCommand::Close)),
            _ => prop_assert_eq!(parsed, None),
        }
    }

    /// Surrounding whitespace or case changes are not tolerated
    #[test]
    fn prop_decorated_words_rejected(
        word in prop_oneof![Just("OPEN"), Just("CLOSE")],
        prefix in "[ \t\n]{0,2}",
        suffix in "[ \t\n]{0,2}",
        lowercase in any::<bool>(),
    ) {
        prop_assume!(!prefix.is_empty() || !suffix.is_empty() || lowercase);
        let word = if lowercase { word.to_lowercase() } else { word.to_string() };
        let payload = format!("{prefix}{word}{suffix}");
        prop_assert_eq!(DaemonCommand::parse(payload.as_bytes()), None);
    }
}
