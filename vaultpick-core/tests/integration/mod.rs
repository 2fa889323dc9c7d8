//! Daemon integration tests

mod daemon_tests;
mod socket_tests;
