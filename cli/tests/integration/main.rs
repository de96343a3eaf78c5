//! Integration tests for wuwrap CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! They never reach a real update agent: the configured PowerShell host is
//! a program that does not exist.
