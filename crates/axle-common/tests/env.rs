//! Environment helper semantics: only "1" is true, empty equals unset.

use axle_common::env::{env_string, env_to_bool};

#[test]
fn only_literal_one_is_true() {
    std::env::set_var("AXLE_COMMON_TEST_BOOL", "1");
    assert!(env_to_bool("AXLE_COMMON_TEST_BOOL"));

    std::env::set_var("AXLE_COMMON_TEST_BOOL", "0");
    assert!(!env_to_bool("AXLE_COMMON_TEST_BOOL"));

    std::env::set_var("AXLE_COMMON_TEST_BOOL", "true");
    assert!(!env_to_bool("AXLE_COMMON_TEST_BOOL"));

    std::env::remove_var("AXLE_COMMON_TEST_BOOL");
    assert!(!env_to_bool("AXLE_COMMON_TEST_BOOL"));
}

#[test]
fn empty_string_reads_as_unset() {
    std::env::set_var("AXLE_COMMON_TEST_STR", "");
    assert_eq!(env_string("AXLE_COMMON_TEST_STR"), None);

    std::env::set_var("AXLE_COMMON_TEST_STR", "value");
    assert_eq!(env_string("AXLE_COMMON_TEST_STR").as_deref(), Some("value"));

    std::env::remove_var("AXLE_COMMON_TEST_STR");
    assert_eq!(env_string("AXLE_COMMON_TEST_STR"), None);
}
