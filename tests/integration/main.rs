//! Integration tests

mod http_client_tests;
