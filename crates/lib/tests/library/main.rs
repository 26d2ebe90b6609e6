mod common;
mod config_tests;
mod provisioner_tests;
