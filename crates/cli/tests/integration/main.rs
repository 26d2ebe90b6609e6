mod command_tests;
mod sandbox_tests;
