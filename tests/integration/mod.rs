//! Integration tests for the tagship binary

mod helpers;
mod test_cli;
