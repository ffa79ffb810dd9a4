//! Integration tests for the release manager against a fake GitHub

mod common;
mod release_workflow;
