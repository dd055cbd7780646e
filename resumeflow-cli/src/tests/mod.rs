//! Unit tests for resumeflow-cli, organized by module.

mod render;
