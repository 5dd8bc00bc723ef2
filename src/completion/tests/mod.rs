//! Cross-module completion tests
