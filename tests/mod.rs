//! Test module organization.
//!
//! This module organizes all integration tests for the memory view analysis.



/// Connectivity graph arena and lookups.
mod graph_tests;


/// TOML and JSON library parsing.
mod loader_tests;

/// Initiator-to-target path enumeration.
mod path_search_tests;
