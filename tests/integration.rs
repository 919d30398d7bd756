//! Integration tests for micrometa.
//!
//! These tests verify end-to-end functionality including:
//! - FluoView and FluoView 3000 project parsing with real tile files
//! - OIF, OIB and OIR metadata readers
//! - Tile configuration and macro output

mod integration {
    pub mod test_utils;

    pub mod fluoview3k_tests;
    pub mod fluoview_tests;
    pub mod imagej_tests;
    pub mod olympus_tests;
}
