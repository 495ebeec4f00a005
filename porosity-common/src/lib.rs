pub mod batch;
pub mod bin_common;
pub mod porosity;

/// For stand-alone functionality that fit comfortably within one file.
pub mod utils;
