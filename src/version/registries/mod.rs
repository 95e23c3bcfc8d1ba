//! Registry implementations for looking up package versions

pub mod maven_central;

pub use maven_central::MavenCentralRegistry;
