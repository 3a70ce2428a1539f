//! Common test infrastructure: the Cucumber world and its mock targets

pub mod world;

#[allow(unused_imports)]
pub use world::HttpDiffWorld;
