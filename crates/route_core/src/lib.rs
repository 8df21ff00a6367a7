pub mod batch;
pub mod chunking;
pub mod export;
pub mod geo;
pub mod ordering;
pub mod region;
pub mod request;
pub mod resolver;
pub mod routing;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;
