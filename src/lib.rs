pub mod fetch;
pub mod loader;
pub mod model;
pub mod output;
pub mod publish;
pub mod scales;
pub mod timefilter;
pub mod traffic;
