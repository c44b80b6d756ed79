pub mod backend;
pub mod factory;

pub use backend::HttpExecutionsApi;
