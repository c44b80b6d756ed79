mod http;

pub use http::HttpExecutionsApi;
