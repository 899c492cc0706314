//! Upstream API clients: URL construction, response structs, and the pure
//! normalizers that turn each response into a document update.
//!
//! One file per upstream.

#[cfg(test)]
pub mod fixtures;
pub mod http;
pub mod nws;
pub mod openweathermap;
pub mod usno;
