// Translation stack
//
// - backend: the remote service seam and its HTTP implementation
// - cache: concurrent (text, language) -> translation map
// - client: cache-then-backend resolution of a single line

pub mod backend;
pub mod cache;
pub mod client;

pub use backend::*;
pub use cache::TranslationCache;
pub use client::TranslationClient;
