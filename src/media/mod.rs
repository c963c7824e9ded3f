pub mod extract;
pub mod fetch;

pub use extract::extract_audio;
pub use fetch::fetch_url;
