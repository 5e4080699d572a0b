// LLM abstraction layer

pub mod provider;
pub mod xai;

pub use provider::*;
pub use xai::XaiAdapter;
