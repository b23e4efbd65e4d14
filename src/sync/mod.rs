pub mod cache;
pub mod coordinator;
pub mod debounce;
pub mod source;
