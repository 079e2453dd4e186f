pub mod store;

pub use store::{SessionEntry, SessionStore};
