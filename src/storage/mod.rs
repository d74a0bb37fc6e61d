//! In-memory stores
//!
//! Nothing here touches disk. Both stores are cheap to clone-share behind an
//! `Arc` and use `std::sync::RwLock`, since no lock is held across an await.

mod feedback;
mod sessions;

pub use feedback::FeedbackStore;
pub use sessions::{is_well_formed_token, SessionStore};
