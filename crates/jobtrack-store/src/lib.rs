//! In-memory persistence for the JobTrack backend.
//!
//! Each store is a cheap-to-clone handle over shared state
//! (`Arc<RwLock<HashMap>>` plus an atomic id sequence). Ids are assigned
//! sequentially on insert, mirroring an auto-increment primary key.

pub mod admins;
pub mod jobs;
pub mod users;

pub use admins::AdminStore;
pub use jobs::JobStore;
pub use users::UserStore;
