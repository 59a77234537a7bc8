mod coordinator;
pub mod error;
mod readme;
pub mod slot;

pub use coordinator::{Outcome, UploadCoordinator, UploadState};
pub use error::{Error, Result};
pub use readme::Readme;
pub use slot::{SlotGuard, SlotState, UploadSlot};
