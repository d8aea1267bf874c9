#![forbid(unsafe_code)]

pub mod bank;
pub mod classify;
pub mod error;
pub mod model;
pub mod proficiency;
pub mod staircase;
pub mod time;

pub use bank::{CuratedSource, ItemBank, ItemBankError, DEFAULT_POOL_SIZE};
pub use classify::Classification;
pub use error::Error;
pub use model::{
    Band, EndReason, Item, ItemDraft, ItemError, ItemId, ParseIdError, SessionSettings,
    SessionSnapshot, SessionState, TimeProfile,
};
pub use time::Clock;
