mod band;
mod ids;
mod item;
pub mod session;

pub use band::{Band, TimeProfile};
pub use ids::{ItemId, ParseIdError};
pub use item::{Item, ItemDraft, ItemError};
pub use session::{
    EndReason, FATIGUE_CEILING, ROLLING_WINDOW, RollingWindow, SessionSettings, SessionSnapshot,
    SessionState,
};
