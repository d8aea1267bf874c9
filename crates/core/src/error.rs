use thiserror::Error;

use crate::bank::ItemBankError;
use crate::model::{ItemError, ParseIdError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Item(#[from] ItemError),
    #[error(transparent)]
    ItemBank(#[from] ItemBankError),
    #[error(transparent)]
    ParseId(#[from] ParseIdError),
}
