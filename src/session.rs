//! Sign-in state handed over by the external identity provider.
//!
//! Only two facts cross that boundary: whether someone is signed in, and the
//! name to greet them with.

use crate::errors::{StoreError, StoreResult};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub signed_in: bool,
    pub display_name: Option<String>,
}

impl Session {
    pub fn sign_in(&mut self, display_name: &str) -> StoreResult<()> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(StoreError::Invalid("display name must not be empty".into()));
        }
        self.signed_in = true;
        self.display_name = Some(name.to_string());
        Ok(())
    }

    pub fn sign_out(&mut self) {
        *self = Self::default();
    }
}
