use std::collections::HashSet;
use thiserror::Error;

/// Privileged operations check the caller against this set up front and
/// surface a typed forbidden result; there is no wrapper-based gating.
#[derive(Debug, Clone, Default)]
pub struct AdminSet {
    ids: HashSet<i64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("user {0} is not an administrator")]
pub struct Forbidden(pub i64);

impl AdminSet {
    #[must_use]
    pub fn new(ids: impl IntoIterator<Item = i64>) -> AdminSet {
        AdminSet {
            ids: ids.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.ids.contains(&user_id)
    }

    pub fn require(&self, user_id: i64) -> Result<(), Forbidden> {
        if self.is_admin(user_id) {
            Ok(())
        } else {
            Err(Forbidden(user_id))
        }
    }
}
