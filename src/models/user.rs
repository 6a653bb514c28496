use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Activation state of a platform user as reported by the user directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatus {
    pub user_id: Uuid,
    #[serde(default)]
    pub active: bool,
}

impl UserStatus {
    pub fn active(user_id: Uuid) -> Self {
        Self {
            user_id,
            active: true,
        }
    }

    pub fn inactive(user_id: Uuid) -> Self {
        Self {
            user_id,
            active: false,
        }
    }
}
