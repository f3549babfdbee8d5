//! Model descriptors contributed by the auth slice.

use manifold_kernel::prelude::{ModelDescriptor, ModelModule};

/// The `models.user` module: the account model plus its login log.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserModels;

impl ModelModule for UserModels {
    fn models(&self) -> Vec<ModelDescriptor> {
        vec![
            ModelDescriptor::new(
                "User",
                ["id", "name", "email", "password", "register_at", "confirmed", "confirmed_at"],
            ),
            ModelDescriptor::new("Log", ["id", "user_id", "login_at"]),
        ]
    }
}
