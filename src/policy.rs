//! Which role may do what. Both the row renderer and the action dispatchers
//! consult this table, so there is exactly one place that decides.

use crate::session::{Role, Viewer};
use crate::{Result, StorefrontError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    CreateProduct,
    EditProduct,
    DeleteProduct,
    AddToCart,
    AddToFavorite,
}

impl Capability {
    /// Per-row controls, in display order.
    pub const ROW: [Capability; 4] = [Self::EditProduct, Self::DeleteProduct, Self::AddToCart, Self::AddToFavorite];

    pub fn required_role(&self) -> Role {
        match self {
            Self::CreateProduct | Self::EditProduct | Self::DeleteProduct => Role::Owner,
            Self::AddToCart | Self::AddToFavorite => Role::User,
        }
    }

    /// Buying actions make no sense for a sold-out product.
    pub fn needs_stock(&self) -> bool { matches!(self, Self::AddToCart | Self::AddToFavorite) }

    /// Cart and favorites are keyed by the viewer, so the request carries an identity header.
    pub fn needs_user_id(&self) -> bool { matches!(self, Self::AddToCart | Self::AddToFavorite) }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::CreateProduct => "add products",
            Self::EditProduct => "edit products",
            Self::DeleteProduct => "delete products",
            Self::AddToCart => "use the cart",
            Self::AddToFavorite => "use favorites",
        }
    }

    /// What the viewer is told when the table says no.
    pub fn denial_message(&self) -> String {
        format!("Only the {} account can {}.", self.required_role().display_name(), self.describe())
    }
}

const OWNER: &[Capability] = &[Capability::CreateProduct, Capability::EditProduct, Capability::DeleteProduct];
const USER: &[Capability] = &[Capability::AddToCart, Capability::AddToFavorite];

pub fn capabilities(role: Option<&Role>) -> &'static [Capability] {
    match role {
        Some(Role::Owner) => OWNER,
        Some(Role::User) => USER,
        Some(Role::Other(_)) | None => &[],
    }
}

pub fn allows(viewer: &Viewer, capability: Capability) -> bool {
    capabilities(viewer.role.as_ref()).contains(&capability)
}

/// Fails with the role the capability needs, before any request is built.
pub fn require(viewer: &Viewer, capability: Capability) -> Result<()> {
    if allows(viewer, capability) { Ok(()) } else { Err(StorefrontError::PermissionDenied { required: capability.required_role() }) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserId;

    #[test]
    fn test_policy_table() {
        let owner = Viewer::owner(None);
        let user = Viewer::user(Some(UserId::new("1")));
        let anon = Viewer::anonymous();
        let other = Viewer { role: Some(Role::Other("ROLE_STAFF".into())), user_id: None };
        for cap in [Capability::CreateProduct, Capability::EditProduct, Capability::DeleteProduct] {
            assert!(allows(&owner, cap));
            assert!(!allows(&user, cap));
        }
        for cap in [Capability::AddToCart, Capability::AddToFavorite] {
            assert!(allows(&user, cap));
            assert!(!allows(&owner, cap));
        }
        assert!(capabilities(anon.role.as_ref()).is_empty());
        assert!(capabilities(other.role.as_ref()).is_empty());
    }

    #[test]
    fn test_require_names_role() {
        let err = require(&Viewer::user(None), Capability::DeleteProduct).unwrap_err();
        assert!(matches!(err, StorefrontError::PermissionDenied { required: Role::Owner }));
        assert!(require(&Viewer::owner(None), Capability::DeleteProduct).is_ok());
    }
}
