//! Role-based site visibility.

use uuid::Uuid;

use crate::models::Profile;

/// Set of sites an actor is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteScope {
    /// Superadmins see every site.
    All,
    /// Managers see only explicitly assigned sites. An actor without a
    /// profile resolves to an empty assignment.
    Assigned(Vec<Uuid>),
}

/// Resolve the visibility scope for the current actor.
pub fn site_scope(profile: Option<&Profile>) -> SiteScope {
    match profile {
        Some(p) if p.is_superadmin() => SiteScope::All,
        Some(p) => SiteScope::Assigned(p.site_ids.clone()),
        None => SiteScope::Assigned(Vec::new()),
    }
}
