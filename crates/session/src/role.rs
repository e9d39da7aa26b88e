use std::sync::Arc;

use encore_model::Role;
use parking_lot::Mutex;

/// Role picked on the landing page, carried from login to profile setup.
/// Set on role login; cleared on logout or once the profile is created.
#[derive(Clone, Debug, Default)]
pub struct RoleSelection(Arc<Mutex<Option<Role>>>);

impl RoleSelection {
    /// Records the pre-selected role.
    pub fn set(&self, role: Role) {
        *self.0.lock() = Some(role);
    }

    /// The pre-selected role, if any.
    #[must_use]
    pub fn get(&self) -> Option<Role> {
        *self.0.lock()
    }

    /// Forgets the pre-selected role.
    pub fn clear(&self) {
        *self.0.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_selection() {
        let selection = RoleSelection::default();
        let other = selection.clone();

        selection.set(Role::Venue);
        assert_eq!(other.get(), Some(Role::Venue));

        other.clear();
        assert_eq!(selection.get(), None);
    }
}
