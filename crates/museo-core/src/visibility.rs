//! # Visibility Rules
//!
//! Pure allow/deny predicates deciding what a viewer may see. These are the
//! closest thing this system has to a core algorithm, so they live here,
//! isolated from HTTP and storage, with the viewer's admin flag threaded
//! explicitly through every call.
//!
//! Denials are surfaced upstream as not-found, never as forbidden: a viewer
//! who may not see a floor or exposition cannot distinguish it from one that
//! does not exist.

use crate::position::FloorPosition;

/// Whether a viewer may list the expositions on the given floor.
///
/// The unassigned pool (`-1`) and the storage reserve (`0`) are visible only
/// to admins; every other defined position is visible to any authenticated
/// viewer. Undefined levels never reach this function — they fail parsing.
pub fn floor_visible(position: FloorPosition, is_admin: bool) -> bool {
    is_admin || !position.admin_only()
}

/// Whether a viewer may list the exhibits of an exposition.
///
/// Open expositions are visible to any authenticated viewer; closed ones
/// only to admins.
pub fn exposition_visible(open: bool, is_admin: bool) -> bool {
    is_admin || open
}

/// Whether a viewer may see an exhibit's detail view.
///
/// Always true for authenticated viewers: exhibits carry no open/closed gate
/// of their own, even when their exposition is closed. This asymmetry with
/// [`exposition_visible`] is inherited from the catalog it replaces and is
/// kept deliberately rather than silently tightened.
pub fn exhibit_visible(_is_admin: bool) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn storage_and_unassigned_are_admin_only() {
        assert!(!floor_visible(FloorPosition::Storage, false));
        assert!(!floor_visible(FloorPosition::Unassigned, false));
        assert!(floor_visible(FloorPosition::Storage, true));
        assert!(floor_visible(FloorPosition::Unassigned, true));
    }

    #[test]
    fn public_floors_are_visible_to_everyone() {
        for position in [
            FloorPosition::Floor1,
            FloorPosition::Floor2,
            FloorPosition::Floor3,
            FloorPosition::OtherMuseum,
        ] {
            assert!(floor_visible(position, false));
            assert!(floor_visible(position, true));
        }
    }

    #[test]
    fn closed_expositions_are_admin_only() {
        assert!(!exposition_visible(false, false));
        assert!(exposition_visible(false, true));
        assert!(exposition_visible(true, false));
        assert!(exposition_visible(true, true));
    }

    #[test]
    fn exhibits_have_no_gate() {
        assert!(exhibit_visible(false));
        assert!(exhibit_visible(true));
    }

    proptest! {
        /// Admins see every defined floor.
        #[test]
        fn admin_sees_every_floor(level in -1i16..=4) {
            let position = FloorPosition::from_level(level).unwrap();
            prop_assert!(floor_visible(position, true));
        }

        /// A visitor's floor access matches the admin-only classification exactly.
        #[test]
        fn visitor_access_matches_classification(level in -1i16..=4) {
            let position = FloorPosition::from_level(level).unwrap();
            prop_assert_eq!(floor_visible(position, false), !position.admin_only());
        }

        /// Granting admin never revokes visibility (monotonicity).
        #[test]
        fn admin_flag_is_monotone(level in -1i16..=4, open: bool) {
            let position = FloorPosition::from_level(level).unwrap();
            prop_assert!(!floor_visible(position, false) || floor_visible(position, true));
            prop_assert!(!exposition_visible(open, false) || exposition_visible(open, true));
        }
    }
}
