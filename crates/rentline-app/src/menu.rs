//! Role-tagged sidebar menus.
//!
//! Each role resolves to a fixed, explicit list of entries; screens render
//! the list verbatim instead of branching on the role at render time.

use rentline_shared::Role;

/// One sidebar entry: label, icon name, navigation destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub icon: &'static str,
    pub destination: &'static str,
}

const LANDLORD_MENU: &[MenuItem] = &[
    MenuItem {
        label: "Home",
        icon: "home",
        destination: "/landlord/dashboard",
    },
    MenuItem {
        label: "Financial Dashboard",
        icon: "attach-money",
        destination: "/landlord/financial",
    },
    MenuItem {
        label: "Messaging",
        icon: "chatbubble-outline",
        destination: "/landlord/chat",
    },
    MenuItem {
        label: "Maintenance",
        icon: "wrench-outline",
        destination: "/landlord/maintenance",
    },
    MenuItem {
        label: "Documents",
        icon: "document-text-outline",
        destination: "/landlord/documents",
    },
];

const TENANT_MENU: &[MenuItem] = &[
    MenuItem {
        label: "Home",
        icon: "home",
        destination: "/tenant/dashboard",
    },
    MenuItem {
        label: "Pay Rent",
        icon: "attach-money",
        destination: "/tenant/pay-rent",
    },
    MenuItem {
        label: "Messaging",
        icon: "chatbubble-outline",
        destination: "/tenant/chat",
    },
    MenuItem {
        label: "Maintenance",
        icon: "wrench-outline",
        destination: "/tenant/maintenance",
    },
    MenuItem {
        label: "Documents",
        icon: "document-text-outline",
        destination: "/tenant/documents",
    },
];

/// The fixed sidebar menu for a role.
pub fn menu_for(role: Role) -> &'static [MenuItem] {
    match role {
        Role::Landlord => LANDLORD_MENU,
        Role::Tenant => TENANT_MENU,
    }
}
