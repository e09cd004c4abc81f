//! Process-wide UI preferences and session state.
//!
//! One explicit struct handed to rendering code, instead of flags scattered across
//! components. Initialized with defaults on load; nothing is persisted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Which kind of account the auth screens are operating on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserType {
    /// Pharmacy owner or staff.
    #[default]
    Merchant,
    Customer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarState {
    pub open: bool,
    pub collapsed: bool,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self { open: true, collapsed: false }
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub user_id: String,
    pub email: String,
    pub user_type: UserType,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub theme: Theme,
    pub sidebar: SidebarState,
    /// Selection of the user-type toggle on the auth screens.
    pub user_type: UserType,
    pub session: Option<UserSession>,
}

impl AppState {
    pub const fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub const fn toggle_sidebar(&mut self) {
        self.sidebar.open = !self.sidebar.open;
    }

    /// Collapsing an open sidebar keeps it open, just narrow.
    pub const fn toggle_sidebar_collapsed(&mut self) {
        self.sidebar.collapsed = !self.sidebar.collapsed;
    }

    /// Switching account type is ignored while signed in.
    pub fn set_user_type(&mut self, user_type: UserType) {
        if self.session.is_none() {
            self.user_type = user_type;
        }
    }

    pub fn sign_in(&mut self, session: UserSession) {
        self.user_type = session.user_type;
        self.session = Some(session);
    }

    pub fn sign_out(&mut self) {
        self.session = None;
    }

    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }
}
