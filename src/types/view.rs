//! Navigation views

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five top-level screens
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Dashboard,
    Plan,
    Shopping,
    Meals,
    Profile,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::Plan,
        View::Shopping,
        View::Meals,
        View::Profile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Plan => "plan",
            View::Shopping => "shopping",
            View::Meals => "meals",
            View::Profile => "profile",
        }
    }

    /// Sidebar label
    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Plan => "My Plan",
            View::Shopping => "Shopping Assist",
            View::Meals => "Meals",
            View::Profile => "Profile",
        }
    }

    /// Resolve a view name, falling back to the dashboard for anything unknown
    pub fn from_name(name: &str) -> View {
        match name.trim().to_lowercase().as_str() {
            "plan" | "my plan" => View::Plan,
            "shopping" | "scan" => View::Shopping,
            "meals" => View::Meals,
            "profile" => View::Profile,
            _ => View::Dashboard,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        for view in View::ALL {
            assert_eq!(View::from_name(view.as_str()), view);
        }
        assert_eq!(View::from_name("PLAN"), View::Plan);
        assert_eq!(View::from_name("settings"), View::Dashboard);
    }
}
