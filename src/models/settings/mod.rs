// Settings module
// Application configuration loaded from config.toml.

use serde::{Deserialize, Serialize};

use super::event::EventScope;
use super::ui::ZoomLevel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/".to_string(),
            token: None,
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// First hour shown in day/week grids.
    pub start_hour: u32,
    /// Last hour row shown; the grid closes at `end_hour + 1`.
    pub end_hour: u32,
    pub pixels_per_hour: u32,
    /// Snap drag-moves to 15 minutes like resizes do. Off keeps raw deltas.
    pub snap_moves: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            start_hour: 6,
            end_hour: 22,
            pixels_per_hour: 60,
            snap_moves: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Member,
    Lead,
    Admin,
}

impl UserRole {
    /// Roles allowed to write to the shared lab calendar.
    pub fn is_elevated(&self) -> bool {
        matches!(self, UserRole::Lead | UserRole::Admin)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: UserRole,
    pub default_scope: EventScope,
    pub default_view: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            id: None,
            role: UserRole::Member,
            default_scope: EventScope::Personal,
            default_view: "Week".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Drop fetch responses superseded by a newer range/scope request.
    pub discard_stale_responses: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            discard_stale_responses: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub grid: GridSettings,
    pub user: UserSettings,
    pub sync: SyncSettings,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.api.base_url.trim().is_empty() {
            return Err("api.base_url cannot be empty".to_string());
        }
        if self.api.timeout_secs == 0 {
            return Err("api.timeout_secs must be positive".to_string());
        }
        if self.grid.start_hour >= self.grid.end_hour {
            return Err(format!(
                "grid.start_hour ({}) must be before grid.end_hour ({})",
                self.grid.start_hour, self.grid.end_hour
            ));
        }
        if self.grid.end_hour > 22 {
            return Err(format!(
                "grid.end_hour ({}) must be 22 or earlier so the grid closes before midnight",
                self.grid.end_hour
            ));
        }
        Ok(())
    }

    pub fn zoom(&self) -> ZoomLevel {
        ZoomLevel::new(self.grid.pixels_per_hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.start_hour, 6);
        assert!(!config.grid.snap_moves);
        assert!(config.sync.discard_stale_responses);
        assert_eq!(config.zoom().value(), 60);
    }

    #[test]
    fn test_validate_hour_order() {
        let mut config = AppConfig::default();
        config.grid.start_hour = 12;
        config.grid.end_hour = 12;
        assert!(config.validate().unwrap_err().contains("start_hour"));
    }

    #[test]
    fn test_validate_grid_closes_before_midnight() {
        let mut config = AppConfig::default();
        config.grid.end_hour = 23;
        assert!(config.validate().unwrap_err().contains("end_hour"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [user]
            role = "lead"
            default_scope = "lab"

            [grid]
            snap_moves = true
            "#,
        )
        .unwrap();
        assert_eq!(config.user.role, UserRole::Lead);
        assert_eq!(config.user.default_scope, EventScope::Lab);
        assert!(config.grid.snap_moves);
        assert_eq!(config.grid.end_hour, 22);
        assert_eq!(config.api, ApiSettings::default());
    }

    #[test]
    fn test_role_elevation() {
        assert!(!UserRole::Member.is_elevated());
        assert!(UserRole::Lead.is_elevated());
        assert!(UserRole::Admin.is_elevated());
    }
}
