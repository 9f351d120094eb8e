use crate::error::{Result, SpendsortError};
use crate::report::goal_progress;
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

pub const DEFAULT_GOAL_AMOUNT: f64 = 1_000_000.0;

/// Savings goal for one user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub current_assets: f64,
    pub goal_amount: f64,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            current_assets: 0.0,
            goal_amount: DEFAULT_GOAL_AMOUNT,
        }
    }
}

impl Profile {
    /// Percent of the goal reached, 0 to 100.
    pub fn progress(&self) -> f64 {
        goal_progress(self.current_assets, self.goal_amount)
    }

    /// Copy with either field replaced. The result is validated.
    pub fn with_updates(self, assets: Option<f64>, target: Option<f64>) -> Result<Self> {
        let updated = Self {
            current_assets: assets.unwrap_or(self.current_assets),
            goal_amount: target.unwrap_or(self.goal_amount),
        };
        updated.validate()?;
        Ok(updated)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.current_assets.is_finite() || self.current_assets < 0.0 {
            return Err(SpendsortError::UserInput(format!(
                "current assets must be a non-negative amount, got {}",
                self.current_assets
            )));
        }
        if !self.goal_amount.is_finite() || self.goal_amount <= 0.0 {
            return Err(SpendsortError::UserInput(format!(
                "goal amount must be positive, got {}",
                self.goal_amount
            )));
        }
        Ok(())
    }
}

pub fn get_profile(conn: &Connection, user: &str) -> Result<Option<Profile>> {
    let profile = conn
        .query_row(
            "SELECT current_assets, goal_amount FROM profiles WHERE user = ?1",
            [user],
            |row| {
                Ok(Profile {
                    current_assets: row.get(0)?,
                    goal_amount: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(profile)
}

/// Insert or replace the user's profile. Invalid values are rejected before writing.
pub fn save_profile(conn: &Connection, user: &str, profile: &Profile) -> Result<()> {
    profile.validate()?;
    conn.execute(
        "INSERT INTO profiles (user, current_assets, goal_amount, updated_at)
         VALUES (?1, ?2, ?3, datetime('now'))
         ON CONFLICT(user) DO UPDATE SET
             current_assets = excluded.current_assets,
             goal_amount = excluded.goal_amount,
             updated_at = excluded.updated_at",
        (user, profile.current_assets, profile.goal_amount),
    )?;
    log::debug!(
        "Saved profile for {}: assets {}, goal {}",
        user,
        profile.current_assets,
        profile.goal_amount
    );
    Ok(())
}

/// Load the user's profile, writing the defaults on first access.
pub fn get_or_create_profile(conn: &Connection, user: &str) -> Result<Profile> {
    if let Some(profile) = get_profile(conn, user)? {
        return Ok(profile);
    }

    log::info!("No profile for {}, creating default goal", user);
    let profile = Profile::default();
    save_profile(conn, user, &profile)?;
    Ok(profile)
}
