use crate::categorize::rules::{Rule, RuleSet};
use crate::error::{Result, SpendsortError};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};

/// Load the stored rule set for `user`, if one has been written.
pub fn get_rule_set(conn: &Connection, user: &str) -> Result<Option<RuleSet>> {
    let row = conn
        .query_row(
            "SELECT rules, last_updated FROM rule_sets WHERE user = ?1",
            [user],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()?;

    let Some((rules_json, last_updated)) = row else {
        return Ok(None);
    };

    let rules: Vec<Rule> = serde_json::from_str(&rules_json)?;
    let last_updated = DateTime::parse_from_rfc3339(&last_updated)
        .map_err(|e| {
            SpendsortError::InvalidRuleSet(format!("bad last_updated for user '{}': {}", user, e))
        })?
        .with_timezone(&Utc);

    RuleSet::new(rules, last_updated).map(Some)
}

/// Replace the stored rule set for `user` with `rule_set`.
pub fn save_rule_set(conn: &Connection, user: &str, rule_set: &RuleSet) -> Result<()> {
    let rules_json = serde_json::to_string(rule_set.rules())?;
    conn.execute(
        "INSERT INTO rule_sets (user, rules, last_updated) VALUES (?1, ?2, ?3)
         ON CONFLICT(user) DO UPDATE SET rules = excluded.rules, last_updated = excluded.last_updated",
        (user, rules_json, rule_set.last_updated().to_rfc3339()),
    )?;
    log::debug!(
        "Saved rule set for {}: {} rules, {} keywords",
        user,
        rule_set.rules().len(),
        rule_set.keyword_count()
    );
    Ok(())
}

/// Load the user's rule set, seeding and persisting the default one on first access.
pub fn get_or_create_rule_set(conn: &Connection, user: &str) -> Result<RuleSet> {
    if let Some(rule_set) = get_rule_set(conn, user)? {
        return Ok(rule_set);
    }

    log::info!("No rule set for {}, creating default rules", user);
    let seed = RuleSet::default_seed();
    save_rule_set(conn, user, &seed)?;
    Ok(seed)
}
