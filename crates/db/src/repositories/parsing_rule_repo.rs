//! Repository for parsing rules.
//!
//! The single default rule is seeded the first time the (empty) table
//! is listed. Saves are upserts keyed by id.

use director_core::parsing_rule::ParsingRule;
use sqlx::PgPool;

use crate::models::parsing_rule::ParsingRuleRow;

const RULE_COLUMNS: &str = "id, name, system_instruction, is_default";

/// CRUD over parsing rules.
pub struct ParsingRuleRepo;

impl ParsingRuleRepo {
    /// List all rules, seeding the default on first run.
    pub async fn list(pool: &PgPool) -> Result<Vec<ParsingRule>, sqlx::Error> {
        let query = format!(
            "SELECT {RULE_COLUMNS} FROM parsing_rules ORDER BY is_default DESC, name"
        );
        let rows = sqlx::query_as::<_, ParsingRuleRow>(&query)
            .fetch_all(pool)
            .await?;
        if !rows.is_empty() {
            return Ok(rows.into_iter().map(ParsingRule::from).collect());
        }

        let default = ParsingRule::seeded_default();
        Self::save(pool, &default).await?;
        tracing::info!("Seeded default parsing rule");
        Ok(vec![default])
    }

    /// Find one rule by id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<ParsingRule>, sqlx::Error> {
        let query = format!("SELECT {RULE_COLUMNS} FROM parsing_rules WHERE id = $1");
        let row = sqlx::query_as::<_, ParsingRuleRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(ParsingRule::from))
    }

    /// The rule marked as default, if the table has been seeded.
    pub async fn find_default(pool: &PgPool) -> Result<Option<ParsingRule>, sqlx::Error> {
        let query = format!("SELECT {RULE_COLUMNS} FROM parsing_rules WHERE is_default LIMIT 1");
        let row = sqlx::query_as::<_, ParsingRuleRow>(&query)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(ParsingRule::from))
    }

    /// Insert or overwrite a rule.
    pub async fn save(pool: &PgPool, rule: &ParsingRule) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO parsing_rules (id, name, system_instruction, is_default) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE \
             SET name = $2, system_instruction = $3, is_default = $4",
        )
        .bind(&rule.id)
        .bind(&rule.name)
        .bind(&rule.system_instruction)
        .bind(rule.is_default)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Delete a rule by id.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM parsing_rules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
