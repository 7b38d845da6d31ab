//! Row type for the `parsing_rules` table.

use director_core::parsing_rule::ParsingRule;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ParsingRuleRow {
    pub id: String,
    pub name: String,
    pub system_instruction: String,
    pub is_default: bool,
}

impl From<ParsingRuleRow> for ParsingRule {
    fn from(row: ParsingRuleRow) -> Self {
        ParsingRule {
            id: row.id,
            name: row.name,
            system_instruction: row.system_instruction,
            is_default: row.is_default,
        }
    }
}
