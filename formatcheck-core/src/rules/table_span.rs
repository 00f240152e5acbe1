use super::engine::{CheckContext, CheckRule, BODY_ONLY};
use crate::config::ProfileConfig;
use crate::model::TableSpan;
use crate::types::{Finding, FindingCategory, Zone};

// TableSpanRule - a table should fit on one page
pub struct TableSpanRule;

impl TableSpanRule {
    pub fn new(_config: &ProfileConfig) -> Self {
        Self
    }
}

impl CheckRule for TableSpanRule {
    fn check(&self, context: &CheckContext<'_>) -> Vec<Finding> {
        context
            .scoped_tables()
            .filter_map(|table| match &table.span {
                TableSpan::Pages { first, last } if first == last => None,
                TableSpan::Pages { first, last } => Some(
                    Finding::new(
                        FindingCategory::TableSpan,
                        format!("Table {} spans pages {first} to {last}", table.number),
                    )
                    .on_page(Some(*first)),
                ),
                TableSpan::Unknown { reason } => Some(Finding::new(
                    FindingCategory::Skipped,
                    format!(
                        "Could not determine page span of table {}: {reason}",
                        table.number
                    ),
                )),
            })
            .collect()
    }

    fn name(&self) -> &str {
        "TableSpan"
    }

    fn default_zones(&self) -> &'static [Zone] {
        BODY_ONLY
    }
}
