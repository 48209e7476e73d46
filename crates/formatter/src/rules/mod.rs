use crate::{error::CellError, settings::FormatSettings};
use model::core::{cell::Cell, column::ColumnKind};
use std::sync::Arc;

pub mod currency;
pub mod temporal;
pub mod text;

/// What a rule sees besides the string itself.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub settings: &'a FormatSettings,
    pub kind: ColumnKind,
}

/// One string classification step. `Ok(None)` hands the string to the next
/// rule; `Ok(Some(_))` ends classification.
pub trait CellRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn accepts(&self, kind: ColumnKind) -> bool;

    fn apply(&self, text: &str, ctx: &RuleContext) -> Result<Option<Cell>, CellError>;
}

pub trait RulePipelineExt {
    fn add_if<T, F>(self, condition: bool, factory: F) -> Self
    where
        T: CellRule + 'static,
        F: FnOnce() -> T;
}

/// Ordered string rules; strings no rule claims are truncated.
#[derive(Clone)]
pub struct TextRulePipeline {
    rules: Vec<Arc<dyn CellRule>>,
}

impl TextRulePipeline {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Pipeline used by the formatter for the given settings.
    pub fn standard(settings: &FormatSettings) -> Self {
        Self::new()
            .add_rule(temporal::IsoTimestampRule)
            .add_rule(currency::BareDecimalRule)
            .add_if(settings.legacy_patterns, || temporal::LegacyDateTimeRule)
            .add_if(settings.legacy_patterns, || currency::LegacyDecimalRule)
    }

    pub fn add_rule<T: CellRule + 'static>(mut self, rule: T) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn apply(&self, text: &str, ctx: &RuleContext) -> Result<Cell, CellError> {
        for rule in self.rules.iter().filter(|rule| rule.accepts(ctx.kind)) {
            if let Some(cell) = rule.apply(text, ctx)? {
                return Ok(cell);
            }
        }

        Ok(Cell::Text(text::truncate(
            text,
            ctx.settings.max_text_len,
            &ctx.settings.ellipsis,
        )))
    }
}

impl RulePipelineExt for TextRulePipeline {
    fn add_if<T, F>(mut self, condition: bool, factory: F) -> Self
    where
        T: CellRule + 'static,
        F: FnOnce() -> T,
    {
        if condition {
            self = self.add_rule(factory());
        }
        self
    }
}

impl Default for TextRulePipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shout;

    impl CellRule for Shout {
        fn name(&self) -> &'static str {
            "shout"
        }

        fn accepts(&self, kind: ColumnKind) -> bool {
            kind == ColumnKind::Text
        }

        fn apply(&self, text: &str, _ctx: &RuleContext) -> Result<Option<Cell>, CellError> {
            Ok(Some(Cell::Text(text.to_uppercase())))
        }
    }

    #[test]
    fn test_standard_rule_order() {
        let settings = FormatSettings::default();
        assert_eq!(
            TextRulePipeline::standard(&settings).rule_names(),
            vec!["iso_timestamp", "bare_decimal", "legacy_datetime", "legacy_decimal"]
        );

        let settings = FormatSettings {
            legacy_patterns: false,
            ..Default::default()
        };
        assert_eq!(
            TextRulePipeline::standard(&settings).rule_names(),
            vec!["iso_timestamp", "bare_decimal"]
        );
    }

    #[test]
    fn test_rules_filtered_by_kind() {
        let settings = FormatSettings::default();
        let pipeline = TextRulePipeline::new().add_rule(Shout);

        let text_ctx = RuleContext {
            settings: &settings,
            kind: ColumnKind::Text,
        };
        assert_eq!(pipeline.apply("abc", &text_ctx), Ok(Cell::text("ABC")));

        let unknown_ctx = RuleContext {
            settings: &settings,
            kind: ColumnKind::Unknown,
        };
        assert_eq!(pipeline.apply("abc", &unknown_ctx), Ok(Cell::text("abc")));
    }
}
