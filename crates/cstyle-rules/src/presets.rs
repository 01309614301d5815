//! Rule presets for common configurations.

use crate::{
    BinaryOperatorSpacing, BracePlacement, IncludeOrder, Indentation, KeywordParenSpacing,
    MemberAccessSpacing, TemplateDeclarationBreak,
};
use cstyle_core::RuleBox;

/// Preset configurations for cstyle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every rule of the house style.
    All,
    /// Block layout only, for gradual adoption.
    Layout,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::All => all_rules(),
            Self::Layout => layout_rules(),
        }
    }

    /// Parses a preset name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "all" => Some(Self::All),
            "layout" => Some(Self::Layout),
            _ => None,
        }
    }
}

/// Returns all available rules, in code order.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(IncludeOrder::new()),
        Box::new(BracePlacement::new()),
        Box::new(KeywordParenSpacing::new()),
        Box::new(BinaryOperatorSpacing::new()),
        Box::new(MemberAccessSpacing::new()),
        Box::new(TemplateDeclarationBreak::new()),
        Box::new(Indentation::new()),
    ]
}

/// Returns the layout rules.
///
/// Includes:
/// - `brace-placement` (CS002)
/// - `indentation` (CS007)
#[must_use]
pub fn layout_rules() -> Vec<RuleBox> {
    vec![Box::new(BracePlacement::new()), Box::new(Indentation::new())]
}

/// Looks up a rule by id or code.
#[must_use]
pub fn find_rule(id: &str) -> Option<RuleBox> {
    all_rules().into_iter().find(|r| r.matches_id(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_rules() {
        assert_eq!(Preset::All.rules().len(), 7);
        assert_eq!(Preset::Layout.rules().len(), 2);
        assert_eq!(Preset::from_name("layout"), Some(Preset::Layout));
        assert_eq!(Preset::from_name("strict"), None);
    }

    #[test]
    fn test_codes_are_unique_and_ordered() {
        let codes: Vec<&str> = all_rules().iter().map(|r| r.code()).collect();
        assert_eq!(
            codes,
            vec!["CS001", "CS002", "CS003", "CS004", "CS005", "CS006", "CS007"]
        );
    }

    #[test]
    fn test_find_rule_by_name_or_code() {
        assert_eq!(find_rule("indentation").map(|r| r.code()), Some("CS007"));
        assert_eq!(find_rule("cs003").map(|r| r.name()), Some("keyword-paren-spacing"));
        assert!(find_rule("no-such-rule").is_none());
    }

    #[test]
    fn test_every_rule_documents_itself() {
        for rule in all_rules() {
            assert!(!rule.description().is_empty(), "{}", rule.name());
            assert!(!rule.example().is_empty(), "{}", rule.name());
        }
    }
}
