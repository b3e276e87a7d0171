use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::category::UnknownVariant;

/// A matching rule attached to a category.
///
/// Rules are stored in insertion order. The `kind` field selects the variant
/// when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Rule {
    /// Tags matching the pattern belong to the category.
    Match {
        /// A literal string or regular expression source.
        pattern: String,
    },
    /// Occurrences of `from` are rewritten to `to`.
    Replace {
        /// Text to look for.
        from: String,
        /// Replacement text.
        to: String,
    },
}

impl Rule {
    /// Which variant this rule is.
    #[must_use]
    pub const fn kind(&self) -> RuleKind {
        match self {
            Self::Match { .. } => RuleKind::Match,
            Self::Replace { .. } => RuleKind::Replace,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match { pattern } => write!(f, "match: {pattern}"),
            Self::Replace { from, to } => write!(f, "replace: {from} → {to}"),
        }
    }
}

/// The discriminant of a [`Rule`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// See [`Rule::Match`].
    #[default]
    Match,
    /// See [`Rule::Replace`].
    Replace,
}

impl RuleKind {
    /// Every rule kind, in selection order.
    pub const ALL: [Self; 2] = [Self::Match, Self::Replace];

    /// The lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Replace => "replace",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "match" => Ok(Self::Match),
            "replace" => Ok(Self::Replace),
            _ => Err(UnknownVariant::new("rule kind", s, "match, replace")),
        }
    }
}

/// The in-progress inputs of the rule adder.
///
/// Only the fields relevant to `kind` are read when building.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleDraft {
    /// Which kind of rule to build.
    pub kind: RuleKind,
    /// Pattern of a match rule.
    pub pattern: String,
    /// Search text of a replace rule.
    pub from: String,
    /// Replacement text of a replace rule.
    pub to: String,
}

impl RuleDraft {
    /// A draft for a match rule.
    #[must_use]
    pub fn matching(pattern: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Match,
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    /// A draft for a replace rule.
    #[must_use]
    pub fn replacing(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Replace,
            from: from.into(),
            to: to.into(),
            ..Self::default()
        }
    }

    /// Builds a rule from the trimmed inputs.
    ///
    /// # Errors
    ///
    /// Returns [`IncompleteRule`] if an input required by the kind is blank.
    pub fn build(&self) -> Result<Rule, IncompleteRule> {
        match self.kind {
            RuleKind::Match => {
                let pattern = self.pattern.trim();
                if pattern.is_empty() {
                    return Err(IncompleteRule::MissingPattern);
                }
                Ok(Rule::Match {
                    pattern: pattern.to_string(),
                })
            }
            RuleKind::Replace => {
                let (from, to) = (self.from.trim(), self.to.trim());
                if from.is_empty() || to.is_empty() {
                    return Err(IncompleteRule::MissingReplacement);
                }
                Ok(Rule::Replace {
                    from: from.to_string(),
                    to: to.to_string(),
                })
            }
        }
    }

    /// Clears the inputs of the current kind, keeping the kind selected.
    pub fn clear(&mut self) {
        match self.kind {
            RuleKind::Match => self.pattern.clear(),
            RuleKind::Replace => {
                self.from.clear();
                self.to.clear();
            }
        }
    }
}

/// A rule draft is missing required input.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IncompleteRule {
    /// A match rule was drafted with a blank pattern.
    #[error("a match rule needs a pattern")]
    MissingPattern,
    /// A replace rule was drafted with a blank side.
    #[error("a replace rule needs both 'from' and 'to'")]
    MissingReplacement,
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn builds_trimmed_match_rule() {
        let rule = RuleDraft::matching("  inv-*  ").build().unwrap();
        assert_eq!(
            rule,
            Rule::Match {
                pattern: "inv-*".to_string()
            }
        );
        assert_eq!(rule.kind(), RuleKind::Match);
    }

    #[test_case(&RuleDraft::matching("") => IncompleteRule::MissingPattern ; "empty pattern")]
    #[test_case(&RuleDraft::matching("   ") => IncompleteRule::MissingPattern ; "blank pattern")]
    #[test_case(&RuleDraft::replacing("", "b") => IncompleteRule::MissingReplacement ; "missing from")]
    #[test_case(&RuleDraft::replacing("a", " ") => IncompleteRule::MissingReplacement ; "missing to")]
    fn rejects_incomplete_drafts(draft: &RuleDraft) -> IncompleteRule {
        draft.build().unwrap_err()
    }

    #[test]
    fn build_ignores_inputs_of_other_kind() {
        let mut draft = RuleDraft::replacing("colour", "color");
        draft.pattern = "unused".to_string();
        assert_eq!(
            draft.build().unwrap(),
            Rule::Replace {
                from: "colour".to_string(),
                to: "color".to_string()
            }
        );
    }

    #[test]
    fn clear_keeps_kind() {
        let mut draft = RuleDraft::replacing("a", "b");
        draft.clear();
        assert_eq!(draft, RuleDraft {
            kind: RuleKind::Replace,
            ..RuleDraft::default()
        });
    }

    #[test]
    fn serializes_with_kind_tag() {
        let rules = vec![
            Rule::Match {
                pattern: "^inv".to_string(),
            },
            Rule::Replace {
                from: "a".to_string(),
                to: "b".to_string(),
            },
        ];
        let json = serde_json::to_value(&rules).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "kind": "match", "pattern": "^inv" },
                { "kind": "replace", "from": "a", "to": "b" }
            ])
        );
    }

    #[test]
    fn displays_rules_like_the_rule_list() {
        let rule = Rule::Replace {
            from: "colour".to_string(),
            to: "color".to_string(),
        };
        assert_eq!(rule.to_string(), "replace: colour → color");
    }
}
