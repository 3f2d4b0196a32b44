use once_cell::sync::Lazy;
use regex::Regex;

/// Attack signature families reported by [`ThreatRules`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ThreatCategory {
    ScriptTag,
    JavascriptProtocol,
    VbscriptProtocol,
    EventHandler,
    CssExpression,
    SqlKeywords,
    SqlComment,
    CommandInjection,
    Custom(String),
}

impl ThreatCategory {
    pub fn message(&self) -> &str {
        match self {
            ThreatCategory::ScriptTag => "Script tag detected",
            ThreatCategory::JavascriptProtocol => "JavaScript protocol detected",
            ThreatCategory::VbscriptProtocol => "VBScript protocol detected",
            ThreatCategory::EventHandler => "Event handler detected",
            ThreatCategory::CssExpression => "CSS expression detected",
            ThreatCategory::SqlKeywords => "SQL keywords detected",
            ThreatCategory::SqlComment => "SQL comment detected",
            ThreatCategory::CommandInjection => "Command injection pattern detected",
            ThreatCategory::Custom(message) => message,
        }
    }
}

/// One pattern → category mapping
#[derive(Debug, Clone)]
pub struct ThreatRule {
    pattern: Regex,
    category: ThreatCategory,
}

impl ThreatRule {
    pub fn new(pattern: &str, category: ThreatCategory) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            category,
        })
    }

    pub fn category(&self) -> &ThreatCategory {
        &self.category
    }

    pub fn matches(&self, input: &str) -> bool {
        self.pattern.is_match(input)
    }
}

fn standard_patterns() -> Vec<(&'static str, ThreatCategory)> {
    vec![
        (r"(?i)<script\b", ThreatCategory::ScriptTag),
        (r"(?i)javascript\s*:", ThreatCategory::JavascriptProtocol),
        (r"(?i)vbscript\s*:", ThreatCategory::VbscriptProtocol),
        (r"(?i)\bon\w+\s*=", ThreatCategory::EventHandler),
        (r"(?i)expression\s*\(", ThreatCategory::CssExpression),
        (
            r"(?i)\b(union|select|insert|delete|drop|update)\b",
            ThreatCategory::SqlKeywords,
        ),
        (r"--|#|/\*|\*/", ThreatCategory::SqlComment),
        (r"[|&;`]|\$\(", ThreatCategory::CommandInjection),
    ]
}

static STANDARD_RULES: Lazy<ThreatRules> = Lazy::new(|| {
    let rules = standard_patterns()
        .into_iter()
        .map(|(pattern, category)| {
            ThreatRule::new(pattern, category).expect("Invalid regex pattern for threat rule")
        })
        .collect();
    ThreatRules { rules }
});

/// Ordered table of threat detection rules.
///
/// Detection is advisory defense in depth: persistence always binds
/// parameters, so a miss here never becomes an injection. Extra rules are
/// appended with [`ThreatRules::with_rule`]; the detection loop itself never
/// changes.
#[derive(Debug, Clone)]
pub struct ThreatRules {
    rules: Vec<ThreatRule>,
}

impl ThreatRules {
    /// Shared instance of the built-in table
    pub fn standard() -> &'static ThreatRules {
        &STANDARD_RULES
    }

    pub fn with_rule(mut self, rule: ThreatRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Categories that match `input`, each reported once, in table order.
    pub fn detect(&self, input: &str) -> Vec<&ThreatCategory> {
        let mut found: Vec<&ThreatCategory> = Vec::new();
        for rule in &self.rules {
            if rule.matches(input) && !found.contains(&rule.category()) {
                found.push(rule.category());
            }
        }
        found
    }
}

impl Default for ThreatRules {
    fn default() -> Self {
        STANDARD_RULES.clone()
    }
}
