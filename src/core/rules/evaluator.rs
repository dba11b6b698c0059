// ─── Rule Evaluation ───
// Platform rules attached to libraries and conditional launch arguments.

use serde::Deserialize;

use super::host::HostDescriptor;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsRule {
    #[serde(default)]
    pub name: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    pub arch: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    pub action: RuleAction,
    #[serde(default)]
    pub os: Option<OsRule>,
    /// Feature flags (demo user, custom resolution, ...). Never modeled, so
    /// a rule carrying any of them never matches.
    #[serde(default)]
    pub features: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Rule {
    fn matches(&self, host: &HostDescriptor) -> bool {
        if self.features.is_some() {
            return false;
        }

        match self.os.as_ref().and_then(|os| os.name.as_deref()) {
            None => true,
            Some(name) => name == host.os.metadata_name(),
        }
    }
}

/// Decide whether a node guarded by `rules` is active on `host`.
///
/// - No rule list → active.
/// - Otherwise start disallowed and walk the rules in order; each *matching*
///   rule overwrites the verdict with its action. Non-matching rules leave it
///   untouched, so the last matching rule wins.
pub fn applies(rules: Option<&[Rule]>, host: &HostDescriptor) -> bool {
    let Some(rules) = rules else {
        return true;
    };

    rules.iter().fold(false, |allowed, rule| {
        if rule.matches(host) {
            rule.action == RuleAction::Allow
        } else {
            allowed
        }
    })
}
