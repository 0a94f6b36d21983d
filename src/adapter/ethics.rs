//! Ethics gate contract.
//!
//! The engine never decides policy. It asks a gate about each transition
//! and maps the three possible verdicts onto different state rules:
//!
//! | Verdict     | Shift                     | Collapse score |
//! |-------------|---------------------------|----------------|
//! | `Allow`     | proceeds at normal cost   | 1.0            |
//! | `Uncertain` | soft-fails, penalty paid  | 0.5            |
//! | `Deny`      | hard-fails, nothing paid  | 0.0            |

use std::collections::BTreeSet;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EthicsDecision {
    Allow,
    Deny,
    /// Not enough evidence either way. Distinct from `Deny`.
    Uncertain,
}

impl EthicsDecision {
    /// Contribution of this verdict to a collapse score.
    pub fn score(self) -> f64 {
        match self {
            Self::Allow => 1.0,
            Self::Uncertain => 0.5,
            Self::Deny => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
            Self::Uncertain => "uncertain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthicsGateResult {
    pub decision: EthicsDecision,
    pub reason: String,
}

impl EthicsGateResult {
    pub fn allow(reason: impl Into<String>) -> Self {
        Self { decision: EthicsDecision::Allow, reason: reason.into() }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self { decision: EthicsDecision::Deny, reason: reason.into() }
    }

    pub fn uncertain(reason: impl Into<String>) -> Self {
        Self { decision: EthicsDecision::Uncertain, reason: reason.into() }
    }
}

#[async_trait]
pub trait EthicsGate: Send + Sync {
    async fn evaluate(&self, from: &str, to: &str) -> Result<EthicsGateResult>;
}

/// Reference gate that permits every transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl EthicsGate for AllowAll {
    async fn evaluate(&self, _from: &str, _to: &str) -> Result<EthicsGateResult> {
        Ok(EthicsGateResult::allow("allow-all gate"))
    }
}

/// Target-list gate: denies listed targets, is uncertain about others,
/// allows the rest. Deny wins when a target is on both lists.
#[derive(Debug, Clone, Default)]
pub struct DenyListGate {
    deny: BTreeSet<String>,
    uncertain: BTreeSet<String>,
}

impl DenyListGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deny(mut self, target: impl Into<String>) -> Self {
        self.deny.insert(target.into());
        self
    }

    pub fn uncertain(mut self, target: impl Into<String>) -> Self {
        self.uncertain.insert(target.into());
        self
    }

    /// Build from comma-separated lists, ignoring blanks.
    pub fn from_lists(deny: &str, uncertain: &str) -> Self {
        let split = |s: &str| -> BTreeSet<String> {
            s.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        };
        Self {
            deny: split(deny),
            uncertain: split(uncertain),
        }
    }

    fn judge(&self, to: &str) -> EthicsGateResult {
        if self.deny.contains(to) {
            EthicsGateResult::deny(format!("{} is on the deny list", to))
        } else if self.uncertain.contains(to) {
            EthicsGateResult::uncertain(format!("{} is on the uncertain list", to))
        } else {
            EthicsGateResult::allow("not listed")
        }
    }
}

#[async_trait]
impl EthicsGate for DenyListGate {
    async fn evaluate(&self, _from: &str, to: &str) -> Result<EthicsGateResult> {
        Ok(self.judge(to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_scores() {
        assert_eq!(EthicsDecision::Allow.score(), 1.0);
        assert_eq!(EthicsDecision::Uncertain.score(), 0.5);
        assert_eq!(EthicsDecision::Deny.score(), 0.0);
    }

    #[tokio::test]
    async fn test_allow_all() {
        let r = AllowAll.evaluate("a", "anything").await.unwrap();
        assert_eq!(r.decision, EthicsDecision::Allow);
    }

    #[tokio::test]
    async fn test_deny_list_gate() {
        let gate = DenyListGate::new().deny("forbidden").uncertain("murky");
        assert_eq!(gate.evaluate("a", "forbidden").await.unwrap().decision, EthicsDecision::Deny);
        assert_eq!(gate.evaluate("a", "murky").await.unwrap().decision, EthicsDecision::Uncertain);
        assert_eq!(gate.evaluate("a", "fine").await.unwrap().decision, EthicsDecision::Allow);
    }

    #[tokio::test]
    async fn test_deny_wins_over_uncertain() {
        let gate = DenyListGate::from_lists("x, y", "y,,z ");
        assert_eq!(gate.evaluate("a", "y").await.unwrap().decision, EthicsDecision::Deny);
        assert_eq!(gate.evaluate("a", "z").await.unwrap().decision, EthicsDecision::Uncertain);
        assert_eq!(gate.evaluate("a", "").await.unwrap().decision, EthicsDecision::Allow);
    }

    #[test]
    fn test_reason_names_list() {
        let gate = DenyListGate::new().deny("forbidden");
        assert!(gate.judge("forbidden").reason.contains("deny list"));
    }

    #[test]
    fn test_decision_serde() {
        assert_eq!(serde_json::to_string(&EthicsDecision::Uncertain).unwrap(), "\"uncertain\"");
    }
}
