//! Risk tier and recommendation rules.
//!
//! Pure functions, no learned parameters. Rules are evaluated in a fixed
//! priority order and the first matching rule wins; keeping them as an
//! explicit ordered list (rather than nested conditionals) makes ordering
//! and tie-break behavior auditable and testable in isolation.

use crate::domain::RiskTier;

/// Map (esg_score, budget) to a risk tier.
pub fn estimate_risk(esg_score: i32, budget: f64) -> RiskTier {
    if esg_score >= 75 && budget <= 500_000.0 {
        RiskTier::Low
    } else if esg_score >= 60 {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}

struct Rule {
    applies: fn(esg_score: i32, description: &str) -> bool,
    message: &'static str,
}

/// Ordered recommendation rules. Predicates see the lowercased
/// description; the final rule is the unconditional fallback.
const RULES: [Rule; 4] = [
    Rule {
        applies: |esg, _| esg < 55,
        message: "Improve reporting on CO2 reduction metrics and formalize an ESG action plan.",
    },
    Rule {
        applies: |_, desc| !desc.contains("scope") && !desc.contains("emission"),
        message: "Add scope 1/2/3 emissions tracking and publish reduction targets.",
    },
    Rule {
        applies: |_, desc| !desc.contains("audit") && !desc.contains("report"),
        message: "Introduce third-party ESG audits and publish periodic progress reports.",
    },
    Rule {
        applies: |_, _| true,
        message: "Maintain transparency and track reductions against declared ESG targets.",
    },
];

/// First matching rule's recommendation text.
pub fn recommend(esg_score: i32, description: &str) -> &'static str {
    let desc = description.to_lowercase();
    for rule in &RULES {
        if (rule.applies)(esg_score, &desc) {
            return rule.message;
        }
    }
    // The last rule is unconditional; this line is unreachable.
    RULES[RULES.len() - 1].message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_tier_boundaries() {
        assert_eq!(estimate_risk(75, 500_000.0), RiskTier::Low);
        assert_eq!(estimate_risk(74, 500_000.0), RiskTier::Medium);
        assert_eq!(estimate_risk(75, 500_001.0), RiskTier::Medium);
        assert_eq!(estimate_risk(60, 1_000_000.0), RiskTier::Medium);
        assert_eq!(estimate_risk(59, 100.0), RiskTier::High);
    }

    #[test]
    fn low_score_wins_regardless_of_text() {
        let msg = recommend(54, "scope emission audit report");
        assert!(msg.starts_with("Improve reporting on CO2"));
    }

    #[test]
    fn missing_scope_and_emission_is_rule_two() {
        // Score threshold not met, so rule 1 is skipped; none of the four
        // keywords present, so rule 2 fires before rules 3 and 4.
        let msg = recommend(80, "solar farm with community ownership");
        assert!(msg.starts_with("Add scope 1/2/3"));
    }

    #[test]
    fn missing_audit_and_report_is_rule_three() {
        let msg = recommend(80, "tracks scope emissions closely");
        assert!(msg.starts_with("Introduce third-party ESG audits"));
    }

    #[test]
    fn fallback_rule() {
        let msg = recommend(80, "scope emissions audit report in place");
        assert!(msg.starts_with("Maintain transparency"));
    }

    #[test]
    fn substring_checks_are_case_insensitive() {
        let msg = recommend(80, "SCOPE EMISSIONS AUDIT REPORT");
        assert!(msg.starts_with("Maintain transparency"));
    }
}
