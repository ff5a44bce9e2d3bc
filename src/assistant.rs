//! Canned analyst responses for the dashboard's chat panel.
//!
//! Questions are matched against an ordered keyword table; the first rule
//! with any keyword contained in the lowercased question answers it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    EarningsOverview,
    VarianceAnalysis,
    Scenario,
    BoardDeck,
    PeerComparison,
    Profitability,
    Risk,
    Efficiency,
    NetInterestMargin,
    Provisions,
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub topic: Topic,
    pub text: String,
}

struct Rule {
    keywords: &'static [&'static str],
    topic: Topic,
    response: &'static str,
}

const EARNINGS_OVERVIEW: &str = "Q3 2024 Performance Highlights: revenue reached $2.85B (+8.2% YoY) and net profit \
$890M (+12.5% YoY). NIM expanded 8bps QoQ to 3.45% on loan repricing, the cost-to-income ratio improved to 58.2% \
and EPS rose to $4.25. Capital stays strong with CET1 at 12.1%.";

const VARIANCE_ANALYSIS: &str = "Line-item variance for Q3 2024: net interest income is the largest positive \
driver on loan repricing, fee and commission income grew on digital adoption, while impairment charges rose \
27.6% QoQ to $125M. Operating expenses grew slower than income, improving the cost-to-income ratio to 58.2%.";

const SCENARIO: &str = "Scenario Analysis: adjust loan growth, deposit rate change, provisioning change, fee growth \
and cost growth to project net profit, NIM, ROE, capital and valuation ratios against the Q3 2024 baseline of \
$890M net profit and 3.45% NIM.";

const BOARD_DECK: &str = "Q3 2024 Financial Performance Summary: net profit of $890M (+12.5% YoY, +5.8% QoQ), \
revenue of $2.85B (+8.2% YoY), NIM of 3.45% (+8bps QoQ), cost-to-income ratio of 58.2% (from 59.8% in Q2) and \
EPS of $4.25 (+11.8% YoY). Strategic focus remains on SME lending, digital channels and cost discipline.";

const PEER_COMPARISON: &str = "Performance Assessment: the bank is competitively positioned against regional peers \
with ROE of 12.8%, NIM of 3.45% and an NPL ratio of 1.8%. The cost-to-income ratio of 58.2% shows good operational \
discipline with room to close the gap to the most efficient peers.";

const PROFITABILITY: &str = "Strong Profitability Performance: ROE stands at 12.8% and ROA at 1.28%, supported by \
net profit of $890M and margin expansion to 3.45%. Returns remain above the cost of equity.";

const RISK: &str = "Asset Quality Status: the NPL ratio of 1.8% remains well within acceptable limits. Provisions \
rose to $125M on forward-looking assessments, and CET1 of 12.1% with a capital adequacy ratio of 15.2% leaves \
ample buffer above regulatory minimums.";

const EFFICIENCY: &str = "Operational Excellence: the cost-to-income ratio improved to 58.2% from 59.8% in Q2 \
through digital process automation and branch optimization, while investment in technology continues.";

const NET_INTEREST_MARGIN: &str = "Q3 2024 NIM Performance: net interest margin improved 8bps QoQ to 3.45%, driven \
by loan repricing and a favorable deposit mix with CASA at 42.0%. Management expects continued expansion through \
strategic repricing.";

const PROVISIONS: &str = "Q3 2024 Provision Increase: loan loss provisions increased 27.6% QoQ to $125M, reflecting \
a cautious approach to emerging credit risks. Drivers were an $18M commercial real estate build, $7M of \
forward-looking economic adjustments and a $2M specific provision.";

const GENERAL: &str = "I can help you analyze the Q3 2024 financial performance: earnings overview, variance \
analysis, peer comparison and what-if scenarios. You can also ask about specific metrics like NIM, ROE or \
provisions.";

const RULES: &[Rule] = &[
    Rule {
        keywords: &["earnings overview", "quarterly snapshot"],
        topic: Topic::EarningsOverview,
        response: EARNINGS_OVERVIEW,
    },
    Rule {
        keywords: &["variance analysis", "line item"],
        topic: Topic::VarianceAnalysis,
        response: VARIANCE_ANALYSIS,
    },
    Rule {
        keywords: &["what-if", "scenario"],
        topic: Topic::Scenario,
        response: SCENARIO,
    },
    Rule {
        keywords: &["board deck", "presentation"],
        topic: Topic::BoardDeck,
        response: BOARD_DECK,
    },
    Rule {
        keywords: &["peer", "compare", "benchmark"],
        topic: Topic::PeerComparison,
        response: PEER_COMPARISON,
    },
    Rule {
        keywords: &["profitability", "roe", "roa"],
        topic: Topic::Profitability,
        response: PROFITABILITY,
    },
    Rule {
        keywords: &["risk", "npl", "asset quality"],
        topic: Topic::Risk,
        response: RISK,
    },
    Rule {
        keywords: &["efficiency", "cost", "operational"],
        topic: Topic::Efficiency,
        response: EFFICIENCY,
    },
    Rule {
        keywords: &["nim", "margin"],
        topic: Topic::NetInterestMargin,
        response: NET_INTEREST_MARGIN,
    },
    Rule {
        keywords: &["provision"],
        topic: Topic::Provisions,
        response: PROVISIONS,
    },
];

pub fn classify(question: &str) -> Topic {
    let question = question.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| question.contains(k)))
        .map(|rule| rule.topic)
        .unwrap_or(Topic::General)
}

pub fn respond(question: &str) -> AssistantReply {
    let topic = classify(question);
    let text = RULES
        .iter()
        .find(|rule| rule.topic == topic)
        .map(|rule| rule.response)
        .unwrap_or(GENERAL);

    AssistantReply {
        topic,
        text: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_route_to_topics() {
        let cases = [
            ("Show me the complete earnings overview", Topic::EarningsOverview),
            ("Perform detailed VARIANCE ANALYSIS", Topic::VarianceAnalysis),
            ("Run what-if scenarios", Topic::Scenario),
            ("Draft the board deck", Topic::BoardDeck),
            ("Compare with industry peers", Topic::PeerComparison),
            ("How is our ROA trending?", Topic::Profitability),
            ("What is the NPL ratio?", Topic::Risk),
            ("Any operational improvements?", Topic::Efficiency),
            ("Explain the margin", Topic::NetInterestMargin),
            ("Why did provisions rise?", Topic::Provisions),
            ("Hello", Topic::General),
        ];

        for (question, expected) in cases {
            assert_eq!(classify(question), expected, "{}", question);
        }
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // "cost" and "nim" both match; efficiency comes first.
        assert_eq!(classify("nim versus cost"), Topic::Efficiency);
        // "scenario" precedes "risk".
        assert_eq!(classify("risk scenario"), Topic::Scenario);
    }

    #[test]
    fn test_respond_carries_figures() {
        let reply = respond("Why did provisions rise?");
        assert!(reply.text.contains("27.6% QoQ to $125M"));

        let reply = respond("What's the net interest margin?");
        assert_eq!(reply.topic, Topic::NetInterestMargin);
        assert!(reply.text.contains("3.45%"));

        let reply = respond("hi there");
        assert_eq!(reply.topic, Topic::General);
        assert_eq!(reply.text, GENERAL);
    }
}
