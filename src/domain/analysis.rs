use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Backend classification label. The backend sends free-form strings
/// ("Legitime", "Suspicious", "Phishing", ...); anything unrecognized is
/// kept verbatim so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Legitimate,
    Suspicious,
    Phishing,
    Other(String),
}

impl Verdict {
    pub fn parse(label: &str) -> Self {
        match label {
            "Legitime" | "Legitimate" => Verdict::Legitimate,
            "Suspicious" => Verdict::Suspicious,
            "Phishing" => Verdict::Phishing,
            other => Verdict::Other(other.to_string()),
        }
    }
}

/// Full per-email report as emitted by the backend aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub id_email: Option<String>,
    pub phishgard_verdict: String,
    #[serde(default)]
    pub confidence_score: String,
    #[serde(default)]
    pub final_score_internal: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub breakdown: Breakdown,
}

impl AnalysisReport {
    pub fn verdict(&self) -> Verdict {
        Verdict::parse(&self.phishgard_verdict)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Breakdown {
    #[serde(default)]
    pub heuristic_analysis: Option<HeuristicAnalysis>,
    #[serde(default)]
    pub url_ml_analysis: Option<UrlMlAnalysis>,
    #[serde(default)]
    pub llm_analysis: Option<LlmAnalysis>,
    #[serde(default)]
    pub osint_enrichment: Option<OsintEnrichment>,
}

/// Rule-based scoring (SPF/DKIM/DMARC, domain age...). Only the fields the
/// client displays are typed; the rest rides along in `details`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeuristicAnalysis {
    #[serde(default)]
    pub summary: HeuristicSummary,
    #[serde(default)]
    pub details: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeuristicSummary {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub positive_indicators: Vec<String>,
    #[serde(default)]
    pub negative_indicators: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UrlMlAnalysis {
    #[serde(default)]
    pub prediction: String,
    #[serde(default)]
    pub probability_legitimate: String,
    #[serde(default)]
    pub probability_phishing: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmAnalysis {
    #[serde(default)]
    pub classification: String,
    #[serde(default)]
    pub confidence_score: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsintEnrichment {
    #[serde(default)]
    pub ip_analysis: Vec<IpAnalysis>,
    #[serde(default)]
    pub domain_analysis: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpAnalysis {
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub ipinfo: Value,
    #[serde(default)]
    pub abuseipdb: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_labels() {
        assert_eq!(Verdict::parse("Legitime"), Verdict::Legitimate);
        assert_eq!(Verdict::parse("Phishing"), Verdict::Phishing);
        assert_eq!(
            Verdict::parse("UNPROCESSED"),
            Verdict::Other("UNPROCESSED".into())
        );
    }

    #[test]
    fn report_deserializes_with_partial_breakdown() {
        let raw = serde_json::json!({
            "id_email": "e1",
            "phishgard_verdict": "Phishing",
            "confidence_score": "92%",
            "final_score_internal": -92.0,
            "summary": "Veto: domaine récent",
            "breakdown": {
                "llm_analysis": {
                    "classification": "PHISHING",
                    "confidence_score": "9",
                    "reason": "Usurpation de marque"
                },
                "osint_enrichment": {
                    "ip_analysis": [
                        {"ip": "203.0.113.7", "abuseipdb": {"abuseConfidenceScore": 97}}
                    ]
                }
            }
        });
        let report: AnalysisReport = serde_json::from_value(raw).unwrap();
        assert_eq!(report.verdict(), Verdict::Phishing);
        assert!(report.breakdown.heuristic_analysis.is_none());
        let llm = report.breakdown.llm_analysis.unwrap();
        assert_eq!(llm.reason, "Usurpation de marque");
        let osint = report.breakdown.osint_enrichment.unwrap();
        assert_eq!(osint.ip_analysis[0].ip, "203.0.113.7");
        assert_eq!(osint.ip_analysis[0].abuseipdb["abuseConfidenceScore"], 97);
    }
}
