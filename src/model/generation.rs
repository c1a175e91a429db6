//! Wire types exchanged with the code-generation endpoint
//!
//! Only the shape of the data matters here. Every response field is optional:
//! a response without `final_code.artifacts` is an empty artifact list, not an
//! error.

use super::artifact::Artifact;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST {endpoint}/generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub num_docs: u32,
}

/// Decoded generation response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Assistant text shown alongside the artifacts
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub final_code: Option<FinalCode>,

    #[serde(default)]
    pub auditor_report: Option<AuditorReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalCode {
    #[serde(default)]
    pub artifacts: Option<Vec<Artifact>>,
}

/// Security review attached to a response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditorReport {
    #[serde(default)]
    pub vulnerabilities_found: bool,

    #[serde(default)]
    pub vulnerabilities_list: Vec<Value>,

    /// Either a list of strings or a single free-form string
    #[serde(default)]
    pub recommendations: Value,
}

impl GenerationResponse {
    /// Parse a response body
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// Artifacts carried by the response; missing fields yield an empty list
    pub fn artifacts(&self) -> Vec<Artifact> {
        self.final_code
            .as_ref()
            .and_then(|code| code.artifacts.clone())
            .unwrap_or_default()
    }

    /// Consume the response, returning its artifacts
    pub fn into_artifacts(self) -> Vec<Artifact> {
        self.final_code
            .and_then(|code| code.artifacts)
            .unwrap_or_default()
    }

    /// Number of vulnerabilities the auditor flagged
    pub fn vulnerability_count(&self) -> usize {
        self.auditor_report
            .as_ref()
            .filter(|report| report.vulnerabilities_found)
            .map(|report| report.vulnerabilities_list.len().max(1))
            .unwrap_or(0)
    }
}

impl AuditorReport {
    /// Recommendations flattened to display lines
    pub fn recommendation_lines(&self) -> Vec<String> {
        match &self.recommendations {
            Value::String(text) if !text.trim().is_empty() => vec![text.clone()],
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}
