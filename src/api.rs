//! JSON request/response envelope shared by the HTTP server and WASM bindings

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisOptions;
use crate::error::{FaultKind, FrameError};
use crate::model::FrameModel;
use crate::results::AnalysisResult;

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub model: FrameModel,
    #[serde(default)]
    pub options: Option<AnalysisOptions>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FaultKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<AnalysisResult>,
}

impl AnalysisResponse {
    pub fn ok(results: AnalysisResult) -> Self {
        Self {
            success: true,
            error: None,
            error_kind: None,
            results: Some(results),
        }
    }

    pub fn failed(error: &FrameError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            error_kind: Some(error.kind()),
            results: None,
        }
    }
}

/// Run one analysis request
pub fn run_analysis(request: &AnalysisRequest) -> AnalysisResponse {
    let options = request.options.clone().unwrap_or_default();
    match request.model.analyze_with(&options) {
        Ok(results) => AnalysisResponse::ok(results),
        Err(e) => {
            log::warn!("Analysis failed: {}", e);
            AnalysisResponse::failed(&e)
        }
    }
}

/// Parse a JSON request, run it and serialize the response
pub fn run_json(request_json: &str) -> String {
    let response = match serde_json::from_str::<AnalysisRequest>(request_json) {
        Ok(request) => run_analysis(&request),
        Err(e) => AnalysisResponse::failed(&FrameError::from(e)),
    };

    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"error":"failed to serialize response: {}","error_kind":"io"}}"#,
            e
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_BEAM: &str = r#"{
        "model": {
            "nodes": [
                {"id": "A", "x": 0.0, "y": 0.0},
                {"id": "B", "x": 4.0, "y": 0.0}
            ],
            "members": [
                {"id": "M1", "start": "A", "end": "B",
                 "section": {"e": 200e9, "i": 1e-4, "a": 1e-2}}
            ],
            "supports": [
                {"id": "S1", "node": "A", "kind": "pin"},
                {"id": "S2", "node": "B", "kind": "roller"}
            ],
            "loads": [
                {"id": "P1", "member": "M1", "kind": "point", "magnitude": -10.0, "position": 2.0}
            ]
        },
        "options": {"diagram_segments": 4}
    }"#;

    #[test]
    fn test_run_json_success() {
        let response: serde_json::Value = serde_json::from_str(&run_json(SIMPLE_BEAM)).unwrap();
        assert_eq!(response["success"], true);
        let fy = response["results"]["reactions"]["A"]["fy"].as_f64().unwrap();
        assert!((fy - 5.0).abs() < 1e-9);
        let points = response["results"]["diagrams"]["M1"]["points"].as_array().unwrap();
        assert_eq!(points.len(), 5);
    }

    #[test]
    fn test_run_json_reports_fault_kind() {
        let bad = SIMPLE_BEAM.replace(r#""x": 4.0"#, r#""x": 0.0"#);
        let response: serde_json::Value = serde_json::from_str(&run_json(&bad)).unwrap();
        assert_eq!(response["success"], false);
        assert_eq!(response["error_kind"], "configuration");

        let response: serde_json::Value = serde_json::from_str(&run_json("nope")).unwrap();
        assert_eq!(response["error_kind"], "io");
    }
}
