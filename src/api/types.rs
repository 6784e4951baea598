use serde::{Deserialize, Serialize};
use std::ffi::CString;
use std::os::raw::c_char;

use crate::error::EngineError;
use crate::modules::emotion::{FusionResult, RawPrediction};
use crate::modules::recommendation::PlannedPose;
use crate::modules::session::FeedbackSubmission;

pub type UserId = String;
pub type SessionId = String;
pub type FusionOutput = FusionResult;
pub type FeedbackRequest = FeedbackSubmission;

#[repr(C)]
pub struct ApiResult {
    pub success: u8,
    pub status: u16,
    pub data: *mut c_char,
    pub error: *mut c_char,
}

fn into_c_string(value: String, fallback: &str) -> *mut c_char {
    match CString::new(value) {
        Ok(cstring) => cstring.into_raw(),
        Err(_) => CString::new(fallback)
            .expect("Hardcoded fallback string should be valid")
            .into_raw(),
    }
}

impl ApiResult {
    pub fn success(data: String) -> Self {
        Self {
            success: 1,
            status: 200,
            data: into_c_string(data, "Data contains invalid characters"),
            error: std::ptr::null_mut(),
        }
    }

    /// Failure carrying a `{success: false, message}` body.
    pub fn failure(error: &EngineError) -> Self {
        let body = serde_json::json!({
            "success": false,
            "message": error.to_string(),
        })
        .to_string();

        Self {
            success: 0,
            status: error.status_code(),
            data: std::ptr::null_mut(),
            error: into_c_string(body, "Error message contains invalid characters"),
        }
    }

    pub fn into_raw(self) -> *mut ApiResult {
        Box::into_raw(Box::new(self))
    }
}

/// Classifier outputs as posted by the service layer, labels not yet normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FusionInput {
    #[serde(default)]
    pub voice: Option<RawPrediction>,
    #[serde(default)]
    pub text: Option<RawPrediction>,
    #[serde(default)]
    pub face: Option<RawPrediction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileHint {
    #[serde(default)]
    pub avg_completion: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub modalities: Option<FusionInput>,
    #[serde(default)]
    pub user_profile: Option<ProfileHint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub session_id: SessionId,
    pub emotion: String,
    pub yoga_plan: Vec<PlannedPose>,
    pub total_duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FeedbackResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }
}
