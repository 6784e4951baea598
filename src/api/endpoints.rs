use serde::Serialize;
use std::os::raw::c_char;

use crate::api::{
    services::{
        engine_service::{initialize_engine as init_engine, shared_engine},
        validation_service::*,
    },
    types::{
        ApiResult, FeedbackRequest, FeedbackResponse, FusionInput, FusionOutput, RecommendationRequest,
        RecommendationResponse,
    },
};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::modules::profile::UserProfile;
use crate::modules::session::Session;
use crate::utils::logging::init_logging;

fn respond<T: Serialize>(result: EngineResult<T>) -> *mut ApiResult {
    let outcome = result.and_then(|value| serde_json::to_string(&value).map_err(EngineError::from));

    match outcome {
        Ok(json) => ApiResult::success(json).into_raw(),
        Err(e) => ApiResult::failure(&e).into_raw(),
    }
}

/// Builds the process-wide engine. A null `config_toml` selects the defaults.
#[no_mangle]
pub extern "C" fn initialize_engine(config_toml: *const c_char) -> *mut ApiResult {
    let config = match parse_optional_c_string(config_toml) {
        Some(raw) => match EngineConfig::from_toml_str(&raw) {
            Ok(config) => config,
            Err(e) => return ApiResult::failure(&e).into_raw(),
        },
        None => EngineConfig::default(),
    };

    init_logging(&config.logging.level);

    respond(init_engine(config).map(|_| serde_json::json!({"initialized": true})))
}

fn fuse(input_json: *const c_char) -> EngineResult<FusionOutput> {
    let engine = shared_engine()?;
    let input: FusionInput = parse_json_arg(input_json, "Fusion input")?;
    Ok(engine.fuse(&input))
}

fn recommend(request_json: *const c_char) -> EngineResult<RecommendationResponse> {
    let engine = shared_engine()?;
    let request: RecommendationRequest = parse_json_arg(request_json, "Recommendation request")?;
    engine.recommend(&request)
}

fn begin(session_id: *const c_char, user_id: *const c_char) -> EngineResult<Session> {
    let engine = shared_engine()?;
    let session_id = parse_c_string(session_id, "Session ID string")?;
    let user_id = parse_c_string(user_id, "User ID string")?;
    engine.begin_session(&session_id, &user_id)
}

fn feedback(request_json: *const c_char) -> EngineResult<FeedbackResponse> {
    let engine = shared_engine()?;
    let request: FeedbackRequest = parse_json_arg(request_json, "Feedback request")?;
    engine.submit_feedback(&request)
}

fn profile(user_id: *const c_char) -> EngineResult<UserProfile> {
    let engine = shared_engine()?;
    let user_id = parse_c_string(user_id, "User ID string")?;
    engine.profile(&user_id)
}

#[no_mangle]
pub extern "C" fn fuse_modalities(input_json: *const c_char) -> *mut ApiResult {
    respond(fuse(input_json))
}

#[no_mangle]
pub extern "C" fn recommend_plan(request_json: *const c_char) -> *mut ApiResult {
    respond(recommend(request_json))
}

#[no_mangle]
pub extern "C" fn begin_session(session_id: *const c_char, user_id: *const c_char) -> *mut ApiResult {
    respond(begin(session_id, user_id))
}

#[no_mangle]
pub extern "C" fn submit_feedback(request_json: *const c_char) -> *mut ApiResult {
    respond(feedback(request_json))
}

#[no_mangle]
pub extern "C" fn get_user_profile(user_id: *const c_char) -> *mut ApiResult {
    respond(profile(user_id))
}

#[no_mangle]
pub extern "C" fn free_api_result(result: *mut ApiResult) {
    if result.is_null() {
        return;
    }

    unsafe {
        let result = Box::from_raw(result);
        if !result.data.is_null() {
            let _ = std::ffi::CString::from_raw(result.data);
        }
        if !result.error.is_null() {
            let _ = std::ffi::CString::from_raw(result.error);
        }
    }
}
