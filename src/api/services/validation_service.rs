use serde::de::DeserializeOwned;
use std::ffi::CStr;
use std::os::raw::c_char;

use crate::error::{EngineError, EngineResult};

pub fn parse_c_string(ptr: *const c_char, field_name: &str) -> EngineResult<String> {
    if ptr.is_null() {
        return Err(EngineError::Validation(format!("{} is null", field_name)));
    }

    unsafe {
        match CStr::from_ptr(ptr).to_str() {
            Ok(s) => Ok(s.to_string()),
            Err(_) => Err(EngineError::Validation(format!("Invalid UTF-8 string for {}", field_name))),
        }
    }
}

pub fn parse_optional_c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }

    unsafe { CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string()) }
}

pub fn parse_json_arg<T: DeserializeOwned>(ptr: *const c_char, field_name: &str) -> EngineResult<T> {
    let raw = parse_c_string(ptr, field_name)?;
    if raw.trim().is_empty() {
        return Err(EngineError::Validation(format!("{} is empty", field_name)));
    }

    serde_json::from_str(&raw).map_err(|e| EngineError::Validation(format!("Failed to parse {}: {}", field_name, e)))
}

/// Rejects absent or blank values. The value is returned as sent, so ids keep
/// matching later exact comparisons.
pub fn require_non_empty<'a>(value: Option<&'a str>, message: &str) -> EngineResult<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(EngineError::Validation(message.to_string())),
    }
}
