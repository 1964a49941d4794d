//! C ABI with JSON payloads.
//!
//! Request:
//!
//! ```json
//! {
//!   "network": { "intersections": [{"id": 1, "x": 0.0, "y": 0.0}], "roads": [] },
//!   "config": { "zone_count": 3, "seed": 42 },
//!   "peak_hour": true
//! }
//! ```
//!
//! `config` is optional and partial. With `peak_hour` present the roads are
//! relabeled with simulated traffic; without it the payload's `traffic`
//! values are used as given.
//!
//! Response: `{"zones": [ZoneResult, ...]}` or `{"error": "..."}`. Strings
//! returned by [`usig_optimize_json`] must be released with
//! [`usig_free_string`].

use std::ffi::{CStr, CString};
use std::ptr;

use libc::c_char;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::de::DeConfig;
use crate::network::{NetworkData, RoadNetwork, TrafficLabeler};
use crate::optimizer::{ZoneOptimizer, ZoneResult};

#[derive(Debug, Deserialize)]
struct OptimizeRequest {
    network: NetworkData,
    #[serde(default)]
    config: DeConfig,
    #[serde(default)]
    peak_hour: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum OptimizeResponse {
    Zones { zones: Vec<ZoneResult> },
    Error { error: String },
}

/// Runs an optimization request given as JSON and returns the JSON reply.
///
/// Failures are reported inside the reply, never as a panic.
pub fn optimize_json(request: &str) -> String {
    let response = match handle(request) {
        Ok(zones) => OptimizeResponse::Zones { zones },
        Err(error) => {
            warn!(%error, "optimization request rejected");
            OptimizeResponse::Error { error }
        }
    };
    serde_json::to_string(&response)
        .unwrap_or_else(|e| format!(r#"{{"error":"failed to encode response: {e}"}}"#))
}

fn handle(request: &str) -> Result<Vec<ZoneResult>, String> {
    let request: OptimizeRequest = serde_json::from_str(request).map_err(|e| e.to_string())?;
    let mut network = RoadNetwork::from_data(&request.network).map_err(|e| e.to_string())?;
    let seed = request.config.seed.unwrap_or_else(rand::random);
    if let Some(peak_hour) = request.peak_hour {
        TrafficLabeler::new(peak_hour)
            .label(&mut network, &mut u_numflow::random::create_rng(seed));
    }
    ZoneOptimizer::new(request.config.with_seed(seed))
        .run(&network)
        .map_err(|e| e.to_string())
}

/// Optimizes signal placement for a JSON request.
///
/// Returns a newly allocated, NUL-terminated JSON string, or null if
/// `request` is null.
///
/// # Safety
///
/// `request` must be null or point to a valid NUL-terminated string. The
/// result must be freed with [`usig_free_string`].
#[no_mangle]
pub unsafe extern "C" fn usig_optimize_json(request: *const c_char) -> *mut c_char {
    if request.is_null() {
        return ptr::null_mut();
    }
    let reply = match CStr::from_ptr(request).to_str() {
        Ok(text) => optimize_json(text),
        Err(_) => r#"{"error":"request is not valid UTF-8"}"#.to_string(),
    };
    CString::new(reply).map_or(ptr::null_mut(), CString::into_raw)
}

/// Frees a string returned by [`usig_optimize_json`].
///
/// # Safety
///
/// `ptr` must be null or a pointer obtained from [`usig_optimize_json`]
/// that has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn usig_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}
