//! JNI bindings for the Android app.
//!
//! Each public function here corresponds to a `external fun` declaration
//! in RustBridge.kt. The function names follow JNI naming conventions:
//! Java_<package>_<class>_<method> with dots replaced by underscores.
//!
//! Requests and replies are JSON strings, see [`crate::api`].

use std::ptr;
use std::sync::OnceLock;

use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;
use log::{error, info};

use crate::api;
use crate::resolve::RouteRequests;

fn route_requests() -> &'static RouteRequests {
    static REQUESTS: OnceLock<RouteRequests> = OnceLock::new();
    REQUESTS.get_or_init(RouteRequests::new)
}

fn read_string(env: &mut JNIEnv, value: &JString) -> Option<String> {
    match env.get_string(value) {
        Ok(s) => Some(s.into()),
        Err(e) => {
            error!("failed to read Java string: {e}");
            None
        }
    }
}

fn to_jstring(env: &mut JNIEnv, value: String) -> jstring {
    match env.new_string(value) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            error!("failed to create Java string: {e}");
            ptr::null_mut()
        }
    }
}

/// Returns the rust-core library version.
/// Maps to: RustBridge.version() -> String
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_parknav_app_RustBridge_version(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    to_jstring(&mut env, crate::VERSION.to_string())
}

/// Routes `log` output to logcat. Safe to call more than once.
/// Maps to: RustBridge.initLogging()
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_parknav_app_RustBridge_initLogging(
    _env: JNIEnv,
    _class: JClass,
) {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("parknav"),
    );
    info!("parknav {} logging initialised", crate::VERSION);
}

/// Resolves a route. Returns null if a newer request started meanwhile.
/// Maps to: RustBridge.resolveRoute(requestJson: String) -> String?
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_parknav_app_RustBridge_resolveRoute(
    mut env: JNIEnv,
    _class: JClass,
    request: JString,
) -> jstring {
    let Some(request) = read_string(&mut env, &request) else {
        return ptr::null_mut();
    };

    let ticket = route_requests().begin();
    let reply = api::resolve_route_json(&request);

    match ticket.accept(reply) {
        Some(reply) => to_jstring(&mut env, reply),
        None => ptr::null_mut(),
    }
}

/// Maps to: RustBridge.trackProgress(requestJson: String) -> String
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_parknav_app_RustBridge_trackProgress(
    mut env: JNIEnv,
    _class: JClass,
    request: JString,
) -> jstring {
    let Some(request) = read_string(&mut env, &request) else {
        return ptr::null_mut();
    };
    to_jstring(&mut env, api::track_progress_json(&request))
}

/// Maps to: RustBridge.importTour(gpx: String, configJson: String) -> String
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_parknav_app_RustBridge_importTour(
    mut env: JNIEnv,
    _class: JClass,
    gpx: JString,
    config: JString,
) -> jstring {
    let (Some(gpx), Some(config)) = (read_string(&mut env, &gpx), read_string(&mut env, &config)) else {
        return ptr::null_mut();
    };
    to_jstring(&mut env, api::import_tour_json(&gpx, &config))
}
