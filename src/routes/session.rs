//! Group access sessions carried as cookies.
//!
//! The core only supplies the verification result and the session
//! duration; this module owns the transport representation.

use axum::http::{HeaderMap, header};
use uuid::Uuid;

use crate::{error::AppError, state::SharedState};

/// Marker value stored in the session cookie.
const SESSION_VALUE: &str = "authenticated";

/// Name of the cookie granting access to one group.
pub fn cookie_name(group_id: Uuid) -> String {
    format!("group_access_{group_id}")
}

/// `Set-Cookie` value granting access to a group for the configured
/// session duration.
pub fn grant_cookie(state: &SharedState, group_id: Uuid) -> String {
    let max_age = state.config().session_duration().as_secs();
    format!(
        "{}={SESSION_VALUE}; Max-Age={max_age}; Path=/; HttpOnly; SameSite=Lax",
        cookie_name(group_id)
    )
}

/// `Set-Cookie` value revoking a group session immediately.
pub fn revoke_cookie(group_id: Uuid) -> String {
    format!(
        "{}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax",
        cookie_name(group_id)
    )
}

/// Check that the request carries a valid session for the group, unless
/// password enforcement is disabled in the configuration.
pub fn ensure_group_access(
    state: &SharedState,
    headers: &HeaderMap,
    group_id: Uuid,
) -> Result<(), AppError> {
    if !state.config().require_password() {
        return Ok(());
    }

    if has_session(headers, group_id) {
        Ok(())
    } else {
        Err(AppError::Unauthorized(format!(
            "no valid session for group `{group_id}`"
        )))
    }
}

fn has_session(headers: &HeaderMap, group_id: Uuid) -> bool {
    let name = cookie_name(group_id);
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(key, value)| key == name && value == SESSION_VALUE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn session_cookie_is_recognized() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("other=1; {}=authenticated", cookie_name(id))).unwrap(),
        );
        assert!(has_session(&headers, id));
        assert!(!has_session(&headers, Uuid::new_v4()));
    }

    #[test]
    fn wrong_value_is_rejected() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{}=forged", cookie_name(id))).unwrap(),
        );
        assert!(!has_session(&headers, id));
    }
}
