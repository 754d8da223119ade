//! Map curl errors onto probe failure kinds.

use super::FailureKind;

/// Classify a curl error for reporting.
pub fn classify_curl_error(e: &curl::Error) -> FailureKind {
    if e.is_operation_timedout() {
        return FailureKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_ssl_connect_error()
        || e.is_peer_failed_verification()
        || e.is_ssl_certproblem()
        || e.is_got_nothing()
        || e.is_recv_error()
        || e.is_send_error()
    {
        return FailureKind::ConnectionFailed;
    }
    FailureKind::RequestFailed
}
