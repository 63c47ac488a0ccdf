//! Security headers middleware for XSS, clickjacking, and isolation protection.
//!
//! Adds restrictive security headers to all responses. Start locked down and
//! loosen only when specific functionality requires it.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use super::csp::CspNonce;

/// Origin serving the pinned htmx build.
pub const SCRIPT_CDN: &str = "https://unpkg.com";

/// Image hosts used by the catalog placeholders and the UPI QR code.
const IMAGE_HOSTS: &str = "https://placehold.co https://i.ibb.co";

/// Policy sent when the per-request policy is not a valid header value.
///
/// The regular policy without the nonce and the script CDN: only same-origin
/// scripts run.
pub const FALLBACK_CSP: &str = "default-src 'none'; \
     script-src 'self'; \
     style-src 'self'; \
     img-src 'self' https://placehold.co https://i.ibb.co; \
     connect-src 'self'; \
     frame-src 'none'; \
     object-src 'none'; \
     base-uri 'self'; \
     form-action 'self'; \
     frame-ancestors 'none'";

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY` - Prevent clickjacking
/// - `X-Content-Type-Options: nosniff` - Prevent MIME sniffing
/// - `Referrer-Policy: no-referrer` - Zero referrer leakage
/// - `Content-Security-Policy` - Strict CSP (see below)
/// - `Permissions-Policy` - Deny all sensitive features
/// - `Cache-Control: no-store, max-age=0` - Prevent caching per-visitor pages
/// - `Cross-Origin-Opener-Policy: same-origin` - Process isolation
/// - `Cross-Origin-Resource-Policy: same-origin` - Resource isolation
/// - `X-DNS-Prefetch-Control: off` - Prevent DNS prefetch leakage
///
/// # CSP Policy
///
/// ```text
/// default-src 'none';
/// script-src 'self' 'nonce-<per request>' https://unpkg.com;
/// style-src 'self';
/// img-src 'self' https://placehold.co https://i.ibb.co;
/// connect-src 'self';
/// frame-src 'none';
/// object-src 'none';
/// base-uri 'self';
/// form-action 'self';
/// frame-ancestors 'none'
/// ```
///
/// Checkout links open `wa.me` in a new tab, which CSP does not restrict.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let nonce = request.extensions().get::<CspNonce>().cloned();
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    // Prevent clickjacking
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    // Prevent MIME sniffing
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    // Zero referrer leakage (stricter than same-origin)
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));

    headers.insert(CONTENT_SECURITY_POLICY, csp_header(nonce.as_ref()));

    // Strict Permissions Policy - deny all sensitive features
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "accelerometer=(), \
             autoplay=(), \
             browsing-topics=(), \
             camera=(), \
             display-capture=(), \
             encrypted-media=(), \
             fullscreen=(), \
             geolocation=(), \
             gyroscope=(), \
             hid=(), \
             idle-detection=(), \
             magnetometer=(), \
             microphone=(), \
             midi=(), \
             payment=(), \
             picture-in-picture=(), \
             publickey-credentials-get=(), \
             screen-wake-lock=(), \
             serial=(), \
             sync-xhr=(), \
             usb=(), \
             xr-spatial-tracking=()",
        ),
    );

    // Pages carry per-visitor cart state
    headers.insert(
        HeaderName::from_static("cache-control"),
        HeaderValue::from_static("no-store, max-age=0"),
    );

    // Cross-Origin policies for additional isolation
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    headers.insert(
        HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("same-origin"),
    );

    // Prevent DNS prefetching to avoid leaking which links user hovers over
    headers.insert(
        HeaderName::from_static("x-dns-prefetch-control"),
        HeaderValue::from_static("off"),
    );

    response
}

/// Build the CSP header value, allowing the request's nonce when present.
fn content_security_policy(nonce: Option<&CspNonce>) -> String {
    let script_src = match nonce {
        Some(nonce) if !nonce.value().is_empty() => {
            format!("'self' 'nonce-{}' {SCRIPT_CDN}", nonce.value())
        }
        _ => format!("'self' {SCRIPT_CDN}"),
    };

    format!(
        "default-src 'none'; \
         script-src {script_src}; \
         style-src 'self'; \
         img-src 'self' {IMAGE_HOSTS}; \
         connect-src 'self'; \
         frame-src 'none'; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'"
    )
}

/// The CSP header value, falling back to [`FALLBACK_CSP`].
fn csp_header(nonce: Option<&CspNonce>) -> HeaderValue {
    HeaderValue::from_str(&content_security_policy(nonce)).unwrap_or_else(|e| {
        tracing::error!(error = %e, "invalid content security policy, using fallback");
        HeaderValue::from_static(FALLBACK_CSP)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csp_includes_nonce() {
        let nonce = CspNonce("abc123".to_string());
        let csp = content_security_policy(Some(&nonce));
        assert!(csp.contains("script-src 'self' 'nonce-abc123' https://unpkg.com;"));
        assert!(csp.contains("img-src 'self' https://placehold.co https://i.ibb.co;"));
    }

    #[test]
    fn test_invalid_nonce_falls_back_to_strict_policy() {
        let nonce = CspNonce("abc\r\nx-injected: 1".to_string());
        let value = csp_header(Some(&nonce));
        assert_eq!(value, FALLBACK_CSP);
        assert!(!FALLBACK_CSP.contains("nonce-"));
        assert!(!FALLBACK_CSP.contains(SCRIPT_CDN));
    }

    #[test]
    fn test_valid_nonce_is_used() {
        let nonce = CspNonce("abc123".to_string());
        let value = csp_header(Some(&nonce));
        assert!(value.to_str().is_ok_and(|csp| csp.contains("'nonce-abc123'")));
    }

    #[test]
    fn test_csp_without_nonce() {
        let csp = content_security_policy(None);
        assert!(csp.contains("script-src 'self' https://unpkg.com;"));
        assert!(!csp.contains("nonce-"));
    }
}
