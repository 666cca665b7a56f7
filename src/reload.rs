//! Dynamic Content Reload - Identifier watching and the transport contract
//!
//! When the root's content identifier (`data-slug`) changes, the engine
//! asks the host to fetch a freshly rendered fragment for the new listing
//! and, on success, replaces the root's markup and re-initializes the
//! whole state machine. The transport itself is a collaborator: this
//! module only defines the request/response contract and the bookkeeping.
//!
//! Overlapping changes coalesce to the newest identifier: while a request
//! is in flight, later identifiers overwrite `pending_slug`, and whichever
//! one is current when the in-flight request resolves is fetched next.
//! In-flight requests are never cancelled.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::Instance;
use crate::host::Host;

/// Operation name sent with every reload request.
pub const RELOAD_ACTION: &str = "load_carousel";

// =============================================================================
// CONTRACT TYPES
// =============================================================================

/// Reload request body. Hosts encode this however their endpoint expects
/// (form fields or JSON); the field names are the wire names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReloadRequest {
    /// Fixed operation name ([`RELOAD_ACTION`]).
    pub action: &'static str,
    /// The content identifier to render.
    pub slug: String,
    /// Monotonic cache-busting token.
    pub cache_buster: u64,
    /// Opaque anti-forgery token supplied by the host page.
    pub nonce: String,
}

#[derive(Debug, Deserialize)]
struct ReloadResponse {
    success: bool,
    #[serde(default)]
    data: Option<ReloadData>,
}

#[derive(Debug, Deserialize)]
struct ReloadData {
    html: String,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Failure reported by the host's transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {0}")]
    Status(u16),
}

/// Any way a reload can fail. All variants are recoverable: the previous
/// content and bindings stay in place.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("malformed reload payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("server rejected the reload")]
    Rejected,
    #[error("reload response carried no fragment")]
    MissingFragment,
}

// =============================================================================
// FLOW
// =============================================================================

/// Parse a raw response body into the replacement fragment.
pub fn parse_response(body: &str) -> Result<String, ReloadError> {
    let response: ReloadResponse = serde_json::from_str(body)?;
    if !response.success {
        return Err(ReloadError::Rejected);
    }
    response
        .data
        .map(|data| data.html)
        .ok_or(ReloadError::MissingFragment)
}

/// Fire a reload for `slug`. The identifier is recorded as loaded up
/// front, so a failed reload is not retried until the attribute changes
/// again.
pub fn begin<H: Host>(instance: &mut Instance, host: &mut H, slug: String, cache_buster: u64) {
    log::debug!("carousel {:?} reloading slug {slug:?}", instance.root);

    let request = ReloadRequest {
        action: RELOAD_ACTION,
        slug: slug.clone(),
        cache_buster,
        nonce: host.nonce(),
    };

    instance.loaded_slug = Some(slug);
    instance.reload_in_flight = true;
    host.begin_reload(instance.root, &request);
}
