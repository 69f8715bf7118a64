use axum::http::HeaderMap;
use axum_extra::headers::{self, HeaderMapExt};

pub fn authenticated_headers(api_key: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    if let Ok(bearer) = headers::Authorization::bearer(api_key) {
        map.typed_insert(bearer);
    } else {
        tracing::warn!("Gateway api key is not a valid bearer token, sending unauthenticated");
    }
    map.typed_insert(headers::ContentType::json());
    map
}
