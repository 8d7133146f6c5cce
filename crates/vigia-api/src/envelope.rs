// Envelope normalization for upstream responses.
//
// Most endpoints wrap payloads as `{success, data}`, list endpoints add a
// `pagination` block, and some deployments return the bare payload with no
// wrapper at all. Everything funnels through `normalize` so the rest of
// the crate only ever sees one canonical inner shape.

use serde_json::Value;

use crate::Error;
use crate::types::Pagination;

/// Canonical payload extracted from a 2xx response body.
#[derive(Debug)]
pub(crate) struct Payload {
    pub data: Value,
    pub pagination: Option<Pagination>,
}

/// Reduce any accepted envelope shape to its inner payload.
///
/// - `{success: false, ...}` is a protocol-level failure even on 2xx;
///   the server-supplied `message` is surfaced when present.
/// - An object with a `data` key unwraps to the value under it, keeping
///   the `pagination` block when one is attached.
/// - Bare objects and arrays pass through unchanged.
pub(crate) fn normalize(body: Value) -> Result<Payload, Error> {
    let mut map = match body {
        Value::Object(map) => map,
        other => {
            return Ok(Payload {
                data: other,
                pagination: None,
            });
        }
    };

    if map.get("success").and_then(Value::as_bool) == Some(false) {
        let message = map
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("upstream reported failure without a message")
            .to_owned();
        return Err(Error::Api { message });
    }

    match map.remove("data") {
        Some(data) => {
            let pagination = map
                .remove("pagination")
                .and_then(|p| serde_json::from_value(p).ok());
            Ok(Payload { data, pagination })
        }
        None => Ok(Payload {
            data: Value::Object(map),
            pagination: None,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wrapped_object_unwraps_to_data() {
        let body = json!({"success": true, "data": {"total": 3}});
        let payload = normalize(body).unwrap();
        assert_eq!(payload.data, json!({"total": 3}));
        assert!(payload.pagination.is_none());
    }

    #[test]
    fn bare_object_passes_through() {
        let body = json!({"total": 3, "hoy": 1});
        let payload = normalize(body.clone()).unwrap();
        assert_eq!(payload.data, body);
    }

    #[test]
    fn bare_array_passes_through() {
        let body = json!([{"id": 1}, {"id": 2}]);
        let payload = normalize(body.clone()).unwrap();
        assert_eq!(payload.data, body);
    }

    #[test]
    fn wrapped_and_bare_produce_identical_output() {
        let inner = json!({"total": 7, "hoy": 2, "semana": 5});
        let wrapped = normalize(json!({"success": true, "data": inner.clone()})).unwrap();
        let bare = normalize(inner.clone()).unwrap();
        assert_eq!(wrapped.data, bare.data);
        assert_eq!(wrapped.data, inner);
    }

    #[test]
    fn success_false_is_an_api_error() {
        let body = json!({"success": false, "message": "Error al obtener movimientos"});
        match normalize(body) {
            Err(Error::Api { message }) => assert_eq!(message, "Error al obtener movimientos"),
            other => panic!("expected Api error, got: {other:?}"),
        }
    }

    #[test]
    fn success_false_without_message_gets_fallback() {
        match normalize(json!({"success": false})) {
            Err(Error::Api { message }) => assert!(message.contains("without a message")),
            other => panic!("expected Api error, got: {other:?}"),
        }
    }

    #[test]
    fn pagination_block_is_extracted() {
        let body = json!({
            "success": true,
            "data": [{"id": 1}],
            "pagination": {"total": 42, "page": 1, "limit": 10, "total_pages": 5}
        });
        let payload = normalize(body).unwrap();
        let pagination = payload.pagination.unwrap();
        assert_eq!(pagination.total, 42);
        assert_eq!(pagination.total_pages, 5);
    }

    #[test]
    fn success_true_without_data_keeps_the_object() {
        // POST acknowledgements look like {success, message, id} with no data key.
        let body = json!({"success": true, "message": "registrado", "id": 9});
        let payload = normalize(body).unwrap();
        assert_eq!(payload.data.get("id"), Some(&json!(9)));
    }
}
