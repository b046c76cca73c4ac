use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

/// A response body after the "never fail on malformed JSON" parse.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return ResponseBody::Empty;
        }
        match serde_json::from_str(text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text.to_string()),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            ResponseBody::Empty => Value::Null,
            ResponseBody::Json(value) => value,
            ResponseBody::Text(text) => Value::String(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Gateway-proxy envelope or plain payload, told apart by the `body` key.
enum ProxyResponse {
    Envelope { body: Value, is_base64: bool },
    Payload(ResponseBody),
}

impl ProxyResponse {
    fn classify(response: ResponseBody) -> Self {
        match response {
            ResponseBody::Json(Value::Object(mut map)) if map.contains_key("body") => {
                let is_base64 = map
                    .get("isBase64Encoded")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let body = map.remove("body").unwrap_or(Value::Null);
                ProxyResponse::Envelope { body, is_base64 }
            }
            other => ProxyResponse::Payload(other),
        }
    }
}

/// Unwraps one level of gateway-proxy envelope. Never recurses into the inner payload.
pub fn unwrap_gateway_proxy(response: ResponseBody) -> ResponseBody {
    match ProxyResponse::classify(response) {
        ProxyResponse::Payload(payload) => payload,
        ProxyResponse::Envelope {
            body: Value::String(body),
            is_base64: true,
        } => decode_base64_body(body),
        ProxyResponse::Envelope {
            body: Value::String(body),
            is_base64: false,
        } => match serde_json::from_str(&body) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(body),
        },
        ProxyResponse::Envelope { body, .. } => ResponseBody::Json(body),
    }
}

fn decode_base64_body(body: String) -> ResponseBody {
    let decoded = match STANDARD.decode(body.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::debug!("Envelope body flagged base64 but failed to decode: {}", e);
            return ResponseBody::Text(body);
        }
    };
    let decoded = String::from_utf8_lossy(&decoded).into_owned();
    match serde_json::from_str(&decoded) {
        Ok(value) => ResponseBody::Json(value),
        Err(_) => ResponseBody::Text(decoded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> ResponseBody {
        ResponseBody::Json(value)
    }

    #[test]
    fn parse_keeps_malformed_json_as_text() {
        assert_eq!(ResponseBody::parse(""), ResponseBody::Empty);
        assert_eq!(
            ResponseBody::parse("{\"items\": [}"),
            ResponseBody::Text("{\"items\": [}".into())
        );
        assert_eq!(ResponseBody::parse("[1]"), ResponseBody::Json(json!([1])));
    }

    #[test]
    fn plain_json_envelope_is_parsed() {
        let inner = json!({"items": [{"plant_disease_id": 3}], "total": 1});
        let wrapped = envelope(json!({
            "statusCode": 200,
            "body": inner.to_string(),
            "isBase64Encoded": false
        }));
        assert_eq!(unwrap_gateway_proxy(wrapped), ResponseBody::Json(inner));
    }

    #[test]
    fn base64_envelope_is_decoded_then_parsed() {
        let inner = json!({"recommended_plant_ids": [1, 2, 3]});
        let encoded = STANDARD.encode(inner.to_string());
        let wrapped = envelope(json!({"body": encoded, "isBase64Encoded": true}));
        assert_eq!(unwrap_gateway_proxy(wrapped), ResponseBody::Json(inner));
    }

    #[test]
    fn base64_non_json_returns_decoded_text() {
        let encoded = STANDARD.encode("plain text");
        let wrapped = envelope(json!({"body": encoded, "isBase64Encoded": true}));
        assert_eq!(
            unwrap_gateway_proxy(wrapped),
            ResponseBody::Text("plain text".into())
        );
    }

    #[test]
    fn invalid_base64_body_is_kept_as_raw_text() {
        let wrapped = envelope(json!({"body": "not base64 at all!", "isBase64Encoded": true}));
        assert_eq!(
            unwrap_gateway_proxy(wrapped),
            ResponseBody::Text("not base64 at all!".into())
        );
    }

    #[test]
    fn object_body_is_returned_directly() {
        let wrapped = envelope(json!({"body": {"ok": true}}));
        assert_eq!(unwrap_gateway_proxy(wrapped), ResponseBody::Json(json!({"ok": true})));
    }

    #[test]
    fn unwrap_happens_only_once() {
        let nested = json!({"body": "{\"deep\": 1}"});
        let wrapped = envelope(json!({"body": nested.to_string()}));
        assert_eq!(unwrap_gateway_proxy(wrapped), ResponseBody::Json(nested));
    }

    #[test]
    fn payload_without_body_is_untouched() {
        let payload = envelope(json!({"items": [], "total": 0}));
        assert_eq!(unwrap_gateway_proxy(payload.clone()), payload);
        assert_eq!(
            unwrap_gateway_proxy(ResponseBody::Text("ok".into())),
            ResponseBody::Text("ok".into())
        );
    }
}
