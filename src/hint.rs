use serde::Serialize;

/// Navigation hint attached to responses, pointing the client at the next
/// sensible call.
#[derive(Debug, Serialize)]
pub struct RequestHint {
    #[serde(rename = "type")]
    pub method: &'static str,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl RequestHint {
    pub fn get(url: String) -> Self {
        Self {
            method: "GET",
            url,
            body: None,
        }
    }

    pub fn post(url: String, body: serde_json::Value) -> Self {
        Self {
            method: "POST",
            url,
            body: Some(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_hint_omits_body() {
        let hint = RequestHint::get("http://shop.local/products/1".into());
        let value = serde_json::to_value(&hint).unwrap();
        assert_eq!(value["type"], "GET");
        assert_eq!(value["url"], "http://shop.local/products/1");
        assert!(value.get("body").is_none());
    }

    #[test]
    fn post_hint_describes_the_body_shape() {
        let hint = RequestHint::post(
            "http://shop.local/orders/".into(),
            json!({ "productId": "String", "quantity": "Number" }),
        );
        let value = serde_json::to_value(&hint).unwrap();
        assert_eq!(value["type"], "POST");
        assert_eq!(value["body"]["productId"], "String");
    }
}
