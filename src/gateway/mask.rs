use serde::Serialize;

pub trait MaskPolicy {
    fn mask(value: &str) -> String;
}

/// Keeps the first character of the mailbox and the whole domain
pub struct EmailMask;

/// Keeps the last 4 digits
pub struct PhoneMask;

impl MaskPolicy for EmailMask {
    fn mask(value: &str) -> String {
        match value.split_once('@') {
            Some((local, domain)) => {
                let first: String = local.chars().take(1).collect();
                format!("{first}***@{domain}")
            }
            None => "***".to_string(),
        }
    }
}

impl MaskPolicy for PhoneMask {
    fn mask(value: &str) -> String {
        let chars: Vec<char> = value.chars().collect();
        let len = chars.len();
        if len > 4 {
            "*".repeat(len - 4) + &chars[len - 4..].iter().collect::<String>()
        } else {
            "*".repeat(len)
        }
    }
}

fn is_email_key(key: &str) -> bool {
    key.to_lowercase().contains("email")
}

fn is_phone_key(key: &str) -> bool {
    let k = key.to_lowercase();
    k.contains("phone") || k.contains("msisdn")
}

/// Return true if a key name likely holds a secret that must never be logged.
fn is_secret_key(key: &str) -> bool {
    let k = key.to_lowercase();
    k.contains("signature")
        || k.contains("private_key")
        || k.contains("api_key")
        || k == "authorization"
        || k.contains("secret")
}

pub fn secure_serializable(v: impl Serialize) -> serde_json::Value {
    match serde_json::to_value(v) {
        Ok(value) => secure_value(&value),
        Err(e) => serde_json::Value::String(format!("<unserializable: {e}>")),
    }
}

pub fn secure_value(v: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match v {
        Value::Object(map) => {
            let mut new = serde_json::Map::with_capacity(map.len());
            for (k, val) in map {
                let new_val = match val {
                    Value::Null => Value::Null,
                    _ if is_secret_key(k) => Value::String("***".to_string()),
                    Value::String(s) if is_email_key(k) => Value::String(EmailMask::mask(s)),
                    Value::String(s) if is_phone_key(k) => Value::String(PhoneMask::mask(s)),
                    Value::Number(n) if is_phone_key(k) => {
                        Value::String(PhoneMask::mask(&n.to_string()))
                    }
                    _ => secure_value(val),
                };
                new.insert(k.clone(), new_val);
            }
            Value::Object(new)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(secure_value).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn masks_buyer_fields_and_secrets() {
        let value = json!({
            "merchant_ref": "ARD-1-abc",
            "customer_email": "steve@example.com",
            "customer_phone": "08123456789",
            "signature": "deadbeef",
            "order_items": [{ "name": "Elite", "price": 40000 }]
        });
        let masked = secure_value(&value);
        assert_eq!(masked["merchant_ref"], "ARD-1-abc");
        assert_eq!(masked["customer_email"], "s***@example.com");
        assert_eq!(masked["customer_phone"], "*******6789");
        assert_eq!(masked["signature"], "***");
        assert_eq!(masked["order_items"][0]["price"], 40000);
    }

    #[test]
    fn short_phone_is_fully_hidden() {
        assert_eq!(PhoneMask::mask("123"), "***");
    }

    #[test]
    fn null_secret_stays_null() {
        let masked = secure_value(&json!({ "signature": null }));
        assert!(masked["signature"].is_null());
    }
}
