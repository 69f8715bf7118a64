use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs transaction intents with the merchant private key.
///
/// Lives on the server only. The private key is never sent to a buyer.
#[derive(Clone)]
pub struct Signer {
    merchant_code: String,
    private_key: String,
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("merchant_code", &self.merchant_code)
            .field("private_key", &"***")
            .finish()
    }
}

impl Signer {
    pub fn new(merchant_code: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            merchant_code: merchant_code.into(),
            private_key: private_key.into(),
        }
    }

    fn mac(&self, merchant_ref: &str, amount: u64) -> HmacSha256 {
        // hmac accepts keys of any length
        let mut mac = HmacSha256::new_from_slice(self.private_key.as_bytes())
            .expect("hmac key of any size");
        mac.update(self.merchant_code.as_bytes());
        mac.update(merchant_ref.as_bytes());
        mac.update(amount.to_string().as_bytes());
        mac
    }

    /// Lowercase hex HMAC-SHA256 over `merchant_code + merchant_ref + amount`
    pub fn sign(&self, merchant_ref: &str, amount: u64) -> String {
        hex::encode(self.mac(merchant_ref, amount).finalize().into_bytes())
    }

    /// Constant time comparison against a supplied hex signature
    pub fn verify(&self, merchant_ref: &str, amount: u64, signature: &str) -> bool {
        let Ok(supplied) = hex::decode(signature.trim()) else {
            return false;
        };
        self.mac(merchant_ref, amount).verify_slice(&supplied).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::Signer;

    #[test]
    fn sign_then_verify() {
        let signer = Signer::new("T0001", "private-key");
        let signature = signer.sign("ARD-1700000000000-abc123xyz", 42500);
        assert_eq!(signature.len(), 64);
        assert!(signer.verify("ARD-1700000000000-abc123xyz", 42500, &signature));
    }

    #[test]
    fn any_field_change_breaks_signature() {
        let signer = Signer::new("T0001", "private-key");
        let signature = signer.sign("ARD-1-a", 1000);
        assert!(!signer.verify("ARD-1-b", 1000, &signature));
        assert!(!signer.verify("ARD-1-a", 1001, &signature));
        let other = Signer::new("T0001", "another-key");
        assert!(!other.verify("ARD-1-a", 1000, &signature));
    }

    #[test]
    fn garbage_signature_is_rejected() {
        let signer = Signer::new("T0001", "private-key");
        assert!(!signer.verify("ARD-1-a", 1000, "not-hex"));
        assert!(!signer.verify("ARD-1-a", 1000, ""));
    }

    #[test]
    fn debug_hides_private_key() {
        let signer = Signer::new("T0001", "private-key");
        assert!(!format!("{signer:?}").contains("private-key"));
    }
}
