use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::security::CsrfProtection,
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Anti-forgery tokens derived from the server secret and an intent string.
/// Verification is constant-time via the mac itself.
pub struct HmacCsrfTokens {
    mac: HmacSha256,
}

impl HmacCsrfTokens {
    pub fn new(secret: &str) -> ApplicationResult<Self> {
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(Self { mac })
    }
}

impl CsrfProtection for HmacCsrfTokens {
    fn issue(&self, intent: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(intent.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }

    fn verify(&self, intent: &str, token: &str) -> bool {
        let Ok(signature) = URL_SAFE_NO_PAD.decode(token) else {
            return false;
        };
        let mut mac = self.mac.clone();
        mac.update(intent.as_bytes());
        mac.verify_slice(&signature).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> HmacCsrfTokens {
        HmacCsrfTokens::new("0123456789abcdef0123456789abcdef").unwrap()
    }

    #[test]
    fn issued_token_verifies_for_its_intent() {
        let tokens = tokens();
        let token = tokens.issue("delete-article-7:2");
        assert!(tokens.verify("delete-article-7:2", &token));
    }

    #[test]
    fn token_fails_for_a_different_intent() {
        let tokens = tokens();
        let token = tokens.issue("delete-article-7:2");
        assert!(!tokens.verify("delete-article-8:2", &token));
        assert!(!tokens.verify("delete-article-7:3", &token));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let tokens = tokens();
        assert!(!tokens.verify("delete-article-7:2", "@@not-base64@@"));
        assert!(!tokens.verify("delete-article-7:2", ""));
    }
}
