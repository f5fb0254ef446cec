use crate::application::{
    dto::{AuthenticatedUser, SessionSubject, SessionTokenDto},
    error::{ApplicationError, ApplicationResult},
    ports::{security::SessionManager, time::Clock},
};
use crate::domain::user::{Role, UserId};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::{str::FromStr, sync::Arc, time::Duration};

type HmacSha256 = Hmac<Sha256>;

/// Stateless session tokens: a base64url JSON payload plus an HMAC-SHA256
/// signature over it, joined with a dot. Expiry lives inside the payload.
pub struct HmacSessionManager {
    mac: HmacSha256,
    ttl: ChronoDuration,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: i64,
    name: String,
    roles: Vec<String>,
    iat: i64,
    exp: i64,
}

impl HmacSessionManager {
    pub fn new(secret: &str, ttl: Duration, clock: Arc<dyn Clock>) -> ApplicationResult<Self> {
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let ttl = ChronoDuration::from_std(ttl)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(Self { mac, ttl, clock })
    }

    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

impl SessionManager for HmacSessionManager {
    fn issue(&self, subject: SessionSubject) -> ApplicationResult<SessionTokenDto> {
        let now = self.clock.now();
        let expires_at = now + self.ttl;

        let mut roles: Vec<String> = subject
            .roles
            .iter()
            .map(|role| role.as_str().to_string())
            .collect();
        roles.sort_unstable();

        let claims = SessionClaims {
            sub: subject.user_id.into(),
            name: subject.username,
            roles,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let json = serde_json::to_vec(&claims)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = URL_SAFE_NO_PAD.encode(self.sign(payload.as_bytes()));

        Ok(SessionTokenDto {
            token: format!("{payload}.{signature}"),
            expires_at,
        })
    }

    fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| ApplicationError::unauthorized("malformed session token"))?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| ApplicationError::unauthorized("malformed session token"))?;

        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| ApplicationError::unauthorized("session signature mismatch"))?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| ApplicationError::unauthorized("malformed session token"))?;
        let claims: SessionClaims = serde_json::from_slice(&json)
            .map_err(|_| ApplicationError::unauthorized("malformed session token"))?;

        if claims.exp <= self.clock.now().timestamp() {
            return Err(ApplicationError::unauthorized("session expired"));
        }

        let roles = claims
            .roles
            .iter()
            .map(|role| Role::from_str(role))
            .collect::<Result<_, _>>()
            .map_err(|_| ApplicationError::unauthorized("session carries unknown role"))?;

        let issued_at = DateTime::<Utc>::from_timestamp(claims.iat, 0)
            .ok_or_else(|| ApplicationError::unauthorized("invalid session timestamps"))?;
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .ok_or_else(|| ApplicationError::unauthorized("invalid session timestamps"))?;

        Ok(AuthenticatedUser {
            id: UserId::new(claims.sub)
                .map_err(|_| ApplicationError::unauthorized("invalid session subject"))?,
            username: claims.name,
            roles,
            issued_at,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Mutex::new(Utc::now()),
            }
        }

        fn advance(&self, by: ChronoDuration) {
            *self.now.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn subject() -> SessionSubject {
        SessionSubject {
            user_id: UserId::new(7).unwrap(),
            username: "admin".into(),
            roles: HashSet::from([Role::Admin, Role::SuperAdmin]),
        }
    }

    fn manager(clock: Arc<ManualClock>) -> HmacSessionManager {
        HmacSessionManager::new(SECRET, Duration::from_secs(3600), clock).unwrap()
    }

    #[test]
    fn issue_then_authenticate_roundtrips() {
        let clock = Arc::new(ManualClock::new());
        let manager = manager(clock);

        let session = manager.issue(subject()).unwrap();
        let user = manager.authenticate(&session.token).unwrap();

        assert_eq!(i64::from(user.id), 7);
        assert_eq!(user.username, "admin");
        assert_eq!(user.roles, HashSet::from([Role::Admin, Role::SuperAdmin]));
        assert_eq!(user.expires_at.timestamp(), session.expires_at.timestamp());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let clock = Arc::new(ManualClock::new());
        let manager = manager(clock);

        let session = manager.issue(subject()).unwrap();
        let tampered = format!("A{}", &session.token[1..]);
        assert!(manager.authenticate(&tampered).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let clock = Arc::new(ManualClock::new());
        let manager_a = manager(Arc::clone(&clock));
        let manager_b =
            HmacSessionManager::new("another-secret-another-secret!!!", Duration::from_secs(3600), clock)
                .unwrap();

        let session = manager_a.issue(subject()).unwrap();
        assert!(manager_b.authenticate(&session.token).is_err());
    }

    #[test]
    fn expired_session_is_rejected() {
        let clock = Arc::new(ManualClock::new());
        let manager = manager(Arc::clone(&clock));

        let session = manager.issue(subject()).unwrap();
        clock.advance(ChronoDuration::hours(2));
        assert!(manager.authenticate(&session.token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let clock = Arc::new(ManualClock::new());
        let manager = manager(clock);
        assert!(manager.authenticate("not-a-token").is_err());
        assert!(manager.authenticate("a.b").is_err());
    }
}
