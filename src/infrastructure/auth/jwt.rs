//! JWT token issuance and verification with JWKS support

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::{BigUint, RsaPrivateKey};
use serde::Deserialize;
use std::fmt::Debug;
use std::time::Duration;

use crate::domain::{DomainError, IssuedToken, TokenClaims, TokenIssuer, TokenVerifier};

const INVALID_TOKEN: &str = "Invalid or expired token";

/// Configuration for the shared-secret JWT service
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .finish()
    }
}

fn sign(
    header: &Header,
    subject: &str,
    duration: Duration,
    key: &EncodingKey,
) -> Result<IssuedToken, DomainError> {
    let claims = TokenClaims::new(subject, duration)?;

    let token = encode(header, &claims, key)
        .map_err(|e| DomainError::internal(format!("Failed to sign token: {}", e)))?;

    Ok(IssuedToken { token, claims })
}

fn check(token: &str, key: &DecodingKey, algorithm: Algorithm) -> Result<TokenClaims, DomainError> {
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<TokenClaims>(token, key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        DomainError::unauthorized(INVALID_TOKEN)
    })?;

    // jsonwebtoken still accepts exp == now
    if token_data.claims.is_expired() {
        return Err(DomainError::unauthorized(INVALID_TOKEN));
    }

    Ok(token_data.claims)
}

/// HS256 token service using a shared secret
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("algorithm", &Algorithm::HS256)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
        }
    }
}

impl TokenIssuer for JwtService {
    fn issue(&self, subject: &str, duration: Duration) -> Result<IssuedToken, DomainError> {
        sign(&Header::new(Algorithm::HS256), subject, duration, &self.encoding_key)
    }
}

impl TokenVerifier for JwtService {
    fn verify(&self, token: &str) -> Result<TokenClaims, DomainError> {
        check(token, &self.decoding_key, Algorithm::HS256)
    }
}

/// JWK key structure for manual parsing (includes private key components)
#[derive(Debug, Clone, Deserialize)]
struct JwkKey {
    /// Key type (RSA, oct)
    kty: String,
    kid: Option<String>,
    alg: Option<String>,
    /// RSA modulus (base64url)
    n: Option<String>,
    /// RSA public exponent (base64url)
    e: Option<String>,
    /// RSA private exponent (base64url)
    d: Option<String>,
    /// RSA prime factors (base64url)
    p: Option<String>,
    q: Option<String>,
    /// Symmetric key value (base64url) for oct keys
    k: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwks {
    keys: Vec<JwkKey>,
}

/// JWKS-based token service supporting RSA and symmetric keys
#[derive(Clone)]
pub struct JwksJwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    key_id: String,
}

impl Debug for JwksJwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksJwtService")
            .field("algorithm", &self.algorithm)
            .field("key_id", &self.key_id)
            .finish()
    }
}

impl JwksJwtService {
    /// Build the service from a JWKS JSON document.
    ///
    /// The first key with a `kid` signs; without one the first key is used.
    pub fn from_jwks_json(jwks_json: &str) -> Result<Self, DomainError> {
        let jwks: Jwks = serde_json::from_str(jwks_json)
            .map_err(|e| DomainError::configuration(format!("Failed to parse JWKS: {}", e)))?;

        let key = jwks
            .keys
            .iter()
            .find(|k| k.kid.is_some())
            .or_else(|| jwks.keys.first())
            .ok_or_else(|| DomainError::configuration("JWKS contains no keys"))?;

        let key_id = key.kid.clone().unwrap_or_else(|| "default".to_string());

        match key.kty.as_str() {
            "RSA" => Self::from_rsa_jwk(key, key_id),
            "oct" => Self::from_symmetric_jwk(key, key_id),
            other => Err(DomainError::configuration(format!(
                "Unsupported key type: {}. Use RSA or oct.",
                other
            ))),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn from_rsa_jwk(key: &JwkKey, key_id: String) -> Result<Self, DomainError> {
        let algorithm = match key.alg.as_deref() {
            Some("RS256") | None => Algorithm::RS256,
            Some("RS384") => Algorithm::RS384,
            Some("RS512") => Algorithm::RS512,
            Some(alg) => {
                return Err(DomainError::configuration(format!(
                    "Unsupported RSA algorithm: {}",
                    alg
                )))
            }
        };

        let n = required(&key.n, "n")?;
        let e = required(&key.e, "e")?;
        let d = required(&key.d, "d")?;

        let private_key = build_rsa_private_key(n, e, d, key.p.as_deref(), key.q.as_deref())?;

        let private_pem = private_key
            .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
            .map_err(|e| DomainError::configuration(format!("Failed to encode RSA private key: {}", e)))?;
        let public_pem = private_key
            .to_public_key()
            .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
            .map_err(|e| DomainError::configuration(format!("Failed to encode RSA public key: {}", e)))?;

        let encoding_key = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .map_err(|e| DomainError::configuration(format!("Failed to create encoding key: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map_err(|e| DomainError::configuration(format!("Failed to create decoding key: {}", e)))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            algorithm,
            key_id,
        })
    }

    fn from_symmetric_jwk(key: &JwkKey, key_id: String) -> Result<Self, DomainError> {
        let k = required(&key.k, "k")?;

        let algorithm = match key.alg.as_deref() {
            Some("HS256") | None => Algorithm::HS256,
            Some("HS384") => Algorithm::HS384,
            Some("HS512") => Algorithm::HS512,
            Some(alg) => {
                return Err(DomainError::configuration(format!(
                    "Unsupported symmetric algorithm: {}",
                    alg
                )))
            }
        };

        let secret_bytes = decode_base64url(k, "k")?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&secret_bytes),
            decoding_key: DecodingKey::from_secret(&secret_bytes),
            algorithm,
            key_id,
        })
    }
}

impl TokenIssuer for JwksJwtService {
    fn issue(&self, subject: &str, duration: Duration) -> Result<IssuedToken, DomainError> {
        let mut header = Header::new(self.algorithm);
        header.kid = Some(self.key_id.clone());

        sign(&header, subject, duration, &self.encoding_key)
    }
}

impl TokenVerifier for JwksJwtService {
    fn verify(&self, token: &str) -> Result<TokenClaims, DomainError> {
        check(token, &self.decoding_key, self.algorithm)
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, DomainError> {
    value
        .as_deref()
        .ok_or_else(|| DomainError::configuration(format!("JWK missing '{}'", field)))
}

fn build_rsa_private_key(
    n: &str,
    e: &str,
    d: &str,
    p: Option<&str>,
    q: Option<&str>,
) -> Result<RsaPrivateKey, DomainError> {
    let n = BigUint::from_bytes_be(&decode_base64url(n, "n")?);
    let e = BigUint::from_bytes_be(&decode_base64url(e, "e")?);
    let d = BigUint::from_bytes_be(&decode_base64url(d, "d")?);

    let primes = match (p, q) {
        (Some(p), Some(q)) => vec![
            BigUint::from_bytes_be(&decode_base64url(p, "p")?),
            BigUint::from_bytes_be(&decode_base64url(q, "q")?),
        ],
        // the rsa crate recovers the primes from n, e and d
        _ => Vec::new(),
    };

    RsaPrivateKey::from_components(n, e, d, primes)
        .map_err(|e| DomainError::configuration(format!("Invalid RSA key components: {}", e)))
}

fn decode_base64url(s: &str, field: &str) -> Result<Vec<u8>, DomainError> {
    URL_SAFE_NO_PAD
        .decode(s)
        .map_err(|e| DomainError::configuration(format!("Invalid base64url in '{}': {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Outcome;

    const SECRET: &str = "test-secret-key-that-is-32-bytes!!";

    fn create_service() -> JwtService {
        JwtService::new(JwtConfig::new(SECRET))
    }

    fn fifteen_minutes() -> Duration {
        Duration::from_secs(900)
    }

    #[test]
    fn test_issue_and_verify() {
        let service = create_service();

        let issued = service.issue("a@x.com", fifteen_minutes()).unwrap();
        assert!(!issued.token.is_empty());

        let claims = service.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims, issued.claims);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_subject_is_kept_verbatim() {
        let service = create_service();

        let issued = service.issue("Mixed.Case@X.com", fifteen_minutes()).unwrap();
        let claims = service.verify(&issued.token).unwrap();

        assert_eq!(claims.subject(), "Mixed.Case@X.com");
    }

    #[test]
    fn test_zero_duration_is_internal() {
        let service = create_service();

        let err = service.issue("a@x.com", Duration::ZERO).unwrap_err();
        assert_eq!(err.outcome(), Outcome::InternalError);
    }

    #[test]
    fn test_invalid_token() {
        let service = create_service();

        let err = service.verify("invalid-token").unwrap_err();
        assert_eq!(err.outcome(), Outcome::Unauthorized);
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = JwtService::new(JwtConfig::new("secret-1-secret-1-secret-1-secret-1"));
        let service2 = JwtService::new(JwtConfig::new("secret-2-secret-2-secret-2-secret-2"));

        let issued = service1.issue("a@x.com", fifteen_minutes()).unwrap();

        let result = service2.verify(&issued.token);
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token() {
        let service = create_service();

        let past_time = chrono::Utc::now() - chrono::Duration::hours(1);
        let claims = TokenClaims {
            sub: "a@x.com".to_string(),
            jti: "expired".to_string(),
            iat: (past_time - chrono::Duration::hours(2)).timestamp(),
            exp: past_time.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = service.verify(&token).unwrap_err();
        assert_eq!(err.outcome(), Outcome::Unauthorized);
    }

    #[test]
    fn test_tampered_token() {
        let service = create_service();
        let issued = service.issue("a@x.com", fifteen_minutes()).unwrap();

        let forged_payload = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&TokenClaims {
                sub: "admin@x.com".to_string(),
                ..issued.claims.clone()
            })
            .unwrap(),
        );
        let mut parts: Vec<&str> = issued.token.split('.').collect();
        parts[1] = &forged_payload;

        assert!(service.verify(&parts.join(".")).is_err());
    }

    #[test]
    fn test_debug_hides_keys() {
        let debug = format!("{:?} {:?}", create_service(), JwtConfig::new(SECRET));
        assert!(!debug.contains(SECRET));
    }

    #[test]
    fn test_jwks_invalid_json() {
        let err = JwksJwtService::from_jwks_json("not valid json").unwrap_err();
        assert_eq!(err.outcome(), Outcome::InternalError);
    }

    #[test]
    fn test_jwks_empty_keys() {
        let result = JwksJwtService::from_jwks_json(r#"{"keys": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_jwks_unsupported_key_type() {
        let result = JwksJwtService::from_jwks_json(r#"{"keys": [{"kty": "EC", "kid": "ec"}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_jwks_hs256() {
        let secret = "super-secret-key-for-testing-purposes-12345678";
        let k_value = URL_SAFE_NO_PAD.encode(secret);

        let jwks_json = format!(
            r#"{{
            "keys": [
                {{
                    "kty": "oct",
                    "kid": "test-key-1",
                    "alg": "HS256",
                    "k": "{}"
                }}
            ]
        }}"#,
            k_value
        );

        let service = JwksJwtService::from_jwks_json(&jwks_json).unwrap();
        assert_eq!(service.algorithm(), Algorithm::HS256);

        let issued = service.issue("a@x.com", fifteen_minutes()).unwrap();
        let header = jsonwebtoken::decode_header(&issued.token).unwrap();
        assert_eq!(header.kid, Some("test-key-1".to_string()));

        let claims = service.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "a@x.com");
    }

    #[test]
    fn test_jwks_rs256() {
        use rand::rngs::OsRng;
        use rsa::traits::{PrivateKeyParts, PublicKeyParts};

        let mut rng = OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, 2048).unwrap();

        let n = URL_SAFE_NO_PAD.encode(private_key.n().to_bytes_be());
        let e = URL_SAFE_NO_PAD.encode(private_key.e().to_bytes_be());
        let d = URL_SAFE_NO_PAD.encode(private_key.d().to_bytes_be());

        let primes = private_key.primes();
        let p = URL_SAFE_NO_PAD.encode(primes[0].to_bytes_be());
        let q = URL_SAFE_NO_PAD.encode(primes[1].to_bytes_be());

        let jwks_json = format!(
            r#"{{
            "keys": [
                {{
                    "kty": "RSA",
                    "kid": "test-rsa-key",
                    "alg": "RS256",
                    "n": "{}",
                    "e": "{}",
                    "d": "{}",
                    "p": "{}",
                    "q": "{}"
                }}
            ]
        }}"#,
            n, e, d, p, q
        );

        let service = JwksJwtService::from_jwks_json(&jwks_json).unwrap();

        let issued = service.issue("a@x.com", fifteen_minutes()).unwrap();

        let header = jsonwebtoken::decode_header(&issued.token).unwrap();
        assert_eq!(header.kid, Some("test-rsa-key".to_string()));
        assert_eq!(header.alg, Algorithm::RS256);

        let claims = service.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "a@x.com");

        // a token signed with the shared-secret service is not accepted
        let foreign = create_service().issue("a@x.com", fifteen_minutes()).unwrap();
        assert!(service.verify(&foreign.token).is_err());
    }
}
