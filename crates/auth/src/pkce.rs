//! PKCE (Proof Key for Code Exchange) primitives for OAuth 2.0
//!
//! Implements RFC 7636 for secure authorization without a client secret.
//! Used for native applications where a client secret cannot be safely
//! embedded.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Generate a cryptographically secure code verifier
///
/// Returns a URL-safe base64-encoded random string of 32 bytes (43 characters).
/// Per RFC 7636, verifiers must be 43-128 characters long.
///
/// # Errors
/// Returns error if random number generation fails (extremely rare)
pub fn generate_code_verifier() -> Result<String, String> {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    Ok(URL_SAFE_NO_PAD.encode(random_bytes))
}

/// Compute the code challenge for a verifier using SHA256
///
/// Per RFC 7636, the challenge is BASE64URL(SHA256(ASCII(code_verifier)))
///
/// # Arguments
/// * `verifier` - The code verifier string
///
/// # Errors
/// Returns error if encoding fails
pub fn compute_code_challenge(verifier: &str) -> Result<String, String> {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    let hash = hasher.finalize();
    Ok(URL_SAFE_NO_PAD.encode(hash))
}

/// Generate a random state token for CSRF protection
///
/// Returns a URL-safe base64-encoded random string of 32 bytes (43 characters,
/// 256 bits of entropy).
///
/// # Errors
/// Returns error if random number generation fails (extremely rare)
pub fn generate_state() -> Result<String, String> {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    Ok(URL_SAFE_NO_PAD.encode(random_bytes))
}

/// Validate that the state token matches
///
/// # Arguments
/// * `expected` - The state that was sent in the authorization request
/// * `actual` - The state received in the callback
///
/// # Returns
/// `true` if states match, `false` otherwise
#[must_use]
pub fn validate_state(expected: &str, actual: &str) -> bool {
    expected == actual
}

/// PKCE verifier/challenge pair for one authorization session
///
/// The verifier is generated once per session and kept secret until token
/// exchange; the challenge is its SHA256 digest, sent in the authorization
/// request so the provider can bind the issued code to this client.
#[derive(Debug, Clone)]
pub struct PkcePair {
    /// Random string (43-128 chars, base64url encoded)
    /// Kept secret until token exchange
    pub verifier: String,

    /// SHA256 hash of the verifier (base64url encoded)
    /// Sent in the authorization request for server validation
    pub challenge: String,
}

impl PkcePair {
    /// Generate a new PKCE pair with a cryptographically secure random verifier
    ///
    /// # Returns
    /// A new `PkcePair` with:
    /// - `verifier`: 32 random bytes → 43 chars base64url (within RFC 7636
    ///   43-128 limit)
    /// - `challenge`: SHA256(verifier) → base64url
    ///
    /// # Examples
    /// ```
    /// use okta_auth::pkce::PkcePair;
    ///
    /// let pair = PkcePair::generate().expect("Failed to generate PKCE pair");
    /// assert!(pair.verifier.len() >= 43);
    /// assert!(pair.verifier.len() <= 128);
    /// ```
    ///
    /// # Errors
    /// Returns error if cryptographic random number generation fails (extremely
    /// rare)
    pub fn generate() -> Result<Self, String> {
        let verifier = generate_code_verifier()?;
        let challenge = compute_code_challenge(&verifier)?;

        Ok(Self { verifier, challenge })
    }

    /// Get the challenge method (always "S256" for SHA256)
    #[must_use]
    pub fn challenge_method(&self) -> &str {
        "S256"
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for pkce.
    use super::*;

    /// Validates `PkcePair::generate` behavior for the generate pkce pair
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures `pair.verifier.len() >= 43` evaluates to true.
    /// - Ensures `pair.verifier.len() <= 128` evaluates to true.
    /// - Ensures `!pair.challenge.is_empty()` evaluates to true.
    #[test]
    fn test_generate_pkce_pair() {
        let pair = PkcePair::generate().expect("Failed to generate pair");

        // Verify verifier length (RFC 7636: 43-128 chars)
        assert!(pair.verifier.len() >= 43, "verifier too short: {} chars", pair.verifier.len());
        assert!(pair.verifier.len() <= 128, "verifier too long: {} chars", pair.verifier.len());

        // Verify challenge is not empty
        assert!(!pair.challenge.is_empty());
    }

    /// Validates `generate_code_verifier` behavior for the verifier alphabet
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures every verifier character is in the URL-safe base64 alphabet.
    /// - Ensures `!verifier.contains('=')` evaluates to true.
    #[test]
    fn test_verifier_alphabet() {
        let verifier = generate_code_verifier().expect("Failed to generate verifier");

        assert!(verifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert!(!verifier.contains('='));
    }

    /// Validates `PkcePair::generate` behavior for the unique pairs scenario.
    ///
    /// Assertions:
    /// - Confirms `pair1.verifier` differs from `pair2.verifier`.
    /// - Confirms `pair1.challenge` differs from `pair2.challenge`.
    #[test]
    fn test_unique_pairs() {
        // Each generation should produce unique values
        let pair1 = PkcePair::generate().expect("Failed to generate pair 1");
        let pair2 = PkcePair::generate().expect("Failed to generate pair 2");

        assert_ne!(pair1.verifier, pair2.verifier);
        assert_ne!(pair1.challenge, pair2.challenge);
    }

    /// Validates `PkcePair::generate` behavior for the challenge method
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `pair.challenge_method()` equals `"S256"`.
    #[test]
    fn test_challenge_method() {
        let pair = PkcePair::generate().expect("Failed to generate pair");
        assert_eq!(pair.challenge_method(), "S256");
    }

    /// Validates `PkcePair::generate` behavior for the base64url encoding
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures `!pair.verifier.contains('=')` evaluates to true.
    /// - Ensures `!pair.challenge.contains('=')` evaluates to true.
    /// - Ensures `!pair.verifier.contains('+')` evaluates to true.
    /// - Ensures `!pair.verifier.contains('/')` evaluates to true.
    /// - Ensures `!pair.challenge.contains('+')` evaluates to true.
    /// - Ensures `!pair.challenge.contains('/')` evaluates to true.
    #[test]
    fn test_base64url_encoding() {
        let pair = PkcePair::generate().expect("Failed to generate pair");

        // Verify no padding characters (base64url should not have padding)
        assert!(!pair.verifier.contains('='));
        assert!(!pair.challenge.contains('='));

        // Verify URL-safe characters only (no + or /)
        assert!(!pair.verifier.contains('+'));
        assert!(!pair.verifier.contains('/'));
        assert!(!pair.challenge.contains('+'));
        assert!(!pair.challenge.contains('/'));
    }

    /// Validates `compute_code_challenge` behavior for the challenge
    /// deterministic scenario.
    ///
    /// Assertions:
    /// - Confirms `pair.challenge` equals `recomputed`.
    #[test]
    fn test_challenge_deterministic() {
        // Same verifier should produce same challenge
        let pair = PkcePair::generate().expect("Failed to generate pair");

        let recomputed =
            compute_code_challenge(&pair.verifier).expect("Failed to compute challenge");

        assert_eq!(pair.challenge, recomputed);
    }

    /// Validates `compute_code_challenge` behavior for the RFC 7636 appendix B
    /// vector scenario.
    ///
    /// Assertions:
    /// - Confirms `challenge` equals the published S256 challenge for the
    ///   published verifier.
    #[test]
    fn test_rfc7636_appendix_b_vector() {
        let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
        let challenge = compute_code_challenge(verifier).expect("Failed to compute challenge");

        assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    }

    /// Validates `generate_state` behavior for the unique states scenario.
    ///
    /// Assertions:
    /// - Confirms `state1` differs from `state2`.
    /// - Ensures `!state1.contains('=')` evaluates to true.
    #[test]
    fn test_unique_states() {
        let state1 = generate_state().expect("Failed to generate state 1");
        let state2 = generate_state().expect("Failed to generate state 2");

        assert_ne!(state1, state2);
        assert!(!state1.contains('='));
    }

    /// Validates `validate_state` behavior for the state comparison scenario.
    ///
    /// Assertions:
    /// - Ensures `validate_state("abc", "abc")` evaluates to true.
    /// - Ensures `!validate_state("abc", "abd")` evaluates to true.
    /// - Ensures `!validate_state("abc", "")` evaluates to true.
    #[test]
    fn test_validate_state() {
        assert!(validate_state("abc", "abc"));
        assert!(!validate_state("abc", "abd"));
        assert!(!validate_state("abc", ""));
    }
}
