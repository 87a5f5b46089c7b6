//! Golden test vectors for deterministic verification.
//!
//! Secrets and codes here were computed independently with a stock MD5
//! implementation. Any port of the code scheme must reproduce them exactly.

use uniqcode_core::{BatchSecret, OrderCode, UniqueCode};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Canonical request timestamp text.
    pub timestamp: &'static str,
    /// Transaction id of the issuing transaction.
    pub tx_id: &'static str,
    /// Expected batch secret (hex).
    pub secret: &'static str,
    /// Expected `(ordinal, code)` pairs under that secret.
    pub codes: &'static [(u64, &'static str)],
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "first batch secret",
            timestamp: "1576458896541",
            tx_id: "tx1",
            secret: "f59226a876da3b57886d982153861805",
            codes: &[
                (1, "0000000001532478"),
                (2, "00000000022fe1ca"),
                (10_000, "0000010000932e27"),
            ],
        },
        GoldenVector {
            name: "second batch secret",
            timestamp: "1576458896541",
            tx_id: "tx2",
            secret: "68d21da73eea73543bfc5335112ae1b9",
            codes: &[(10_001, "000001000133f6b4"), (20_000, "0000020000be43bd")],
        },
    ]
}

/// Digest vectors for the raw hash: `(input, hex)`.
pub const DIGEST_VECTORS: &[(&str, &str)] = &[
    ("", "d41d8cd98f00b204e9800998ecf8427e"),
    ("abc", "900150983cd24fb0d6963f7d28e17f72"),
];

/// Recompute every vector and report the first mismatch.
pub fn verify_all_vectors() -> Result<(), String> {
    for (input, expected) in DIGEST_VECTORS {
        let got = uniqcode_core::digest(input.as_bytes());
        if got != *expected {
            return Err(format!("digest({input:?}): expected {expected}, got {got}"));
        }
    }

    for vector in all_vectors() {
        let secret = BatchSecret::derive(vector.timestamp, vector.tx_id);
        if secret.as_str() != vector.secret {
            return Err(format!(
                "{}: expected secret {}, got {}",
                vector.name,
                vector.secret,
                secret.as_str()
            ));
        }

        for (ordinal, expected) in vector.codes {
            let order = OrderCode::new(*ordinal).map_err(|e| e.to_string())?;
            let code = UniqueCode::issue(&order, &secret);
            if code.as_str() != *expected {
                return Err(format!(
                    "{} ordinal {}: expected {}, got {}",
                    vector.name,
                    ordinal,
                    expected,
                    code.as_str()
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectors_match() {
        assert_eq!(verify_all_vectors(), Ok(()));
    }

    #[test]
    fn test_vector_codes_verify_under_their_secret() {
        for vector in all_vectors() {
            let secret = BatchSecret::derive(vector.timestamp, vector.tx_id);
            for (_, text) in vector.codes {
                let code = UniqueCode::parse(text).unwrap();
                assert!(code.is_authentic(&secret), "{}: {}", vector.name, text);
            }
        }
    }

    #[test]
    fn test_vector_codes_fail_under_other_secret() {
        let vectors = all_vectors();
        let other = BatchSecret::derive(vectors[1].timestamp, vectors[1].tx_id);
        for (_, text) in vectors[0].codes {
            let code = UniqueCode::parse(text).unwrap();
            assert!(!code.is_authentic(&other));
        }
    }
}
