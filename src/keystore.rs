//! # Keystore — Shared PKCS#12 MAC Oracle
//!
//! Owns the parsed PKCS#12 (RFC 7292) structure and answers the only
//! question the search engines ever ask: does this candidate passphrase
//! verify the keystore's integrity MAC?
//!
//! The file is read and parsed exactly once, before any worker thread
//! exists; the resulting [`Keystore`] is immutable and shared read-only for
//! the lifetime of the search. `openssl`'s `Pkcs12` is `Send + Sync`, so
//! verification runs lock-free from every worker. Each `verify` call pays a
//! password-based key derivation plus an HMAC — milliseconds per candidate —
//! which is what makes everything else in this crate cheap by comparison.

use std::fmt;
use std::fs;
use std::io;
use std::os::raw::{c_char, c_int};
use std::path::Path;

use foreign_types::ForeignType;
use openssl::pkcs12::Pkcs12;
use thiserror::Error;
use tracing::debug;

use crate::MacOracle;

// Not exposed by this version of `openssl-sys`; declared here to match the
// upstream OpenSSL signature (`int PKCS12_verify_mac(PKCS12 *, const char *, int)`).
extern "C" {
    fn PKCS12_verify_mac(p12: *mut openssl_sys::PKCS12, pass: *const c_char, passlen: c_int) -> c_int;
}

#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("PKCS12 file not found: {path}")]
    NotFound {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("unable to parse PKCS12 structure in {path}")]
    Unparseable {
        path: String,
        #[source]
        source: openssl::error::ErrorStack,
    },
}

/// The parsed keystore. Construct once, share everywhere.
pub struct Keystore {
    p12: Pkcs12,
}

impl Keystore {
    /// Read the whole keystore file into memory and parse its DER encoding.
    ///
    /// Both failure modes are fatal to the run: an unreadable file and an
    /// undecodable ASN.1 structure are reported with distinct errors so the
    /// CLI can map them to distinct exit codes.
    pub fn open(path: &Path) -> Result<Self, KeystoreError> {
        let der = fs::read(path).map_err(|source| KeystoreError::NotFound {
            path: path.display().to_string(),
            source,
        })?;
        let p12 = Pkcs12::from_der(&der).map_err(|source| KeystoreError::Unparseable {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), bytes = der.len(), "keystore parsed");
        Ok(Keystore { p12 })
    }
}

impl MacOracle for Keystore {
    /// Test one candidate against the stored MAC.
    ///
    /// Only the MAC is checked — the encrypted SafeBags are never
    /// decrypted, so an unsupported bag cipher cannot fail a correct
    /// password and a MAC-less keystore never matches. rust-openssl has no
    /// safe wrapper for `PKCS12_verify_mac`, so the call goes through
    /// `openssl-sys` with an explicit length, keeping candidates opaque
    /// bytes (embedded NULs included). The function only reads the parsed
    /// structure, which keeps concurrent calls on the shared handle sound.
    /// Wrong passwords come back as misses; there is no third outcome.
    fn verify(&self, candidate: &[u8]) -> bool {
        let Ok(len) = c_int::try_from(candidate.len()) else {
            return false;
        };
        // The C side expects a dereferenceable pointer even at length 0.
        static EMPTY: [u8; 1] = [0];
        let pass = if candidate.is_empty() {
            EMPTY.as_ptr()
        } else {
            candidate.as_ptr()
        };
        let verified = unsafe { PKCS12_verify_mac(self.p12.as_ptr(), pass.cast::<c_char>(), len) };
        verified == 1
    }
}

impl fmt::Debug for Keystore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keystore").finish_non_exhaustive()
    }
}
