//! Shared test helpers: throwaway PKCS#12 keystores and wordlist files.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Mutex;

use openssl::asn1::Asn1Time;
use openssl::bn::{BigNum, MsbOption};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::PKey;
use openssl::rsa::Rsa;
use openssl::x509::{X509, X509NameBuilder};
use tempfile::NamedTempFile;

use p12crack::MacOracle;

/// Cache of generated keystores by password — RSA key generation is the
/// slow part and the DER is reusable across tests.
static KEYSTORE_CACHE: Mutex<BTreeMap<String, Vec<u8>>> = Mutex::new(BTreeMap::new());

/// DER encoding of a fresh PKCS#12 keystore protected by `password`.
pub fn keystore_der(password: &str) -> Vec<u8> {
    let mut cache = KEYSTORE_CACHE.lock().unwrap();
    if let Some(der) = cache.get(password) {
        return der.clone();
    }

    let rsa = Rsa::generate(2048).unwrap();
    let pkey = PKey::from_rsa(rsa).unwrap();

    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_nid(Nid::COMMONNAME, "p12crack test").unwrap();
    let name = name.build();

    let mut builder = X509::builder().unwrap();
    builder.set_version(2).unwrap();
    let serial = {
        let mut bn = BigNum::new().unwrap();
        bn.rand(64, MsbOption::MAYBE_ZERO, false).unwrap();
        bn.to_asn1_integer().unwrap()
    };
    builder.set_serial_number(&serial).unwrap();
    builder.set_subject_name(&name).unwrap();
    builder.set_issuer_name(&name).unwrap();
    builder.set_pubkey(&pkey).unwrap();
    builder
        .set_not_before(&Asn1Time::days_from_now(0).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::days_from_now(1).unwrap())
        .unwrap();
    builder.sign(&pkey, MessageDigest::sha256()).unwrap();
    let cert = builder.build();

    let p12 = Pkcs12::builder()
        .name("p12crack test")
        .pkey(&pkey)
        .cert(&cert)
        .build2(password)
        .unwrap();
    let der = p12.to_der().unwrap();
    cache.insert(password.to_string(), der.clone());
    der
}

/// A keystore written to a temp file, kept alive by the returned handle.
pub fn keystore_file(password: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&keystore_der(password)).unwrap();
    file
}

/// A wordlist temp file with `\n` terminators.
pub fn wordlist_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

/// A wordlist temp file with arbitrary raw content.
pub fn raw_wordlist_file(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file
}

/// Oracle that records every candidate it is asked about and matches an
/// optional target password. Lets engine tests assert coverage without
/// paying for real MAC verification.
pub struct RecordingOracle {
    target: Option<Vec<u8>>,
    seen: Mutex<Vec<Vec<u8>>>,
}

impl RecordingOracle {
    pub fn matching(target: &[u8]) -> Self {
        RecordingOracle {
            target: Some(target.to_vec()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn miss_everything() -> Self {
        RecordingOracle {
            target: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Every candidate verified so far, in no particular order.
    pub fn seen(&self) -> Vec<Vec<u8>> {
        self.seen.lock().unwrap().clone()
    }

    pub fn seen_sorted(&self) -> Vec<Vec<u8>> {
        let mut seen = self.seen();
        seen.sort();
        seen
    }
}

impl MacOracle for RecordingOracle {
    fn verify(&self, candidate: &[u8]) -> bool {
        self.seen.lock().unwrap().push(candidate.to_vec());
        self.target.as_deref() == Some(candidate)
    }
}
