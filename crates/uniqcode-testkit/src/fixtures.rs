//! Credential fixtures.
//!
//! The certificates under `fixtures/` are self-signed P-256 certificates
//! generated with openssl. Only their subject common names matter here.

/// Common name of the admin certificate.
pub const ADMIN_ID: &str = "Admin@org1.chains.cloudchain.cn";

/// Common name of the ordinary user certificate.
pub const USER_ID: &str = "User1@org1.chains.cloudchain.cn";

/// Common name of the admin certificate carrying an org-assigned prefix.
pub const PREFIXED_ADMIN_CN: &str = "1001_Admin@org1.chains.cloudchain.cn";

/// MSP id written in front of the certificate.
pub const MSP_ID: &str = "Org1MSP";

pub const ADMIN_PEM: &str = include_str!("../fixtures/admin.pem");
pub const USER_PEM: &str = include_str!("../fixtures/user1.pem");
pub const PREFIXED_ADMIN_PEM: &str = include_str!("../fixtures/prefixed_admin.pem");
pub const NO_COMMON_NAME_PEM: &str = include_str!("../fixtures/no_common_name.pem");

/// Request timestamp used throughout the examples, Unix ms.
pub const SCENARIO_TIMESTAMP: i64 = 1_576_458_896_541;

/// Wrap a PEM certificate the way a host serializes a submitter: a
/// length-delimited MSP id field followed by a length-delimited
/// certificate field.
pub fn credential(pem: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(pem.len() + MSP_ID.len() + 8);
    write_field(&mut out, 1, MSP_ID.as_bytes());
    write_field(&mut out, 2, pem.as_bytes());
    out
}

fn write_field(out: &mut Vec<u8>, field: u8, bytes: &[u8]) {
    out.push((field << 3) | 2);
    let mut len = bytes.len();
    while len >= 0x80 {
        out.push((len as u8 & 0x7f) | 0x80);
        len >>= 7;
    }
    out.push(len as u8);
    out.extend_from_slice(bytes);
}

pub fn admin_credential() -> Vec<u8> {
    credential(ADMIN_PEM)
}

pub fn user_credential() -> Vec<u8> {
    credential(USER_PEM)
}

pub fn prefixed_admin_credential() -> Vec<u8> {
    credential(PREFIXED_ADMIN_PEM)
}

pub fn no_common_name_credential() -> Vec<u8> {
    credential(NO_COMMON_NAME_PEM)
}

/// A fresh 64-hex-character transaction id.
pub fn random_tx_id() -> String {
    hex::encode(rand::random::<[u8; 32]>())
}
