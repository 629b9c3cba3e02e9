use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Action name all record operations are bound to. Tokens issued for one
/// action never validate another.
pub const RECORDS_ACTION: &str = "rolodex-records";

/// Anti-forgery token derived from a shared secret and a fixed action name.
/// Every record operation must present the issued value before it is
/// validated or allowed to touch the store.
#[derive(Clone)]
pub struct ActionToken {
    secret: Vec<u8>,
    action: String,
}

impl ActionToken {
    pub fn new(secret: &[u8], action: &str) -> Self {
        Self {
            secret: secret.to_vec(),
            action: action.to_string(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length");
        mac.update(self.action.as_bytes());
        mac
    }

    /// The token value clients must send back, as lowercase hex.
    pub fn issue(&self) -> String {
        hex::encode(self.mac().finalize().into_bytes())
    }

    /// Constant-time check of a candidate token. Absent or undecodable
    /// candidates fail.
    pub fn verify(&self, candidate: Option<&str>) -> bool {
        let candidate = match candidate {
            Some(value) => value.trim(),
            None => return false,
        };
        let bytes = match hex::decode(candidate) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        self.mac().verify_slice(&bytes).is_ok()
    }
}
