#![allow(dead_code)]

pub const KEY: &str = "bdacaf398071931518f73917cb0c6f04b3a0ab45ee9cbedc258047a8c149a3e1";

/// `{"alg":"HS512","typ":"JWT"}`
pub const HEADER: &str = "eyJhbGciOiJIUzUxMiIsInR5cCI6IkpXVCJ9";

/// `{"exp":99999999999}`
pub const PAYLOAD: &str = "eyJleHAiOjk5OTk5OTk5OTk5fQ";

pub const SIGNING_INPUT: &str = concat!(
    "eyJhbGciOiJIUzUxMiIsInR5cCI6IkpXVCJ9",
    ".",
    "eyJleHAiOjk5OTk5OTk5OTk5fQ"
);

pub const SIGNATURE: &str =
    "rMKkGe6riuLZ3boYiMZsk5xrT7S-7VK6gZmFs1_7kKtVUkpvGatudYI5ZSkwIQ-iJKp2XskCxzn_6fVkCohtUQ";

pub const TOKEN: &str = concat!(
    "eyJhbGciOiJIUzUxMiIsInR5cCI6IkpXVCJ9",
    ".",
    "eyJleHAiOjk5OTk5OTk5OTk5fQ",
    ".",
    "rMKkGe6riuLZ3boYiMZsk5xrT7S-7VK6gZmFs1_7kKtVUkpvGatudYI5ZSkwIQ-iJKp2XskCxzn_6fVkCohtUQ"
);

pub const EXP: u64 = 99_999_999_999;

/// Signs an arbitrary header and payload JSON pair with HS512 under `key`,
/// bypassing every check the codec would apply.
pub fn forge(header_json: &str, payload_json: &str, key: &[u8]) -> String {
    use hsjwt_base64::Base64Url;

    let message = format!(
        "{}.{}",
        Base64Url::from_raw(header_json),
        Base64Url::from_raw(payload_json)
    );
    let signature = crate::jwa::Algorithm::HS512.sign(key, message.as_bytes());
    format!("{}.{}", message, Base64Url::from_raw(signature))
}
