use std::collections::BTreeMap;

pub const REPLY_KEY: &str = "reply";
pub const REPLY_VALUE: &str = "Message received";

// Flat string-to-string JSON object; any key set is accepted.
pub type EchoMessage = BTreeMap<String, String>;

pub fn decode(payload: &str) -> serde_json::Result<EchoMessage> {
    serde_json::from_str(payload)
}

pub fn decode_bytes(payload: &[u8]) -> serde_json::Result<EchoMessage> {
    serde_json::from_slice(payload)
}

// Overwrites any value already stored under the reply key.
pub fn apply_reply(message: &mut EchoMessage) {
    message.insert(REPLY_KEY.to_string(), REPLY_VALUE.to_string());
}

pub fn encode(message: &EchoMessage) -> serde_json::Result<String> {
    serde_json::to_string(message)
}
