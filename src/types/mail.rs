//! Mail records as exchanged with a mail storage canister.

use std::fmt;
use std::str::FromStr;

use candid::CandidType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

use crate::{DmailError, Result};

use super::{EmailAddress, MailId};

/// Value returned by a successful `send_mail` call.
pub type Receipt = ();

/// Convert a canister timestamp (nanoseconds since the Unix epoch) to UTC.
pub fn timestamp_to_datetime(nanos: u64) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(nanos / 1_000_000_000).ok()?;
    DateTime::from_timestamp(secs, (nanos % 1_000_000_000) as u32)
}

/// Channel a mail was submitted through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderChannel {
    Web2,
    Ethereum,
    Icp,
}

impl SenderChannel {
    /// Wire text for this channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderChannel::Web2 => "web2",
            SenderChannel::Ethereum => "ethereum",
            SenderChannel::Icp => "icp",
        }
    }
}

impl fmt::Display for SenderChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SenderChannel {
    type Err = DmailError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "web2" => Ok(SenderChannel::Web2),
            "ethereum" => Ok(SenderChannel::Ethereum),
            "icp" => Ok(SenderChannel::Icp),
            other => Err(DmailError::Validation(format!(
                "unknown sender channel: {other}"
            ))),
        }
    }
}

/// Mail header.
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MailHeader {
    /// Sender address. Left empty by the composer, filled in by the canister.
    pub from: String,
    /// Canister time in nanoseconds since the Unix epoch.
    pub timestamp: u64,
    pub content_type: Option<String>,
    pub to: Vec<EmailAddress>,
    pub subject: Option<String>,
    pub cc: Option<Vec<EmailAddress>>,
    pub bcc: Option<Vec<EmailAddress>>,
    pub sender_name: Option<String>,
    pub sender_canister_id: Option<String>,
    pub sender_channel: Option<String>,
    #[serde(rename = "receipient_canister_id")]
    pub recipient_canister_id: Option<String>,
}

impl MailHeader {
    /// Parsed sender channel, if the canister recorded a known one.
    pub fn channel(&self) -> Option<SenderChannel> {
        self.sender_channel.as_deref().and_then(|c| c.parse().ok())
    }

    /// All recipient addresses: `to`, then `cc`, then `bcc`.
    pub fn recipients(&self) -> impl Iterator<Item = &EmailAddress> {
        self.to
            .iter()
            .chain(self.cc.iter().flatten())
            .chain(self.bcc.iter().flatten())
    }
}

/// A reply appended to a mail thread.
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MailReply {
    pub content: ByteBuf,
    pub sender_address: String,
    pub principal: Option<String>,
    pub timestamp: u64,
}

/// A complete mail: header plus raw body bytes.
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Mail {
    pub correlation_id: Option<String>,
    pub header: MailHeader,
    pub body: ByteBuf,
    pub reply_messages: Option<Vec<MailReply>>,
}

impl Mail {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Inbox entry returned by `get_mails`.
///
/// Large bodies are left out by the canister, so `content` may be absent even
/// for a mail with a body.
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MailRecord {
    pub mail_id: MailId,
    pub header: MailHeader,
    pub content: Option<ByteBuf>,
    pub read: bool,
}

impl MailRecord {
    /// Inline content decoded as UTF-8.
    pub fn content_text(&self) -> Option<String> {
        self.content
            .as_ref()
            .map(|c| String::from_utf8_lossy(c).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_channel_parse() {
        assert_eq!("web2".parse::<SenderChannel>().unwrap(), SenderChannel::Web2);
        assert_eq!(
            "ethereum".parse::<SenderChannel>().unwrap(),
            SenderChannel::Ethereum
        );
        assert_eq!("icp".parse::<SenderChannel>().unwrap(), SenderChannel::Icp);
        assert!("smtp".parse::<SenderChannel>().is_err());
    }

    #[test]
    fn test_sender_channel_display() {
        assert_eq!(SenderChannel::Icp.to_string(), "icp");
    }

    #[test]
    fn test_header_channel() {
        let header = MailHeader {
            sender_channel: Some("ethereum".to_string()),
            ..Default::default()
        };
        assert_eq!(header.channel(), Some(SenderChannel::Ethereum));

        let header = MailHeader {
            sender_channel: Some("carrier-pigeon".to_string()),
            ..Default::default()
        };
        assert_eq!(header.channel(), None);
    }

    #[test]
    fn test_header_recipients_order() {
        let header = MailHeader {
            to: vec!["a@x.com".to_string()],
            cc: Some(vec!["b@x.com".to_string()]),
            bcc: Some(vec!["c@x.com".to_string()]),
            ..Default::default()
        };
        let all: Vec<_> = header.recipients().cloned().collect();
        assert_eq!(all, vec!["a@x.com", "b@x.com", "c@x.com"]);
    }

    #[test]
    fn test_record_candid_roundtrip_keeps_options_absent() {
        let record = MailRecord {
            mail_id: "1".to_string(),
            header: MailHeader {
                from: "a@x.com".to_string(),
                subject: Some("Hi".to_string()),
                timestamp: 100,
                ..Default::default()
            },
            content: None,
            read: false,
        };
        let bytes = candid::encode_one(&record).unwrap();
        let decoded: MailRecord = candid::decode_one(&bytes).unwrap();
        assert_eq!(decoded, record);
        assert!(decoded.header.sender_name.is_none());
    }

    #[test]
    fn test_header_wire_field_name() {
        let header = MailHeader {
            recipient_canister_id: Some("aaaaa-aa".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["receipient_canister_id"], "aaaaa-aa");
    }

    #[test]
    fn test_timestamp_to_datetime() {
        let at = timestamp_to_datetime(1_700_000_000_123_456_789).unwrap();
        assert_eq!(at.to_rfc3339(), "2023-11-14T22:13:20.123456789+00:00");
        assert_eq!(timestamp_to_datetime(0).unwrap().timestamp(), 0);
    }

    #[test]
    fn test_body_text_lossy() {
        let mail = Mail {
            body: ByteBuf::from(vec![b'h', b'i', 0xff]),
            ..Default::default()
        };
        assert_eq!(mail.body_text(), "hi\u{fffd}");
    }
}
