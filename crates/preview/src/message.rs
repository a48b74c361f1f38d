//! Message protocol between the engine and the preview surface.

use almanac_client::PreviewPayload;
use serde::{Deserialize, Serialize};

/// Engine to surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum InboundMessage {
	/// Replace everything shown with a new snapshot.
	Update { preview: PreviewPayload },
}

/// Surface to engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum OutboundMessage {
	/// The user picked an entry; reveal its source line.
	JumpToLine { line: u32 },
	/// Show an error to the user.
	Alert { text: String },
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_outbound_wire_shape() {
		let json = serde_json::to_value(OutboundMessage::JumpToLine { line: 42 }).unwrap();
		assert_eq!(json, serde_json::json!({"command": "jumpToLine", "line": 42}));

		let alert: OutboundMessage = serde_json::from_str(r#"{"command":"alert","text":"boom"}"#).unwrap();
		assert_eq!(alert, OutboundMessage::Alert { text: "boom".into() });
	}

	#[test]
	fn test_inbound_wire_shape() {
		let json = r#"{"command":"update","preview":{"today":[],"week":[],"overview":{"categories":[]},"calendar":[]}}"#;
		let msg: InboundMessage = serde_json::from_str(json).unwrap();
		assert_eq!(
			msg,
			InboundMessage::Update {
				preview: PreviewPayload::default()
			}
		);
	}
}
