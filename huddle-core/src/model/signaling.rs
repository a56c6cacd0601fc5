use crate::model::candidate::IceCandidate;
use crate::model::peer::PeerId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// Messages the client sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientSignal {
    JoinRoom {
        room_id: RoomId,
        user_id: PeerId,
        user_name: String,
    },
    Offer {
        target: PeerId,
        sdp: String,
        user_name: String,
    },
    Answer {
        target: PeerId,
        sdp: String,
        user_name: String,
    },
    IceCandidate {
        target: PeerId,
        candidate: IceCandidate,
    },
    HandRaise {
        room_id: RoomId,
        raised: bool,
    },
    VideoState {
        room_id: RoomId,
        enabled: bool,
    },
    AudioState {
        room_id: RoomId,
        enabled: bool,
    },
}

impl ClientSignal {
    pub fn event_name(&self) -> &'static str {
        match self {
            ClientSignal::JoinRoom { .. } => "join-room",
            ClientSignal::Offer { .. } => "offer",
            ClientSignal::Answer { .. } => "answer",
            ClientSignal::IceCandidate { .. } => "ice-candidate",
            ClientSignal::HandRaise { .. } => "hand-raise",
            ClientSignal::VideoState { .. } => "video-state",
            ClientSignal::AudioState { .. } => "audio-state",
        }
    }
}

/// Messages the relay fans out to room members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerSignal {
    UserConnected {
        user_id: PeerId,
        user_name: String,
    },
    UserDisconnected {
        user_id: PeerId,
        #[serde(default)]
        user_name: Option<String>,
    },
    Offer {
        caller: PeerId,
        sdp: String,
        user_name: String,
    },
    Answer {
        caller: PeerId,
        sdp: String,
        #[serde(default)]
        user_name: Option<String>,
    },
    IceCandidate {
        caller: PeerId,
        candidate: IceCandidate,
    },
    HandRaised {
        user_id: PeerId,
        raised: bool,
    },
    VideoState {
        user_id: PeerId,
        enabled: bool,
    },
    AudioState {
        user_id: PeerId,
        enabled: bool,
    },
    RoomState {
        #[serde(default)]
        video: HashMap<PeerId, bool>,
        #[serde(default)]
        audio: HashMap<PeerId, bool>,
    },
}
