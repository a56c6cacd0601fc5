/// Negotiation state of one peer link.
///
/// `AwaitingAnswer` is the first local offer (HAVE_LOCAL_OFFER on a fresh
/// link); `AwaitingRenegotiation` is a re-offer on a link that already
/// carried media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeerState {
    New,
    AwaitingAnswer,
    HaveRemoteOffer,
    Connected,
    AwaitingRenegotiation,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NegotiationStep {
    LocalOfferSent,
    RemoteOfferApplied,
    AnswerSent,
    RemoteAnswerApplied,
    RolledBack,
    Close,
}

impl PeerState {
    /// Next state after `step`, `None` when the step is not valid here.
    pub fn apply(self, step: NegotiationStep) -> Option<PeerState> {
        use NegotiationStep::*;
        use PeerState::*;

        match (self, step) {
            (Closed, _) => None,
            (_, Close) => Some(Closed),

            (New, LocalOfferSent) => Some(AwaitingAnswer),
            (Connected, LocalOfferSent) => Some(AwaitingRenegotiation),

            (New | Connected | HaveRemoteOffer, RemoteOfferApplied) => Some(HaveRemoteOffer),
            (HaveRemoteOffer, AnswerSent) => Some(Connected),

            (AwaitingAnswer | AwaitingRenegotiation, RemoteAnswerApplied) => Some(Connected),

            (AwaitingAnswer, RolledBack) => Some(New),
            (AwaitingRenegotiation, RolledBack) => Some(Connected),

            _ => None,
        }
    }

    pub fn has_remote_description(self) -> bool {
        matches!(
            self,
            PeerState::HaveRemoteOffer | PeerState::Connected | PeerState::AwaitingRenegotiation
        )
    }

    /// An offer of ours is outstanding, so an inbound offer collides.
    pub fn has_local_offer(self) -> bool {
        matches!(
            self,
            PeerState::AwaitingAnswer | PeerState::AwaitingRenegotiation
        )
    }

    pub fn is_closed(self) -> bool {
        self == PeerState::Closed
    }
}
