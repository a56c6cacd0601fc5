use crate::error::SessionError;
use crate::session::{RenegotiationReport, SessionSnapshot};
use tokio::sync::oneshot;

type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

pub(crate) enum SessionCommand {
    Leave { reply: oneshot::Sender<()> },
    ToggleAudio { enabled: bool, reply: Reply<()> },
    ToggleVideo { enabled: bool, reply: Reply<()> },
    RestartVideo { reply: Reply<RenegotiationReport> },
    RaiseHand { raised: bool, reply: Reply<()> },
    Snapshot { reply: oneshot::Sender<SessionSnapshot> },
}
