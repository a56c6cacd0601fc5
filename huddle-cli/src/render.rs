use colored::*;
use huddle::client::{MediaKind, SessionEvent, SessionSnapshot};

fn on_off(enabled: bool) -> ColoredString {
    if enabled { "on".green() } else { "off".red() }
}

pub fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::LocalStream { stream_id, tracks } => {
            let kinds: Vec<String> = tracks.iter().map(|t| t.kind().to_string()).collect();
            println!(
                "{} stream {} [{}]",
                "🎥 Local".cyan().bold(),
                stream_id.dimmed(),
                kinds.join(", ")
            );
        }
        SessionEvent::RemoteStream {
            peer_id,
            peer_name,
            stream,
        } => {
            let kinds: Vec<String> = stream.tracks.iter().map(|t| t.kind.to_string()).collect();
            println!(
                "{} from {} ({}) [{}]",
                "📡 Remote media".cyan(),
                peer_name.bold(),
                peer_id,
                kinds.join(", ")
            );
        }
        SessionEvent::UserConnected { peer_id, name } => {
            println!("{} {} ({})", "➕ Joined:".green().bold(), name.bold(), peer_id);
        }
        SessionEvent::UserDisconnected { peer_id, name } => {
            let name = name.as_deref().unwrap_or("unknown");
            println!("{} {} ({})", "➖ Left:".yellow().bold(), name, peer_id);
        }
        SessionEvent::HandRaised { peer_id, raised } => {
            if *raised {
                println!("{} {}", "✋ Hand raised by".magenta().bold(), peer_id);
            } else {
                println!("{} {}", "Hand lowered by".magenta(), peer_id);
            }
        }
        SessionEvent::RemoteVideoState { peer_id, enabled } => {
            println!("   {} video {}", peer_id, on_off(*enabled));
        }
        SessionEvent::RemoteAudioState { peer_id, enabled } => {
            println!("   {} audio {}", peer_id, on_off(*enabled));
        }
        SessionEvent::RoomState { video, audio } => {
            println!(
                "{} {} video, {} audio states",
                "Room state:".cyan(),
                video.len(),
                audio.len()
            );
        }
        SessionEvent::MediaError(e) => {
            println!("{} {}", "⚠️  Media error:".red().bold(), e);
        }
        SessionEvent::PeerFailed { peer_id, reason } => {
            println!("{} {}: {}", "❌ Peer failed:".red().bold(), peer_id, reason);
        }
    }
}

pub fn print_snapshot(snapshot: &SessionSnapshot) {
    println!(
        "{} {} as {} ({})",
        "Room".bold(),
        snapshot.room_id,
        snapshot.local_name.bold(),
        snapshot.local_id
    );
    println!(
        "   audio {}  video {}  hand {}",
        on_off(snapshot.audio_enabled),
        on_off(snapshot.video_enabled),
        if snapshot.hand_raised { "up" } else { "down" }
    );

    if snapshot.peers.is_empty() {
        println!("   {}", "nobody else here".dimmed());
    }
    for peer in &snapshot.peers {
        let has = |kind| peer.remote_tracks.contains(&kind);
        println!(
            "   {} {} {:?} polite={} media[a:{} v:{}] pending={}{}",
            "•".cyan(),
            peer.name.bold(),
            peer.state,
            peer.polite,
            has(MediaKind::Audio),
            has(MediaKind::Video),
            peer.pending_candidates,
            if peer.presence.hand_raised { " ✋" } else { "" }
        );
    }
}
