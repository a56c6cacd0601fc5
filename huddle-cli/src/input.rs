/// A line typed at the call prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    Audio(bool),
    Video(bool),
    Restart,
    Hand(bool),
    Peers,
    Help,
    Leave,
}

pub const HELP: &str = "commands: mute | unmute | video on|off | restart | hand up|down | peers | leave";

impl InputCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let head = words.next().unwrap_or_default().to_ascii_lowercase();
        let arg = words.next().map(str::to_ascii_lowercase);

        let command = match (head.as_str(), arg.as_deref()) {
            ("mute", None) => Self::Audio(false),
            ("unmute", None) => Self::Audio(true),
            ("video", Some("on")) => Self::Video(true),
            ("video", Some("off")) => Self::Video(false),
            ("restart", None) => Self::Restart,
            ("hand", Some("up")) => Self::Hand(true),
            ("hand", Some("down")) => Self::Hand(false),
            ("peers", None) => Self::Peers,
            ("help" | "?", None) => Self::Help,
            ("leave" | "quit" | "exit", None) => Self::Leave,
            _ => return Err(format!("unknown command `{}`", line.trim())),
        };

        if words.next().is_some() {
            return Err(format!("unexpected arguments in `{}`", line.trim()));
        }
        Ok(command)
    }
}
