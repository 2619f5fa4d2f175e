//! Online help.
//!
//! Help entries are keyed by a closed [`HelpKey`] enum; [`HelpKey::entry`] is
//! an exhaustive match, so adding a key without help text does not compile.

/// Every command token and topic that has a help entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelpKey {
    /// `/help`
    Help,
    /// `/quit`
    Quit,
    /// `/encrypt`
    Encrypt,
    /// `/plain`
    Plain,
    /// `/gold`
    Gold,
    /// `/stealth`
    Stealth,
    /// `/status`
    Status,
    /// `/msg`
    Msg,
    /// `/enc`
    Enc,
    /// `/dec`
    Dec,
    /// `/e`
    E,
    /// `/encr`
    Encr,
    /// `/q`
    Q,
    /// `/p`
    P,
    /// `/say`
    Say,
    /// `/me`
    Me,
    /// `/bell`
    Bell,
    /// Topic: transmission modes
    Modes,
    /// Topic: what this client is for
    About,
}

/// Help for one command or topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpEntry {
    /// A command with its usage line.
    Command {
        /// Usage synopsis.
        usage: &'static str,
        /// Description.
        info: &'static str,
        /// Related entries.
        see_also: &'static [HelpKey],
    },
    /// A free-standing topic.
    Topic {
        /// Topic title.
        title: &'static str,
        /// Description.
        info: &'static str,
        /// Related entries.
        see_also: &'static [HelpKey],
    },
}

const MODE_SWITCHES: &[HelpKey] = &[HelpKey::Plain, HelpKey::Encrypt, HelpKey::Stealth];

impl HelpKey {
    /// Command keys in the order `/help` lists them.
    pub const COMMANDS: [HelpKey; 17] = [
        HelpKey::Help,
        HelpKey::Quit,
        HelpKey::Encrypt,
        HelpKey::Plain,
        HelpKey::Stealth,
        HelpKey::Gold,
        HelpKey::Status,
        HelpKey::Msg,
        HelpKey::Enc,
        HelpKey::Dec,
        HelpKey::E,
        HelpKey::Encr,
        HelpKey::Q,
        HelpKey::P,
        HelpKey::Say,
        HelpKey::Me,
        HelpKey::Bell,
    ];

    /// Topic keys.
    pub const TOPICS: [HelpKey; 2] = [HelpKey::Modes, HelpKey::About];

    /// Lookup name: the command token or the topic name.
    pub fn token(self) -> &'static str {
        match self {
            HelpKey::Help => "/help",
            HelpKey::Quit => "/quit",
            HelpKey::Encrypt => "/encrypt",
            HelpKey::Plain => "/plain",
            HelpKey::Gold => "/gold",
            HelpKey::Stealth => "/stealth",
            HelpKey::Status => "/status",
            HelpKey::Msg => "/msg",
            HelpKey::Enc => "/enc",
            HelpKey::Dec => "/dec",
            HelpKey::E => "/e",
            HelpKey::Encr => "/encr",
            HelpKey::Q => "/q",
            HelpKey::P => "/p",
            HelpKey::Say => "/say",
            HelpKey::Me => "/me",
            HelpKey::Bell => "/bell",
            HelpKey::Modes => "modes",
            HelpKey::About => "about",
        }
    }

    /// Resolve a lookup name. Exact, case-sensitive match.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::COMMANDS.into_iter().chain(Self::TOPICS).find(|key| key.token() == token)
    }

    /// Help entry for this key.
    pub fn entry(self) -> HelpEntry {
        match self {
            HelpKey::Help => HelpEntry::Command {
                usage: "/help [command]",
                info: "shows help",
                see_also: &[HelpKey::Modes, HelpKey::About],
            },
            HelpKey::Quit => {
                HelpEntry::Command { usage: "/quit", info: "quit the client", see_also: &[] }
            },
            HelpKey::Encrypt => HelpEntry::Command {
                usage: "/encrypt",
                info: "switch to encrypted (gold) mode. Everyone will see, that there was a \
                       message, but only users with the key can read them",
                see_also: &[HelpKey::Plain, HelpKey::Stealth, HelpKey::Status],
            },
            HelpKey::Plain => HelpEntry::Command {
                usage: "/plain",
                info: "switch to plaintext mode. This is the mode, every client supports.",
                see_also: &[HelpKey::Encrypt, HelpKey::Stealth, HelpKey::Status],
            },
            HelpKey::Gold => HelpEntry::Command {
                usage: "/gold",
                info: "alias for /encrypt",
                see_also: &[HelpKey::Encrypt, HelpKey::Stealth, HelpKey::Status],
            },
            HelpKey::Stealth => HelpEntry::Command {
                usage: "/stealth",
                info: "switch to stealth mode. Messages are sent encrypted and regular clients \
                       will not see the message at all",
                see_also: &[HelpKey::Encrypt, HelpKey::Plain, HelpKey::Status],
            },
            HelpKey::Status => HelpEntry::Command {
                usage: "/status",
                info: "show the current status.",
                see_also: MODE_SWITCHES,
            },
            HelpKey::Msg => HelpEntry::Command {
                usage: "/msg nick message",
                info: "send a private message to \"nick\".",
                see_also: &[],
            },
            HelpKey::Enc => HelpEntry::Command {
                usage: "/enc text",
                info: "encrypt text and display the result locally. Probably only useful for \
                       debugging.",
                see_also: &[HelpKey::Dec, HelpKey::Encr],
            },
            HelpKey::Dec => HelpEntry::Command {
                usage: "/dec text",
                info: "decrypt text and display the result locally. Probably only useful for \
                       debugging.",
                see_also: &[HelpKey::Enc, HelpKey::Encr],
            },
            HelpKey::Encr => HelpEntry::Command {
                usage: "/encr text",
                info: "encrypt text in the same way as /enc does, but send the result \
                       unencrypted. Probably only useful to annoy someone.",
                see_also: &[HelpKey::Enc, HelpKey::Dec],
            },
            HelpKey::E => HelpEntry::Command {
                usage: "/e text",
                info: "send encrypted text, exactly in the same way as in the \"encrypt\" mode, \
                       but without switching the mode.",
                see_also: &[HelpKey::Encrypt],
            },
            HelpKey::P => HelpEntry::Command {
                usage: "/p text",
                info: "send plain text, exactly in the same way as in the \"plain\" mode, but \
                       without switching the mode.",
                see_also: &[HelpKey::Plain],
            },
            HelpKey::Q => HelpEntry::Command {
                usage: "/q text",
                info: "send text quietly (stealth), exactly in the same way as in the \
                       \"stealth\" mode, but without switching the mode.",
                see_also: &[HelpKey::Stealth],
            },
            HelpKey::Say => HelpEntry::Command {
                usage: "/say text",
                info: "send text literally. This allows to start a message with a \"/\".",
                see_also: &[HelpKey::Me],
            },
            HelpKey::Me => HelpEntry::Command {
                usage: "/me text",
                info: "send a message starting with \"/me\". Other clients show it as an \
                       action.",
                see_also: &[HelpKey::Say],
            },
            HelpKey::Bell => HelpEntry::Command {
                usage: "/bell [on|off]",
                info: "sets or shows the usage of the terminal's bell. If enabled, the bell \
                       will ring if a message is received.",
                see_also: &[],
            },
            HelpKey::Modes => HelpEntry::Topic {
                title: "Modes",
                info: "There exist 3 different modes of operation: plaintext, encrypted and \
                       stealth mode. They influence how messages are sent and if a regular \
                       client can see and/or read them. The current mode is indicated by the \
                       last character of the prompt.\n> = plaintext, # = encrypted, $ = stealth",
                see_also: &[HelpKey::Plain, HelpKey::Encrypt, HelpKey::Stealth, HelpKey::Status],
            },
            HelpKey::About => HelpEntry::Topic {
                title: "About",
                info: "This client was written to allow private group chats in public rooms. \
                       The encrypted mode was invented to show other participants, that a \
                       conversation is going on, and to show them, that they have no chance \
                       to participate. The stealth mode was invented to hide the fact, that \
                       there is a conversation at all. To make this possible, the protocol \
                       was extended, such that regular clients silently ignore the stealth \
                       messages, but the conference server still distributes them to all \
                       clients.",
                see_also: &[HelpKey::Modes],
            },
        }
    }
}

impl HelpEntry {
    /// Related entries.
    pub fn see_also(&self) -> &'static [HelpKey] {
        match self {
            HelpEntry::Command { see_also, .. } | HelpEntry::Topic { see_also, .. } => *see_also,
        }
    }

    /// Multi-line text shown for `/help <key>`.
    pub fn render(&self) -> String {
        let mut text = match self {
            HelpEntry::Command { usage, info, .. } => format!("COMMAND: {usage}\nINFO: {info}"),
            HelpEntry::Topic { title, info, .. } => format!("TOPIC: {title}\nINFO: {info}"),
        };

        let see_also = self.see_also();
        if !see_also.is_empty() {
            let names: Vec<&str> = see_also.iter().map(|key| key.token()).collect();
            text.push_str("\nSEE: ");
            text.push_str(&names.join(", "));
        }

        text
    }
}

/// One-line list of every command, shown for a bare `/help`.
pub fn command_list() -> String {
    let tokens: Vec<&str> = HelpKey::COMMANDS.iter().map(|key| key.token()).collect();
    format!("commands: {}", tokens.join(" "))
}

/// Text shown for `/help <topic>`.
pub fn lookup(topic: &str) -> String {
    HelpKey::from_token(topic)
        .map_or_else(|| "no help entry found".to_string(), |key| key.entry().render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_list_order() {
        insta::assert_snapshot!(command_list(), @"commands: /help /quit /encrypt /plain /stealth /gold /status /msg /enc /dec /e /encr /q /p /say /me /bell");
    }

    #[test]
    fn every_token_resolves_to_itself() {
        for key in HelpKey::COMMANDS.into_iter().chain(HelpKey::TOPICS) {
            assert_eq!(HelpKey::from_token(key.token()), Some(key));
        }
    }

    #[test]
    fn commands_render_usage_and_see_also() {
        assert_eq!(
            lookup("/status"),
            "COMMAND: /status\nINFO: show the current status.\nSEE: /plain, /encrypt, /stealth"
        );
    }

    #[test]
    fn entries_without_see_also_omit_the_line() {
        assert_eq!(lookup("/quit"), "COMMAND: /quit\nINFO: quit the client");
    }

    #[test]
    fn topics_render_title_instead_of_usage() {
        let text = lookup("modes");

        assert!(text.starts_with("TOPIC: Modes\nINFO: There exist 3 different modes"));
        assert!(text.contains("\n> = plaintext, # = encrypted, $ = stealth"));
        assert!(text.ends_with("SEE: /plain, /encrypt, /stealth, /status"));
    }

    #[test]
    fn unknown_topic() {
        assert_eq!(lookup("/nope"), "no help entry found");
        assert_eq!(lookup("Modes"), "no help entry found");
    }

    #[test]
    fn see_also_only_references_known_keys() {
        for key in HelpKey::COMMANDS.into_iter().chain(HelpKey::TOPICS) {
            for related in key.entry().see_also() {
                assert_ne!(*related, key, "{} refers to itself", key.token());
            }
        }
    }
}
