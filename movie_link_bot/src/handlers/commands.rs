use teloxide::types::BotCommand;

pub const COMMANDS: &[Command] = &[START, SAVE, CLEAR, LIST];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    Start,
    Save,
    Clear,
    List,
}

pub struct Command {
    pub callname: &'static str,
    pub description: &'static str,
    pub kind: CommandKind,
    /// Admin commands are only shown in the admin's command menu.
    pub admin_only: bool,
}

const START: Command = Command {
    callname: "/start",
    description: "Get the files of a link",
    kind: CommandKind::Start,
    admin_only: false,
};

const SAVE: Command = Command {
    callname: "/save",
    description: "Reply to a message to save it under a code",
    kind: CommandKind::Save,
    admin_only: true,
};

const CLEAR: Command = Command {
    callname: "/clear",
    description: "Delete everything saved under a code",
    kind: CommandKind::Clear,
    admin_only: true,
};

const LIST: Command = Command {
    callname: "/list",
    description: "Show all codes and how many items each has",
    kind: CommandKind::List,
    admin_only: true,
};

impl Command {
    pub fn is_matching_callname(&self, command: &str) -> bool {
        self.callname.eq_ignore_ascii_case(command)
    }

    /// Commands for the menu next to the message box. Admin commands are only
    /// included if `for_admin` is set.
    pub fn generate_bot_commands(for_admin: bool) -> Vec<BotCommand> {
        COMMANDS
            .iter()
            .filter(|command| for_admin || !command.admin_only)
            .map(|command| BotCommand {
                // Cut off the /
                command: command.callname[1..].to_string(),
                description: command.description.to_string(),
            })
            .collect()
    }
}

/// A command found in a message, along with whatever text followed it.
pub struct ParsedCommand<'a> {
    pub command: &'static Command,
    params: &'a str,
}

impl<'a> ParsedCommand<'a> {
    /// Returns [`None`] if the text is not one of our commands.
    ///
    /// `/command@SomeBot` is accepted only if `SomeBot` is `bot_username`.
    pub fn parse(message_text: &'a str, bot_username: &str) -> Option<ParsedCommand<'a>> {
        if !message_text.starts_with('/') {
            return None;
        }

        let command = message_text.split_whitespace().next()?;

        if !command.is_ascii() {
            // Telegram commands must be ASCII.
            // See https://core.telegram.org/bots/api#botcommand
            return None;
        }

        let callname = if let Some(username_start) = command.find('@') {
            // Bot names are guaranteed ASCII, so ignore ASCII case specifically.
            if !command[username_start + '@'.len_utf8()..].eq_ignore_ascii_case(bot_username) {
                // This command is not for us.
                return None;
            }
            &command[..username_start]
        } else {
            command
        };

        let command_def = COMMANDS
            .iter()
            .find(|x| x.is_matching_callname(callname))?;

        Some(ParsedCommand {
            command: command_def,
            params: message_text[command.len()..].trim_start(),
        })
    }

    pub fn kind(&self) -> CommandKind {
        self.command.kind
    }

    /// First word after the command, if any.
    ///
    /// If the input is `/save promo1 please`, this is `promo1`.
    pub fn first_arg(&self) -> Option<&'a str> {
        self.params.split_whitespace().next()
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, CommandKind, ParsedCommand};

    #[test]
    fn plain_commands() {
        let parsed = ParsedCommand::parse("/start promo1", "MovieBot").unwrap();
        assert_eq!(parsed.kind(), CommandKind::Start);
        assert_eq!(parsed.first_arg(), Some("promo1"));

        let parsed = ParsedCommand::parse("/list", "MovieBot").unwrap();
        assert_eq!(parsed.kind(), CommandKind::List);
        assert_eq!(parsed.first_arg(), None);

        let parsed = ParsedCommand::parse("/SAVE   big_one extra words", "MovieBot").unwrap();
        assert_eq!(parsed.kind(), CommandKind::Save);
        assert_eq!(parsed.first_arg(), Some("big_one"));

        let parsed = ParsedCommand::parse("/clear\npromo1", "MovieBot").unwrap();
        assert_eq!(parsed.kind(), CommandKind::Clear);
        assert_eq!(parsed.first_arg(), Some("promo1"));
    }

    #[test]
    fn addressed_commands() {
        let parsed = ParsedCommand::parse("/clear@moviebot promo1", "MovieBot").unwrap();
        assert_eq!(parsed.kind(), CommandKind::Clear);
        assert_eq!(parsed.first_arg(), Some("promo1"));

        assert!(ParsedCommand::parse("/clear@OtherBot promo1", "MovieBot").is_none());
    }

    #[test]
    fn not_commands() {
        assert!(ParsedCommand::parse("start promo1", "MovieBot").is_none());
        assert!(ParsedCommand::parse("/unknown", "MovieBot").is_none());
        assert!(ParsedCommand::parse("/старт", "MovieBot").is_none());
        assert!(ParsedCommand::parse("/", "MovieBot").is_none());
        assert!(ParsedCommand::parse("/startpromo1", "MovieBot").is_none());
    }

    #[test]
    fn command_menus() {
        let public: Vec<_> = Command::generate_bot_commands(false)
            .into_iter()
            .map(|c| c.command)
            .collect();
        assert_eq!(public, ["start"]);

        let admin: Vec<_> = Command::generate_bot_commands(true)
            .into_iter()
            .map(|c| c.command)
            .collect();
        assert_eq!(admin, ["start", "save", "clear", "list"]);
    }
}
