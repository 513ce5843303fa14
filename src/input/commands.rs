//! # Command Definitions
//!
//! The command reference shown by the `help` command.

/// One line of the command reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandHelp {
    pub keys: &'static str,
    pub description: &'static str,
}

pub const COMMAND_HELP: &[CommandHelp] = &[
    CommandHelp {
        keys: "north/south/east/west, ne/nw/se/sw",
        description: "move or attack",
    },
    CommandHelp {
        keys: "h j k l y u b (vi keys), w a d",
        description: "move or attack",
    },
    CommandHelp {
        keys: ". | wait",
        description: "wait a turn",
    },
    CommandHelp {
        keys: "r | rest",
        description: "rest and recover a little HP",
    },
    CommandHelp {
        keys: "i | inventory",
        description: "open or close the inventory",
    },
    CommandHelp {
        keys: "1-9 | select N",
        description: "select an inventory slot",
    },
    CommandHelp {
        keys: "e | use",
        description: "use the selected item",
    },
    CommandHelp {
        keys: "o | open",
        description: "open an adjacent locked or special door",
    },
    CommandHelp {
        keys: "m | map",
        description: "print the map",
    },
    CommandHelp {
        keys: "new",
        description: "start a new game",
    },
    CommandHelp {
        keys: "q | quit",
        description: "leave",
    },
];

/// Formats [`COMMAND_HELP`] as aligned lines.
pub fn help_text() -> String {
    let width = COMMAND_HELP
        .iter()
        .map(|entry| entry.keys.len())
        .max()
        .unwrap_or(0);
    COMMAND_HELP
        .iter()
        .map(|entry| format!("  {:width$}  {}", entry.keys, entry.description, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}
