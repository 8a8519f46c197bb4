use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.0" for releases, "0.3.0@abc1234 2024-01-15" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("MINDMAP_GIT_HASH");
    const COMMIT_DATE: &str = env!("MINDMAP_COMMIT_DATE");
    const IS_RELEASE: &str = env!("MINDMAP_IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "mindmap",
    bin_name = "mindmap",
    version = get_version(),
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Cards of nested notes, kept in a single JSON file", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Map file to operate on (defaults to the configured map)
    #[arg(short, long, global = true, value_name = "FILE", help_heading = "Options")]
    pub file: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Nodes,
    View,
    Maps,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Nodes => "Node Commands:",
            CommandGroup::View => "Viewing:",
            CommandGroup::Maps => "Map Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "add" | "delete" | "edit" | "move" => Some(CommandGroup::Nodes),
            "list" | "tree" | "search" | "export" => Some(CommandGroup::View),
            "new" | "maps" | "shell" => Some(CommandGroup::Maps),
            "doctor" | "config" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Nodes,
            CommandGroup::View,
            CommandGroup::Maps,
            CommandGroup::Misc,
        ]
    }
}

/// Returns the custom grouped help output as a string
pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("mindmap {version}\n"));
    output.push_str("Cards of nested notes, kept in a single JSON file\n");
    output.push('\n');
    output.push_str("Usage: mindmap [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", name, about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("  -f, --file <FILE>  Map file to operate on\n");
    output.push_str("  -v, --verbose      More log output (repeat for more)\n");
    output.push_str("  -h, --help         Print help\n");
    output.push_str("  -V, --version      Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Prints help for a command by name, falling back to the grouped help.
pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();

    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name || subcmd.get_all_aliases().any(|a| a == name) {
            print!("{}", subcmd.render_help());
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a card, or a child node with --parent
    #[command(alias = "a", display_order = 1)]
    Add {
        /// Parent node ID (omit to create a new card)
        #[arg(short, long, value_name = "ID")]
        parent: Option<String>,

        /// Node text (words are joined with spaces)
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Delete a node and everything under it
    #[command(aliases = ["del", "rm"], display_order = 2)]
    Delete {
        /// Node ID
        id: String,

        /// Confirm deleting a whole card
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Change the text of a node
    #[command(alias = "e", display_order = 3)]
    Edit {
        /// Node ID
        id: String,

        /// New text (words are joined with spaces)
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Move a node (and its children) under another node
    #[command(alias = "mv", display_order = 4)]
    Move {
        /// Node ID to move
        id: String,

        /// ID of the new parent
        parent: String,
    },

    /// List the cards
    #[command(alias = "ls", display_order = 10)]
    List {
        /// Show every card with its children
        #[arg(short = 'R', long)]
        recursive: bool,
    },

    /// Print every card as a tree
    #[command(display_order = 11)]
    Tree,

    /// Find nodes whose text contains a term (case-insensitive)
    #[command(alias = "find", display_order = 12)]
    Search {
        /// Search term (words are joined with spaces)
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        term: Vec<String>,
    },

    /// Export the map as a text tree (to stdout, or to OUTPUT)
    #[command(display_order = 13)]
    Export {
        /// Output file
        output: Option<PathBuf>,
    },

    /// Create an empty map file
    #[command(display_order = 20)]
    New {
        /// Overwrite an existing map
        #[arg(long)]
        force: bool,
    },

    /// List the maps in the data directory
    #[command(display_order = 21)]
    Maps,

    /// Start the interactive shell
    #[command(display_order = 22)]
    Shell,

    /// Check the map for structural problems
    #[command(display_order = 30)]
    Doctor,

    /// Get or set configuration
    #[command(display_order = 31)]
    Config {
        /// Configuration key (default-map, show-ids)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print help for mindmap or a subcommand
    #[command(display_order = 32)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Add { .. } => "add",
            Commands::Delete { .. } => "delete",
            Commands::Edit { .. } => "edit",
            Commands::Move { .. } => "move",
            Commands::List { .. } => "list",
            Commands::Tree => "tree",
            Commands::Search { .. } => "search",
            Commands::Export { .. } => "export",
            Commands::New { .. } => "new",
            Commands::Maps => "maps",
            Commands::Shell => "shell",
            Commands::Doctor => "doctor",
            Commands::Config { .. } => "config",
            Commands::Help { .. } => "help",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_parent() {
        let cli = Cli::try_parse_from(["mindmap", "add", "-p", "abc", "Buy", "milk"]).unwrap();
        match cli.command {
            Some(Commands::Add { parent, text }) => {
                assert_eq!(parent.as_deref(), Some("abc"));
                assert_eq!(text.join(" "), "Buy milk");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["mindmap", "tree", "-f", "work.json", "-vv"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("work.json")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn aliases_resolve() {
        let cli = Cli::try_parse_from(["mindmap", "mv", "a", "b"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Move { .. })));
        let cli = Cli::try_parse_from(["mindmap", "del", "a", "--yes"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Delete { yes: true, .. })));
    }

    #[test]
    fn grouped_help_lists_every_group() {
        let help = get_grouped_help();
        for group in CommandGroup::all() {
            assert!(help.contains(group.heading()));
        }
        assert!(help.contains("shell"));
    }
}
