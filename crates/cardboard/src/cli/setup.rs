use cardboardapp::model::CardStatus;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "cardboard",
    bin_name = "cardboard",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Spaces, canvas topics and flashcards from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root of the document store (also CARDBOARD_DATA_DIR)
    #[arg(long, global = true, help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Config file to load instead of the default cardboard.toml
    #[arg(long, global = true, help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage spaces
    #[command(display_order = 1)]
    Space {
        #[command(subcommand)]
        action: SpaceCommands,
    },

    /// Rename or delete a whole group of spaces
    #[command(display_order = 2)]
    Group {
        #[command(subcommand)]
        action: GroupCommands,
    },

    /// Manage topics on a space's canvas
    #[command(display_order = 3)]
    Topic {
        #[command(subcommand)]
        action: TopicCommands,
    },

    /// Manage a topic's flashcards
    #[command(display_order = 4)]
    Card {
        #[command(subcommand)]
        action: CardCommands,
    },

    /// Step through a topic's cards, revealing answers and rating them
    #[command(display_order = 5)]
    Learn {
        /// Topic id
        topic: String,

        /// Only learn cards with this status
        #[arg(long, short)]
        status: Option<CardStatus>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SpaceCommands {
    /// Create a space
    Add {
        name: String,

        /// Group shown above the space (blank means "Default")
        #[arg(long, short, default_value = "")]
        group: String,
    },

    /// List spaces by group
    #[command(alias = "ls")]
    List,

    /// Rename a space
    Rename { id: String, name: String },

    /// Move a space to another group
    Group { id: String, group: String },

    /// Set the display order of spaces
    Reorder {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Delete a space with its topics and flashcards
    Rm { id: String },
}

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// Relabel every space in a group
    Rename { from: String, to: String },

    /// Delete every space in a group
    Rm { name: String },
}

#[derive(Subcommand, Debug)]
pub enum TopicCommands {
    /// Create a topic in a space
    Add {
        space: String,
        title: String,

        #[arg(long, default_value = "")]
        content: String,

        /// Canvas x (defaults to the configured position)
        #[arg(long, requires = "y", allow_negative_numbers = true)]
        x: Option<f64>,

        /// Canvas y
        #[arg(long, requires = "x", allow_negative_numbers = true)]
        y: Option<f64>,
    },

    /// List the topics of a space
    #[command(alias = "ls")]
    List { space: String },

    /// Show a topic with its cards
    Show { id: String },

    /// Change a topic's title or content
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,
    },

    /// Place a topic on the canvas
    #[command(allow_negative_numbers = true)]
    Move { id: String, x: f64, y: f64 },

    /// Delete a topic and its flashcards
    Rm { id: String },
}

#[derive(Subcommand, Debug)]
pub enum CardCommands {
    /// Add a flashcard at the end of a topic
    Add {
        topic: String,
        question: String,
        answer: String,

        #[arg(long)]
        bold: bool,

        #[arg(long)]
        italic: bool,

        /// Text colour as #RGB or #RRGGBB
        #[arg(long)]
        color: Option<String>,
    },

    /// List a topic's cards in order
    #[command(alias = "ls")]
    List {
        topic: String,

        /// Only cards with this status
        #[arg(long, short)]
        status: Option<CardStatus>,
    },

    /// Change a card's text or style
    Edit {
        topic: String,
        card: String,

        #[arg(long)]
        question: Option<String>,

        #[arg(long)]
        answer: Option<String>,

        #[arg(long)]
        bold: Option<bool>,

        #[arg(long)]
        italic: Option<bool>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a card
    Rm { topic: String, card: String },

    /// Rate a card: new, learning, reviewing, mastered (or 1-4)
    Status {
        topic: String,
        card: String,
        status: CardStatus,
    },

    /// Move a card between two positions of the listing
    Move {
        topic: String,

        /// 1-based position in `card list`
        from: usize,

        /// 1-based target position
        to: usize,

        /// Positions refer to the listing under this status filter
        #[arg(long, short)]
        status: Option<CardStatus>,
    },

    /// Put the given cards first, in this order
    Reorder {
        topic: String,

        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Import cards from a JSON file ("-" reads stdin)
    Import { topic: String, file: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn status_parses_names_and_numbers() {
        let cli = Cli::try_parse_from(["cardboard", "card", "status", "t", "c", "3"]).unwrap();
        match cli.command {
            Commands::Card {
                action: CardCommands::Status { status, .. },
            } => assert_eq!(status, CardStatus::Reviewing),
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["cardboard", "learn", "t", "--status", "mastered"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Learn {
                status: Some(CardStatus::Mastered),
                ..
            }
        ));
    }

    #[test]
    fn topic_move_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["cardboard", "topic", "move", "t", "-10", "20.5"]).unwrap();
        match cli.command {
            Commands::Topic {
                action: TopicCommands::Move { x, y, .. },
            } => assert_eq!((x, y), (-10.0, 20.5)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn topic_position_needs_both_axes() {
        assert!(Cli::try_parse_from(["cardboard", "topic", "add", "s", "T", "--x", "3"]).is_err());
    }
}
