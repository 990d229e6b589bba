use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::core::ItemType;
use crate::storage::DriverGeneration;

#[derive(Parser)]
#[command(name = "clipstash")]
#[command(about = "Clipboard history store and action engine")]
#[command(long_about = "clipstash - clipboard history store and action engine

Keeps clipboard history in an embedded SQLite database and decides which
user-defined actions apply to each entry.

QUICK START:
  clipstash history add \"hello\"           Store an entry
  clipstash history list --type link      List stored links
  clipstash actions match 3               Actions applicable to entry 3
  clipstash actions run paste-as-path 3   Run an action on entry 3
  clipstash actions upgrade               Add new bundled actions

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

Settings are read from ~/.clipstash/config.yaml; flags take precedence.")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output,
    /// or 'json' for machine-readable output suitable for scripting.
    /// Defaults to the `general.output` setting.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Database driver generation
    ///
    /// 'modern' runs statements directly with bound parameters,
    /// 'legacy' submits them as jobs and polls for the result.
    #[arg(long, value_enum, global = true, env = "CLIPSTASH_DRIVER")]
    pub driver: Option<DriverGeneration>,

    /// Database file (default: ~/.clipstash/clipstash.db)
    #[arg(long, global = true, env = "CLIPSTASH_DATABASE")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage clipboard history entries
    ///
    /// # Examples
    ///
    ///   clipstash history list                 Newest entries first
    ///   clipstash history list --search foo    Entries containing "foo"
    ///   echo hi | clipstash history add        Store stdin
    ///   clipstash history clear                Keep pinned and tagged entries
    #[command(alias = "h")]
    History(HistoryArgs),

    /// Inspect and run actions
    ///
    /// Actions are read from ~/.clipstash/actions.json. Set
    /// CLIPSTASH_ACTIONS=default to use the bundled actions instead,
    /// or to a path to use another file.
    #[command(alias = "a")]
    Actions(ActionsArgs),

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   clipstash completions bash > /etc/bash_completion.d/clipstash
    ///   clipstash completions zsh > ~/.zfunc/_clipstash
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommands,
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List entries, newest first
    #[command(alias = "ls")]
    List(ListArgs),

    /// Store a new entry
    ///
    /// Reads the content from stdin when no content argument is given.
    Add(AddArgs),

    /// Show one entry
    Show {
        /// Entry id
        id: i64,
    },

    /// Set or clear the tag of an entry
    Tag {
        /// Entry id
        id: i64,
        /// New tag; omit to clear the tag
        tag: Option<String>,
    },

    /// Pin or unpin an entry
    Pin {
        /// Entry id
        id: i64,
        /// Unpin instead
        #[arg(long)]
        unpin: bool,
    },

    /// Delete an entry
    #[command(alias = "rm")]
    Delete {
        /// Entry id
        id: i64,
    },

    /// Clear the history
    ///
    /// Pinned and tagged entries are kept unless --all is given.
    Clear {
        /// Delete pinned and tagged entries too
        #[arg(long)]
        all: bool,
    },
}

#[derive(Args)]
pub struct ListArgs {
    /// Only entries of this type
    #[arg(short = 't', long = "type")]
    pub item_type: Option<ItemType>,

    /// Only entries with this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Only entries containing this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only pinned entries
    #[arg(long)]
    pub pinned: bool,

    /// Maximum number of entries
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Entry content
    pub content: Option<String>,

    /// Entry type
    #[arg(short = 't', long = "type", default_value = "text")]
    pub item_type: ItemType,

    /// Tag for the entry
    #[arg(long)]
    pub tag: Option<String>,

    /// Pin the entry
    #[arg(long)]
    pub pinned: bool,

    /// Language id of a code entry, e.g. "rust"
    #[arg(long, requires = "language_name")]
    pub language: Option<String>,

    /// Display name of the language, e.g. "Rust"
    #[arg(long, requires = "language")]
    pub language_name: Option<String>,
}

#[derive(Args)]
pub struct ActionsArgs {
    #[command(subcommand)]
    pub command: ActionsCommands,
}

#[derive(Subcommand)]
pub enum ActionsCommands {
    /// List configured actions
    #[command(alias = "ls")]
    List,

    /// List the actions applicable to an entry
    Match(EntryTarget),

    /// Run an action on an entry
    ///
    /// Command actions run through `sh -c`; capture groups of the action's
    /// pattern are passed as $0, $1, ... and the content is written to stdin.
    Run {
        /// Action id
        action: String,

        #[command(flatten)]
        target: EntryTarget,

        /// Print the command instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Add new bundled actions to the action configuration
    ///
    /// Existing actions, their order and the defaults are left untouched.
    /// The previous file is kept as actions.json~.
    Upgrade {
        /// Report what would be added without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the path of the action configuration file
    Path,
}

/// An entry to evaluate actions against: a stored entry or ad-hoc content.
#[derive(Args)]
pub struct EntryTarget {
    /// Stored entry id
    #[arg(conflicts_with = "content")]
    pub id: Option<i64>,

    /// Ad-hoc content instead of a stored entry
    #[arg(short, long)]
    pub content: Option<String>,

    /// Type of the ad-hoc content
    #[arg(short = 't', long = "type", default_value = "text")]
    pub item_type: ItemType,
}
