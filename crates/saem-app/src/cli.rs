use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use saem_types::{ContentOrigin, EntryKind};

#[derive(Debug, Parser)]
#[command(
    name = "saem",
    about = "Bulk fetcher for the 우리말샘 open dictionary",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download entries for explicit identifiers
    Fetch(FetchArgs),
    /// Resolve a text query to entry identifiers
    Search(SearchArgs),
    /// Search, then download every match
    Download(DownloadArgs),
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Identifiers, comma separated
    #[arg(long, value_delimiter = ',')]
    pub ids: Vec<String>,

    /// File with one identifier per line
    #[arg(long)]
    pub ids_file: Option<PathBuf>,

    #[command(flatten)]
    pub sink: SinkArgs,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text to search for
    pub query: String,

    /// Part of the dictionary to search
    #[arg(long, value_enum, default_value_t = KindArg::Vocabulary)]
    pub kind: KindArg,

    /// Match anywhere in the entry instead of the whole word
    #[arg(long)]
    pub partial: bool,

    /// Which content origin to include
    #[arg(long, value_enum, default_value_t = OriginArg::All)]
    pub origin: OriginArg,
}

#[derive(Debug, Args)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub search: SearchArgs,

    #[command(flatten)]
    pub sink: SinkArgs,
}

#[derive(Debug, Args)]
pub struct SinkArgs {
    /// Write records to this file as a JSON array instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Append failed identifiers to this file
    #[arg(long)]
    pub errors: Option<PathBuf>,

    /// Worker count, defaults to the available cores
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Field keys to leave out of the records, comma separated
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Suppress the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Vocabulary,
    Idiom,
    Definition,
    Usage,
}

impl From<KindArg> for EntryKind {
    fn from(kind: KindArg) -> EntryKind {
        match kind {
            KindArg::Vocabulary => EntryKind::Vocabulary,
            KindArg::Idiom => EntryKind::Idiom,
            KindArg::Definition => EntryKind::Definition,
            KindArg::Usage => EntryKind::Usage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OriginArg {
    All,
    Expert,
    User,
}

impl From<OriginArg> for ContentOrigin {
    fn from(origin: OriginArg) -> ContentOrigin {
        match origin {
            OriginArg::All => ContentOrigin::All,
            OriginArg::Expert => ContentOrigin::ExpertOnly,
            OriginArg::User => ContentOrigin::UserOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_args_parse_ids_and_excludes() {
        let cli = Cli::try_parse_from([
            "saem",
            "fetch",
            "--ids",
            "1,2,3",
            "--exclude",
            "hand_no,related",
            "--workers",
            "4",
            "--quiet",
        ])
        .unwrap();

        let Command::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.ids, ["1", "2", "3"]);
        assert_eq!(args.sink.exclude, ["hand_no", "related"]);
        assert_eq!(args.sink.workers, Some(4));
        assert!(args.sink.quiet);
        assert!(args.ids_file.is_none());
    }

    #[test]
    fn search_defaults_to_exact_vocabulary_over_all_origins() {
        let cli = Cli::try_parse_from(["saem", "search", "누리"]).unwrap();

        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.query, "누리");
        assert_eq!(args.kind, KindArg::Vocabulary);
        assert!(!args.partial);
        assert_eq!(args.origin, OriginArg::All);
    }

    #[test]
    fn download_takes_search_and_sink_flags_together() {
        let cli = Cli::try_parse_from([
            "saem", "download", "누리", "--kind", "idiom", "--origin", "expert", "--output",
            "out.json",
        ])
        .unwrap();

        let Command::Download(args) = cli.command else {
            panic!("expected download");
        };
        assert_eq!(args.search.kind, KindArg::Idiom);
        assert_eq!(args.search.origin, OriginArg::Expert);
        assert_eq!(args.sink.output.as_deref(), Some("out.json".as_ref()));
    }
}
