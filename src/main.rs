use anyhow::Result;
use bit_filter::areas::repository::Repository;
use bit_filter::artifacts::log::cutoff::parse_cutoff;
use bit_filter::commands::porcelain::log::{DateField, SinceOptions};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bit-filter",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Filter git history by commit date",
    long_about = "Lists the commits reachable from HEAD, following first parents, \
    whose author or committer date is at or after a cutoff.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "since",
        about = "Show commits dated at or after a cutoff",
        long_about = "This command walks the history of HEAD and prints every commit whose date \
        is at or after the cutoff. The cutoff may be epoch milliseconds, RFC 3339, RFC 2822, \
        'YYYY-MM-DD HH:MM:SS +ZZZZ' or 'YYYY-MM-DD'."
    )]
    Since {
        #[arg(index = 1, help = "The cutoff date")]
        date: String,
        #[arg(long, help = "Compare the committer date instead of the author date")]
        committer: bool,
        #[arg(long, help = "Stop at the first commit older than the cutoff")]
        stop: bool,
        #[arg(long, help = "Show each commit on a single line")]
        oneline: bool,
        #[arg(short = 'C', long, help = "The path to the repository")]
        path: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Since {
            date,
            committer,
            stop,
            oneline,
            path,
        } => {
            let path = match path {
                Some(path) => path.clone(),
                None => std::env::current_dir()?.to_string_lossy().to_string(),
            };
            let repository = Repository::new(&path, Box::new(std::io::stdout()))?;

            let opts = SinceOptions {
                cutoff: parse_cutoff(date)?,
                date_field: if *committer {
                    DateField::Committer
                } else {
                    DateField::Author
                },
                stop: *stop,
                oneline: *oneline,
            };

            repository.log_since(&opts)?
        }
    }

    Ok(())
}
