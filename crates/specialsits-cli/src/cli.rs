use clap::{Parser, Subcommand};

/// SpecialSits - SEC filing extraction system
#[derive(Parser, Debug)]
#[command(name = "specialsits")]
#[command(about = "Extract odd-lot tender offer terms from SEC filings", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the structured extraction over a dataset's filings
    Extract(ExtractArgs),

    /// Ask a free-form question over a dataset's filings
    Ask(AskArgs),

    /// Show dataset summaries from the mapper files
    Status(StatusArgs),

    /// Run the extraction on a recurring schedule
    Schedule(ScheduleArgs),
}

/// How a multi-field schema is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExtractionModeArg {
    /// One retrieval + one LLM call per field
    Isolated,
    /// One retrieval + one LLM call for the whole record
    Joint,
}

#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Dataset to extract from (oddlots or spinoffs)
    #[arg(long, default_value = "oddlots")]
    pub dataset: String,

    /// Only load filings whose file name contains this substring
    #[arg(long)]
    pub filter: Option<String>,

    /// Extraction mode
    #[arg(long, value_enum, default_value = "isolated")]
    pub mode: ExtractionModeArg,

    /// Feed the whole document set into the prompt instead of retrieving
    #[arg(long)]
    pub whole_document: bool,

    /// Number of chunks to retrieve per query (defaults to configuration)
    #[arg(long, short = 'k')]
    pub top_k: Option<usize>,

    /// Enrich chunks with LLM-generated context before indexing
    #[arg(long)]
    pub contextual: bool,
}

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The question to ask (omit with --interactive to start a chat session)
    pub question: Option<String>,

    /// Dataset to ask over (oddlots or spinoffs)
    #[arg(long, default_value = "oddlots")]
    pub dataset: String,

    /// Only load filings whose file name contains this substring
    #[arg(long)]
    pub filter: Option<String>,

    /// Feed the whole document set into the prompt instead of retrieving
    #[arg(long)]
    pub whole_document: bool,

    /// Number of chunks to retrieve per query (defaults to configuration)
    #[arg(long, short = 'k')]
    pub top_k: Option<usize>,

    /// Interactive chat loop (type exit, quit, bye, or stop to leave)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Show only this dataset (oddlots or spinoffs)
    #[arg(long)]
    pub dataset: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ScheduleArgs {
    /// Hours between scheduled runs
    #[arg(long, default_value = "24")]
    pub every_hours: u64,

    /// Seconds to wait before the single retry after a failed run
    #[arg(long, default_value = "300")]
    pub retry_delay_secs: u64,

    #[command(flatten)]
    pub extract: ExtractArgs,
}
