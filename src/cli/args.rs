use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "carcompare",
    version,
    about = "car insurance and leasing comparison page generator",
    long_about = "carcompare loads the car insurance and leasing offer datasets, renders them as desktop cards, mobile cards and a comparison table, and writes a static page with FAQ, navigation and structured data.\n\nExamples:\n  carcompare --base ./data -o index.html\n  carcompare --base https://example.dk/data/ --format json\n  carcompare --migrate data/bilforsikring.json data/leasing.json\n\nTip: Use --init-config to write ~/.carcompare/config.yml and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence."
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "qt",
        visible_alias = "quiet",
        help_heading = "Output",
        help = "Hide the progress bar and the run summary."
    )]
    pub quiet: bool,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the result to FILE instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'F',
        long = "fmt",
        visible_alias = "format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format: html, json or text (inferred from --output when omitted)."
    )]
    pub format: Option<String>,

    #[arg(
        short = 'I',
        long = "ins",
        visible_alias = "insurance",
        value_name = "RESOURCE",
        help_heading = "Input",
        help = "Insurance dataset: file, path or URL (default bilforsikring.json)."
    )]
    pub insurance: Option<String>,

    #[arg(
        short = 'L',
        long = "lea",
        visible_alias = "leasing",
        value_name = "RESOURCE",
        help_heading = "Input",
        help = "Leasing dataset: file, path or URL (default leasing.json)."
    )]
    pub leasing: Option<String>,

    #[arg(
        short = 'b',
        long = "base",
        visible_alias = "base-url",
        value_name = "DIR|URL",
        help_heading = "Input",
        help = "Directory or URL that relative dataset names are resolved against."
    )]
    pub base: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.carcompare/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Input",
        help = "Write a default config file (if missing) and exit."
    )]
    pub init_config: bool,

    #[arg(
        long = "mig",
        visible_alias = "migrate",
        value_name = "FILE",
        num_args = 1..,
        action = ArgAction::Append,
        help_heading = "Input",
        help = "Rewrite local dataset files in the current schema and exit."
    )]
    pub migrate: Vec<String>,

    #[arg(
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Per-request timeout in seconds (default 10)."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long = "nr",
        visible_alias = "no-retry",
        help_heading = "HTTP",
        help = "Do not retry transient failures."
    )]
    pub no_retry: bool,

    #[arg(
        long = "fp",
        visible_alias = "failure-policy",
        value_name = "POLICY",
        help_heading = "Page",
        help = "What a section shows when its dataset fails: notice or silent (default notice)."
    )]
    pub failure_policy: Option<String>,

    #[arg(
        short = 't',
        long = "ttl",
        visible_alias = "title",
        value_name = "TEXT",
        help_heading = "Page",
        help = "Page title."
    )]
    pub title: Option<String>,

    #[arg(
        long = "css",
        visible_alias = "stylesheet",
        value_name = "HREF",
        help_heading = "Page",
        help = "Stylesheet linked from the page (default styles.css, empty string for none)."
    )]
    pub stylesheet: Option<String>,
}
