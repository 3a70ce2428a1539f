use std::ffi::OsString;
use std::path::PathBuf;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "httpdiff",
    version,
    about = "Performs two HTTP requests and diffs the responses",
    long_about = None
)]
struct ClapArgs {
    /// HTTP method. Defaults to GET, or the profile's method.
    #[clap(short = 'X', long, help = "Sets the HTTP method")]
    method: Option<String>,

    /// Request body. Only sent for POST and PUT.
    #[clap(short = 'd', long, help = "Sets body data to send server")]
    body: Option<String>,

    #[clap(long, help = "Sets the Host header sent with both requests")]
    host: Option<String>,

    #[clap(short = 'i', long, help = "Comma-separated list of headers to ignore")]
    ignore: Option<String>,

    #[clap(short = 'm', long, help = "Monochrome output")]
    mono: bool,

    #[clap(short = 'A', long, help = "Sets User-Agent [default: httpdiff/0.1]")]
    agent: Option<String>,

    #[clap(short = 'k', long, help = "Allow connection to HTTPS sites without certs")]
    insecure: bool,

    #[clap(
        long,
        value_name = "PROGRAM",
        help = "The diff application to call when response bodies are different"
    )]
    diffapp: Option<String>,

    /// `Name: Value`. May be given more than once.
    #[clap(
        short = 'H',
        long = "header",
        value_name = "HEADER",
        help = "HTTP header to add to request (repeatable)"
    )]
    header: Vec<String>,

    #[clap(
        long = "headers",
        value_name = "FILE",
        help = "File containing HTTP headers (one per line) to add to request"
    )]
    header_file: Option<PathBuf>,

    #[clap(short = 't', long, value_name = "SECONDS", help = "Per-request timeout")]
    timeout: Option<u64>,

    /// Profile name
    /// Optional. Profile section to read defaults from. Default is 'default'.
    /// A missing profile is not an error.
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,

    #[clap(short = 'j', long, help = "Print the report as JSON")]
    json: bool,

    #[clap(
        short = 'v',
        long,
        help = "Print verbose message",
        default_value = "false"
    )]
    verbose: bool,

    /// The two URLs to compare
    #[clap(value_name = "URL")]
    urls: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CommandLineArgs {
    method: Option<String>,
    body: Option<String>,
    host: Option<String>,
    ignore: Option<String>,
    mono: bool,
    agent: Option<String>,
    insecure: bool,
    diffapp: Option<String>,
    headers: Vec<String>,
    header_file: Option<PathBuf>,
    timeout: Option<u64>,
    profile: String,
    json: bool,
    verbose: bool,
    urls: Vec<String>,
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        Self {
            method: args.method,
            body: args.body,
            host: args.host,
            ignore: args.ignore,
            mono: args.mono,
            agent: args.agent,
            insecure: args.insecure,
            diffapp: args.diffapp,
            headers: args.header,
            header_file: args.header_file,
            timeout: args.timeout,
            profile: args.profile,
            json: args.json,
            verbose: args.verbose,
            urls: args.urls,
        }
    }
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        ClapArgs::parse().into()
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        ClapArgs::parse_from(itr).into()
    }

    /// Like `parse_from` but returns clap's error instead of exiting
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        ClapArgs::try_parse_from(itr).map(Into::into)
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn ignore(&self) -> Option<&str> {
        self.ignore.as_deref()
    }

    pub fn mono(&self) -> bool {
        self.mono
    }

    pub fn agent(&self) -> Option<&str> {
        self.agent.as_deref()
    }

    pub fn insecure(&self) -> bool {
        self.insecure
    }

    pub fn diffapp(&self) -> Option<&str> {
        self.diffapp.as_deref()
    }

    /// Raw `-H` values, in command-line order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn header_file(&self) -> Option<&PathBuf> {
        self.header_file.as_ref()
    }

    pub fn timeout(&self) -> Option<u64> {
        self.timeout
    }

    pub fn profile(&self) -> &String {
        &self.profile
    }

    pub fn json(&self) -> bool {
        self.json
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }
}
