use cucumber::World;
use httpdiff::artifacts::ArtifactWriter;
use httpdiff::cmd_args::CommandLineArgs;
use httpdiff::config::{Profile, Settings};
use httpdiff::{AppController, ComparisonOutcome, TargetIndex};
use tempfile::TempDir;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// What one mocked target will answer with
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Default for StubResponse {
    fn default() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: String::new(),
        }
    }
}

/// Where a target points
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetKind {
    Mock,
    Unreachable,
    Omitted,
}

/// Holds two mock servers, the flags for the run and what came out of it
#[derive(World)]
#[world(init = Self::new)]
pub struct HttpDiffWorld {
    pub stubs: [StubResponse; 2],
    pub kinds: [TargetKind; 2],
    pub servers: Vec<MockServer>,

    /// Extra CLI flags for the run
    pub cli_flags: Vec<String>,

    /// Headers to ignore, always including Date
    pub ignored: Vec<String>,

    pub artifact_dir: TempDir,

    pub output: String,
    pub outcome: Option<ComparisonOutcome>,
    pub config_error: Option<String>,
}

impl std::fmt::Debug for HttpDiffWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDiffWorld")
            .field("kinds", &self.kinds)
            .field("cli_flags", &self.cli_flags)
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl HttpDiffWorld {
    pub fn new() -> Self {
        Self {
            stubs: [StubResponse::default(), StubResponse::default()],
            kinds: [TargetKind::Mock; 2],
            servers: Vec::new(),
            cli_flags: Vec::new(),
            ignored: vec!["Date".to_string()],
            artifact_dir: tempfile::tempdir().expect("Failed to create artifact dir"),
            output: String::new(),
            outcome: None,
            config_error: None,
        }
    }

    /// Cucumber numbers targets from 1
    pub fn target(n: usize) -> TargetIndex {
        match n {
            1 => TargetIndex::First,
            2 => TargetIndex::Second,
            _ => panic!("There are only targets 1 and 2, got {n}"),
        }
    }

    pub fn stub_mut(&mut self, n: usize) -> &mut StubResponse {
        &mut self.stubs[Self::target(n).as_usize()]
    }

    pub fn server(&self, n: usize) -> &MockServer {
        &self.servers[Self::target(n).as_usize()]
    }

    async fn start_server(stub: &StubResponse) -> MockServer {
        let server = MockServer::start().await;
        let mut template = ResponseTemplate::new(stub.status).set_body_string(stub.body.clone());
        for (name, value) in &stub.headers {
            template = template.append_header(name.as_str(), value.as_str());
        }
        Mock::given(any())
            .respond_with(template)
            .mount(&server)
            .await;
        server
    }

    fn closed_port_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        let port = listener.local_addr().expect("No local addr").port();
        drop(listener);
        format!("http://127.0.0.1:{port}/")
    }

    /// Start both targets and run the comparison the way the binary does
    pub async fn run_comparison(&mut self) {
        let mut urls = Vec::new();
        for (stub, kind) in self.stubs.iter().zip(self.kinds) {
            let server = Self::start_server(stub).await;
            match kind {
                TargetKind::Mock => urls.push(format!("{}/", server.uri())),
                TargetKind::Unreachable => urls.push(Self::closed_port_url()),
                TargetKind::Omitted => {}
            }
            self.servers.push(server);
        }

        let mut argv = vec![
            "httpdiff".to_string(),
            "--mono".to_string(),
            "--ignore".to_string(),
            self.ignored.join(","),
        ];
        argv.extend(self.cli_flags.iter().cloned());
        argv.extend(urls);
        tracing::debug!("Running {:?}", argv);

        let args = CommandLineArgs::parse_from(argv);
        let settings = match Settings::resolve(&args, &Profile::default()) {
            Ok(settings) => settings,
            Err(err) => {
                self.config_error = Some(err.to_string());
                return;
            }
        };

        let app = AppController::new(settings)
            .expect("Failed to build controller")
            .with_artifact_writer(ArtifactWriter::in_dir(self.artifact_dir.path()));
        let mut out = Vec::new();
        let outcome = app.run(&mut out).await.expect("Failed to write report");

        self.output = String::from_utf8(out).expect("Report is not UTF-8");
        self.outcome = Some(outcome);
    }

    /// Exit code the binary would use
    pub fn exit_code(&self) -> i32 {
        match (&self.outcome, &self.config_error) {
            (Some(outcome), _) => outcome.exit_code(),
            (None, Some(_)) => httpdiff::outcome::EXIT_FATAL,
            (None, None) => panic!("No comparison has been run"),
        }
    }

    pub fn artifact_count(&self) -> usize {
        std::fs::read_dir(self.artifact_dir.path())
            .expect("Failed to read artifact dir")
            .count()
    }
}

impl Default for HttpDiffWorld {
    fn default() -> Self {
        Self::new()
    }
}
