//! Agent-backed test generation.
//!
//! Each request gets its own scratch workspace holding the source file. The
//! coding agent runs there as a subprocess; its test file (or a code block in
//! its stdout) becomes the response. Any agent failure falls back to the local
//! template synthesizer, so generation itself never fails.

mod output;
mod prompt;
mod runner;
mod workspace;

pub use output::{extract_code_block, is_test_content};
pub use prompt::build_prompt;
pub use workspace::ScratchWorkspace;

use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use testgen::generator::local_test;
use testgen::protocol::SourcePayload;
use testgen::{analyze, base_name, FileRecord, Framework, GenerationOptions};
use thiserror::Error;
use tokio::process::Command;
use tokio::task;
use tracing::{info, warn};

pub const DEFAULT_AGENT_PROGRAM: &str = "cline";
pub const DEFAULT_AGENT_ARGS: &str = "--yolo --output-format json";
pub const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(120);
/// 50 MB
pub const DEFAULT_MAX_BUFFER: usize = 50 * 1024 * 1024;
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("failed to start agent: {0}")]
    Spawn(#[source] io::Error),
    #[error("failed to read agent output: {0}")]
    Pipe(#[source] io::Error),
    #[error("agent exited with {}: {stderr}", exit_label(.code))]
    Exit { code: Option<i32>, stderr: String },
    #[error("agent timed out after {0:?}")]
    Timeout(Duration),
    #[error("agent output exceeded {limit} bytes")]
    OutputOverflow { limit: usize },
    #[error("agent produced no recognizable test content")]
    NoTestContent,
    #[error("scratch workspace error: {0}")]
    Workspace(#[from] io::Error),
    #[error("blocking workspace task failed: {0}")]
    Join(#[from] task::JoinError),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "signal".to_string(),
    }
}

/// How the agent subprocess is launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Agent executable
    pub program: String,
    /// Arguments placed before the prompt
    pub args: Vec<String>,
    pub timeout: Duration,
    /// Max bytes accepted on stdout or stderr
    pub max_buffer: usize,
    /// Parent directory of per-request workspaces
    pub scratch_root: PathBuf,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_AGENT_PROGRAM.to_string(),
            args: split_args(DEFAULT_AGENT_ARGS),
            timeout: DEFAULT_AGENT_TIMEOUT,
            max_buffer: DEFAULT_MAX_BUFFER,
            scratch_root: std::env::temp_dir(),
        }
    }
}

/// Whitespace-separated argument list
pub fn split_args(args: &str) -> Vec<String> {
    args.split_whitespace().map(str::to_string).collect()
}

/// Which tier produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Agent,
    Template,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Agent => "agent",
            Method::Template => "template",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub content: String,
    pub method: Method,
}

/// Result of probing the agent binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub available: bool,
    pub agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    fn healthy(agent: &str, version: String) -> Self {
        Self {
            status: "healthy",
            available: true,
            agent: agent.to_string(),
            version: Some(version),
            error: None,
        }
    }

    fn unavailable(agent: &str, error: String) -> Self {
        Self {
            status: "unavailable",
            available: false,
            agent: agent.to_string(),
            version: None,
            error: Some(error),
        }
    }

    fn from_output(agent: &str, output: io::Result<std::process::Output>) -> Self {
        match output {
            Ok(out) if out.status.success() => {
                Self::healthy(agent, String::from_utf8_lossy(&out.stdout).trim().to_string())
            }
            Ok(out) => Self::unavailable(
                agent,
                format!(
                    "{} --version failed: {}",
                    agent,
                    String::from_utf8_lossy(&out.stderr).trim()
                ),
            ),
            Err(e) => Self::unavailable(agent, e.to_string()),
        }
    }
}

pub struct AgentService {
    config: AgentConfig,
}

impl AgentService {
    pub fn new(config: AgentConfig) -> Self {
        Self { config }
    }

    /// Produce a test for `file`: agent first, template on any agent failure
    pub async fn generate(
        &self,
        file: &SourcePayload,
        framework: Framework,
        options: &GenerationOptions,
    ) -> Generated {
        info!("Generating test for: {}", file.name);
        match self.run_agent(file, framework, options).await {
            Ok(content) => Generated {
                content,
                method: Method::Agent,
            },
            Err(e) => {
                warn!("{}; using template fallback for {}", e, file.name);
                Generated {
                    content: template_fallback(file, framework, options),
                    method: Method::Template,
                }
            }
        }
    }

    async fn run_agent(
        &self,
        file: &SourcePayload,
        framework: Framework,
        options: &GenerationOptions,
    ) -> Result<String, AgentError> {
        let root = self.config.scratch_root.clone();
        let (name, content) = (file.name.clone(), file.content.clone());
        let (workspace, source_name) = task::spawn_blocking(move || -> io::Result<_> {
            let workspace = ScratchWorkspace::create(&root)?;
            let source = workspace.write_source(&name, &content)?;
            let source_name = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok((workspace, source_name))
        })
        .await??;

        let expected = framework.test_filename(base_name(&source_name));
        let analysis = analyze(&file.content);
        let prompt = build_prompt(&source_name, &analysis, framework, options, &expected);

        let stdout = runner::run(&self.config, workspace.path(), &prompt).await;
        // Recovery walks the workspace and dropping it removes the directory;
        // both stay off the async workers.
        let recovered = task::spawn_blocking(move || {
            let found = stdout.map(|out| output::recover(workspace.path(), &expected, &out));
            drop(workspace);
            found
        })
        .await??;
        recovered.ok_or(AgentError::NoTestContent)
    }

    /// Run `<agent> --version` with a short deadline
    pub async fn health(&self) -> HealthReport {
        let program = &self.config.program;
        let probe = Command::new(program)
            .arg("--version")
            .kill_on_drop(true)
            .output();
        match tokio::time::timeout(HEALTH_TIMEOUT, probe).await {
            Ok(output) => HealthReport::from_output(program, output),
            Err(_) => HealthReport::unavailable(
                program,
                format!("{} --version timed out after {:?}", program, HEALTH_TIMEOUT),
            ),
        }
    }
}

/// Template tier. Renders from a minimal placeholder source named after the
/// file, one exported function, whatever the request carried.
pub fn template_fallback(
    file: &SourcePayload,
    framework: Framework,
    options: &GenerationOptions,
) -> String {
    let content = placeholder_source(base_name(&file.name));
    let path = file.path.clone().unwrap_or_else(|| file.name.clone());
    let record = FileRecord::new(file.name.clone(), path, file.name.clone(), content);
    local_test(&record, framework, options)
}

fn placeholder_source(base: &str) -> String {
    let mut ident: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    format!("export function {}() {{}}\n", ident)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn payload(name: &str, content: &str) -> SourcePayload {
        SourcePayload {
            name: name.to_string(),
            content: content.to_string(),
            path: None,
        }
    }

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.program, "cline");
        assert_eq!(config.args, vec!["--yolo", "--output-format", "json"]);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.max_buffer, 50 * 1024 * 1024);
    }

    #[test]
    fn test_placeholder_source() {
        assert_eq!(placeholder_source("math"), "export function math() {}\n");
        assert_eq!(placeholder_source("my-util"), "export function my_util() {}\n");
        assert_eq!(placeholder_source("1st"), "export function _1st() {}\n");
    }

    #[test]
    fn test_template_fallback_ignores_request_content() {
        let file = payload("math.js", "export function add(a,b) { return a+b; }");
        let content = template_fallback(&file, Framework::Jest, &GenerationOptions::default());
        assert!(content.contains("import { math } from './math';"));
        assert!(content.contains("describe('math'"));
        assert!(!content.contains("describe('add'"));
    }

    #[test]
    fn test_template_fallback_placeholder_for_empty_content() {
        let file = payload("widget.js", "  ");
        let content = template_fallback(&file, Framework::Jest, &GenerationOptions::default());
        assert!(content.contains("describe('widget'"));
        assert!(content.contains("import { widget } from './widget';"));
    }

    #[test]
    fn test_exit_error_display() {
        let err = AgentError::Exit {
            code: Some(2),
            stderr: "bad flag".into(),
        };
        assert_eq!(err.to_string(), "agent exited with status 2: bad flag");
    }

    #[cfg(unix)]
    #[test]
    fn test_health_report_from_output() {
        use std::os::unix::process::ExitStatusExt;
        use std::process::{ExitStatus, Output};

        let ok = Output {
            status: ExitStatus::from_raw(0),
            stdout: b"cline 1.2.3\n".to_vec(),
            stderr: vec![],
        };
        let report = HealthReport::from_output("cline", Ok(ok));
        assert_eq!(report.status, "healthy");
        assert!(report.available);
        assert_eq!(report.version.as_deref(), Some("cline 1.2.3"));

        let failed = Output {
            status: ExitStatus::from_raw(1 << 8),
            stdout: vec![],
            stderr: b"unknown option".to_vec(),
        };
        let report = HealthReport::from_output("cline", Ok(failed));
        assert!(!report.available);
        assert!(report.error.unwrap().contains("unknown option"));
    }

    #[tokio::test]
    async fn test_health_missing_binary() {
        let service = AgentService::new(AgentConfig {
            program: "testgen-no-such-agent".to_string(),
            ..AgentConfig::default()
        });
        let report = service.health().await;
        assert_eq!(report.status, "unavailable");
        assert!(!report.available);
        assert_eq!(report.agent, "testgen-no-such-agent");
    }

    #[cfg(unix)]
    mod subprocess {
        use super::*;

        const SUITE: &str = "describe('math', () => { test('adds', () => {}); });";

        fn service(root: &TempDir, script: &str) -> AgentService {
            AgentService::new(AgentConfig {
                program: "sh".to_string(),
                args: vec!["-c".to_string(), script.to_string(), "agent".to_string()],
                scratch_root: root.path().to_path_buf(),
                ..AgentConfig::default()
            })
        }

        fn assert_scratch_empty(root: &TempDir) {
            assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
        }

        fn math() -> SourcePayload {
            payload("math.js", "export function add(a,b) { return a+b; }")
        }

        #[tokio::test]
        async fn test_agent_writes_expected_file() {
            let root = TempDir::new().unwrap();
            let script = format!("test -f math.js && printf \"%s\" \"{}\" > math.test.js", SUITE);
            let out = service(&root, &script)
                .generate(&math(), Framework::Jest, &GenerationOptions::default())
                .await;
            assert_eq!(out.method, Method::Agent);
            assert_eq!(out.content, SUITE);
            assert_scratch_empty(&root);
        }

        #[tokio::test]
        async fn test_agent_stdout_json() {
            let root = TempDir::new().unwrap();
            let script = r#"printf '%s\n' '{"type":"say","text":"```js\ndescribe(1, () => {})\n```"}'"#;
            let out = service(&root, script)
                .generate(&math(), Framework::Jest, &GenerationOptions::default())
                .await;
            assert_eq!(out.method, Method::Agent);
            assert_eq!(out.content, "describe(1, () => {})");
            assert_scratch_empty(&root);
        }

        #[tokio::test]
        async fn test_failures_fall_back_to_template() {
            let expected = template_fallback(&math(), Framework::Vitest, &GenerationOptions::default());
            assert!(expected.contains("describe('math'"));
            for script in ["exit 3", "echo nothing useful", "head -c 100 /dev/zero"] {
                let root = TempDir::new().unwrap();
                let mut svc = service(&root, script);
                svc.config.max_buffer = 64;
                let out = svc
                    .generate(&math(), Framework::Vitest, &GenerationOptions::default())
                    .await;
                assert_eq!(out.method, Method::Template, "script: {}", script);
                assert_eq!(out.content, expected);
                assert_scratch_empty(&root);
            }
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
        async fn test_crowded_workspace_is_recovered_and_removed() {
            let root = TempDir::new().unwrap();
            let script = format!(
                "for d in 1 2 3 4 5; do mkdir -p out/$d; for f in 1 2 3 4 5 6 7 8; do echo x > out/$d/f$f.txt; done; done; \
                 mkdir -p out/zz && printf \"%s\" \"{}\" > out/zz/math.spec.js",
                SUITE
            );
            let out = service(&root, &script)
                .generate(&math(), Framework::Jest, &GenerationOptions::default())
                .await;
            assert_eq!(out.method, Method::Agent);
            assert_eq!(out.content, SUITE);
            assert_scratch_empty(&root);
        }

        #[tokio::test]
        async fn test_timeout_falls_back_and_cleans_up() {
            let root = TempDir::new().unwrap();
            let mut svc = service(&root, "sleep 5");
            svc.config.timeout = Duration::from_millis(200);
            let err = svc
                .run_agent(&math(), Framework::Jest, &GenerationOptions::default())
                .await
                .unwrap_err();
            assert!(matches!(err, AgentError::Timeout(_)));
            assert_scratch_empty(&root);
        }

        #[tokio::test]
        async fn test_no_content_error() {
            let root = TempDir::new().unwrap();
            let err = service(&root, "true")
                .run_agent(&math(), Framework::Jest, &GenerationOptions::default())
                .await
                .unwrap_err();
            assert!(matches!(err, AgentError::NoTestContent));
            assert_scratch_empty(&root);
        }
    }
}
