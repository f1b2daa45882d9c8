//! Supervision of the external codegen subprocess.
//!
//! One recording session at a time. Starting a new session while another is
//! live kills the old generator first. On stop, the generated file is read
//! back after a short flush grace period and wrapped into a standalone test.

use std::path::PathBuf;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use webscribe_recorder::formatter;

/// Command line used to launch the code generator. The output path and the
/// target URL are appended at spawn time.
#[derive(Debug, Clone)]
pub struct GeneratorCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for GeneratorCommand {
    fn default() -> Self {
        Self {
            program: "npx".to_string(),
            args: vec![
                "playwright".to_string(),
                "codegen".to_string(),
                "--target".to_string(),
                "javascript".to_string(),
                "--viewport-size=1920,1080".to_string(),
            ],
        }
    }
}

impl GeneratorCommand {
    /// Parses an override of the form `program arg1 arg2 ...`.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace();
        let program = parts.next()?.to_string();
        Some(Self {
            program,
            args: parts.map(String::from).collect(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no recording in progress")]
    NotRecording,

    #[error("failed to stage output directory: {0}")]
    Stage(#[source] std::io::Error),

    #[error("failed to spawn code generator: {0}")]
    Spawn(#[source] std::io::Error),
}

struct CodegenSession {
    child: Child,
    output_path: PathBuf,
    test_name: String,
    // Held so the staging directory outlives the generator process.
    _staging: tempfile::TempDir,
}

#[derive(Default)]
struct ManagerState {
    session: Option<CodegenSession>,
    /// Wrapped output of the most recently stopped session, served to
    /// `/api/code` polls between recordings.
    last_code: Option<String>,
}

/// Owns the single live codegen session, if any.
pub struct SessionManager {
    generator: GeneratorCommand,
    flush_grace: Duration,
    state: Mutex<ManagerState>,
}

impl SessionManager {
    pub fn new(generator: GeneratorCommand) -> Self {
        Self {
            generator,
            flush_grace: Duration::from_secs(2),
            state: Mutex::new(ManagerState::default()),
        }
    }

    #[cfg(test)]
    fn with_flush_grace(mut self, grace: Duration) -> Self {
        self.flush_grace = grace;
        self
    }

    /// Launches a generator pointed at `url`. A session already in flight is
    /// killed and replaced.
    pub async fn start(&self, url: &str, test_name: String) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;

        if let Some(mut stale) = state.session.take() {
            warn!("replacing live recording session");
            let _ = stale.child.start_kill();
        }

        let staging = tempfile::tempdir().map_err(SessionError::Stage)?;
        let output_path = staging.path().join("generated.spec.js");

        let mut command = Command::new(&self.generator.program);
        command
            .args(&self.generator.args)
            .arg("--output")
            .arg(&output_path)
            .arg(url)
            .kill_on_drop(true);

        debug!(program = %self.generator.program, %url, "spawning code generator");
        let child = command.spawn().map_err(SessionError::Spawn)?;

        info!(%url, test_name, "recording session started");
        state.session = Some(CodegenSession {
            child,
            output_path,
            test_name,
            _staging: staging,
        });
        Ok(())
    }

    /// Stops the live session and returns the generated script.
    pub async fn stop(&self) -> Result<String, SessionError> {
        let mut state = self.state.lock().await;
        let mut session = state.session.take().ok_or(SessionError::NotRecording)?;

        // Give the generator a moment to flush its output file.
        tokio::time::sleep(self.flush_grace).await;

        let raw = tokio::fs::read_to_string(&session.output_path)
            .await
            .unwrap_or_default();

        let _ = session.child.start_kill();
        let _ = session.child.wait().await;

        info!(test_name = session.test_name, "recording session stopped");

        let code = if raw.trim().is_empty() {
            "// No code was generated".to_string()
        } else {
            formatter::wrap_generated(&session.test_name, &raw)
        };
        state.last_code = Some(code.clone());
        Ok(code)
    }

    /// Current generated code and whether a session is live. While recording,
    /// the staged file is read as-is (it may still be empty); between
    /// recordings the last stopped session's script is served.
    pub async fn snapshot(&self) -> (String, bool) {
        let state = self.state.lock().await;
        match state.session.as_ref() {
            Some(session) => {
                let code = tokio::fs::read_to_string(&session.output_path)
                    .await
                    .ok()
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| "// Recording in progress...".to_string());
                (code, true)
            }
            None => {
                let code = state
                    .last_code
                    .clone()
                    .unwrap_or_else(|| "// No recording available".to_string());
                (code, false)
            }
        }
    }
}
