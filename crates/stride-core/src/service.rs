//! Roadmap generation and redistribution collaborators.
//!
//! The engine never talks to a language model directly. It consumes a
//! [`RoadmapService`], which either returns a payload in the fixed schema or
//! fails. [`CommandRoadmapService`] adapts any external program that speaks
//! JSON on stdin/stdout.

use std::{future::Future, io, process::Stdio, time::Duration};

use log::debug;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{io::AsyncWriteExt, process::Command};

use crate::{
    error::{GoalError, Result},
    models::{RedistributionRequest, RedistributionResponse, Roadmap, RoadmapRequest},
    progress::redistribute,
};

/// Environment variable telling a command which operation is requested.
pub const OPERATION_ENV: &str = "STRIDE_OPERATION";

/// External roadmap collaborator.
pub trait RoadmapService: Send + Sync {
    /// Generates a roadmap for a goal.
    fn generate_roadmap(
        &self,
        request: &RoadmapRequest,
    ) -> impl Future<Output = Result<Roadmap>> + Send;

    /// Rebalances incomplete tasks. Defaults to the local algorithm.
    fn redistribute_tasks(
        &self,
        request: &RedistributionRequest,
    ) -> impl Future<Output = Result<RedistributionResponse>> + Send {
        let response = redistribute(request);
        async move { Ok(response) }
    }
}

/// An absent service: generation fails with a configuration error and
/// redistribution falls back to the local algorithm.
impl<S: RoadmapService> RoadmapService for Option<S> {
    async fn generate_roadmap(&self, request: &RoadmapRequest) -> Result<Roadmap> {
        match self {
            Some(service) => service.generate_roadmap(request).await,
            None => Err(GoalError::Configuration {
                message: "no roadmap generator configured".to_string(),
            }),
        }
    }

    async fn redistribute_tasks(
        &self,
        request: &RedistributionRequest,
    ) -> Result<RedistributionResponse> {
        match self {
            Some(service) => service.redistribute_tasks(request).await,
            None => Ok(redistribute(request)),
        }
    }
}

/// Runs an external program per request.
///
/// The request JSON is written to the program's stdin and the response JSON
/// read from its stdout. [`OPERATION_ENV`] is set to `generate` or
/// `redistribute`. With `delegate_redistribution` off, redistribution is
/// computed locally and the program only handles generation.
#[derive(Debug, Clone)]
pub struct CommandRoadmapService {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
    delegate_redistribution: bool,
}

impl CommandRoadmapService {
    /// Creates a service running `program` with no extra arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
            delegate_redistribution: false,
        }
    }

    /// Extra arguments passed on every invocation.
    pub fn with_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Kills the program and reports a transient failure after `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends redistribution requests to the program as well.
    pub fn with_delegated_redistribution(mut self, delegate: bool) -> Self {
        self.delegate_redistribution = delegate;
        self
    }

    async fn invoke<Req, Resp>(&self, operation: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_vec(request)?;
        debug!("invoking {} for {operation}", self.program);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(OPERATION_ENV, operation)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                let message = format!("failed to start {}: {e}", self.program);
                match e.kind() {
                    io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                        GoalError::Configuration { message }
                    }
                    _ => GoalError::transient(message),
                }
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| GoalError::transient("generator stdin unavailable"))?;
        stdin
            .write_all(&payload)
            .await
            .map_err(|e| GoalError::transient(format!("failed to send request: {e}")))?;
        drop(stdin);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| GoalError::transient(format!("generator timed out after {limit:?}")))?,
            None => child.wait_with_output().await,
        }
        .map_err(|e| GoalError::transient(format!("failed to read generator output: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GoalError::generation(format!(
                "generator exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| GoalError::generation(format!("malformed generator response: {e}")))
    }
}

impl RoadmapService for CommandRoadmapService {
    async fn generate_roadmap(&self, request: &RoadmapRequest) -> Result<Roadmap> {
        self.invoke("generate", request).await
    }

    async fn redistribute_tasks(
        &self,
        request: &RedistributionRequest,
    ) -> Result<RedistributionResponse> {
        if self.delegate_redistribution {
            self.invoke("redistribute", request).await
        } else {
            Ok(redistribute(request))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, models::RoadmapDay};

    fn shell(script: &str) -> CommandRoadmapService {
        CommandRoadmapService::new("sh").with_args(["-c", script])
    }

    fn request() -> RoadmapRequest {
        RoadmapRequest {
            goal: "Learn to juggle".to_string(),
            days: 1,
        }
    }

    #[tokio::test]
    async fn test_parses_program_output() {
        let service = shell(
            r#"cat > /dev/null; echo '{"title":"Juggling","durationDays":1,"days":[{"day":1,"tasks":["Two balls"]}]}'"#,
        );
        let roadmap = service.generate_roadmap(&request()).await.unwrap();
        assert_eq!(roadmap.title, "Juggling");
        assert_eq!(roadmap.days[0].tasks, vec!["Two balls"]);
    }

    #[tokio::test]
    async fn test_request_is_sent_on_stdin() {
        // echo the goal back as the title
        let service = shell(
            r#"goal=$(sed -n 's/.*"goal":"\([^"]*\)".*/\1/p'); printf '{"title":"%s","durationDays":1,"days":[{"day":1,"tasks":["x"]}]}' "$goal""#,
        );
        let roadmap = service.generate_roadmap(&request()).await.unwrap();
        assert_eq!(roadmap.title, "Learn to juggle");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_generation_failure() {
        let service = shell("cat > /dev/null; echo 'quota exceeded' >&2; exit 3");
        let err = service.generate_roadmap(&request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_generation_failure() {
        let service = shell("cat > /dev/null; echo 'Sure! Here is your roadmap'");
        let err = service.generate_roadmap(&request()).await.unwrap_err();
        assert!(matches!(err, GoalError::Generation { .. }));
    }

    #[tokio::test]
    async fn test_timeout_is_transient() {
        let service = shell("sleep 5").with_timeout(Some(Duration::from_millis(50)));
        let err = service.generate_roadmap(&request()).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_redistribution_is_local_unless_delegated() {
        let redistribution = RedistributionRequest {
            remaining_days: vec![RoadmapDay {
                day: 2,
                tasks: vec!["a".into()],
            }],
            incomplete_tasks: vec!["b".into()],
            total_remaining_days: 1,
        };
        let local = shell("exit 1");
        let response = local.redistribute_tasks(&redistribution).await.unwrap();
        assert_eq!(response.days[0].tasks, vec!["a", "b"]);

        let delegated = shell(
            r#"cat > /dev/null; [ "$STRIDE_OPERATION" = redistribute ] && echo '{"days":[{"day":2,"tasks":["b","a"]}]}'"#,
        )
        .with_delegated_redistribution(true);
        let response = delegated.redistribute_tasks(&redistribution).await.unwrap();
        assert_eq!(response.days[0].tasks, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_missing_program_is_not_retried() {
        let service = CommandRoadmapService::new("stride-no-such-generator");
        let err = service.generate_roadmap(&request()).await.unwrap_err();
        assert!(matches!(err, GoalError::Configuration { .. }));
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("stride-no-such-generator"));
    }

    #[tokio::test]
    async fn test_absent_service_cannot_generate() {
        let service: Option<CommandRoadmapService> = None;
        let err = service.generate_roadmap(&request()).await.unwrap_err();
        assert!(matches!(err, GoalError::Configuration { .. }));
    }
}
