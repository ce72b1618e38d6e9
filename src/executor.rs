use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::config::Config;
use crate::diagnostics::{self, ErrorReport, ErrorSink};
use crate::error::ActionError;
use crate::http::{HttpPoster, CONTENT_FORM, CONTENT_JSON, CONTENT_TEXT};
use crate::model::{Action, ShutdownStep};

const CHAT_API: &str = "https://slack.com/api";

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Starts an external program for one shutdown step.
pub trait ProcessLauncher: Send + Sync {
    fn launch(
        &self,
        step: &ShutdownStep,
        hidden: bool,
        wait_for_exit: bool,
    ) -> Result<(), ActionError>;
}

/// Runs steps through `std::process::Command`.
///
/// On Windows the argument string reaches the program verbatim. Elsewhere it is
/// split into argv with the same quote rule as the program token.
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(
        &self,
        step: &ShutdownStep,
        hidden: bool,
        wait_for_exit: bool,
    ) -> Result<(), ActionError> {
        let mut command = Command::new(&step.program);
        add_arguments(&mut command, &step.arguments, hidden);

        if hidden {
            command
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        }

        let spawn_error = |source| ActionError::Spawn {
            program: step.program.clone(),
            source,
        };

        if wait_for_exit {
            let status = command.status().map_err(spawn_error)?;
            if !status.success() {
                log::warn!("{} exited with {}", step.program, status);
            }
        } else {
            command.spawn().map_err(spawn_error)?;
        }
        Ok(())
    }
}

// Windows programs parse their own command line, so hand it over untouched.
#[cfg(windows)]
fn add_arguments(command: &mut Command, arguments: &str, hidden: bool) {
    use std::os::windows::process::CommandExt;

    if !arguments.is_empty() {
        command.raw_arg(arguments);
    }
    if hidden {
        command.creation_flags(CREATE_NO_WINDOW);
    }
}

#[cfg(not(windows))]
fn add_arguments(command: &mut Command, arguments: &str, _hidden: bool) {
    command.args(crate::tokenizer::split_arguments(arguments));
}

/// Everything an action needs to reach the outside world.
pub struct ActionContext {
    pub home_assistant_url: String,
    pub http: Arc<dyn HttpPoster>,
    pub launcher: Arc<dyn ProcessLauncher>,
    pub errors: Arc<dyn ErrorSink>,
    pub error_title: String,
}

impl ActionContext {
    pub fn new(
        config: &Config,
        http: Arc<dyn HttpPoster>,
        launcher: Arc<dyn ProcessLauncher>,
        errors: Arc<dyn ErrorSink>,
        error_title: String,
    ) -> Self {
        Self {
            home_assistant_url: config.home_assistant.url.trim_end_matches('/').to_string(),
            http,
            launcher,
            errors,
            error_title,
        }
    }

    fn report_step_failure(&self, what: &str, err: &ActionError) {
        log::warn!("{} failed, continuing: {}", what, err);
        diagnostics::report(
            self.errors.as_ref(),
            &self.error_title,
            ErrorReport::new(&err.to_string()).logged_from("executor", "run"),
        );
    }
}

impl Action {
    /// Runs the action to completion on the calling thread.
    ///
    /// Sub-steps of a composite or a process sequence are best effort: a failing
    /// step is reported and the next one still runs. The first failure is returned
    /// once everything has been attempted.
    pub fn run(&self, ctx: &ActionContext) -> Result<(), ActionError> {
        match self {
            Action::HomeAssistant { service, entity_id } => {
                let domain = entity_id.split('.').next().unwrap_or(entity_id);
                let url = format!("{}/api/services/{}/{}", ctx.home_assistant_url, domain, service);
                let body = serde_json::json!({ "entity_id": entity_id }).to_string();
                ctx.http.post(crate::model::Endpoint::HomeAssistant, &url, body, CONTENT_JSON)
            }
            Action::ChatPresence { endpoint, presence } => {
                let url = format!("{CHAT_API}/users.setPresence?presence={presence}");
                ctx.http.post(*endpoint, &url, String::new(), CONTENT_TEXT)
            }
            Action::ChatStatus { endpoint, emoji, text } => {
                let url = format!("{CHAT_API}/users.profile.set");
                let body = format!("profile={{'status_emoji':'{emoji}','status_text':'{text}'}}");
                ctx.http.post(*endpoint, &url, body, CONTENT_FORM)
            }
            Action::ProcessSequence(steps) => {
                let mut first_error = None;
                for step in steps.iter() {
                    log::info!("Running {} {}", step.program, step.arguments);
                    if let Err(e) = ctx.launcher.launch(step, true, true) {
                        ctx.report_step_failure(&step.program, &e);
                        first_error.get_or_insert(e);
                    }
                }
                first_error.map_or(Ok(()), Err)
            }
            Action::Composite(parts) => {
                let mut first_error = None;
                for part in parts {
                    if let Err(e) = part.run(ctx) {
                        // Sequences report their own steps.
                        if !matches!(part, Action::ProcessSequence(_)) {
                            ctx.report_step_failure(&part.describe(), &e);
                        }
                        first_error.get_or_insert(e);
                    }
                }
                first_error.map_or(Ok(()), Err)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};

    use super::{ActionContext, ProcessLauncher};
    use crate::config::Config;
    use crate::diagnostics::CollectingSink;
    use crate::error::ActionError;
    use crate::http::HttpPoster;
    use crate::model::{Action, Endpoint, ShutdownStep};

    /// Records every side effect, in order, as a readable line.
    #[derive(Default)]
    pub struct Recorder {
        pub calls: Mutex<Vec<String>>,
        pub failing_program: Option<String>,
        pub failing_url: Option<String>,
    }

    impl Recorder {
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ProcessLauncher for Recorder {
        fn launch(&self, step: &ShutdownStep, hidden: bool, wait: bool) -> Result<(), ActionError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!(
                    "exec {} [{}] hidden={} wait={}",
                    step.program, step.arguments, hidden, wait
                ));
            if self.failing_program.as_deref() == Some(step.program.as_str()) {
                return Err(ActionError::Spawn {
                    program: step.program.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                });
            }
            Ok(())
        }
    }

    impl HttpPoster for Recorder {
        fn post(
            &self,
            endpoint: Endpoint,
            url: &str,
            body: String,
            content_type: &str,
        ) -> Result<(), ActionError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("post {:?} {} {} {}", endpoint, url, content_type, body));
            if self.failing_url.as_deref() == Some(url) {
                return Err(ActionError::MissingClient(endpoint.name()));
            }
            Ok(())
        }
    }

    pub fn context(recorder: Arc<Recorder>, sink: Arc<CollectingSink>) -> ActionContext {
        let mut config = Config::default();
        config.home_assistant.url = "http://ha.local:8123/".to_string();
        ActionContext::new(&config, recorder.clone(), recorder, sink, "scenedeck error".to_string())
    }

    #[test]
    fn home_assistant_call_targets_entity_domain() {
        let recorder = Arc::new(Recorder::default());
        let ctx = context(recorder.clone(), Arc::default());

        Action::home_assistant("toggle", "switch.office_small_fan").run(&ctx).unwrap();

        assert_eq!(
            recorder.calls(),
            vec![
                "post HomeAssistant http://ha.local:8123/api/services/switch/toggle application/json {\"entity_id\":\"switch.office_small_fan\"}"
            ]
        );
    }

    #[test]
    fn chat_calls_use_expected_bodies() {
        let recorder = Arc::new(Recorder::default());
        let ctx = context(recorder.clone(), Arc::default());

        Action::ChatPresence { endpoint: Endpoint::ChatWork, presence: "away".into() }
            .run(&ctx)
            .unwrap();
        Action::ChatStatus { endpoint: Endpoint::ChatWork, emoji: String::new(), text: String::new() }
            .run(&ctx)
            .unwrap();

        let calls = recorder.calls();
        assert_eq!(
            calls[0],
            "post ChatWork https://slack.com/api/users.setPresence?presence=away text/plain; charset=utf-8 "
        );
        assert_eq!(
            calls[1],
            "post ChatWork https://slack.com/api/users.profile.set application/x-www-form-urlencoded profile={'status_emoji':'','status_text':''}"
        );
    }

    #[test]
    fn sequence_runs_hidden_in_order_and_survives_failures() {
        let recorder = Arc::new(Recorder {
            failing_program: Some("missing.exe".into()),
            ..Default::default()
        });
        let sink = Arc::new(CollectingSink::default());
        let ctx = context(recorder.clone(), sink.clone());

        let steps: Arc<[ShutdownStep]> = vec![
            ShutdownStep::new("first", "a b"),
            ShutdownStep::new("missing.exe", ""),
            ShutdownStep::new("last", "/s /t 0"),
        ]
        .into();
        let result = Action::ProcessSequence(steps).run(&ctx);

        assert!(matches!(result, Err(ActionError::Spawn { ref program, .. }) if program == "missing.exe"));
        assert_eq!(
            recorder.calls(),
            vec![
                "exec first [a b] hidden=true wait=true",
                "exec missing.exe [] hidden=true wait=true",
                "exec last [/s /t 0] hidden=true wait=true",
            ]
        );
        assert_eq!(sink.shown().len(), 1);
    }

    #[test]
    fn composite_keeps_going_after_a_failed_call() {
        let recorder = Arc::new(Recorder {
            failing_url: Some("https://slack.com/api/users.setPresence?presence=away".into()),
            ..Default::default()
        });
        let sink = Arc::new(CollectingSink::default());
        let ctx = context(recorder.clone(), sink.clone());

        let action = Action::Composite(vec![
            Action::ChatPresence { endpoint: Endpoint::ChatHome, presence: "away".into() },
            Action::home_assistant("turn_on", "script.office_exit"),
        ]);
        assert!(action.run(&ctx).is_err());

        let calls = recorder.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].contains("/api/services/script/turn_on"));
        assert_eq!(sink.shown().len(), 1);
    }
}
