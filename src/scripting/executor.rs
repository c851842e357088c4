use super::Runtime;

/// Result of asking the executor to run some text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The runtime has not finished starting
    NotReady,
    /// Nothing but whitespace to run
    EmptyInput,
    /// The script printed something
    Output(String),
    NoOutput,
    Failed(String),
}

impl RunOutcome {
    pub fn notice(&self) -> String {
        match self {
            RunOutcome::NotReady => "Runtime not initialized yet. Please wait...".to_string(),
            RunOutcome::EmptyInput => "No code to run.".to_string(),
            RunOutcome::Output(text) => text.clone(),
            RunOutcome::NoOutput => "Code executed successfully (no output)".to_string(),
            RunOutcome::Failed(message) => format!("Error: {}", message),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            RunOutcome::NotReady | RunOutcome::EmptyInput | RunOutcome::Failed(_)
        )
    }

    /// Whether the runtime was actually invoked
    pub fn did_run(&self) -> bool {
        matches!(
            self,
            RunOutcome::Output(_) | RunOutcome::NoOutput | RunOutcome::Failed(_)
        )
    }
}

/// Owns the runtime once it is ready and runs editor text through it
pub struct Executor<R: Runtime> {
    runtime: Option<R>,
}

impl<R: Runtime> Executor<R> {
    pub fn new() -> Self {
        Self { runtime: None }
    }

    /// Hand over the initialized runtime. Only the first one is kept.
    pub fn attach(&mut self, runtime: R) -> bool {
        if self.runtime.is_some() {
            tracing::warn!("runtime already attached, ignoring new instance");
            return false;
        }
        tracing::info!(runtime = %runtime.name(), "runtime attached");
        self.runtime = Some(runtime);
        true
    }

    pub fn is_ready(&self) -> bool {
        self.runtime.is_some()
    }

    #[cfg(test)]
    pub fn runtime(&self) -> Option<&R> {
        self.runtime.as_ref()
    }

    pub fn run(&mut self, text: &str) -> RunOutcome {
        let Some(runtime) = self.runtime.as_mut() else {
            return RunOutcome::NotReady;
        };

        let source = text.trim();
        if source.is_empty() {
            return RunOutcome::EmptyInput;
        }

        let channel = runtime.output().clone();
        let (result, printed) = {
            let capture = channel.capture();
            let result = runtime.run(source);
            (result, capture.contents())
        };

        match result {
            Ok(()) if printed.is_empty() => RunOutcome::NoOutput,
            Ok(()) => RunOutcome::Output(printed),
            Err(message) => {
                tracing::warn!(%message, "script raised");
                RunOutcome::Failed(message)
            }
        }
    }
}

impl<R: Runtime> Default for Executor<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::scripting::{OutputChannel, RhaiRuntime};

    /// Runtime double: echoes each line, fails on `fail`, counts calls
    pub(crate) struct EchoRuntime {
        pub calls: usize,
        output: OutputChannel,
    }

    impl EchoRuntime {
        pub(crate) fn new() -> Self {
            Self {
                calls: 0,
                output: OutputChannel::new(),
            }
        }
    }

    impl Runtime for EchoRuntime {
        fn run(&mut self, source: &str) -> Result<(), String> {
            self.calls += 1;
            for line in source.lines() {
                if line == "fail" {
                    return Err("echo failed".to_string());
                }
                if line != "quiet" {
                    self.output.write_line(line);
                }
            }
            Ok(())
        }

        fn output(&self) -> &OutputChannel {
            &self.output
        }

        fn name(&self) -> String {
            "echo".to_string()
        }
    }

    fn ready_echo() -> Executor<EchoRuntime> {
        let mut executor = Executor::new();
        executor.attach(EchoRuntime::new());
        executor
    }

    fn calls(executor: &Executor<EchoRuntime>) -> usize {
        executor.runtime().map(|r| r.calls).unwrap_or(0)
    }

    #[test]
    fn run_before_attach_is_not_ready() {
        let mut executor: Executor<EchoRuntime> = Executor::new();
        let outcome = executor.run("print(1);");
        assert_eq!(outcome, RunOutcome::NotReady);
        assert_eq!(
            outcome.notice(),
            "Runtime not initialized yet. Please wait..."
        );
        assert!(!outcome.did_run());
    }

    #[test]
    fn whitespace_input_never_reaches_runtime() {
        let mut executor = ready_echo();
        for text in ["", "   ", "\n\t\n"] {
            let outcome = executor.run(text);
            assert_eq!(outcome, RunOutcome::EmptyInput);
            assert_eq!(outcome.notice(), "No code to run.");
        }
        assert_eq!(calls(&executor), 0);
    }

    #[test]
    fn captured_output_is_reported() {
        let mut executor = ready_echo();
        assert_eq!(
            executor.run("  hello\nworld  "),
            RunOutcome::Output("hello\nworld\n".to_string())
        );
        assert_eq!(calls(&executor), 1);
    }

    #[test]
    fn silent_run_reports_no_output() {
        let mut executor = ready_echo();
        let outcome = executor.run("quiet");
        assert_eq!(outcome, RunOutcome::NoOutput);
        assert_eq!(outcome.notice(), "Code executed successfully (no output)");
    }

    #[test]
    fn failure_restores_output_channel() {
        let mut executor = ready_echo();
        let outcome = executor.run("before\nfail");
        assert_eq!(outcome, RunOutcome::Failed("echo failed".to_string()));
        assert_eq!(outcome.notice(), "Error: echo failed");

        let runtime = executor.runtime().unwrap();
        assert!(!runtime.output().is_capturing());

        // Output printed before the failure does not leak into the next run
        assert_eq!(
            executor.run("after"),
            RunOutcome::Output("after\n".to_string())
        );
    }

    #[test]
    fn second_attach_is_ignored() {
        let mut executor = ready_echo();
        executor.run("x");
        assert!(!executor.attach(EchoRuntime::new()));
        assert_eq!(calls(&executor), 1);
    }

    #[test]
    fn rhai_state_is_shared_across_runs() {
        let mut executor = Executor::new();
        executor.attach(RhaiRuntime::new(&Settings::default()));

        assert_eq!(executor.run("let x = 5;"), RunOutcome::NoOutput);
        assert_eq!(executor.run("print(x);"), RunOutcome::Output("5\n".to_string()));
    }

    #[test]
    fn rhai_error_leaves_channel_released() {
        let mut executor = Executor::new();
        executor.attach(RhaiRuntime::new(&Settings::default()));

        let outcome = executor.run("print(\"partial\");\nthrow \"boom\";");
        assert!(matches!(outcome, RunOutcome::Failed(ref m) if m.contains("boom")));
        assert!(!executor.runtime().unwrap().output().is_capturing());
        assert_eq!(
            executor.run("print(\"clean\");"),
            RunOutcome::Output("clean\n".to_string())
        );
    }
}
