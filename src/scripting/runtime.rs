use std::path::PathBuf;

use rhai::{AST, Engine, Scope};
use thiserror::Error;

use super::OutputChannel;
use crate::config::Settings;

/// An embedded interpreter that scripts are handed to
pub trait Runtime {
    /// Run `source` as one unit. State it defines stays for later runs.
    fn run(&mut self, source: &str) -> Result<(), String>;

    /// Channel the runtime's print statements write to
    fn output(&self) -> &OutputChannel;

    /// Human readable runtime name for notices
    fn name(&self) -> String;

}

#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to read prelude {path}: {source}")]
    ReadPrelude {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prelude {path} failed: {message}")]
    Prelude { path: PathBuf, message: String },

    #[error("runtime startup was interrupted: {0}")]
    Interrupted(String),
}

/// Rhai engine with a long-lived scope shared by every run
pub struct RhaiRuntime {
    engine: Engine,
    scope: Scope<'static>,
    functions: AST,
    output: OutputChannel,
    max_operations: u64,
}

impl RhaiRuntime {
    /// Build the runtime off the UI task and run the prelude, if any
    pub async fn initialize(settings: Settings) -> Result<Self, InitError> {
        tokio::task::spawn_blocking(move || -> Result<Self, InitError> {
            let mut runtime = Self::new(&settings);
            if let Some(path) = settings.prelude.clone() {
                runtime.run_prelude(path)?;
            }
            Ok(runtime)
        })
        .await
        .map_err(|e| InitError::Interrupted(e.to_string()))?
    }

    pub fn new(settings: &Settings) -> Self {
        let output = OutputChannel::new();
        let engine = Self::create_engine(settings, output.clone());

        Self {
            engine,
            scope: Scope::new(),
            functions: AST::empty(),
            output,
            max_operations: settings.max_operations,
        }
    }

    fn create_engine(settings: &Settings, output: OutputChannel) -> Engine {
        let mut engine = Engine::new();

        // Safety limits
        engine.set_max_expr_depths(settings.max_expr_depth, settings.max_expr_depth);
        engine.set_max_operations(settings.max_operations);

        {
            let out = output.clone();
            engine.on_print(move |text| out.write_line(text));
        }

        engine.on_debug(move |text, source, pos| match source {
            Some(source) => output.write_line(&format!("[{source}:{pos}] {text}")),
            None if pos.is_none() => output.write_line(text),
            None => output.write_line(&format!("[{pos}] {text}")),
        });

        engine
    }

    fn run_prelude(&mut self, path: PathBuf) -> Result<(), InitError> {
        let source = std::fs::read_to_string(&path).map_err(|source| InitError::ReadPrelude {
            path: path.clone(),
            source,
        })?;

        self.run(&source)
            .map_err(|message| InitError::Prelude { path: path.clone(), message })?;

        tracing::info!(path = %path.display(), "ran prelude");
        Ok(())
    }
}

impl Runtime for RhaiRuntime {
    fn run(&mut self, source: &str) -> Result<(), String> {
        let ast = self
            .engine
            .compile_with_scope(&self.scope, source)
            .map_err(|e| format!("Parse error: {}", e))?;

        // Functions from earlier runs stay callable
        self.functions.combine(ast.clone_functions_only());
        let program = self.functions.merge(&ast);

        self.engine
            .run_ast_with_scope(&mut self.scope, &program)
            .map_err(|e| e.to_string())
    }

    fn output(&self) -> &OutputChannel {
        &self.output
    }

    fn name(&self) -> String {
        format!("Rhai (limit {} operations)", self.max_operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_captured(runtime: &mut RhaiRuntime, source: &str) -> (Result<(), String>, String) {
        let channel = runtime.output().clone();
        let capture = channel.capture();
        let result = runtime.run(source);
        (result, capture.contents())
    }

    #[test]
    fn print_goes_to_output_channel() {
        let mut runtime = RhaiRuntime::new(&Settings::default());
        let (result, printed) = run_captured(&mut runtime, "let x = 1;\nprint(x);");
        assert!(result.is_ok());
        assert_eq!(printed, "1\n");
    }

    #[test]
    fn variables_persist_between_runs() {
        let mut runtime = RhaiRuntime::new(&Settings::default());
        runtime.run("let x = 5;").unwrap();
        let (result, printed) = run_captured(&mut runtime, "print(x);");
        assert!(result.is_ok());
        assert_eq!(printed, "5\n");
    }

    #[test]
    fn functions_persist_between_runs() {
        let mut runtime = RhaiRuntime::new(&Settings::default());
        runtime.run("fn double(n) { n * 2 }").unwrap();
        let (_, printed) = run_captured(&mut runtime, "print(double(21));");
        assert_eq!(printed, "42\n");
    }

    #[test]
    fn parse_errors_are_reported() {
        let mut runtime = RhaiRuntime::new(&Settings::default());
        let err = runtime.run("let = ;").unwrap_err();
        assert!(err.starts_with("Parse error"));
    }

    #[test]
    fn runaway_scripts_hit_operation_limit() {
        let settings = Settings {
            max_operations: 1_000,
            ..Settings::default()
        };
        let mut runtime = RhaiRuntime::new(&settings);
        assert!(runtime.run("loop { }").is_err());
    }

    #[tokio::test]
    async fn initialize_runs_prelude_into_shared_scope() {
        let dir = tempfile::tempdir().unwrap();
        let prelude = dir.path().join("prelude.rhai");
        std::fs::write(&prelude, "let greeting = \"hello\";").unwrap();

        let settings = Settings {
            prelude: Some(prelude),
            ..Settings::default()
        };
        let mut runtime = RhaiRuntime::initialize(settings).await.unwrap();
        let (_, printed) = run_captured(&mut runtime, "print(greeting);");
        assert_eq!(printed, "hello\n");
    }

    #[tokio::test]
    async fn initialize_fails_on_broken_prelude() {
        let dir = tempfile::tempdir().unwrap();
        let prelude = dir.path().join("prelude.rhai");
        std::fs::write(&prelude, "throw \"nope\";").unwrap();

        let settings = Settings {
            prelude: Some(prelude),
            ..Settings::default()
        };
        let err = RhaiRuntime::initialize(settings).await.err().unwrap();
        assert!(matches!(err, InitError::Prelude { .. }));
    }
}
