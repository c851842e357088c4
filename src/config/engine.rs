use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use rhai::{Engine, Scope};

use super::Settings;

/// Rhai engine that runs `init.rhai` to build [`Settings`].
/// Separate from the scratchpad runtime: config functions are not
/// visible to user scripts.
pub struct ConfigEngine {
    engine: Engine,
    settings: Arc<RwLock<Settings>>,
}

impl ConfigEngine {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Start from `settings` instead of the defaults
    pub fn with_settings(settings: Settings) -> Self {
        let settings = Arc::new(RwLock::new(settings));
        let engine = Self::create_engine(Arc::clone(&settings));

        Self { engine, settings }
    }

    fn create_engine(settings: Arc<RwLock<Settings>>) -> Engine {
        let mut engine = Engine::new();

        // Limit script execution for safety
        engine.set_max_expr_depths(64, 64);
        engine.set_max_operations(100_000);

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_theme", move |name: &str| {
                if let Ok(mut settings) = s.write() {
                    settings.theme = name.to_string();
                }
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("get_theme", move || -> String {
                s.read().map(|s| s.theme.clone()).unwrap_or_default()
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_tab_width", move |width: i64| {
                if let Ok(mut settings) = s.write() {
                    settings.tab_width = width.clamp(1, 16) as usize;
                }
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_show_line_numbers", move |enabled: bool| {
                if let Ok(mut settings) = s.write() {
                    settings.show_line_numbers = enabled;
                }
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_relative_line_numbers", move |enabled: bool| {
                if let Ok(mut settings) = s.write() {
                    settings.relative_line_numbers = enabled;
                }
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_output_height", move |rows: i64| {
                if let Ok(mut settings) = s.write() {
                    settings.output_height = rows.clamp(1, 100) as u16;
                }
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_max_operations", move |ops: i64| {
                if let Ok(mut settings) = s.write() {
                    settings.max_operations = ops.max(1) as u64;
                }
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_prelude", move |path: &str| {
                if let Ok(mut settings) = s.write() {
                    settings.prelude = Some(PathBuf::from(path));
                }
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_export_dir", move |path: &str| {
                if let Ok(mut settings) = s.write() {
                    settings.export_dir = Some(PathBuf::from(path));
                }
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("bind", move |key: &str, action: &str| {
                if let Ok(mut settings) = s.write() {
                    settings
                        .keybinds
                        .insert(key.to_string(), action.to_string());
                }
            });
        }

        engine.on_print(|msg| tracing::info!(target: "scratch::config", "{}", msg));

        engine
    }

    /// Load and execute a config file
    pub fn load_file(&mut self, path: &Path) -> Result<(), String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        self.eval(&content)
    }

    /// Evaluate a Rhai config string
    pub fn eval(&mut self, script: &str) -> Result<(), String> {
        let ast = self
            .engine
            .compile(script)
            .map_err(|e| format!("Config parse error: {}", e))?;

        let mut scope = Scope::new();
        self.engine
            .run_ast_with_scope(&mut scope, &ast)
            .map_err(|e| format!("Config error: {}", e))
    }

    /// Get the current settings (cloned)
    pub fn settings(&self) -> Settings {
        self.settings.read().map(|s| s.clone()).unwrap_or_default()
    }

    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("scratch"))
    }

    /// Get the default config file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("init.rhai"))
    }

    /// Prelude picked up when the config does not name one
    pub fn default_prelude() -> Option<PathBuf> {
        Self::config_dir()
            .map(|p| p.join("prelude.rhai"))
            .filter(|p| p.exists())
    }

    /// Load the default config file if it exists
    pub fn load_default(&mut self) -> Result<(), String> {
        if let Some(config_file) = Self::config_file() {
            if config_file.exists() {
                return self.load_file(&config_file);
            }
        }
        Ok(()) // No config file is fine
    }
}

impl Default for ConfigEngine {
    fn default() -> Self {
        Self::new()
    }
}
