use std::sync::OnceLock;

static LOGGER: OnceLock<()> = OnceLock::new();

/// Process wide setup shared by every meshbake front end.
pub struct MeshBake {
    profiling: bool,
}

impl MeshBake {
    /// Installs the logger on first use. `Info` is the default level, `RUST_LOG` overrides it.
    pub fn new(app_name: &str) -> Self {
        LOGGER.get_or_init(|| {
            let installed = env_logger::builder()
                .filter_level(log::LevelFilter::Info)
                .parse_default_env()
                .try_init();

            match installed {
                Ok(()) => log::debug!("{} logging to stderr", app_name),
                Err(err) => log::debug!("{} keeps the existing logger: {}", app_name, err),
            }
        });

        Self { profiling: false }
    }

    /// Turns puffin scopes on or off for the whole process.
    pub fn with_profiling(mut self, enabled: bool) -> Self {
        puffin::set_scopes_on(enabled);
        self.profiling = enabled;
        self
    }

    pub fn is_profiling(&self) -> bool {
        self.profiling
    }

    /// Closes the current puffin frame so the recorded scopes become visible to profiler sinks.
    pub fn finish_frame(&self) {
        if self.profiling {
            puffin::GlobalProfiler::lock().new_frame();
        }
    }
}
