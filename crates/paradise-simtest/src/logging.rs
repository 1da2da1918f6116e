use env_logger::{Builder, Env};
use log::LevelFilter;

/// Harness log threshold when `RUST_LOG` is unset
fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Route `paradise_core`'s log records to stderr.
///
/// Scene setup, switches and dialogue sessions log at info; `--verbose`
/// adds the per-agent transitions and seat decisions logged at debug.
/// Lines carry no timestamp.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_level(verbose).to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp(None);

    // A second install is a no-op
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_selects_debug() {
        assert_eq!(default_level(true), LevelFilter::Debug);
        assert_eq!(default_level(false), LevelFilter::Info);
    }

    #[test]
    fn test_init_twice() {
        init(false);
        init(true);
        log::info!("logger still usable");
    }
}
