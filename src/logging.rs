use std::sync::Once;

static INIT: Once = Once::new();

/// Installs the logger for the current target. Safe to call more than once.
///
/// In the browser this routes `log` records to the developer console and, with
/// the `console_error_panic_hook` feature, forwards panics there too. Natively
/// it uses `env_logger`, configured through `RUST_LOG`.
pub fn init_logging() {
    INIT.call_once(|| {
        #[cfg(target_arch = "wasm32")]
        {
            #[cfg(feature = "console_error_panic_hook")]
            console_error_panic_hook::set_once();

            if console_log::init_with_level(log::Level::Debug).is_err() {
                log::warn!("A logger was already installed; keeping it");
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            // Tests and embedding binaries may already own the logger.
            let _ = env_logger::Builder::from_default_env().try_init();
        }
    });
}
