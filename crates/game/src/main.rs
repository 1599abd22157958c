mod app;

use tracing::error;

fn main() {
    let wiring = match app::bootstrap::build_app() {
        Ok(wiring) => wiring,
        Err(level_error) => {
            error!(error = %level_error, "startup_failed");
            std::process::exit(1);
        }
    };

    if let Err(app_error) = engine::run_app(wiring.config, wiring.state, wiring.root_scene) {
        error!(error = %app_error, "app_failed");
        std::process::exit(1);
    }
}
