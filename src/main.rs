mod allocator;
mod app;
mod ui;

use std::process::ExitCode;

use crate::app::App;

fn main() -> ExitCode {
    match App::init().and_then(App::execute) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ui::display::show_error(&err);
            ExitCode::from(app::exit_code(&err))
        }
    }
}
