use relm4::prelude::*;
use ringdial_gtk::gui::app::AppModel;
use ringdial_gtk::sys::runtime;
use std::path::PathBuf;

fn main() {
    env_logger::init();

    // gtk must not see the config path as a file to open
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx, config_path.clone());

    let app = RelmApp::new("org.ringdial.gtk").with_args(Vec::new());

    app.run::<AppModel>((config_path, rx));
}
