use std::process::ExitCode;

use blockout::app::BlockoutApp;
use blockout::{cli, log_err, logger};

use eframe::egui;

fn main() -> ExitCode {
    // -- CLI / headless mode ---------------------------------------------
    if cli::CliArgs::is_cli_mode() {
        use clap::Parser;
        let args = cli::CliArgs::parse();
        return cli::run(args);
    }

    // -- GUI mode --------------------------------------------------------

    // Session log (overwrites the previous session's file)
    logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_title("Blockout"),
        ..Default::default()
    };

    match eframe::run_native(
        "Blockout",
        options,
        Box::new(|cc| Box::new(BlockoutApp::new(cc))),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_err!("eframe failed to start: {}", e);
            eprintln!("error: failed to start the GUI: {}", e);
            ExitCode::FAILURE
        }
    }
}
