fn main() {
    env_logger::init();
    if let Err(e) = rem_scan::cli::run() {
        eprintln!("remscan: {e}");
        std::process::exit(1);
    }
}
