fn main() {
    if let Err(error) = masjid_app_lib::run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
