fn main() {
    if let Err(err) = exticon_renderer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
