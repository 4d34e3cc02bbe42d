fn main() {
    if let Err(e) = crayonbox::cli::main() {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
