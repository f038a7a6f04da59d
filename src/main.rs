fn main() {
    std::process::exit(chapter_migrate::cli::run_cli());
}
