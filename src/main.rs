fn main() {
    if let Some(status) = dsh::worker::maybe_dispatch() {
        std::process::exit(status);
    }
    dsh::repl::run();
}
