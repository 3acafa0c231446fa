fn main() {
    webrequest::cli::run();
}
