fn main() {
    bi_publisher::app::cli::run();
}
