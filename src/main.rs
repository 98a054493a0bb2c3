mod app;
mod cli;

fn main() {
    let cli = cli::parse();
    resolve_transcoder::engine::init_logging(cli.verbose);
    app::run(cli);
}
