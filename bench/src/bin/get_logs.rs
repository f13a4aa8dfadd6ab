use eth_bench::GetLogsConfig;
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = GetLogsConfig::parse();

    if let Err(e) = eth_bench::run(config).await {
        log::error!("benchmark failed:\n{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
