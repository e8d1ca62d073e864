use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use reviewscope::utils::{setup_logging, setup_workers, validate_args};
use reviewscope::{init_default_stopwords, load_stopwords, run_session, Args, PlayStoreClient};

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    if args.init {
        return init_default_stopwords();
    }

    validate_args(&args)?;

    let workers = setup_workers(args.workers)?;
    info!(action = "configure", component = "word_frequency", worker_count = workers, "Using workers for word counting");

    let stopwords = load_stopwords(args.stopwords.as_deref())?;
    let client = PlayStoreClient::new()?;

    match run_session(&args, &client, &stopwords) {
        Ok(_) => Ok(()),
        Err(e) => {
            error!(action = "session", component = "main", error = %format!("{:#}", e), "Session failed");
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
