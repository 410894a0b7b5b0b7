// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tzfanim::{
    LetterMapSet, SearchConfig, SearchEngine, SearchError, SearchOptions, TextCorpus, VariantGenerator,
};

mod cli;
use cli::{display, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Search {
            corpus,
            phrase,
            engine,
            book,
            loose,
            workers,
            deadline,
            limit,
            json,
        } => {
            let mut config = config;
            if let Some(workers) = workers {
                config.workers = workers.max(1);
            }
            let options = SearchOptions {
                use_cache: false,
                strict_word_boundary: loose.then_some(false),
                engine,
                book_filter: book,
                deadline: deadline.map(|secs| Instant::now() + Duration::from_secs(secs)),
            };
            run_search(&corpus, &phrase, config, &options, limit, json)
        }
        Commands::Variants {
            phrase,
            max,
            limit,
            json,
        } => run_variants(&phrase, &config, max.unwrap_or(config.max_variants), limit, json),
        Commands::Inspect { corpus } => run_inspect(&corpus),
    });

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tzfanim=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn load_config(path: Option<&Path>) -> Result<SearchConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(SearchConfig::load(path)?),
        None => Ok(SearchConfig::default()),
    }
}

fn run_search(
    path: &Path,
    phrase: &str,
    config: SearchConfig,
    options: &SearchOptions,
    limit: usize,
    json: bool,
) -> CliResult {
    let corpus = Arc::new(TextCorpus::from_file(path)?);
    let engine = SearchEngine::new(config, corpus, LetterMapSet::standard());

    #[cfg(feature = "progress")]
    let progress = {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner:.cyan} {prefix:<10} {pos} variants {msg}")
                .expect("progress template is valid"),
        );
        pb.set_prefix("searching");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    let response = engine.search_with_partials(phrase, options, &mut |found| {
        #[cfg(feature = "progress")]
        {
            progress.inc(found.len() as u64);
            if let Some(last) = found.last() {
                progress.set_message(last.variant.clone());
            }
        }
        #[cfg(not(feature = "progress"))]
        let _ = found;
    });

    #[cfg(feature = "progress")]
    progress.finish_and_clear();

    let response = match response {
        Ok(response) => response,
        Err(e) if e.is_user_visible() => tzfanim::SearchResponse::failure(phrase, &e),
        Err(e) => return Err(e.into()),
    };

    if json {
        let out = serde_json::to_string_pretty(&response)?;
        println!("{}", out);
    } else if let Some(error) = &response.error {
        eprintln!("❌ {}", error);
    } else {
        display::print_response(&response, limit);
    }

    if response.success {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

fn run_variants(
    phrase: &str,
    config: &SearchConfig,
    max_variants: usize,
    limit: usize,
    json: bool,
) -> CliResult {
    let prepared = tzfanim::prepare_query(phrase);
    if prepared.is_empty() {
        return Err(SearchError::InvalidInput("phrase is empty".to_string()).into());
    }
    let generator = VariantGenerator::new(Arc::new(LetterMapSet::standard()), config.sampling_seed);
    let variants = generator.generate(&prepared, max_variants.max(1));

    if json {
        let out = serde_json::to_string_pretty(&variants)?;
        println!("{}", out);
    } else {
        display::print_variants(&prepared, &variants, limit);
    }
    Ok(())
}

fn run_inspect(path: &Path) -> CliResult {
    let corpus = TextCorpus::from_file(path)?;
    let stats = corpus.stats();
    display::print_stats(&path.display().to_string(), &stats, &corpus.books());
    Ok(())
}
