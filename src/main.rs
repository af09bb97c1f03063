use std::path::PathBuf;

use anyhow::Context;
use mailextra::config::AppConfig;
use mailextra::folder::load_folder;
use mailextra::summary::{read_summaries, write_summaries, SummaryIndex};
use mailextra::{Message, MessageExtraFactory, Summarized, Summary};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration; a positional argument overrides the folder path
    let mut config = AppConfig::load()?;
    if let Some(path) = std::env::args().nth(1) {
        config.folder.path = PathBuf::from(path);
    }
    tracing::info!("Folder: {}", config.folder.path.display());
    tracing::info!(
        "Reply prefixes: {:?}, forward prefixes: {:?}",
        config.extra.reply_prefixes,
        config.extra.forward_prefixes
    );

    let factory = MessageExtraFactory::from_config(&config.extra);

    // Reuse summaries from a previous run where Message-IDs match
    let mut index = match &config.folder.summary_file {
        Some(path) if path.exists() => SummaryIndex::new(
            read_summaries(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        _ => SummaryIndex::default(),
    };
    if !index.is_empty() {
        tracing::info!("{} cached summaries available", index.len());
    }

    let entries = load_folder(&config.folder.path)
        .await
        .with_context(|| format!("Failed to load {}", config.folder.path.display()))?;

    let messages: Vec<Box<dyn Message>> = entries
        .into_iter()
        .map(|entry| match index.take(&entry.message) {
            Some(summary) => {
                Box::new(Summarized::with_summary(entry.message, summary)) as Box<dyn Message>
            }
            None => Box::new(entry.message),
        })
        .collect();

    let mut summaries = Vec::with_capacity(messages.len());
    let mut native = 0usize;
    for message in &messages {
        let extra = factory.get(&**message);
        if extra.is_native() {
            native += 1;
        }
        let summary = Summary::capture(&*extra);
        println!("{}", summary.encode_line()?);
        summaries.push(summary);
    }

    tracing::info!(
        "Summarized {} messages ({} cached, {} computed)",
        summaries.len(),
        native,
        summaries.len() - native
    );

    if let Some(path) = &config.folder.summary_file {
        write_summaries(path, &summaries)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}
