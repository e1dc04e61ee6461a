//! Terminal front-end for the sentiment API.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;
use tweet_sentiment::{
    client::{ApiClient, ClientSession, ClientState, Notice},
    config,
    model::Sentiment,
};

const QUIT: &str = ":q";

fn render(notices: &[Notice]) {
    for notice in notices {
        match notice {
            Notice::Result(Sentiment::Negative) => println!("Sentiment prédit : Négatif 😡"),
            Notice::Result(Sentiment::Positive) => println!("Sentiment prédit : Positif 😊"),
            Notice::Toast(msg) => println!("✓ {}", msg),
            Notice::Warning(msg) => println!("⚠ {}", msg),
            Notice::Error(msg) => eprintln!("✗ {}", msg),
        }
    }
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, question: &str) -> Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(question.as_bytes()).await?;
    stdout.flush().await?;
    Ok(lines.next_line().await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = config::load().await?;
    let api = ApiClient::new(config.client.base_url);

    println!("✈️  Analyseur de sentiment pour Air Paradis ({})", api.base_url());
    println!("Entrez un tweet pour prédire si le sentiment est positif ou négatif.");

    let mut session = ClientSession::new(api);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let Some(input) = prompt(&mut lines, &format!("\nTweet à analyser ({QUIT} pour quitter) : ")).await? else {
            break;
        };
        if input.trim() == QUIT {
            break;
        }

        render(&session.analyze(&input).await?);

        if session.current_state() != ClientState::ResultShown {
            continue;
        }

        let Some(answer) = prompt(&mut lines, "Cette prédiction était-elle correcte ? [o/n] ").await? else {
            break;
        };
        let notices = match answer.trim().to_lowercase().as_str() {
            "o" | "oui" | "y" | "yes" => session.confirm_correct()?,
            "n" | "non" | "no" => session.mark_incorrect().await?,
            // Any other answer keeps the result; the next analysis replaces it.
            _ => Vec::new(),
        };
        render(&notices);
    }

    Ok(())
}
