use std::env;

use sqlx::postgres::PgPoolOptions;
use weatherflow::jobs::{JobDocument, JobsRepo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!(
            "weatherctl <command>\n\
             Commands:\n\
             - reset\n\
             - show <uid>\n\
             - list [limit]\n\
             \n\
             Uses DATABASE_URL or TEST_DATABASE_URL.\n"
        );
        std::process::exit(2);
    }

    dotenvy::dotenv().ok();
    let url = env::var("DATABASE_URL")
        .or_else(|_| env::var("TEST_DATABASE_URL"))
        .map_err(|_| anyhow::anyhow!("DATABASE_URL or TEST_DATABASE_URL must be set"))?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await?;
    let repo = JobsRepo::new(pool);

    match args[1].as_str() {
        "reset" => {
            let n = repo.truncate().await?;
            println!("reset OK ({n} jobs removed)");
        }
        "show" => {
            let uid: i64 = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("usage: weatherctl show <uid>"))?
                .parse()?;
            match repo.get_job(uid).await? {
                Some(doc) => print_job(&doc, true),
                None => println!("no job with uid={uid}"),
            }
        }
        "list" => {
            let limit: i64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(20);
            for doc in repo.list_recent(limit).await? {
                print_job(&doc, false);
            }
        }
        other => {
            eprintln!("Unknown command: {other}");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn print_job(doc: &JobDocument, with_results: bool) {
    let expected = doc
        .expected_count
        .map(|n| n.to_string())
        .unwrap_or_else(|| "MISSING".to_string());
    let progress = doc
        .progress_percent()
        .map(|p| format!("{p:.1}%"))
        .unwrap_or_else(|| "corrupted".to_string());

    println!(
        "JOB: uid={} created_at={} expected={} results={} progress={}",
        doc.uid,
        doc.created_at.to_rfc3339(),
        expected,
        doc.results.len(),
        progress
    );

    if with_results {
        for r in &doc.results {
            println!(
                "  city_id={} temperature={:.2}C humidity={}%",
                r.city_id, r.temperature_celsius, r.humidity_percent
            );
        }
    }
}
