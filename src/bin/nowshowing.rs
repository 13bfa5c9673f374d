use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use nowshowing::ranking::top_movies;
use nowshowing::store::save_crawl;
use nowshowing::{Crawler, Options};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "nowshowing", about = "Scrape now-playing movies and their short comments from Douban")]
struct Cli {
    /// City slug for the default listing URL
    #[arg(short, long, default_value = "wuhan")]
    city: String,

    /// Listing page to scrape instead of the city default
    #[arg(long)]
    listing_url: Option<String>,

    /// Target comments per movie
    #[arg(short = 'n', long, default_value_t = 30)]
    comments: usize,

    /// Comments requested per page
    #[arg(long, default_value_t = 20)]
    page_size: usize,

    /// Seconds to sleep after each request
    #[arg(long, default_value_t = 2.0)]
    delay: f64,

    /// Seconds to sleep between movies
    #[arg(long, default_value_t = 2.0)]
    movie_delay: f64,

    /// JSON output path
    #[arg(short, long, default_value = "data/movies.json")]
    output: PathBuf,

    /// CSV output path
    #[arg(long, default_value = "data/movies.csv")]
    csv: PathBuf,

    /// Skip the CSV output
    #[arg(long)]
    no_csv: bool,

    /// File receiving every fetched page
    #[arg(long, default_value = "debug_page.html")]
    debug_dump: PathBuf,

    /// Disable the debug page dump
    #[arg(long)]
    no_debug_dump: bool,

    /// Number of movies in the ranking report
    #[arg(short, long, default_value_t = 5)]
    top: usize,
}

impl Cli {
    fn into_options(self) -> Result<Options, Box<dyn Error>> {
        let mut options = Options::for_city(&self.city);
        if let Some(url) = self.listing_url {
            options.listing_url = url;
        }
        options.comments_per_movie = self.comments;
        options.comments_page_size = self.page_size;
        options.request_delay = Duration::try_from_secs_f64(self.delay)?;
        options.movie_delay = Duration::try_from_secs_f64(self.movie_delay)?;
        options.output_path = self.output;
        options.csv_path = (!self.no_csv).then_some(self.csv);
        options.debug_dump_path = (!self.no_debug_dump).then_some(self.debug_dump);
        options.top_n = self.top;
        options.validate()?;
        Ok(options)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let options = Cli::parse().into_options()?;
    info!(url = %options.listing_url, "starting crawl");

    let crawler = Crawler::from_options(&options)?;
    let summary = crawler.run();

    if let Err(e) = save_crawl(&summary.movies, &options.output_path, options.csv_path.as_deref()) {
        error!(error = %e, "failed to save crawl results");
        return Err(e.into());
    }

    println!(
        "Crawled {} movies, {} comments -> {}",
        summary.movie_count(),
        summary.comment_count,
        options.output_path.display()
    );

    let top = top_movies(&summary.movies, options.top_n);
    if !top.is_empty() {
        println!("\nMost wanted:");
        for (rank, movie) in top.iter().enumerate() {
            println!(
                "{:>2}. {} ({} want to see, {} comments)",
                rank + 1,
                movie.name,
                movie.wish_count,
                movie.comments.len()
            );
        }
    }

    Ok(())
}
