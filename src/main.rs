use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use dialoguer::{Input, Select};
use moviegram::{
    BrowseController, Config, DEFAULT_API_BASE_URL, DEFAULT_EMBED_BASE_URL,
    DEFAULT_IMAGE_BASE_URL, DEFAULT_LANGUAGE, Destination, MediaKind, MetadataGateway,
    MoviegramError, PlaybackTarget, ResultsView, SeasonView, SeriesView, empty_message,
    open_session, resolve_playback_target,
};
use std::process;
use tracing_subscriber::EnvFilter;

/// Search movies and TV series, browse episodes and resolve playback targets
#[derive(Debug, Parser)]
#[command(name = "moviegram", version, about)]
struct Cli {
    /// TMDB API key
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// TMDB API root
    #[arg(long, env = "MOVIEGRAM_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Response language
    #[arg(long, env = "MOVIEGRAM_LANGUAGE", default_value = DEFAULT_LANGUAGE)]
    language: String,

    /// Image host for posters and stills
    #[arg(long, env = "MOVIEGRAM_IMAGE_BASE_URL", default_value = DEFAULT_IMAGE_BASE_URL)]
    image_base_url: String,

    /// Host serving the playback embed pages
    #[arg(long, env = "MOVIEGRAM_EMBED_BASE_URL", default_value = DEFAULT_EMBED_BASE_URL)]
    embed_base_url: String,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search one catalog and print the results
    Search {
        /// Catalog to search
        #[arg(long, value_enum, default_value_t = KindArg::Movie)]
        kind: KindArg,

        /// Search terms
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Print the episodes of one season of a series
    Episodes { series_id: u64, season: u32 },

    /// Print the playback path and embed URL for a movie or episode
    Resolve {
        #[arg(value_enum)]
        kind: KindArg,

        /// `<title-id>` for movies, `<series-id> <season> <episode>` for series
        #[arg(required = true, allow_negative_numbers = true)]
        ids: Vec<i64>,
    },

    /// Browse the catalog interactively
    Browse,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Movie,
    Series,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Movie => MediaKind::Movie,
            KindArg::Series => MediaKind::Series,
        }
    }
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::new(self.api_key.clone().unwrap_or_default());
        config.api_base_url = self.api_base_url.clone();
        config.language = self.language.clone();
        config.image_base_url = self.image_base_url.clone();
        config.embed_base_url = self.embed_base_url.clone();
        config
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Prints the search results area. Returns `false` for the error view.
fn print_results_view(view: ResultsView<'_>, kind: MediaKind, image_base_url: &str) -> bool {
    match view {
        ResultsView::Loading => println!("Loading..."),
        ResultsView::ErrorDisplay(message) => {
            eprintln!("Error: {}", message);
            return false;
        }
        ResultsView::Empty(_) => println!("{}", empty_message(kind)),
        ResultsView::Populated(titles) => {
            for (index, title) in titles.iter().enumerate() {
                println!(
                    "[{}] {} ({}) ★ {}  -> {}",
                    index + 1,
                    title.name,
                    title.year_label(),
                    title.rating_label(),
                    title.destination().path()
                );
                if let Some(poster) = title.poster_url(image_base_url) {
                    println!("      {}", poster);
                }
            }
        }
    }
    true
}

/// Prints the episode list of the active season. Returns `false` for the error view.
fn print_season_view(view: SeasonView<'_>) -> bool {
    match view {
        SeasonView::Loading => println!("Loading episodes..."),
        SeasonView::ErrorDisplay(message) => {
            eprintln!("Error: {}", message);
            return false;
        }
        SeasonView::Empty(season) => println!("No episodes found for season {}.", season),
        SeasonView::Populated(episodes) => {
            for episode in episodes {
                println!(
                    "  Episode {:>2}: {} ★ {} | {} | {}",
                    episode.number,
                    episode.name,
                    episode.rating_label(),
                    episode.air_date_label(),
                    episode.runtime_label()
                );
                if !episode.overview.is_empty() {
                    println!("      {}", episode.overview);
                }
            }
        }
    }
    true
}

fn print_target(target: &PlaybackTarget, embed_base_url: &str) {
    println!("Playback target: {}", target.path());
    println!("Embed URL:       {}", target.embed_url(embed_base_url));
}

/// Selects an episode and prints its target. A rejected selection is
/// reported and leaves the session usable.
fn pick_episode<G: MetadataGateway>(
    session: &mut BrowseController<G>,
    season: u32,
    episode: u32,
    embed_base_url: &str,
) -> Option<PlaybackTarget> {
    match session.select_episode(season, episode) {
        Ok(target) => {
            print_target(&target, embed_base_url);
            Some(target)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            None
        }
    }
}

/// Walks one series: season picker, episode list and episode selection.
fn browse_series<G: MetadataGateway>(
    session: &mut BrowseController<G>,
    series_id: u64,
    config: &Config,
) -> Result<(), MoviegramError> {
    session.open_series(series_id);

    let detail = match session.series_view() {
        SeriesView::Ready(detail) => detail.clone(),
        SeriesView::Loading => {
            println!("Loading...");
            return Ok(());
        }
        SeriesView::ErrorDisplay(message) => {
            eprintln!("Error: {}", message);
            return Ok(());
        }
        SeriesView::NotFound => {
            println!("Series not found");
            return Ok(());
        }
    };

    println!(
        "\n=== {} ===\n★ {} • {} • {} Seasons\n{}\n",
        detail.name,
        detail.rating_label(),
        detail.first_air_year.as_deref().unwrap_or("N/A"),
        detail.number_of_seasons,
        detail.overview
    );

    loop {
        let season = session.state().active_season();
        println!("--- Season {} ---", season);
        print_season_view(session.season_view());

        let episodes = match session.season_view() {
            SeasonView::Populated(episodes) => episodes.to_vec(),
            _ => Vec::new(),
        };

        let mut labels: Vec<String> = episodes
            .iter()
            .map(|e| format!("Episode {}: {}", e.number, e.name))
            .collect();
        labels.push("Change season".to_string());
        labels.push("Back".to_string());

        let choice = Select::new()
            .with_prompt(format!("{} - Season {}", detail.name, season))
            .items(&labels)
            .default(0)
            .interact()?;

        if choice < episodes.len() {
            pick_episode(session, season, episodes[choice].number, &config.embed_base_url);
        } else if choice == episodes.len() {
            let seasons: Vec<u32> = detail.season_options().collect();
            if seasons.is_empty() {
                println!("This series has no seasons.");
                continue;
            }
            let season_labels: Vec<String> =
                seasons.iter().map(|s| format!("Season {}", s)).collect();
            let picked = Select::new()
                .with_prompt("Season")
                .items(&season_labels)
                .default(seasons.iter().position(|s| *s == season).unwrap_or(0))
                .interact()?;
            if let Err(e) = session.switch_season(seasons[picked]) {
                eprintln!("Error: {}", e);
            }
        } else {
            return Ok(());
        }
    }
}

/// Interactive loop: tab, query, title, then playback or series browsing.
fn browse<G: MetadataGateway>(
    session: &mut BrowseController<G>,
    config: &Config,
) -> Result<(), MoviegramError> {
    let tabs = ["Movies", "TV Series", "Quit"];

    loop {
        let current = match session.state().active_kind() {
            MediaKind::Movie => 0,
            MediaKind::Series => 1,
        };
        let kind = match Select::new()
            .with_prompt("Catalog")
            .items(&tabs)
            .default(current)
            .interact()?
        {
            0 => MediaKind::Movie,
            1 => MediaKind::Series,
            _ => return Ok(()),
        };
        session.set_active_kind(kind);

        let query: String = Input::new()
            .with_prompt(format!("Search {}", kind.plural()))
            .allow_empty(true)
            .interact_text()?;
        session.search(&query);

        let titles = match session.results_view() {
            ResultsView::Populated(titles) => titles.to_vec(),
            view => {
                print_results_view(view, kind, &config.image_base_url);
                continue;
            }
        };

        let mut labels: Vec<String> = titles
            .iter()
            .map(|t| format!("{} ({}) ★ {}", t.name, t.year_label(), t.rating_label()))
            .collect();
        labels.push("Back".to_string());

        let choice = Select::new()
            .with_prompt("Pick a title")
            .items(&labels)
            .default(0)
            .interact()?;
        let Some(title) = titles.get(choice) else {
            continue;
        };

        match title.destination() {
            Destination::Playback(target) => print_target(&target, &config.embed_base_url),
            Destination::SeriesDetail { series_id } => browse_series(session, series_id, config)?,
        }
    }
}

fn run(cli: Cli) -> Result<bool, MoviegramError> {
    let config = cli.config();

    match cli.command {
        Command::Resolve { kind, ids } => {
            let target = resolve_playback_target(kind.into(), &ids)?;
            print_target(&target, &config.embed_base_url);
            Ok(true)
        }
        Command::Search { kind, query } => {
            let mut session = open_session(&config)?;
            let kind = MediaKind::from(kind);
            session.set_active_kind(kind);
            session.search(&query.join(" "));
            Ok(print_results_view(
                session.results_view(),
                kind,
                &config.image_base_url,
            ))
        }
        Command::Episodes { series_id, season } => {
            let mut session = open_session(&config)?;
            match session.get_or_fetch_season(series_id, season)? {
                Some(entry) => {
                    println!("--- Season {} ---", entry.season_number);
                    for episode in &entry.episodes {
                        let target = PlaybackTarget::Episode {
                            series_id,
                            season_number: entry.season_number,
                            episode_number: episode.number,
                        };
                        println!(
                            "  Episode {:>2}: {} ({})  -> {}",
                            episode.number,
                            episode.name,
                            episode.air_date_label(),
                            target.path()
                        );
                    }
                    Ok(true)
                }
                None => {
                    if let Some(message) = session.state().last_error() {
                        eprintln!("Error: {}", message);
                    }
                    Ok(false)
                }
            }
        }
        Command::Browse => {
            let mut session = open_session(&config)?;
            browse(&mut session, &config)?;
            Ok(true)
        }
    }
}

fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
