use clap::Parser;
use local_wildlife::config::cli::{Command, ExploreArgs, FactsArgs, SpeciesArgs};
use local_wildlife::core::export::export_file_name;
use local_wildlife::domain::ports::ObservationSource;
use local_wildlife::utils::error::ErrorSeverity;
use local_wildlife::utils::{logger, validation::Validate};
use local_wildlife::{
    normalize, AppConfig, ChatCompletionClient, CliConfig, ExportFormat, FactGenerator,
    INatClient, LocalStorage, Place, Result, Session, SpeciesExporter, SpeciesRecord,
    TaxonGroup, WildlifeError, WildlifeService,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting local-wildlife CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        // 查無資料不是錯誤，只提示使用者
        if e.is_expected() {
            println!("{}", e.user_friendly_message());
            return;
        }

        tracing::error!(
            "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

fn load_config(cli: &CliConfig) -> Result<AppConfig> {
    let config = match &cli.config {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            AppConfig::from_file(path)?
        }
        None => AppConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn resolve_group(explicit: Option<TaxonGroup>, config: &AppConfig) -> Result<TaxonGroup> {
    explicit
        .or(config.defaults.taxon_group)
        .ok_or_else(|| WildlifeError::MissingConfigError {
            field: "--group (or defaults.taxon_group)".to_string(),
        })
}

fn fact_generator(config: &AppConfig, api_key: String) -> Result<FactGenerator<ChatCompletionClient>> {
    let client = ChatCompletionClient::new(&config.llm, api_key)?;
    Ok(FactGenerator::from_config(client, &config.cache))
}

async fn run(cli: CliConfig) -> Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Command::Locations { query } => locations(&config, &query).await,
        Command::Species(args) => species(&config, args).await,
        Command::Facts(args) => facts(&config, args).await,
        Command::Explore(args) => explore(&config, args).await,
    }
}

async fn locations(config: &AppConfig, query: &str) -> Result<()> {
    let inat = INatClient::new(&config.inaturalist)?;
    let places = inat.resolve_locations(query).await?;

    if places.is_empty() {
        println!("No matching places. Try spelling out the entire name and the state abbreviation.");
        return Ok(());
    }
    print_places(&places);
    Ok(())
}

async fn species(config: &AppConfig, args: SpeciesArgs) -> Result<()> {
    let group = resolve_group(args.group, config)?;
    let inat = INatClient::new(&config.inaturalist)?;

    let page = inat.fetch_species_counts(args.place_id, group).await?;
    let records = normalize(&page).into_records()?;

    println!("{} species observed", records.len());
    print_species(&records, args.limit);

    if args.export {
        let format: ExportFormat = args.format.as_deref().unwrap_or(&config.output.format).parse()?;
        let exporter = SpeciesExporter::new(LocalStorage::new(&config.output.path));
        let file_name = export_file_name(args.place_id, group, format);
        exporter
            .export(&records, args.place_id, None, Some(group), format, &file_name)
            .await?;
        println!(
            "📁 Saved to {}",
            exporter.storage().full_path(&file_name).display()
        );
    }
    Ok(())
}

async fn facts(config: &AppConfig, args: FactsArgs) -> Result<()> {
    let generator = fact_generator(config, config.resolve_api_key()?)?;
    let text = generator.generate_text(&args.species, args.template).await?;
    println!("{}", text);
    Ok(())
}

async fn explore(config: &AppConfig, args: ExploreArgs) -> Result<()> {
    let group = resolve_group(args.group, config)?;
    // 只有要產生描述時才需要 API key
    let api_key = match args.species {
        Some(_) => config.resolve_api_key()?,
        None => config.resolve_api_key().unwrap_or_default(),
    };

    let service = WildlifeService::new(
        INatClient::new(&config.inaturalist)?,
        fact_generator(config, api_key)?,
    );
    let mut session = Session::with_group(group);

    let candidates = service.search(&mut session, &args.query).await?;
    if candidates.is_empty() {
        println!("No matching places. Try spelling out the entire name and the state abbreviation.");
        return Ok(());
    }
    print_places(candidates);

    service.select_place(&mut session, args.pick)?;
    if let Some(title) = session.title() {
        println!("\n## {}", title);
    }

    let records = service.load_species(&mut session).await?.into_records()?;
    println!("{} species observed", records.len());
    print_species(&records, args.limit);

    if let Some(index) = args.species {
        let record = service.select_species(&mut session, index)?;
        println!("\n# {}", record.common_name);
        println!("_{}_ ({} observations)", record.scientific_name, record.observation_count);
        if let Some(image) = &record.image_url {
            println!("{}", image);
        }
        let text = service.species_text(&session, args.template).await?;
        println!("\n{}", text);
    }
    Ok(())
}

fn print_places(places: &[Place]) {
    for (index, place) in places.iter().enumerate() {
        let place_type = place
            .place_type
            .map(|code| code.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("[{:>2}] {:<50} id={:<8} type={}", index, place.name, place.id, place_type);
    }
}

fn print_species(records: &[SpeciesRecord], limit: Option<usize>) {
    let shown = limit.unwrap_or(records.len()).min(records.len());
    for (index, record) in records.iter().take(shown).enumerate() {
        println!(
            "[{:>3}] {:<35} {:<35} {:>7}",
            index, record.common_name, record.scientific_name, record.observation_count
        );
    }
    if shown < records.len() {
        println!("... {} more", records.len() - shown);
    }
}
