use job_config_rust::config::AppConfig;
use job_config_rust::logic::SalesAgreementLoader;
use job_config_rust::model::SessionContext;
use job_config_rust::seed;
use job_config_rust::store::InMemoryStore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new().filter_level(LevelFilter::Info).init();

    println!("JobConfig: Sales Agreement Configuration Core");

    let config = AppConfig::load()?;

    let store = Arc::new(InMemoryStore::new());
    let agreement_id = seed::load_seed_data(&store);
    println!("Seed data loaded, sales agreement {}", agreement_id);

    let loader = SalesAgreementLoader::with_capacity(store, config.loader.event_capacity);
    let ctx = SessionContext::for_community(seed::DEMO_COMMUNITY_ID);

    match loader.load(&ctx, &agreement_id).await {
        Ok(Some(loaded)) => {
            println!(
                "Loaded job {}: plan {:?}, handing {:?}, {} selected choices",
                loaded.job.id,
                loaded.selected_plan_id,
                loaded.selected_handing,
                loaded.selected_choices.len()
            );
            println!("{}", serde_json::to_string_pretty(&loaded.selected_choices)?);
        }
        Ok(None) => println!("Load superseded by a newer one"),
        Err(error) => println!("Load failed: {}", error),
    }

    Ok(())
}
