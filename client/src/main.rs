//! Docket - upsert demo against a Parse-style document store.
//!
//! Creates an `Address`, then changes two fields and saves again so that
//! only those fields travel in the update.

use docket_client::{connect, Address, Config};
use docket_engine::Model;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docket=info,docket_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Using API at {}", config.client.base_url);

    let client = connect(&config)?;

    let mut address = Address::new();
    address.set_name("Test name");
    address.set_description("Lorem ipsum pouet pen erj ejrl ekjrel");
    {
        let entity = address.entity_mut();
        entity.set("price", 350000);
        entity.set("type", "appt");
        entity.set("active", true);
        entity.set("address", "53 rue des petits champs");
        entity.set("zip", "75002");
        entity.set("city", "Paris");
        entity.set("rooms", 3);
        entity.set("surface", 42);
    }
    address.set_loc_info("district", 2)?;
    address.push_metro("Bourse")?;

    address.save(&client)?;
    tracing::info!(id = ?address.id(), "created address");

    address.set_name("toto test 2");
    address.entity_mut().set("address", "42 rue des sablons");
    tracing::info!(
        payload = %serde_json::Value::Object(address.entity().update_payload()),
        "updating address"
    );
    address.save(&client)?;

    println!("saved: {}", serde_json::to_string(address.entity().record())?);

    Ok(())
}
